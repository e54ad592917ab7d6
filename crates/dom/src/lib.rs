//! # Formset DOM
//!
//! A small, owned document model that offers the mutation surface a browser
//! DOM exposes to form helpers: element creation, insertion, deep cloning,
//! detaching, attribute and class access, show/hide and selector queries.
//!
//! ## Key Features
//!
//! - **Arena storage**: every node lives in the [`Document`] and is addressed by
//!   a copyable [`NodeId`]. Detached subtrees stay addressable so callers can
//!   still inspect a row after it was removed.
//! - **Selectors**: a compact CSS dialect ([`Selector`]) covering tag, id,
//!   class and attribute matchers joined by descendant combinators.
//! - **Fixtures**: [`NodeSpec`] (de)serializes subtrees as JSON or YAML.
//! - **Markup**: [`render`] prints a subtree as indented HTML.
//!
//! ## Usage
//!
//! ```rust
//! use formset_dom::{Document, Selector};
//!
//! let mut document = Document::new();
//! let row = document.create_element("div");
//! document.add_class(row, "dynamic-form");
//! let root = document.root();
//! document.append_child(root, row)?;
//!
//! let selector = Selector::parse(".dynamic-form")?;
//! assert_eq!(document.select(&selector), vec![row]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod document;
pub mod markup;
pub mod node;
pub mod selector;
pub mod spec;

pub use document::{Document, DocumentError};
pub use markup::render;
pub use node::{Element, NodeId, NodeKind};
pub use selector::{Selector, SelectorError};
pub use spec::NodeSpec;
