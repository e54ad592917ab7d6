//! # Formset Engine
//!
//! The Formset Engine turns a group of repeated form rows inside a
//! [`formset_dom::Document`] into a dynamic formset: users can add rows
//! cloned from a template and remove rows, while field identifiers and the
//! management counters stay consistent with what a server-side formset
//! expects on submit.
//!
//! ## Key Features
//!
//! - **Delete affordances**: each visible row gets a delete link whose
//!   placement follows the row's container (table row, list, plain block).
//! - **Templates**: new rows are cloned from a user-supplied template or from
//!   a cleared copy of the last row.
//! - **Renumbering**: `prefix-<index>-` segments in `id`, `name` and `for`
//!   attributes are rewritten so indices stay dense after removals.
//! - **Soft deletion**: rows rendered with a delete checkbox are hidden and
//!   marked instead of detached.
//! - **Listeners**: [`FormsetListener`] hooks observe every add and remove.
//!
//! ## Usage
//!
//! ```rust
//! use formset_dom::{Document, NodeSpec};
//! use formset_engine::FormsetManager;
//! use formset_types::FormsetOptions;
//!
//! let row = NodeSpec::element("div")
//!     .with_attr("class", "item")
//!     .with_child(NodeSpec::element("input").with_attr("name", "item-0-title"));
//! let mut document = Document::from_specs(&[row])?;
//!
//! let options = FormsetOptions::with_prefix("item");
//! let mut manager = FormsetManager::attach_selector(&mut document, ".item", options, formset_engine::NoopListener)?;
//! let added = manager.add_form(&mut document).expect("row added");
//! assert_eq!(added.index, 1);
//! assert_eq!(manager.visible_forms(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`manager`**: [`FormsetManager`], the entry point tying everything together
//! - **`template`**: custom template adoption and last-row cloning
//! - **`affordance`**: placement of add and delete links
//! - **`renumber`**: index rewriting in field attributes
//! - **`management`**: reading and writing the sentinel counters
//! - **`policy`**: min/max visibility rules
//! - **`listener`**: add/remove notifications

pub mod affordance;
pub mod listener;
pub mod management;
pub mod manager;
pub mod policy;
pub mod renumber;
pub mod selectors;
pub mod template;

pub use affordance::{AddAffordance, VOID_HREF};
pub use listener::{EventLog, FormAdded, FormRemoved, FormsetEvent, FormsetListener, NoopListener};
pub use management::{ManagementForm, read_counter, write_total_forms};
pub use manager::{DELETE_MARKER_ON, FormsetManager, is_soft_deleted};
pub use policy::VisibilityPolicy;
pub use renumber::{INDEXED_ATTRIBUTES, renumber_field, renumber_row};
pub use selectors::{RowSelectors, class_selector};
pub use template::{NUMBER_FIELD_RESET_VALUE, clear_fields};
