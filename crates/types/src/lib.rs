//! Shared type definitions for the formset workspace.
//!
//! These types carry no behaviour that touches a document: they describe how
//! repeated form rows are named (`FieldIdentifier`, `FormIndex`), which sentinel
//! fields carry the row counters (`ManagementField`), and how a formset is
//! configured (`FormsetOptions`).

pub mod field_identifier;
pub mod management;
pub mod options;

pub use field_identifier::{FieldIdentifier, FormIndex, ParseFormIndexError, PLACEHOLDER_TOKEN, rewrite_index};
pub use management::{DELETE_FIELD_SUFFIX, ManagementField};
pub use options::{CUSTOM_TEMPLATE_CLASS, ERROR_MESSAGE_CLASS, FIELD_ELEMENT_SELECTOR, FormsetOptions};
