//! Selectors derived once from the options of a formset.

use formset_dom::{Document, NodeId, Selector};
use formset_types::{ERROR_MESSAGE_CLASS, FIELD_ELEMENT_SELECTOR, FormsetOptions};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Turns a space-separated class list into a compound class selector body.
///
/// `"delete-row  btn"` becomes `"delete-row.btn"`.
pub fn class_selector(class_list: &str) -> String {
    static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
    WHITESPACE.replace_all(class_list.trim(), ".").into_owned()
}

/// Parses a selector coming from configuration, degrading to "match nothing".
pub fn parse_or_empty(option: &str, source: &str) -> Selector {
    Selector::parse(source).unwrap_or_else(|error| {
        warn!(option, selector = source, error = %error, "Ignoring invalid formset selector");
        Selector::empty()
    })
}

#[derive(Debug, Clone)]
pub struct RowSelectors {
    /// Field-like elements renumbered and cleared inside rows.
    pub fields: Selector,
    /// Fields whose values survive template cloning.
    pub keep_values: Selector,
    /// Element displaying the row number.
    pub row_number: Selector,
    /// Every managed row, template included.
    pub managed_rows: Selector,
    pub delete_links: Selector,
    pub error_messages: Selector,
}

impl RowSelectors {
    pub fn from_options(options: &FormsetOptions) -> Self {
        Self {
            fields: parse_or_empty("fields", FIELD_ELEMENT_SELECTOR),
            keep_values: parse_or_empty("keepFieldValues", &options.keep_field_values),
            row_number: parse_or_empty("rowNumberCssClass", &options.row_number_css_class),
            managed_rows: parse_or_empty("formCssClass", &format!(".{}", class_selector(&options.form_css_class))),
            delete_links: parse_or_empty("deleteCssClass", &format!("a.{}", class_selector(&options.delete_css_class))),
            error_messages: parse_or_empty("errorMessages", &format!(".{ERROR_MESSAGE_CLASS}")),
        }
    }

    pub fn has_fields(&self, document: &Document, row: NodeId) -> bool {
        !document.select_within(row, &self.fields).is_empty()
    }
}
