//! Building the blueprint that new rows are cloned from.

use formset_dom::{Document, NodeId, Selector};
use formset_types::{CUSTOM_TEMPLATE_CLASS, FormIndex, FormsetOptions};
use tracing::{debug, warn};

use crate::renumber::renumber_row;
use crate::selectors::{RowSelectors, parse_or_empty};

/// Value given to numeric inputs of a cloned row.
pub const NUMBER_FIELD_RESET_VALUE: &str = "1";

/// Prepares a user-supplied template element in place.
///
/// The element keeps its position in the document, loses its `id`, is
/// tagged as a managed row plus [`CUSTOM_TEMPLATE_CLASS`], and its fields are
/// pointed at the placeholder index.
pub fn adopt_custom_template(document: &mut Document, selector_source: &str, options: &FormsetOptions, selectors: &RowSelectors) -> Option<NodeId> {
    let selector = parse_or_empty("formTemplate", selector_source);
    let Some(template) = document.select(&selector).into_iter().next() else {
        warn!(selector = selector_source, "Form template not found; cloning the last row instead");
        return None;
    };
    document.remove_attr(template, "id");
    document.add_class(template, &options.form_css_class);
    document.add_class(template, CUSTOM_TEMPLATE_CLASS);
    let renumbered = renumber_row(document, template, &selectors.fields, &options.prefix, FormIndex::Placeholder);
    debug!(%template, renumbered, "Adopted custom form template");
    Some(template)
}

/// Clones the last managed row into a detached, cleared template.
///
/// With `hideLastAddForm` the original last row is hidden first; the clone
/// inherits that state and is revealed when inserted.
pub fn clone_last_row(document: &mut Document, options: &FormsetOptions, selectors: &RowSelectors) -> Option<NodeId> {
    let Some(last_row) = document.select(&selectors.managed_rows).into_iter().last() else {
        warn!(prefix = %options.prefix, "No managed rows to derive a template from");
        return None;
    };
    if options.hide_last_add_form {
        document.hide(last_row);
    }

    let template = document.deep_clone(last_row);
    document.remove_attr(template, "id");
    for message in document.select_within(template, &selectors.error_messages) {
        document.detach(message);
    }
    clear_fields(document, template, &selectors.fields, &selectors.keep_values);
    debug!(source = %last_row, %template, "Cloned last row as form template");
    Some(template)
}

/// Resets the values of every field in `row` except those matching `keep`.
///
/// Checkboxes and radios are unchecked, selects lose their options, number
/// inputs reset to [`NUMBER_FIELD_RESET_VALUE`], textareas are emptied and
/// other inputs get an empty value.
pub fn clear_fields(document: &mut Document, row: NodeId, fields: &Selector, keep: &Selector) {
    let targets: Vec<NodeId> = document
        .select_within(row, fields)
        .into_iter()
        .filter(|field| !keep.matches(document, *field))
        .collect();

    for field in targets {
        let Some(element) = document.element(field) else {
            continue;
        };
        let tag = element.tag().to_string();
        let input_type = element.input_type();
        match (tag.as_str(), input_type.as_deref()) {
            ("input", Some("checkbox" | "radio")) => document.set_checked(field, false),
            ("input", Some("number")) => document.set_value(field, NUMBER_FIELD_RESET_VALUE),
            ("input", _) => document.set_value(field, ""),
            ("select", _) => document.remove_children(field),
            ("textarea", _) => document.remove_children(field),
            _ => {}
        }
    }
}
