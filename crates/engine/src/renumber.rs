//! Rewriting of the row index embedded in field attributes.

use formset_dom::{Document, NodeId, Selector};
use formset_types::{FormIndex, rewrite_index};
use tracing::trace;

/// Attributes that carry the `prefix-<index>-` segment.
pub const INDEXED_ATTRIBUTES: [&str; 3] = ["for", "id", "name"];

/// Points a single field at row `index`.
///
/// Attributes that do not embed a `prefix-<index>-` segment are left as they
/// are. Returns `true` when at least one attribute changed.
pub fn renumber_field(document: &mut Document, field: NodeId, prefix: &str, index: FormIndex) -> bool {
    let mut changed = false;
    for attribute in INDEXED_ATTRIBUTES {
        let Some(current) = document.attr(field, attribute) else {
            continue;
        };
        let Some(rewritten) = rewrite_index(current, prefix, index) else {
            continue;
        };
        if rewritten != current {
            trace!(attribute, from = current, to = %rewritten, "Renumbering field attribute");
            document.set_attr(field, attribute, rewritten);
            changed = true;
        }
    }
    changed
}

/// Renumbers every field of `row` matching `fields`. Returns the number of fields changed.
pub fn renumber_row(document: &mut Document, row: NodeId, fields: &Selector, prefix: &str, index: FormIndex) -> usize {
    let targets = document.select_within(row, fields);
    targets
        .into_iter()
        .filter(|field| renumber_field(document, *field, prefix, index))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formset_types::FIELD_ELEMENT_SELECTOR;

    #[test]
    fn rewrites_id_name_and_label_target() {
        let mut document = Document::new();
        let row = document.create_element("div");
        let label = document.create_element_with("label", &[("for", "id_item-0-title")]);
        let input = document.create_element_with("input", &[("id", "id_item-0-title"), ("name", "item-0-title"), ("value", "item-0-x")]);
        let link = document.create_element_with("a", &[("id", "item-0-link")]);
        for child in [label, input, link] {
            document.append_child(row, child).expect("append");
        }

        let fields = Selector::parse(FIELD_ELEMENT_SELECTOR).expect("field selector");
        let changed = renumber_row(&mut document, row, &fields, "item", FormIndex::Position(3));

        assert_eq!(changed, 2);
        assert_eq!(document.attr(label, "for"), Some("id_item-3-title"));
        assert_eq!(document.attr(input, "id"), Some("id_item-3-title"));
        assert_eq!(document.attr(input, "name"), Some("item-3-title"));
        assert_eq!(document.attr(input, "value"), Some("item-0-x"));
        assert_eq!(document.attr(link, "id"), Some("item-0-link"));
    }

    #[test]
    fn unchanged_fields_report_false() {
        let mut document = Document::new();
        let input = document.create_element_with("input", &[("name", "item-2-title"), ("id", "custom")]);
        assert!(!renumber_field(&mut document, input, "item", FormIndex::Position(2)));
        assert!(renumber_field(&mut document, input, "item", FormIndex::Placeholder));
        assert_eq!(document.attr(input, "name"), Some("item-__prefix__-title"));
        assert_eq!(document.attr(input, "id"), Some("custom"));
    }
}
