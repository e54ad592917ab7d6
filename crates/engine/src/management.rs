//! Sentinel counter fields ("management form").

use formset_dom::{Document, DocumentError, NodeId};
use formset_types::ManagementField;
use tracing::warn;

use crate::policy::VisibilityPolicy;

/// Counter values carried by the sentinel hidden inputs of one prefix.
///
/// Absent, empty or non-numeric fields read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementForm {
    pub prefix: String,
    pub total_forms: Option<usize>,
    pub initial_forms: Option<usize>,
    pub min_num_forms: Option<usize>,
    pub max_num_forms: Option<usize>,
}

impl ManagementForm {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn read(document: &Document, prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            total_forms: read_counter(document, prefix, ManagementField::TotalForms),
            initial_forms: read_counter(document, prefix, ManagementField::InitialForms),
            min_num_forms: read_counter(document, prefix, ManagementField::MinNumForms),
            max_num_forms: read_counter(document, prefix, ManagementField::MaxNumForms),
        }
    }

    pub fn policy(&self) -> VisibilityPolicy {
        VisibilityPolicy {
            min_num_forms: self.min_num_forms,
            max_num_forms: self.max_num_forms,
        }
    }

    pub fn get(&self, field: ManagementField) -> Option<usize> {
        match field {
            ManagementField::TotalForms => self.total_forms,
            ManagementField::InitialForms => self.initial_forms,
            ManagementField::MinNumForms => self.min_num_forms,
            ManagementField::MaxNumForms => self.max_num_forms,
        }
    }

    /// Appends one hidden input per counter to `parent`; unset counters get an empty value.
    pub fn insert_into(&self, document: &mut Document, parent: NodeId) -> Result<Vec<NodeId>, DocumentError> {
        let mut inserted = Vec::with_capacity(ManagementField::ALL.len());
        for field in ManagementField::ALL {
            let value = self.get(field).map(|count| count.to_string()).unwrap_or_default();
            let input = document.create_element_with(
                "input",
                &[
                    ("type", "hidden"),
                    ("name", field.field_name(&self.prefix).as_str()),
                    ("id", field.element_id(&self.prefix).as_str()),
                    ("value", value.as_str()),
                ],
            );
            document.append_child(parent, input)?;
            inserted.push(input);
        }
        Ok(inserted)
    }
}

/// Reads one counter; absent or blank values are unbounded.
pub fn read_counter(document: &Document, prefix: &str, field: ManagementField) -> Option<usize> {
    let element_id = field.element_id(prefix);
    let node = document.get_element_by_id(&element_id)?;
    let raw = document.value(node)?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<usize>() {
        Ok(count) => Some(count),
        Err(error) => {
            warn!(field = %element_id, value = raw, error = %error, "Ignoring non-numeric formset counter");
            None
        }
    }
}

/// Writes the total-forms counter. Returns `false` when the sentinel is absent.
pub fn write_total_forms(document: &mut Document, prefix: &str, total: usize) -> bool {
    let Some(node) = document.get_element_by_id(&ManagementField::TotalForms.element_id(prefix)) else {
        return false;
    };
    document.set_value(node, total.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserted_counters_read_back() {
        let mut document = Document::new();
        let root = document.root();
        let form = ManagementForm {
            prefix: "item".to_string(),
            total_forms: Some(2),
            initial_forms: Some(1),
            min_num_forms: None,
            max_num_forms: Some(5),
        };
        let inserted = form.insert_into(&mut document, root).expect("insert management form");
        assert_eq!(inserted.len(), 4);
        assert_eq!(document.attr(inserted[0], "name"), Some("item-TOTAL_FORMS"));
        assert_eq!(ManagementForm::read(&document, "item"), form);
    }

    #[test]
    fn blank_and_garbage_counters_are_unbounded() {
        let mut document = Document::new();
        let root = document.root();
        let min = document.create_element_with("input", &[("id", "id_item-MIN_NUM_FORMS"), ("value", " ")]);
        let max = document.create_element_with("input", &[("id", "id_item-MAX_NUM_FORMS"), ("value", "lots")]);
        document.append_child(root, min).expect("append min");
        document.append_child(root, max).expect("append max");

        let form = ManagementForm::read(&document, "item");
        assert_eq!(form.min_num_forms, None);
        assert_eq!(form.max_num_forms, None);
        assert_eq!(form.total_forms, None);
        assert!(!write_total_forms(&mut document, "item", 3));
    }

    #[test]
    fn writes_total_forms() {
        let mut document = Document::new();
        let root = document.root();
        ManagementForm::new("item").insert_into(&mut document, root).expect("insert management form");
        assert!(write_total_forms(&mut document, "item", 7));
        assert_eq!(read_counter(&document, "item", ManagementField::TotalForms), Some(7));
    }
}
