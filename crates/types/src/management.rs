//! Names of the sentinel ("management") fields that travel with a formset.

/// Id suffix of the per-row boolean toggle that requests deletion.
pub const DELETE_FIELD_SUFFIX: &str = "-DELETE";

/// Hidden inputs holding the row counters of a formset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagementField {
    /// Number of rows submitted with the form.
    TotalForms,
    /// Number of rows that were rendered from existing data.
    InitialForms,
    /// Lower bound on visible rows; empty means unbounded.
    MinNumForms,
    /// Upper bound on visible rows; empty means unbounded.
    MaxNumForms,
}

impl ManagementField {
    pub const ALL: [ManagementField; 4] = [Self::TotalForms, Self::InitialForms, Self::MinNumForms, Self::MaxNumForms];

    pub fn key(self) -> &'static str {
        match self {
            Self::TotalForms => "TOTAL_FORMS",
            Self::InitialForms => "INITIAL_FORMS",
            Self::MinNumForms => "MIN_NUM_FORMS",
            Self::MaxNumForms => "MAX_NUM_FORMS",
        }
    }

    /// Value of the `name` attribute, e.g. `item-TOTAL_FORMS`.
    pub fn field_name(self, prefix: &str) -> String {
        format!("{prefix}-{}", self.key())
    }

    /// Value of the `id` attribute, e.g. `id_item-TOTAL_FORMS`.
    pub fn element_id(self, prefix: &str) -> String {
        format!("id_{}", self.field_name(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_names_follow_prefix() {
        assert_eq!(ManagementField::TotalForms.field_name("item"), "item-TOTAL_FORMS");
        assert_eq!(ManagementField::MaxNumForms.element_id("item"), "id_item-MAX_NUM_FORMS");
        assert_eq!(ManagementField::MinNumForms.element_id("form"), "id_form-MIN_NUM_FORMS");
    }
}
