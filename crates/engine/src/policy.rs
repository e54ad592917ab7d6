//! Visibility rules for the add and delete affordances.

/// Bounds on the number of visible rows. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityPolicy {
    pub min_num_forms: Option<usize>,
    pub max_num_forms: Option<usize>,
}

impl VisibilityPolicy {
    /// The add affordance is shown while another row fits under the maximum.
    pub fn can_add(&self, visible_forms: usize) -> bool {
        self.max_num_forms.is_none_or(|max| max > visible_forms)
    }

    /// Delete affordances are shown while the count stays above the minimum.
    pub fn can_delete(&self, visible_forms: usize) -> bool {
        self.min_num_forms.is_none_or(|min| visible_forms > min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_policy_allows_everything() {
        let policy = VisibilityPolicy::default();
        assert!(policy.can_add(0));
        assert!(policy.can_add(10_000));
        assert!(policy.can_delete(0));
    }

    #[test]
    fn bounds_are_exclusive() {
        let policy = VisibilityPolicy {
            min_num_forms: Some(1),
            max_num_forms: Some(3),
        };
        assert!(policy.can_add(2));
        assert!(!policy.can_add(3));
        assert!(!policy.can_add(4));
        assert!(!policy.can_delete(1));
        assert!(policy.can_delete(2));
        assert!(!policy.can_delete(0));
    }
}
