//! Formset configuration.

use serde::{Deserialize, Serialize};

/// Class marking a user-supplied template element that is never a live row.
pub const CUSTOM_TEMPLATE_CLASS: &str = "formset-custom-template";

/// Class of server-rendered error messages stripped from cloned templates.
pub const ERROR_MESSAGE_CLASS: &str = "has-text-danger";

/// Elements considered fields when renumbering or clearing a row.
pub const FIELD_ELEMENT_SELECTOR: &str = "input,select,textarea,label,div";

/// Options accepted when attaching a formset manager to a group of rows.
///
/// Keys are camelCase when (de)serialized; every key is optional and falls
/// back to the value documented on the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FormsetOptions {
    /// Field name namespace. Default `form`.
    pub prefix: String,
    /// Selector of an element cloned to build new rows. When absent, the last
    /// row is cloned instead.
    pub form_template: Option<String>,
    /// Label of the add link. Default `add another`.
    pub add_text: String,
    /// Label of the delete links. Default `remove`.
    pub delete_text: String,
    /// The add link is appended to every element whose class contains this text.
    pub add_container_class: Option<String>,
    /// Delete links are appended to every row descendant whose class contains this text.
    pub delete_container_class: Option<String>,
    /// Class list of the add link. Default `add-row`.
    pub add_css_class: String,
    /// Class list of the delete links. Default `delete-row`.
    pub delete_css_class: String,
    /// Class applied to each managed row. Default `dynamic-form`.
    pub form_css_class: String,
    /// Classes applied to rows in rotation by ordinal.
    pub extra_classes: Vec<String>,
    /// Selector of fields whose values survive cloning. Default empty.
    pub keep_field_values: String,
    /// Hide the last (empty) row when it serves as the template.
    pub hide_last_add_form: bool,
    /// Selector of the element displaying a row's number. Default `.clonedField`.
    pub row_number_css_class: String,
}

impl Default for FormsetOptions {
    fn default() -> Self {
        Self {
            prefix: "form".to_string(),
            form_template: None,
            add_text: "add another".to_string(),
            delete_text: "remove".to_string(),
            add_container_class: None,
            delete_container_class: None,
            add_css_class: "add-row".to_string(),
            delete_css_class: "delete-row".to_string(),
            form_css_class: "dynamic-form".to_string(),
            extra_classes: Vec::new(),
            keep_field_values: String::new(),
            hide_last_add_form: false,
            row_number_css_class: ".clonedField".to_string(),
        }
    }
}

impl FormsetOptions {
    /// Default options with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Class of the table row wrapping the add link in table layouts.
    pub fn add_row_class(&self) -> String {
        format!("{}-add", self.form_css_class)
    }

    /// The rotating class for the row at `ordinal`, if any are configured.
    pub fn extra_class_for(&self, ordinal: usize) -> Option<&str> {
        if self.extra_classes.is_empty() {
            return None;
        }
        Some(self.extra_classes[ordinal % self.extra_classes.len()].as_str())
    }

    /// Container class options treat an empty string as unset.
    pub fn add_container(&self) -> Option<&str> {
        non_blank(self.add_container_class.as_deref())
    }

    pub fn delete_container(&self) -> Option<&str> {
        non_blank(self.delete_container_class.as_deref())
    }

    pub fn template_selector(&self) -> Option<&str> {
        non_blank(self.form_template.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let options: FormsetOptions = serde_json::from_str("{}").expect("deserialize options");
        assert_eq!(options, FormsetOptions::default());
        assert_eq!(options.prefix, "form");
        assert_eq!(options.row_number_css_class, ".clonedField");
        assert!(!options.hide_last_add_form);
    }

    #[test]
    fn camel_case_keys_are_recognized() {
        let json = r##"{
            "prefix": "item",
            "formTemplate": "#item-template",
            "addText": "add item",
            "deleteCssClass": "delete-row btn",
            "extraClasses": ["odd", "even"],
            "keepFieldValues": "[name$=currency]",
            "hideLastAddForm": true
        }"##;
        let options: FormsetOptions = serde_json::from_str(json).expect("deserialize options");
        assert_eq!(options.prefix, "item");
        assert_eq!(options.template_selector(), Some("#item-template"));
        assert_eq!(options.add_text, "add item");
        assert_eq!(options.delete_css_class, "delete-row btn");
        assert_eq!(options.extra_class_for(3), Some("even"));
        assert!(options.hide_last_add_form);
        assert_eq!(options.delete_text, "remove");
    }

    #[test]
    fn yaml_options_deserialize() {
        let yaml = "prefix: line\naddContainerClass: toolbar\n";
        let options: FormsetOptions = serde_yaml::from_str(yaml).expect("deserialize yaml options");
        assert_eq!(options.prefix, "line");
        assert_eq!(options.add_container(), Some("toolbar"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<FormsetOptions>(r#"{"prefx": "typo"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn blank_optional_selectors_read_as_unset() {
        let options = FormsetOptions {
            form_template: Some("  ".to_string()),
            delete_container_class: Some(String::new()),
            ..Default::default()
        };
        assert!(options.template_selector().is_none());
        assert!(options.delete_container().is_none());
        assert!(options.extra_class_for(0).is_none());
        assert_eq!(FormsetOptions::with_prefix("item").add_row_class(), "dynamic-form-add");
    }
}
