//! Node payloads stored in the document arena.

use std::fmt;

use indexmap::IndexMap;

/// Handle to a node owned by a [`crate::Document`].
///
/// Ids are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

impl NodeKind {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }
}

/// An element: lowercase tag name plus attributes in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|candidate| candidate == class_name)
    }

    /// Adds every whitespace-separated class in `class_names` that is missing.
    pub fn add_class(&mut self, class_names: &str) {
        let mut classes: Vec<String> = self.classes().map(str::to_string).collect();
        for class_name in class_names.split_whitespace() {
            if !classes.iter().any(|existing| existing == class_name) {
                classes.push(class_name.to_string());
            }
        }
        self.store_classes(classes);
    }

    /// Removes every whitespace-separated class in `class_names`.
    pub fn remove_class(&mut self, class_names: &str) {
        let removed: Vec<&str> = class_names.split_whitespace().collect();
        let classes: Vec<String> = self
            .classes()
            .filter(|candidate| !removed.contains(candidate))
            .map(str::to_string)
            .collect();
        self.store_classes(classes);
    }

    fn store_classes(&mut self, classes: Vec<String>) {
        if classes.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", classes.join(" "));
        }
    }

    /// Lowercased `type` attribute, defaulting to `text` for inputs.
    pub fn input_type(&self) -> Option<String> {
        if self.tag != "input" {
            return None;
        }
        Some(self.attr("type").map(str::to_ascii_lowercase).unwrap_or_else(|| "text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_helpers_keep_order_and_dedupe() {
        let mut element = Element::new("TR");
        assert_eq!(element.tag(), "tr");
        element.add_class("dynamic-form odd");
        element.add_class("odd formset-custom-template");
        assert_eq!(element.attr("class"), Some("dynamic-form odd formset-custom-template"));

        element.remove_class("odd even");
        assert!(!element.has_class("odd"));
        assert!(element.has_class("formset-custom-template"));

        element.remove_class("dynamic-form formset-custom-template");
        assert!(element.attr("class").is_none());
    }

    #[test]
    fn input_type_defaults_to_text() {
        let mut input = Element::new("input");
        assert_eq!(input.input_type().as_deref(), Some("text"));
        input.set_attr("type", "CheckBox");
        assert_eq!(input.input_type().as_deref(), Some("checkbox"));
        assert!(Element::new("select").input_type().is_none());
    }
}
