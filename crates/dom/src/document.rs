//! Arena-backed document tree.

use thiserror::Error;

use crate::node::{Element, NodeId, NodeKind};
use crate::selector::Selector;

/// Tag of the synthetic root element. Selectors never match it.
pub const ROOT_TAG: &str = "#document";

/// Errors raised by structural mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("{node} has no parent to insert next to")]
    Detached { node: NodeId },

    #[error("{node} is not an element")]
    NotAnElement { node: NodeId },

    #[error("cannot insert {child} inside itself or its descendant {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
}

/// Owns every node, attached or not.
///
/// Visibility is modelled by a per-element `hidden` flag (the equivalent of
/// `display: none`); a node is visible when it is attached to the root and
/// neither it nor any ancestor is hidden.
///
/// The arena is never compacted: detached and cloned subtrees keep their
/// slots for the lifetime of the document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Element(Element::new(ROOT_TAG)),
            parent: None,
            children: Vec::new(),
            hidden: false,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            hidden: false,
        });
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    /// Creates a detached element with the given attributes.
    pub fn create_element_with(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut element = Element::new(tag);
        for (name, value) in attributes {
            element.set_attr(name, *value);
        }
        self.push(NodeKind::Element(element))
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes[node.0].kind.as_element()
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes[node.0].kind.as_element_mut()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::tag)
    }

    pub fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag(node).is_some_and(|candidate| candidate.eq_ignore_ascii_case(tag))
    }

    // --- attributes -----------------------------------------------------

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|element| element.attr(name))
    }

    /// Sets an attribute. Text nodes are left untouched.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.element_mut(node).and_then(|element| element.remove_attr(name))
    }

    pub fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.element(node).is_some_and(|element| element.has_class(class_name))
    }

    pub fn add_class(&mut self, node: NodeId, class_names: &str) {
        if let Some(element) = self.element_mut(node) {
            element.add_class(class_names);
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class_names: &str) {
        if let Some(element) = self.element_mut(node) {
            element.remove_class(class_names);
        }
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "value")
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        self.set_attr(node, "value", value);
    }

    pub fn is_checked(&self, node: NodeId) -> bool {
        self.attr(node, "checked").is_some()
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        if checked {
            self.set_attr(node, "checked", "checked");
        } else {
            self.remove_attr(node, "checked");
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => self
                .descendants(node)
                .into_iter()
                .filter_map(|descendant| match &self.nodes[descendant.0].kind {
                    NodeKind::Text(text) => Some(text.as_str()),
                    NodeKind::Element(_) => None,
                })
                .collect(),
        }
    }

    /// Replaces the children of an element with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let NodeKind::Text(existing) = &mut self.nodes[node.0].kind {
            *existing = text.into();
            return;
        }
        self.remove_children(node);
        let text_node = self.create_text(text);
        self.link(node, text_node, None);
    }

    // --- visibility ---------------------------------------------------------

    pub fn hide(&mut self, node: NodeId) {
        self.nodes[node.0].hidden = true;
    }

    pub fn show(&mut self, node: NodeId) {
        self.nodes[node.0].hidden = false;
    }

    /// The node's own hidden flag, ignoring ancestors.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.nodes[node.0].hidden
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        node == self.root || self.ancestors(node).last() == Some(&self.root)
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.is_attached(node) && !self.is_hidden(node) && self.ancestors(node).iter().all(|ancestor| !self.is_hidden(*ancestor))
    }

    // --- navigation -----------------------------------------------------------

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node).iter().copied().filter(|child| self.is_element(*child)).collect()
    }

    /// Ancestors from the parent up to the outermost one.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(node);
        while let Some(ancestor) = current {
            ancestors.push(ancestor);
            current = self.parent(ancestor);
        }
        ancestors
    }

    /// Closest ancestor (excluding `node`) satisfying `predicate`.
    pub fn closest_ancestor(&self, node: NodeId, predicate: impl Fn(&Self, NodeId) -> bool) -> Option<NodeId> {
        self.ancestors(node).into_iter().find(|ancestor| predicate(self, *ancestor))
    }

    /// Every descendant in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut descendants = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            descendants.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        descendants
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|sibling| *sibling == node)?;
        siblings.get(position + 1).copied()
    }

    fn is_inclusive_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        candidate == node || self.ancestors(node).contains(&candidate)
    }

    // --- mutation -------------------------------------------------------------

    fn link(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let position = position.unwrap_or(children.len()).min(children.len());
        children.insert(position, child);
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        if !self.is_element(parent) {
            return Err(DocumentError::NotAnElement { node: parent });
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DocumentError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.link(parent, child, None);
        Ok(())
    }

    /// Moves `node` directly before `reference`.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) -> Result<(), DocumentError> {
        let parent = self.parent(reference).ok_or(DocumentError::Detached { node: reference })?;
        self.check_insertion(parent, node)?;
        self.detach(node);
        let position = self.children(parent).iter().position(|sibling| *sibling == reference);
        self.link(parent, node, position);
        Ok(())
    }

    /// Moves `node` directly after `reference`.
    pub fn insert_after(&mut self, node: NodeId, reference: NodeId) -> Result<(), DocumentError> {
        let parent = self.parent(reference).ok_or(DocumentError::Detached { node: reference })?;
        self.check_insertion(parent, node)?;
        self.detach(node);
        let position = self.children(parent).iter().position(|sibling| *sibling == reference).map(|position| position + 1);
        self.link(parent, node, position);
        Ok(())
    }

    /// Unlinks `node` from its parent. The subtree stays addressable.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|child| *child != node);
    }

    pub fn remove_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Copies the subtree rooted at `node`, including hidden flags.
    ///
    /// The copy is detached.
    pub fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let kind = self.nodes[node.0].kind.clone();
        let copy = self.push(kind);
        self.nodes[copy.0].hidden = self.nodes[node.0].hidden;
        let children = self.nodes[node.0].children.clone();
        for child in children {
            let child_copy = self.deep_clone(child);
            self.link(copy, child_copy, None);
        }
        copy
    }

    // --- queries ---------------------------------------------------------------

    /// Attached elements matching `selector`, in document order.
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.select_within(self.root, selector)
    }

    /// Descendants of `scope` matching `selector`, in document order.
    pub fn select_within(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        if selector.is_empty() {
            return Vec::new();
        }
        self.descendants(scope).into_iter().filter(|node| selector.matches(self, *node)).collect()
    }

    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(self, node)
    }

    /// First attached element whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|node| self.attr(*node, "id") == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_document() -> (Document, NodeId, Vec<NodeId>) {
        let mut document = Document::new();
        let list = document.create_element("ul");
        let root = document.root();
        document.append_child(root, list).expect("append list");
        let items: Vec<NodeId> = (0..3)
            .map(|index| {
                let id = format!("item-{index}");
                let item = document.create_element_with("li", &[("id", id.as_str())]);
                document.append_child(list, item).expect("append item");
                item
            })
            .collect();
        (document, list, items)
    }

    #[test]
    fn insert_before_and_after_keep_sibling_order() {
        let (mut document, list, items) = list_document();
        let before = document.create_element("li");
        let after = document.create_element("li");
        document.insert_before(before, items[1]).expect("insert before");
        document.insert_after(after, items[2]).expect("insert after");
        assert_eq!(document.children(list), &[items[0], before, items[1], items[2], after]);
        assert_eq!(document.next_sibling(items[2]), Some(after));
    }

    #[test]
    fn inserting_next_to_detached_node_fails() {
        let mut document = Document::new();
        let floating = document.create_element("div");
        let other = document.create_element("div");
        assert_eq!(document.insert_before(other, floating), Err(DocumentError::Detached { node: floating }));
    }

    #[test]
    fn cannot_append_into_own_descendant() {
        let (mut document, list, items) = list_document();
        let result = document.append_child(items[0], list);
        assert_eq!(result, Err(DocumentError::HierarchyRequest { parent: items[0], child: list }));
    }

    #[test]
    fn detached_subtrees_stay_addressable() {
        let (mut document, list, items) = list_document();
        document.set_text(items[1], "second");
        document.detach(items[1]);
        assert_eq!(document.children(list).len(), 2);
        assert!(!document.is_attached(items[1]));
        assert!(!document.is_visible(items[1]));
        assert_eq!(document.text_content(items[1]), "second");
        assert!(document.get_element_by_id("item-1").is_none());
        assert_eq!(document.get_element_by_id("item-2"), Some(items[2]));
    }

    #[test]
    fn visibility_follows_ancestors() {
        let (mut document, list, items) = list_document();
        assert!(document.is_visible(items[0]));
        document.hide(list);
        assert!(!document.is_hidden(items[0]));
        assert!(!document.is_visible(items[0]));
        document.show(list);
        document.hide(items[0]);
        assert!(!document.is_visible(items[0]));
        assert!(document.is_visible(items[1]));
    }

    #[test]
    fn deep_clone_copies_attributes_text_and_hidden_flags() {
        let (mut document, _, items) = list_document();
        let label = document.create_element("label");
        document.append_child(items[0], label).expect("append label");
        document.set_text(label, "Title");
        document.hide(label);

        let copy = document.deep_clone(items[0]);
        assert!(document.parent(copy).is_none());
        assert_eq!(document.attr(copy, "id"), Some("item-0"));
        let copied_label = document.children(copy)[0];
        assert_ne!(copied_label, label);
        assert!(document.is_hidden(copied_label));
        assert_eq!(document.text_content(copy), "Title");

        document.set_attr(copy, "id", "changed");
        assert_eq!(document.attr(items[0], "id"), Some("item-0"));
    }

    #[test]
    fn checked_and_value_helpers() {
        let mut document = Document::new();
        let checkbox = document.create_element_with("input", &[("type", "checkbox")]);
        document.set_checked(checkbox, true);
        assert!(document.is_checked(checkbox));
        document.set_checked(checkbox, false);
        assert!(!document.is_checked(checkbox));
        document.set_value(checkbox, "on");
        assert_eq!(document.value(checkbox), Some("on"));
    }
}
