//! Serializable description of document subtrees, used for fixtures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentError};
use crate::node::{NodeId, NodeKind};

/// A subtree as it appears in JSON or YAML fixtures.
///
/// ```json
/// { "tag": "tr", "attrs": { "class": "row" }, "children": [ { "text": "cell" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text {
        text: String,
    },
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        attrs: IndexMap<String, String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        hidden: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    pub fn element(tag: impl Into<String>) -> Self {
        NodeSpec::Element {
            tag: tag.into(),
            attrs: IndexMap::new(),
            hidden: false,
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeSpec::Text { text: text.into() }
    }

    /// Adds an attribute; no-op on text specs.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let NodeSpec::Element { attrs, .. } = &mut self {
            attrs.insert(name.to_string(), value.into());
        }
        self
    }

    /// Appends a child; no-op on text specs.
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        if let NodeSpec::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn hidden(mut self) -> Self {
        if let NodeSpec::Element { hidden, .. } = &mut self {
            *hidden = true;
        }
        self
    }
}

impl Document {
    /// Builds a document whose root holds the given subtrees.
    pub fn from_specs(specs: &[NodeSpec]) -> Result<Self, DocumentError> {
        let mut document = Document::new();
        let root = document.root();
        for spec in specs {
            document.append_spec(root, spec)?;
        }
        Ok(document)
    }

    /// Materializes `spec` as the last child of `parent`.
    pub fn append_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> Result<NodeId, DocumentError> {
        let node = self.build_spec(spec)?;
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Materializes `spec` as a detached subtree.
    pub fn build_spec(&mut self, spec: &NodeSpec) -> Result<NodeId, DocumentError> {
        match spec {
            NodeSpec::Text { text } => Ok(self.create_text(text.clone())),
            NodeSpec::Element {
                tag,
                attrs,
                hidden,
                children,
            } => {
                let node = self.create_element(tag);
                for (name, value) in attrs {
                    self.set_attr(node, name, value.clone());
                }
                if *hidden {
                    self.hide(node);
                }
                for child in children {
                    self.append_spec(node, child)?;
                }
                Ok(node)
            }
        }
    }

    /// Captures the subtree rooted at `node`.
    pub fn to_spec(&self, node: NodeId) -> NodeSpec {
        match self.kind(node) {
            NodeKind::Text(text) => NodeSpec::Text { text: text.clone() },
            NodeKind::Element(element) => NodeSpec::Element {
                tag: element.tag().to_string(),
                attrs: element.attributes().clone(),
                hidden: self.is_hidden(node),
                children: self.children(node).iter().map(|child| self.to_spec(*child)).collect(),
            },
        }
    }

    /// Captures every subtree attached to the root.
    pub fn to_specs(&self) -> Vec<NodeSpec> {
        self.children(self.root()).iter().map(|child| self.to_spec(*child)).collect()
    }
}
