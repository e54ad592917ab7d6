//! HTML rendering of document subtrees.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &["area", "br", "col", "hr", "img", "input", "link", "meta"];
const HIDDEN_STYLE: &str = "display: none";

/// Renders `node` (or, for the root, its children) as indented HTML.
pub fn render(document: &Document, node: NodeId) -> String {
    let mut output = String::new();
    if node == document.root() {
        for child in document.children(node) {
            write_node(document, *child, 0, &mut output);
        }
    } else {
        write_node(document, node, 0, &mut output);
    }
    output
}

fn write_node(document: &Document, node: NodeId, depth: usize, output: &mut String) {
    let indent = "  ".repeat(depth);
    let element = match document.kind(node) {
        NodeKind::Text(text) => {
            if !text.trim().is_empty() {
                output.push_str(&indent);
                output.push_str(&escape(text.trim()));
                output.push('\n');
            }
            return;
        }
        NodeKind::Element(element) => element,
    };

    output.push_str(&indent);
    output.push('<');
    output.push_str(element.tag());
    let mut wrote_style = false;
    for (name, value) in element.attributes() {
        let value = if name == "style" && document.is_hidden(node) {
            wrote_style = true;
            format!("{}; {HIDDEN_STYLE}", value.trim_end_matches(';'))
        } else {
            value.clone()
        };
        output.push_str(&format!(" {name}=\"{}\"", escape(&value)));
    }
    if document.is_hidden(node) && !wrote_style {
        output.push_str(&format!(" style=\"{HIDDEN_STYLE}\""));
    }
    output.push('>');

    if VOID_ELEMENTS.contains(&element.tag()) {
        output.push('\n');
        return;
    }

    let children = document.children(node);
    let text_only = children.iter().all(|child| matches!(document.kind(*child), NodeKind::Text(_)));
    if text_only {
        output.push_str(&escape(&document.text_content(node)));
    } else {
        output.push('\n');
        for child in children {
            write_node(document, *child, depth + 1, output);
        }
        output.push_str(&indent);
    }
    output.push_str(&format!("</{}>\n", element.tag()));
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
