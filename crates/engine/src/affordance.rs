//! Placement of the add and delete links.

use formset_dom::{Document, NodeId};
use formset_types::FormsetOptions;
use tracing::warn;

pub const VOID_HREF: &str = "javascript:void(0)";

/// The add link and the element shown or hidden to toggle it.
///
/// In table layouts the link sits in its own table row, which is the toggle;
/// otherwise the link toggles itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddAffordance {
    pub link: NodeId,
    pub toggle: NodeId,
}

pub fn create_link(document: &mut Document, css_class: &str, text: &str) -> NodeId {
    let link = document.create_element_with("a", &[("class", css_class), ("href", VOID_HREF)]);
    document.set_text(link, text);
    link
}

fn append_or_warn(document: &mut Document, parent: NodeId, child: NodeId) -> bool {
    match document.append_child(parent, child) {
        Ok(()) => true,
        Err(error) => {
            warn!(%parent, error = %error, "Could not place formset link");
            false
        }
    }
}

fn class_attribute_contains(document: &Document, node: NodeId, needle: &str) -> bool {
    document.attr(node, "class").is_some_and(|classes| classes.contains(needle))
}

/// Adds delete links to `row` following its container shape. Returns the links.
pub fn insert_delete_links(document: &mut Document, row: NodeId, options: &FormsetOptions) -> Vec<NodeId> {
    let mut targets = Vec::new();
    if let Some(container_class) = options.delete_container() {
        targets.extend(
            document
                .descendants(row)
                .into_iter()
                .filter(|node| class_attribute_contains(document, *node, container_class)),
        );
    } else if document.is_tag(row, "tr") {
        let last_cell = document.element_children(row).last().copied();
        targets.push(last_cell.unwrap_or(row));
    } else if document.is_tag(row, "ul") || document.is_tag(row, "ol") {
        let item = document.create_element("li");
        if append_or_warn(document, row, item) {
            targets.push(item);
        }
    } else {
        targets.push(row);
    }

    let mut links = Vec::with_capacity(targets.len());
    for target in targets {
        let link = create_link(document, &options.delete_css_class, &options.delete_text);
        if append_or_warn(document, target, link) {
            links.push(link);
        }
    }
    links
}

/// Inserts the add link next to the managed rows.
pub fn insert_add_affordances(document: &mut Document, rows: &[NodeId], options: &FormsetOptions) -> Vec<AddAffordance> {
    let Some(last_row) = rows.last().copied() else {
        return Vec::new();
    };

    if let Some(container_class) = options.add_container() {
        let root = document.root();
        let containers: Vec<NodeId> = document
            .descendants(root)
            .into_iter()
            .filter(|node| class_attribute_contains(document, *node, container_class))
            .collect();
        let mut affordances = Vec::with_capacity(containers.len());
        for container in containers {
            let link = create_link(document, &options.add_css_class, &options.add_text);
            if append_or_warn(document, container, link) {
                affordances.push(AddAffordance { link, toggle: link });
            }
        }
        return affordances;
    }

    if rows.iter().any(|row| document.is_tag(*row, "tr")) {
        let first_row = rows[0];
        let Some(body) = document.parent(first_row) else {
            warn!(row = %first_row, "Table rows are detached; skipping add link");
            return Vec::new();
        };
        let column_count = document.element_children(first_row).len();
        let button_row = document.create_element_with("tr", &[("class", options.add_row_class().as_str())]);
        let cell = document.create_element_with("td", &[("colspan", column_count.to_string().as_str())]);
        let link = create_link(document, &options.add_css_class, &options.add_text);
        if append_or_warn(document, cell, link) && append_or_warn(document, button_row, cell) && append_or_warn(document, body, button_row) {
            return vec![AddAffordance { link, toggle: button_row }];
        }
        return Vec::new();
    }

    let link = create_link(document, &options.add_css_class, &options.add_text);
    match document.insert_after(link, last_row) {
        Ok(()) => vec![AddAffordance { link, toggle: link }],
        Err(error) => {
            warn!(row = %last_row, error = %error, "Could not place add link after the last row");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formset_dom::NodeSpec;

    fn document_with(spec: NodeSpec) -> (Document, NodeId) {
        let document = Document::from_specs(&[spec]).expect("build document");
        let node = document.children(document.root())[0];
        (document, node)
    }

    #[test]
    fn table_rows_get_link_in_last_cell() {
        let (mut document, row) = document_with(
            NodeSpec::element("tr")
                .with_child(NodeSpec::element("td"))
                .with_child(NodeSpec::element("td").with_attr("class", "actions")),
        );
        let links = insert_delete_links(&mut document, row, &FormsetOptions::default());
        assert_eq!(links.len(), 1);
        let last_cell = document.children(row)[1];
        assert_eq!(document.parent(links[0]), Some(last_cell));
        assert_eq!(document.attr(links[0], "href"), Some(VOID_HREF));
        assert_eq!(document.text_content(links[0]), "remove");
    }

    #[test]
    fn lists_get_link_in_new_item() {
        let (mut document, row) = document_with(NodeSpec::element("ul").with_child(NodeSpec::element("li")));
        let links = insert_delete_links(&mut document, row, &FormsetOptions::default());
        let item = document.parent(links[0]).expect("link parent");
        assert!(document.is_tag(item, "li"));
        assert_eq!(document.parent(item), Some(row));
        assert_eq!(document.children(row).len(), 2);
    }

    #[test]
    fn delete_container_receives_link() {
        let (mut document, row) = document_with(
            NodeSpec::element("div")
                .with_child(NodeSpec::element("span").with_attr("class", "row-tools pull-right"))
                .with_child(NodeSpec::element("input")),
        );
        let options = FormsetOptions {
            delete_container_class: Some("row-tools".to_string()),
            ..Default::default()
        };
        let links = insert_delete_links(&mut document, row, &options);
        assert_eq!(links.len(), 1);
        assert_eq!(document.parent(links[0]), Some(document.children(row)[0]));
    }

    #[test]
    fn table_layout_appends_spanning_button_row() {
        let (mut document, body) = document_with(
            NodeSpec::element("tbody").with_child(
                NodeSpec::element("tr")
                    .with_child(NodeSpec::element("td"))
                    .with_child(NodeSpec::element("td"))
                    .with_child(NodeSpec::element("td")),
            ),
        );
        let row = document.children(body)[0];
        let affordances = insert_add_affordances(&mut document, &[row], &FormsetOptions::default());
        assert_eq!(affordances.len(), 1);
        let toggle = affordances[0].toggle;
        assert_eq!(document.children(body), &[row, toggle]);
        assert!(document.has_class(toggle, "dynamic-form-add"));
        let cell = document.children(toggle)[0];
        assert_eq!(document.attr(cell, "colspan"), Some("3"));
        assert_eq!(document.text_content(affordances[0].link), "add another");
    }

    #[test]
    fn generic_layout_places_link_after_last_row() {
        let (mut document, container) = document_with(
            NodeSpec::element("div")
                .with_child(NodeSpec::element("div"))
                .with_child(NodeSpec::element("div"))
                .with_child(NodeSpec::element("p")),
        );
        let rows = document.children(container)[..2].to_vec();
        let affordances = insert_add_affordances(&mut document, &rows, &FormsetOptions::default());
        assert_eq!(document.next_sibling(rows[1]), Some(affordances[0].link));
        assert_eq!(affordances[0].link, affordances[0].toggle);
    }

    #[test]
    fn no_rows_means_no_add_link() {
        let mut document = Document::new();
        assert!(insert_add_affordances(&mut document, &[], &FormsetOptions::default()).is_empty());
    }
}
