//! The formset manager: wires add/delete behaviour onto a group of rows.

use formset_dom::{Document, NodeId, Selector, SelectorError};
use formset_types::{CUSTOM_TEMPLATE_CLASS, DELETE_FIELD_SUFFIX, FormIndex, FormsetOptions};
use tracing::{debug, warn};

use crate::affordance::{AddAffordance, insert_add_affordances, insert_delete_links};
use crate::listener::{FormAdded, FormRemoved, FormsetEvent, FormsetListener, NoopListener};
use crate::management::{ManagementForm, write_total_forms};
use crate::policy::VisibilityPolicy;
use crate::renumber::renumber_row;
use crate::selectors::RowSelectors;
use crate::template::{adopt_custom_template, clone_last_row};

/// Value of a soft-delete marker once its row is marked for deletion.
pub const DELETE_MARKER_ON: &str = "on";

/// Text identifying the label of a delete toggle.
const DELETE_LABEL_TEXT: &str = "Delete";

fn is_delete_input(document: &Document, node: NodeId, input_type: &str) -> bool {
    document
        .element(node)
        .is_some_and(|element| element.input_type().as_deref() == Some(input_type) && element.attr("id").is_some_and(|id| id.ends_with(DELETE_FIELD_SUFFIX)))
}

/// Checkbox a server renders into each row of a deletable formset.
fn find_delete_toggle(document: &Document, row: NodeId) -> Option<NodeId> {
    document.descendants(row).into_iter().find(|node| is_delete_input(document, *node, "checkbox"))
}

/// Hidden input that records a pending deletion.
fn find_delete_marker(document: &Document, row: NodeId) -> Option<NodeId> {
    document.descendants(row).into_iter().find(|node| is_delete_input(document, *node, "hidden"))
}

/// Whether `row` carries a delete marker set to [`DELETE_MARKER_ON`].
pub fn is_soft_deleted(document: &Document, row: NodeId) -> bool {
    find_delete_marker(document, row).is_some_and(|marker| document.value(marker) == Some(DELETE_MARKER_ON))
}

/// Manages one group of repeated form rows inside a [`Document`].
///
/// The manager keeps no copy of the document; every operation borrows it
/// mutably for its duration.
#[derive(Debug)]
pub struct FormsetManager<L = NoopListener> {
    options: FormsetOptions,
    selectors: RowSelectors,
    rows: Vec<NodeId>,
    template: Option<NodeId>,
    add_affordances: Vec<AddAffordance>,
    visible_forms: usize,
    listener: L,
}

impl FormsetManager<NoopListener> {
    /// Attaches to `rows` without a listener.
    pub fn attach(document: &mut Document, rows: Vec<NodeId>, options: FormsetOptions) -> Self {
        Self::attach_with_listener(document, rows, options, NoopListener)
    }
}

impl<L: FormsetListener> FormsetManager<L> {
    /// Attaches to every element matching `row_selector`.
    pub fn attach_selector(document: &mut Document, row_selector: &str, options: FormsetOptions, listener: L) -> Result<Self, SelectorError> {
        let selector = Selector::parse(row_selector)?;
        let rows = document.select(&selector);
        Ok(Self::attach_with_listener(document, rows, options, listener))
    }

    /// Initializes `rows` and inserts the add and delete affordances.
    pub fn attach_with_listener(document: &mut Document, rows: Vec<NodeId>, options: FormsetOptions, listener: L) -> Self {
        let selectors = RowSelectors::from_options(&options);
        let mut manager = Self {
            options,
            selectors,
            rows,
            template: None,
            add_affordances: Vec::new(),
            visible_forms: 0,
            listener,
        };
        manager.initialize(document);
        manager
    }

    fn initialize(&mut self, document: &mut Document) {
        let rows = self.rows.clone();
        let mut decorated = Vec::new();
        for (ordinal, row) in rows.iter().copied().enumerate() {
            self.replace_delete_toggle(document, row);
            if !self.selectors.has_fields(document, row) {
                continue;
            }
            document.add_class(row, &self.options.form_css_class);
            if document.is_visible(row) {
                decorated.push((ordinal, row));
            }
        }
        for (ordinal, row) in decorated {
            insert_delete_links(document, row, &self.options);
            self.apply_extra_classes(document, row, ordinal);
        }

        if !self.rows.is_empty() {
            let custom_template = self
                .options
                .template_selector()
                .and_then(|selector| adopt_custom_template(document, selector, &self.options, &self.selectors));
            self.template = match custom_template {
                Some(template) => {
                    insert_delete_links(document, template, &self.options);
                    Some(template)
                }
                None => clone_last_row(document, &self.options, &self.selectors),
            };
            self.add_affordances = insert_add_affordances(document, &self.rows, &self.options);
        }

        self.visible_forms = self.count_visible_rows(document);
        self.sync_affordances(document);
        debug!(
            prefix = %self.options.prefix,
            rows = self.rows.len(),
            visible_forms = self.visible_forms,
            has_template = self.template.is_some(),
            "Attached formset manager"
        );
    }

    /// Swaps a delete checkbox for a hidden marker carrying the same name, id and state.
    fn replace_delete_toggle(&self, document: &mut Document, row: NodeId) {
        let Some(toggle) = find_delete_toggle(document, row) else {
            return;
        };
        let checked = document.is_checked(toggle);
        let marker = document.create_element_with("input", &[("type", "hidden")]);
        for attribute in ["name", "id"] {
            if let Some(value) = document.attr(toggle, attribute).map(str::to_string) {
                document.set_attr(marker, attribute, value);
            }
        }
        if checked {
            document.set_value(marker, DELETE_MARKER_ON);
            document.hide(row);
        }
        if let Err(error) = document.insert_before(marker, toggle) {
            warn!(%row, error = %error, "Could not insert delete marker");
            return;
        }

        let labels: Vec<NodeId> = document
            .descendants(row)
            .into_iter()
            .filter(|node| document.is_tag(*node, "label") && document.text_content(*node).contains(DELETE_LABEL_TEXT))
            .collect();
        for label in labels {
            document.hide(label);
        }
        document.detach(toggle);
    }

    fn apply_extra_classes(&self, document: &mut Document, row: NodeId, ordinal: usize) {
        let Some(extra_class) = self.options.extra_class_for(ordinal) else {
            return;
        };
        document.remove_class(row, &self.options.extra_classes.join(" "));
        document.add_class(row, extra_class);
    }

    pub fn options(&self) -> &FormsetOptions {
        &self.options
    }

    pub fn selectors(&self) -> &RowSelectors {
        &self.selectors
    }

    /// Rows the manager was attached to, in selection order.
    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn template(&self) -> Option<NodeId> {
        self.template
    }

    pub fn add_affordances(&self) -> &[AddAffordance] {
        &self.add_affordances
    }

    pub fn visible_forms(&self) -> usize {
        self.visible_forms
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Current counters read from the sentinel fields.
    pub fn management_form(&self, document: &Document) -> ManagementForm {
        ManagementForm::read(document, &self.options.prefix)
    }

    pub fn policy(&self, document: &Document) -> VisibilityPolicy {
        self.management_form(document).policy()
    }

    /// Attached managed rows in document order, custom template excluded.
    pub fn managed_rows(&self, document: &Document) -> Vec<NodeId> {
        document
            .select(&self.selectors.managed_rows)
            .into_iter()
            .filter(|row| !document.has_class(*row, CUSTOM_TEMPLATE_CLASS))
            .collect()
    }

    /// Managed rows that are currently visible.
    pub fn visible_rows(&self, document: &Document) -> Vec<NodeId> {
        self.managed_rows(document).into_iter().filter(|row| document.is_visible(*row)).collect()
    }

    fn count_visible_rows(&self, document: &Document) -> usize {
        self.visible_rows(document).len()
    }

    /// Every attached delete link.
    pub fn delete_links(&self, document: &Document) -> Vec<NodeId> {
        document.select(&self.selectors.delete_links)
    }

    /// Shows or hides the add and delete affordances for the current count.
    fn sync_affordances(&self, document: &mut Document) {
        let policy = self.policy(document);
        let can_delete = policy.can_delete(self.visible_forms);
        for link in self.delete_links(document) {
            if can_delete {
                document.show(link);
            } else {
                document.hide(link);
            }
        }
        let can_add = policy.can_add(self.visible_forms);
        for affordance in &self.add_affordances {
            if can_add {
                document.show(affordance.toggle);
            } else {
                document.hide(affordance.toggle);
            }
        }
    }

    /// Adds a row in front of the first add affordance.
    pub fn add_form(&mut self, document: &mut Document) -> Option<FormAdded> {
        let Some(affordance) = self.add_affordances.first().copied() else {
            warn!(prefix = %self.options.prefix, "Formset has no add affordance");
            return None;
        };
        self.add_form_before(document, affordance.toggle)
    }

    fn add_form_before(&mut self, document: &mut Document, anchor: NodeId) -> Option<FormAdded> {
        let Some(template) = self.template else {
            warn!(prefix = %self.options.prefix, "Formset has no template to add rows from");
            return None;
        };
        let prefix = self.options.prefix.clone();
        let form_count = self
            .management_form(document)
            .total_forms
            .unwrap_or_else(|| self.managed_rows(document).len());

        let row = document.deep_clone(template);
        document.remove_class(row, CUSTOM_TEMPLATE_CLASS);
        self.apply_extra_classes(document, row, form_count);
        if let Err(error) = document.insert_before(row, anchor) {
            warn!(%anchor, error = %error, "Could not insert new row");
            return None;
        }
        document.show(row);
        renumber_row(document, row, &self.selectors.fields, &prefix, FormIndex::Position(form_count));

        self.visible_forms += 1;
        let total_forms = form_count + 1;
        write_total_forms(document, &prefix, total_forms);

        for display in document.select_within(row, &self.selectors.row_number) {
            document.set_text(display, self.visible_forms.to_string());
        }
        self.sync_affordances(document);

        let event = FormAdded {
            row,
            index: form_count,
            total_forms,
            visible_forms: self.visible_forms,
        };
        debug!(%prefix, index = form_count, total_forms, visible_forms = self.visible_forms, "Added formset row");
        self.listener.form_added(document, &event);
        Some(event)
    }

    /// Removes `row`, or marks it deleted when it carries a delete marker.
    pub fn remove_form(&mut self, document: &mut Document, row: NodeId) -> Option<FormRemoved> {
        if !document.matches(row, &self.selectors.managed_rows) || document.has_class(row, CUSTOM_TEMPLATE_CLASS) || !document.is_attached(row) {
            warn!(%row, "Ignoring removal of an element that is not a managed row");
            return None;
        }
        let prefix = self.options.prefix.clone();

        let soft_deleted = match find_delete_marker(document, row) {
            Some(marker) => {
                document.set_value(marker, DELETE_MARKER_ON);
                document.hide(row);
                true
            }
            None => {
                document.detach(row);
                false
            }
        };

        let total_forms = if soft_deleted {
            let forms = self.visible_rows(document);
            for (ordinal, form) in forms.iter().copied().enumerate() {
                self.apply_extra_classes(document, form, ordinal);
            }
            self.visible_forms = forms.len();
            self.management_form(document).total_forms
        } else {
            // Soft-deleted rows are still submitted, so they keep a slot in the sequence.
            let forms = self.managed_rows(document);
            for (ordinal, form) in forms.iter().copied().enumerate() {
                self.apply_extra_classes(document, form, ordinal);
                renumber_row(document, form, &self.selectors.fields, &prefix, FormIndex::Position(ordinal));
            }
            self.visible_forms = forms.iter().filter(|form| document.is_visible(**form)).count();
            write_total_forms(document, &prefix, forms.len()).then_some(forms.len())
        };
        self.sync_affordances(document);

        let event = FormRemoved {
            row,
            soft_deleted,
            total_forms,
            visible_forms: self.visible_forms,
        };
        debug!(%prefix, soft_deleted, visible_forms = self.visible_forms, "Removed formset row");
        self.listener.form_removed(document, &event);
        Some(event)
    }

    /// Dispatches a click on `target` to add or remove.
    ///
    /// Clicks on (or inside) an add link add a row in front of that link's
    /// toggle; clicks on (or inside) a delete link remove the enclosing row.
    /// Anything else is ignored.
    pub fn handle_click(&mut self, document: &mut Document, target: NodeId) -> Option<FormsetEvent> {
        let mut path = vec![target];
        path.extend(document.ancestors(target));

        if let Some(affordance) = self.add_affordances.iter().find(|affordance| path.contains(&affordance.link)).copied() {
            return self.add_form_before(document, affordance.toggle).map(FormsetEvent::Added);
        }

        let link = path.iter().copied().find(|node| document.matches(*node, &self.selectors.delete_links))?;
        let row = document.closest_ancestor(link, |document, node| document.matches(node, &self.selectors.managed_rows))?;
        self.remove_form(document, row).map(FormsetEvent::Removed)
    }
}
