//! Observer hooks fired after rows are added or removed.

use formset_dom::{Document, NodeId};

/// Payload delivered after a row was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAdded {
    /// The freshly inserted row.
    pub row: NodeId,
    /// Index the row's fields were numbered with.
    pub index: usize,
    /// Total-forms counter after the addition.
    pub total_forms: usize,
    pub visible_forms: usize,
}

/// Payload delivered after a row was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRemoved {
    /// The removed row. Detached unless `soft_deleted` is set.
    pub row: NodeId,
    /// The row was hidden and marked for deletion instead of detached.
    pub soft_deleted: bool,
    /// Total-forms counter after the removal, when the sentinel exists.
    pub total_forms: Option<usize>,
    pub visible_forms: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormsetEvent {
    Added(FormAdded),
    Removed(FormRemoved),
}

/// Receives add/remove notifications. Both hooks default to no-ops.
pub trait FormsetListener {
    fn form_added(&mut self, _document: &Document, _event: &FormAdded) {}

    fn form_removed(&mut self, _document: &Document, _event: &FormRemoved) {}
}

/// Listener that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl FormsetListener for NoopListener {}

/// Listener that keeps every event, in order.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FormsetEvent>,
}

impl EventLog {
    pub fn events(&self) -> &[FormsetEvent] {
        &self.events
    }
}

impl FormsetListener for EventLog {
    fn form_added(&mut self, _document: &Document, event: &FormAdded) {
        self.events.push(FormsetEvent::Added(event.clone()));
    }

    fn form_removed(&mut self, _document: &Document, event: &FormRemoved) {
        self.events.push(FormsetEvent::Removed(event.clone()));
    }
}
