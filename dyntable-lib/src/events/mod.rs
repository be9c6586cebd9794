//! Publish/subscribe channel for grid notifications.
//!
//! Replaces ambient window-level hooks: anything outside the grid's data
//! flow (toasts, note panels, audit logs) subscribes here.

use tokio::sync::broadcast;

use crate::model::Value;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A notification published by a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A new row collection was reported to the host.
    DataChanged { table: String, row_count: usize },
    /// A new schema was reported to the host.
    SchemaChanged { table: String, column_count: usize },
    /// The selection changed.
    SelectionChanged { table: String, selected: Vec<String> },
    /// A cell save was persisted.
    CellCommitted {
        table: String,
        row_id: String,
        column_key: String,
        value: Value,
    },
    /// A cell save failed and the previous value was restored.
    CellRolledBack {
        table: String,
        row_id: String,
        column_key: String,
        restored: Value,
    },
    /// An open edit was dropped without saving.
    EditDiscarded {
        table: String,
        row_id: String,
        column_key: String,
    },
    /// A note attached to a row was updated.
    NoteUpdated { row_id: String, note: String },
    /// A message for the user.
    Notice { level: NoticeLevel, message: String },
}

impl GridEvent {
    /// Creates an error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Creates an info notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Broadcast bus for [`GridEvent`]s, cheap to clone.
///
/// Slow subscribers that fall more than `capacity` events behind lose the
/// oldest events.
///
/// # Example
///
/// ```
/// use dyntable_lib::events::{EventBus, GridEvent};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
/// bus.publish(GridEvent::info("saved"));
/// assert_eq!(rx.try_recv().unwrap(), GridEvent::info("saved"));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GridEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GridEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event. Returns the number of subscribers reached.
    pub fn publish(&self, event: GridEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Publishes a note update for a row.
    pub fn publish_note(&self, row_id: impl Into<String>, note: impl Into<String>) -> usize {
        self.publish(GridEvent::NoteUpdated {
            row_id: row_id.into(),
            note: note.into(),
        })
    }

    /// Returns the number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
