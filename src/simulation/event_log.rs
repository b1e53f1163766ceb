//! Rolling record of what happened on the river, shown in the side panel.
//!
//! Entries are kept newest first and the oldest ones fall off once the log is
//! full. Counts only cover the retained entries.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One line of the river log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Elapsed run time in seconds
    pub time: f32,
    /// Text shown in the panel
    pub description: String,
    /// Category used for coloring and counting
    pub kind: EventKind,
}

/// What a log line is about; the viewer colors lines by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A wave of fish was released
    Spawn,
    /// A fish crossed a dam
    Crossing,
    /// A fish got stuck at a dam
    Stuck,
    /// A fish was caught
    Catch,
    /// A fishing tower was shut down or slowed
    Regulation,
    /// A fish reached the spawning grounds
    Goal,
    /// A fish died other than by being caught
    Death,
}

/// Bounded, newest-first list of log lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl EventLog {
    /// Creates an empty log holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records a line, dropping the oldest ones past capacity.
    pub fn log(&mut self, time: f32, description: impl Into<String>, kind: EventKind) {
        self.entries.push_front(LoggedEvent {
            time,
            description: description.into(),
            kind,
        });
        self.entries.truncate(self.capacity);
    }

    /// Retained lines, newest first.
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.entries
    }

    /// Number of retained lines of one kind.
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }
}
