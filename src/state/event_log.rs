//! Most recent mouse events the viewer received, newest first.

use std::collections::VecDeque;

pub const LOG_CAPACITY: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub kind: String,
    pub button: i16,
    pub buttons: u16,
    pub x: f64,
    pub y: f64,
    pub delta_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    entries: VecDeque<LoggedEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: LoggedEvent) {
        self.entries.push_front(event);
        self.entries.truncate(LOG_CAPACITY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
