//! Scenario timeline — scheduled commands ordered by trigger time.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ScheduledCommand
// ---------------------------------------------------------------------------

/// A command line released once simulated time reaches `trigger_time`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledCommand {
    /// Seconds since scenario start.
    pub trigger_time: f64,
    pub text: String,
}

impl ScheduledCommand {
    pub fn new(trigger_time: f64, text: &str) -> Self {
        ScheduledCommand {
            trigger_time,
            text: text.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// Entries in non-decreasing trigger order. Equal trigger times keep the
/// order in which they were inserted.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: VecDeque<ScheduledCommand>,
}

impl Timeline {
    pub fn new() -> Self {
        Timeline {
            entries: VecDeque::new(),
        }
    }

    /// Discard the current entries and take `entries` instead.
    pub fn replace(&mut self, entries: Vec<ScheduledCommand>) {
        self.entries = entries.into();
        self.sort();
    }

    /// Append `entries` after the current ones and re-sort. Existing entries
    /// precede new ones with the same trigger time.
    pub fn merge(&mut self, entries: Vec<ScheduledCommand>) {
        self.entries.extend(entries);
        self.sort();
    }

    /// Remove and return the earliest entry if it is due at `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<ScheduledCommand> {
        match self.entries.front() {
            Some(first) if first.trigger_time <= now => self.entries.pop_front(),
            _ => None,
        }
    }

    /// Trigger time of the earliest entry.
    pub fn next_trigger(&self) -> Option<f64> {
        self.entries.front().map(|e| e.trigger_time)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledCommand> {
        self.entries.iter()
    }

    fn sort(&mut self) {
        // slice::sort_by is stable.
        self.entries
            .make_contiguous()
            .sort_by(|a, b| a.trigger_time.total_cmp(&b.trigger_time));
    }
}
