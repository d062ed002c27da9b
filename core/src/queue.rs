//! Pending queue — raw command lines awaiting the current drain pass.

use std::collections::VecDeque;

/// FIFO of raw command lines. Handlers may append while a drain pass is
/// running; the pass continues until the queue is exhausted.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    lines: VecDeque<String>,
}

impl PendingQueue {
    pub fn new() -> Self {
        PendingQueue {
            lines: VecDeque::new(),
        }
    }

    /// Stack one input line; `;` separates several commands, each queued
    /// as its own segment in order.
    pub fn stack(&mut self, cmdline: &str) {
        let cmdline = cmdline.trim();
        if cmdline.is_empty() {
            return;
        }
        for segment in cmdline.split(';') {
            self.lines.push_back(segment.to_string());
        }
    }

    /// Take the oldest line.
    pub fn pop(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
