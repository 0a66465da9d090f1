//! Circular buffer of recent log lines, kept for in-app log viewers.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

pub struct LineBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append one line, evicting the oldest when full
    pub fn push(&self, line: String) {
        if self.capacity == 0 {
            return;
        }
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Split a formatted record into lines and append the non-empty ones
    pub fn push_chunk(&self, chunk: &str) {
        for line in chunk.lines().filter(|l| !l.trim().is_empty()) {
            self.push(line.to_string());
        }
    }

    /// Oldest first
    pub fn snapshot(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let buffer = LineBuffer::new(2);
        buffer.push("a".into());
        buffer.push("b".into());
        buffer.push("c".into());
        assert_eq!(buffer.snapshot(), vec!["b", "c"]);
    }

    #[test]
    fn test_chunk_splits_lines() {
        let buffer = LineBuffer::new(10);
        buffer.push_chunk("first\nsecond\n\n");
        assert_eq!(buffer.snapshot(), vec!["first", "second"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let buffer = LineBuffer::new(0);
        buffer.push("a".into());
        assert!(buffer.is_empty());
    }
}
