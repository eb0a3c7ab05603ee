// SYNOID Shorts Recency Window
// Copyright (c) 2026 Xing_The_Creator | SYNOID

use std::collections::VecDeque;

/// Fixed-capacity ordered history, newest last. Appending past capacity
/// evicts the oldest entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RecencyWindow {
    capacity: usize,
    items: VecDeque<String>,
}

impl RecencyWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Rebuild a window from persisted values, keeping only the newest
    /// `capacity` of them.
    pub fn from_values(capacity: usize, values: impl IntoIterator<Item = String>) -> Self {
        let mut window = Self::new(capacity);
        for v in values {
            window.push(v);
        }
        window
    }

    pub fn push(&mut self, value: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        self.items.push_back(value.into());
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// The newest `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip).map(String::as_str)
    }

    pub fn contains_recent(&self, value: &str, n: usize) -> bool {
        self.recent(n).any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_on_append() {
        let mut w = RecencyWindow::new(3);
        for v in ["a", "b", "c", "d"] {
            w.push(v);
        }
        assert_eq!(w.to_vec(), vec!["b", "c", "d"]);
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn recent_is_a_suffix() {
        let w = RecencyWindow::from_values(12, (0..10).map(|i| i.to_string()));
        let tail: Vec<&str> = w.recent(3).collect();
        assert_eq!(tail, vec!["7", "8", "9"]);
        assert!(w.contains_recent("9", 3));
        assert!(!w.contains_recent("6", 3));
        assert!(w.contains_recent("6", 12));
    }

    #[test]
    fn from_values_truncates_to_capacity() {
        let w = RecencyWindow::from_values(5, (0..8).map(|i| format!("v{i}")));
        assert_eq!(w.to_vec(), vec!["v3", "v4", "v5", "v6", "v7"]);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut w = RecencyWindow::new(0);
        w.push("x");
        assert!(w.is_empty());
    }
}
