//! Double-ended list values.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// An ordered, double-ended sequence of strings.
///
/// Pops on an empty list return `None`; the command layer maps that to the
/// empty-string sentinel instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    items: VecDeque<String>,
}

impl List {
    pub fn push_front(&mut self, value: impl Into<String>) {
        self.items.push_front(value.into());
    }

    pub fn push_back(&mut self, value: impl Into<String>) {
        self.items.push_back(value.into());
    }

    pub fn pop_front(&mut self) -> Option<String> {
        self.items.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<String> {
        self.items.pop_back()
    }

    /// Element at `idx`, or `None` when out of range.
    pub fn index(&self, idx: usize) -> Option<&str> {
        self.items.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes the first element equal to `value`. Returns whether one was
    /// found.
    pub fn rem(&mut self, value: &str) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Keeps only the half-open range `[begin, end)`.
    ///
    /// No-op when `begin >= end` or `begin >= len`; `end` is clamped to the
    /// current length.
    pub fn trim(&mut self, begin: usize, end: usize) {
        if begin >= end || begin >= self.items.len() {
            return;
        }
        let end = end.min(self.items.len());
        self.items.truncate(end);
        self.items.drain(..begin);
    }

    /// Iterates the elements front to back.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}
