//! LRU Tracker Module
//!
//! Keeps the recency order of cached keys for least-recently-used eviction.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for the LRU eviction strategy.
///
/// Keys are stored in a VecDeque where:
/// - Front = least recently used (next eviction candidate)
/// - Back = most recently used
///
/// Each key appears at most once.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if untracked.
    pub fn touch(&mut self, key: &str) {
        match self.position(key) {
            Some(index) => {
                if let Some(existing) = self.order.remove(index) {
                    self.order.push_back(existing);
                }
            }
            None => self.order.push_back(key.to_string()),
        }
    }

    // == Remove ==
    /// Removes a key from the tracker. Returns whether it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(index) => self.order.remove(index).is_some(),
            None => false,
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Least Recent ==
    /// Returns the least recently used key without removing it.
    pub fn peek_least_recent(&self) -> Option<&str> {
        self.order.front().map(String::as_str)
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }
}
