//! Thread registry and per-thread timeline cursors.
//!
//! A thread is named once per `(full name, tid)` pair across the whole run.
//! Timeline cursors are keyed by full name only, so every frame of a thread
//! is laid end to end after the previous one.

use crate::utils::config::UNKNOWN_THREAD;
use std::collections::{HashMap, HashSet};

/// Blank thread names get a fixed placeholder
pub fn normalize_thread_name(thread_name: &str) -> &str {
    if thread_name.trim().is_empty() {
        UNKNOWN_THREAD
    } else {
        thread_name
    }
}

/// `group.thread`, or just `thread` when the group is empty
pub fn thread_full_name(thread_name: &str, group_name: &str) -> String {
    if group_name.is_empty() {
        thread_name.to_string()
    } else {
        format!("{}.{}", group_name, thread_name)
    }
}

#[derive(Debug, Default)]
pub struct ThreadRegistry {
    seen: HashSet<(String, u64)>,
    cursors: HashMap<String, f64>,
}

impl ThreadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a `(full name, tid)` pair is seen; the
    /// caller then owes one thread-name record for it
    pub fn ensure_registered(&mut self, full_name: &str, thread_id: u64) -> bool {
        self.seen.insert((full_name.to_string(), thread_id))
    }

    /// Current start time for the thread's next frame (0 on first sight)
    pub fn cursor(&mut self, full_name: &str) -> f64 {
        *self.cursors.entry(full_name.to_string()).or_insert(0.0)
    }

    /// Move the thread's cursor past a frame's consumed duration
    pub fn advance(&mut self, full_name: &str, consumed: f64) -> f64 {
        let cursor = self.cursors.entry(full_name.to_string()).or_insert(0.0);
        *cursor += consumed;
        *cursor
    }

    /// Number of distinct `(full name, tid)` pairs
    pub fn registered_count(&self) -> usize {
        self.seen.len()
    }

    /// Number of distinct timelines
    pub fn timeline_count(&self) -> usize {
        self.cursors.len()
    }
}
