// SPDX-License-Identifier: MPL-2.0
//! Rotation engine: owns the current image index and the per-batch seen set.
//!
//! The engine is a two-state machine: `Idle` until the first batch is
//! anchored, then `Active` with a valid index. While active, each tick marks
//! the current record as seen and scans forward circularly for the first
//! unseen record, guaranteeing full coverage of the batch before any repeat.
//! Manual navigation bypasses the seen set entirely.

use super::batch::ImageBatch;
use std::collections::HashSet;
use std::time::Duration;

/// Result of one automatic rotation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// No batch has been anchored yet; nothing happened.
    Idle,
    /// Moved to the first unseen record at this index.
    Advanced(usize),
    /// Every record has been seen; the seen set was cleared, the index
    /// reset to 0, and the caller should request a fresh batch.
    Exhausted,
}

#[derive(Debug)]
pub struct RotationEngine {
    current: Option<usize>,
    seen: HashSet<String>,
    interval: Duration,
}

impl RotationEngine {
    pub fn new(interval: Duration) -> Self {
        Self {
            current: None,
            seen: HashSet::new(),
            interval,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn has_seen(&self, date: &str) -> bool {
        self.seen.contains(date)
    }

    /// Anchors the engine to a (new) batch: resume at the last-viewed date
    /// when the batch contains it, otherwise start at index 0. The seen set
    /// is reset in both cases.
    pub fn anchor(&mut self, batch: &ImageBatch, last_viewed: Option<&str>) {
        self.seen.clear();
        if batch.is_empty() {
            self.current = None;
            return;
        }
        let resume = last_viewed.and_then(|date| batch.position_of(date));
        self.current = Some(resume.unwrap_or(0));
    }

    /// One automatic rotation step.
    ///
    /// Marks the current record as seen, then scans `(current + 1 + k) % len`
    /// for the first unseen record. When none remains, the seen set is
    /// cleared and the index resets to 0 pending a refreshed batch.
    pub fn tick(&mut self, batch: &ImageBatch) -> RotationOutcome {
        let Some(current) = self.current else {
            return RotationOutcome::Idle;
        };
        let len = batch.len();
        if len == 0 {
            return RotationOutcome::Idle;
        }

        if let Some(record) = batch.get(current) {
            self.seen.insert(record.date.clone());
        }

        for k in 0..len {
            let candidate = (current + 1 + k) % len;
            if let Some(record) = batch.get(candidate) {
                if !self.seen.contains(&record.date) {
                    self.current = Some(candidate);
                    return RotationOutcome::Advanced(candidate);
                }
            }
        }

        self.seen.clear();
        self.current = Some(0);
        RotationOutcome::Exhausted
    }

    /// Manual forward navigation: a plain circular increment that neither
    /// marks anything seen nor consults the seen set.
    pub fn next(&mut self, batch: &ImageBatch) -> Option<usize> {
        let len = batch.len();
        if len == 0 {
            return None;
        }
        let current = self.current?;
        let next = (current + 1) % len;
        self.current = Some(next);
        Some(next)
    }

    /// Manual backward navigation; see [`RotationEngine::next`].
    pub fn previous(&mut self, batch: &ImageBatch) -> Option<usize> {
        let len = batch.len();
        if len == 0 {
            return None;
        }
        let current = self.current?;
        let previous = (current + len - 1) % len;
        self.current = Some(previous);
        Some(previous)
    }
}
