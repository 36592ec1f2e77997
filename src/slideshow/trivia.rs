// SPDX-License-Identifier: MPL-2.0
//! Trivia pop-up scheduling.
//!
//! Once the caption overlay has hidden, the scheduler runs a sequence of
//! randomly timed fact pop-ups for the current image. Every fire first
//! checks how much time remains before the next rotation, measured against
//! the anchor recorded at activation; a fire landing inside the gap
//! threshold aborts the whole sequence silently. Any state change that
//! invalidates the sequence (image change, overlay re-show, pop-ups
//! disabled, teardown) cancels the pending fire so a stale fact can never
//! appear against a new image.

use crate::config::{
    TRIVIA_GAP_THRESHOLD_MS, TRIVIA_ROTATION_MAX_MS, TRIVIA_ROTATION_MIN_MS, TRIVIA_START_MAX_MS,
    TRIVIA_START_MIN_MS,
};
use rand::Rng;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TriviaScheduler {
    /// Facts for the current image; replaced wholesale when the image
    /// changes.
    facts: Vec<String>,
    /// Index of the fact currently on screen, if any.
    active_index: Option<usize>,
    enabled: bool,
    /// When the running sequence was activated. Explicit state rather than
    /// a value captured by a timer closure, so cancellation and restart
    /// are unambiguous.
    anchor: Option<Instant>,
    /// Deadline of the single in-flight fire, if one is scheduled.
    pending: Option<Instant>,
}

impl TriviaScheduler {
    pub fn new(enabled: bool) -> Self {
        Self {
            facts: Vec::new(),
            active_index: None,
            enabled,
            anchor: None,
            pending: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables pop-ups. Disabling cancels everything pending
    /// immediately; no delayed pop-up may appear after a disable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_all();
        }
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }

    /// The fact currently on screen, if a sequence is showing one.
    pub fn active_fact(&self) -> Option<&str> {
        self.active_index
            .and_then(|index| self.facts.get(index))
            .map(String::as_str)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces the fact list for a new image, cancelling any running
    /// sequence first.
    pub fn set_facts(&mut self, facts: Vec<String>) {
        self.cancel_all();
        self.facts = facts;
    }

    /// Cancels the pending fire and clears the sequence state. Invoked on
    /// image change, overlay re-show, disable, and teardown.
    pub fn cancel_all(&mut self) {
        self.pending = None;
        self.active_index = None;
        self.anchor = None;
    }

    /// Starts a new pop-up sequence. Only activates when pop-ups are
    /// enabled and a non-empty fact list exists; returns whether a sequence
    /// was started.
    pub fn activate(&mut self, now: Instant, rng: &mut impl Rng) -> bool {
        if !self.enabled || self.facts.is_empty() {
            return false;
        }
        self.cancel_all();
        self.anchor = Some(now);
        let delay = rng.random_range(TRIVIA_START_MIN_MS..=TRIVIA_START_MAX_MS);
        self.pending = Some(now + Duration::from_millis(delay));
        true
    }

    /// Checks the pending deadline. When it has passed, the gap condition
    /// is evaluated against the original anchor: with less than the gap
    /// threshold remaining before the next rotation the sequence aborts
    /// silently, otherwise the next fact index is selected (index 0 on the
    /// first fire, wrapping modulo the fact count after) and a follow-up
    /// fire is scheduled. Returns the index of the fact to display.
    pub fn poll(&mut self, now: Instant, interval: Duration, rng: &mut impl Rng) -> Option<usize> {
        let deadline = self.pending?;
        if now < deadline {
            return None;
        }
        self.pending = None;

        let Some(anchor) = self.anchor else {
            return None;
        };
        let elapsed = now.saturating_duration_since(anchor);
        let remaining = interval.saturating_sub(elapsed);
        if remaining < Duration::from_millis(TRIVIA_GAP_THRESHOLD_MS) {
            self.active_index = None;
            self.anchor = None;
            return None;
        }

        let index = match self.active_index {
            None => 0,
            Some(previous) => (previous + 1) % self.facts.len(),
        };
        self.active_index = Some(index);
        let delay = rng.random_range(TRIVIA_ROTATION_MIN_MS..=TRIVIA_ROTATION_MAX_MS);
        self.pending = Some(now + Duration::from_millis(delay));
        Some(index)
    }
}

impl Default for TriviaScheduler {
    fn default() -> Self {
        Self::new(true)
    }
}
