// SPDX-License-Identifier: MPL-2.0
//! Caption overlay visibility and its single expiry deadline.
//!
//! The controller owns at most one pending expiry at a time: every call to
//! [`OverlayController::show`] replaces the previous deadline, so a burst of
//! pointer events collapses into one timer. The visible-to-hidden transition
//! reported by [`OverlayController::poll`] is the sole upstream trigger for
//! trivia pop-up activation.

use crate::config::{CAPTION_MAX_MS, CAPTION_MIN_MS, CAPTION_MS_PER_WORD};
use std::time::{Duration, Instant};

/// What caused the overlay to (re)appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTrigger {
    /// Automatic image change: display time scales with description length.
    ImageChange,
    /// User activity (pointer movement, manual navigation): fixed short
    /// display time.
    UserActivity,
}

/// How long the caption stays visible for the given trigger.
///
/// Automatic changes get a reading-time allowance proportional to the word
/// count, clamped to `[CAPTION_MIN_MS, CAPTION_MAX_MS]`; user activity gets
/// the fixed minimum.
pub fn caption_delay(trigger: ShowTrigger, word_count: usize) -> Duration {
    let ms = match trigger {
        ShowTrigger::ImageChange => {
            (word_count as u64 * CAPTION_MS_PER_WORD).clamp(CAPTION_MIN_MS, CAPTION_MAX_MS)
        }
        ShowTrigger::UserActivity => CAPTION_MIN_MS,
    };
    Duration::from_millis(ms)
}

#[derive(Debug, Default)]
pub struct OverlayController {
    visible: bool,
    expires_at: Option<Instant>,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Makes the overlay visible and schedules the hide deadline, replacing
    /// any pending one.
    pub fn show(&mut self, trigger: ShowTrigger, word_count: usize, now: Instant) {
        self.visible = true;
        self.expires_at = Some(now + caption_delay(trigger, word_count));
    }

    /// Hides the overlay immediately; no other side effects.
    pub fn hide(&mut self) {
        self.visible = false;
        self.expires_at = None;
    }

    /// Checks the deadline; returns true exactly when the overlay just
    /// transitioned from visible to hidden.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if self.visible && now >= deadline => {
                self.visible = false;
                self.expires_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_starts_hidden() {
        let overlay = OverlayController::new();
        assert!(!overlay.is_visible());
    }

    #[test]
    fn show_makes_visible_and_poll_hides_at_deadline() {
        // Ten words at 400 ms/word is 4000 ms, clamped up to the 5000 ms floor.
        let mut overlay = OverlayController::new();
        let t0 = Instant::now();
        overlay.show(ShowTrigger::ImageChange, 10, t0);
        assert!(overlay.is_visible());

        assert!(!overlay.poll(t0 + Duration::from_millis(4_999)));
        assert!(overlay.is_visible());

        assert!(overlay.poll(t0 + Duration::from_millis(5_000)));
        assert!(!overlay.is_visible());
    }

    #[test]
    fn poll_reports_transition_only_once() {
        let mut overlay = OverlayController::new();
        let t0 = Instant::now();
        overlay.show(ShowTrigger::UserActivity, 0, t0);

        let after = t0 + Duration::from_millis(CAPTION_MIN_MS + 1);
        assert!(overlay.poll(after));
        assert!(!overlay.poll(after));
    }

    #[test]
    fn show_replaces_pending_deadline() {
        let mut overlay = OverlayController::new();
        let t0 = Instant::now();
        overlay.show(ShowTrigger::UserActivity, 0, t0);

        // Re-show just before the first deadline would have fired.
        let t1 = t0 + Duration::from_millis(CAPTION_MIN_MS - 100);
        overlay.show(ShowTrigger::UserActivity, 0, t1);

        // The original deadline passes without a hide.
        assert!(!overlay.poll(t0 + Duration::from_millis(CAPTION_MIN_MS)));
        assert!(overlay.is_visible());

        // The replacement deadline fires.
        assert!(overlay.poll(t1 + Duration::from_millis(CAPTION_MIN_MS)));
    }

    #[test]
    fn hide_clears_deadline_without_reporting_transition() {
        let mut overlay = OverlayController::new();
        let t0 = Instant::now();
        overlay.show(ShowTrigger::ImageChange, 50, t0);
        overlay.hide();

        assert!(!overlay.is_visible());
        assert!(!overlay.poll(t0 + Duration::from_secs(3600)));
    }

    #[test]
    fn automatic_delay_scales_with_word_count() {
        // 10 words * 400 ms = 4000 ms -> clamped to the 5000 ms minimum.
        assert_eq!(
            caption_delay(ShowTrigger::ImageChange, 10),
            Duration::from_millis(5_000)
        );
        // 30 words * 400 ms = 12000 ms, inside the bounds.
        assert_eq!(
            caption_delay(ShowTrigger::ImageChange, 30),
            Duration::from_millis(12_000)
        );
        // 100 words * 400 ms = 40000 ms -> clamped to the 20000 ms maximum.
        assert_eq!(
            caption_delay(ShowTrigger::ImageChange, 100),
            Duration::from_millis(20_000)
        );
    }

    #[test]
    fn automatic_delay_is_monotonic_and_bounded() {
        let mut previous = Duration::ZERO;
        for word_count in 0..200 {
            let delay = caption_delay(ShowTrigger::ImageChange, word_count);
            assert!(delay >= previous, "delay decreased at {word_count} words");
            assert!(delay >= Duration::from_millis(CAPTION_MIN_MS));
            assert!(delay <= Duration::from_millis(CAPTION_MAX_MS));
            previous = delay;
        }
    }

    #[test]
    fn user_activity_delay_ignores_word_count() {
        assert_eq!(
            caption_delay(ShowTrigger::UserActivity, 500),
            Duration::from_millis(CAPTION_MIN_MS)
        );
    }
}
