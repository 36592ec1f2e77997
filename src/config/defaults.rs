// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Batch**: Image batch size and cache time-to-live
//! - **Rotation**: Automatic slide rotation cadence
//! - **Caption**: Caption overlay visibility timing
//! - **Trivia**: Trivia pop-up scheduling windows
//! - **View**: Transition animation and poll timing

// ==========================================================================
// Batch Defaults
// ==========================================================================

/// Default number of image records requested per batch.
pub const DEFAULT_IMAGE_COUNT: usize = 10;

/// Minimum allowed batch size.
pub const MIN_IMAGE_COUNT: usize = 1;

/// Maximum allowed batch size.
pub const MAX_IMAGE_COUNT: usize = 50;

/// How long a fetched batch stays fresh before a new fetch is attempted.
pub const BATCH_TTL_SECS: u64 = 20 * 60;

// ==========================================================================
// Rotation Defaults
// ==========================================================================

/// Default interval between automatic image changes (in seconds).
pub const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 60;

/// Minimum rotation interval (in seconds).
pub const MIN_ROTATION_INTERVAL_SECS: u64 = 10;

/// Maximum rotation interval (in seconds).
pub const MAX_ROTATION_INTERVAL_SECS: u64 = 3600;

// ==========================================================================
// Caption Overlay Defaults
// ==========================================================================

/// Reading-time allowance per word of the image description.
pub const CAPTION_MS_PER_WORD: u64 = 400;

/// Shortest caption display time; also the fixed delay after user activity.
pub const CAPTION_MIN_MS: u64 = 5_000;

/// Longest caption display time, regardless of description length.
pub const CAPTION_MAX_MS: u64 = 20_000;

// ==========================================================================
// Trivia Pop-up Defaults
// ==========================================================================

/// Minimum time that must remain before the next rotation for a pop-up
/// to be shown. A fire closer to the rotation than this aborts silently.
pub const TRIVIA_GAP_THRESHOLD_MS: u64 = 10_000;

/// Bounds for the random delay before the first pop-up of a sequence.
pub const TRIVIA_START_MIN_MS: u64 = 4_000;
pub const TRIVIA_START_MAX_MS: u64 = 10_000;

/// Bounds for the random delay between consecutive pop-ups.
pub const TRIVIA_ROTATION_MIN_MS: u64 = 8_000;
pub const TRIVIA_ROTATION_MAX_MS: u64 = 15_000;

// ==========================================================================
// View Timing Defaults
// ==========================================================================

/// Duration of the visual transition applied when the image changes.
pub const TRANSITION_FADE_MS: u64 = 1_000;

/// Cadence of the deadline-polling tick while timers are pending.
pub const POLL_TICK_MS: u64 = 100;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Batch validation
    assert!(MIN_IMAGE_COUNT > 0);
    assert!(MAX_IMAGE_COUNT >= MIN_IMAGE_COUNT);
    assert!(DEFAULT_IMAGE_COUNT >= MIN_IMAGE_COUNT);
    assert!(DEFAULT_IMAGE_COUNT <= MAX_IMAGE_COUNT);
    assert!(BATCH_TTL_SECS > 0);

    // Rotation validation
    assert!(MIN_ROTATION_INTERVAL_SECS > 0);
    assert!(MAX_ROTATION_INTERVAL_SECS >= MIN_ROTATION_INTERVAL_SECS);
    assert!(DEFAULT_ROTATION_INTERVAL_SECS >= MIN_ROTATION_INTERVAL_SECS);
    assert!(DEFAULT_ROTATION_INTERVAL_SECS <= MAX_ROTATION_INTERVAL_SECS);

    // Caption validation
    assert!(CAPTION_MS_PER_WORD > 0);
    assert!(CAPTION_MAX_MS >= CAPTION_MIN_MS);

    // Trivia validation
    assert!(TRIVIA_START_MAX_MS >= TRIVIA_START_MIN_MS);
    assert!(TRIVIA_ROTATION_MAX_MS >= TRIVIA_ROTATION_MIN_MS);
    assert!(TRIVIA_GAP_THRESHOLD_MS > 0);

    // View validation
    assert!(TRANSITION_FADE_MS > 0);
    assert!(POLL_TICK_MS > 0);
};
