// SPDX-License-Identifier: MPL-2.0
//! Presentation scheduling engine.
//!
//! The modules here own the temporal coordination of the slideshow: which
//! image is shown next, how long the caption overlay stays visible, which
//! visual transition applies, and when trivia pop-ups may fire. They are
//! plain state machines: every deadline is an explicit field compared
//! against an injected `Instant`, and every randomized decision takes a
//! caller-supplied RNG, so the application's poll tick drives them and
//! tests drive them with seeded clocks.
//!
//! Nothing in this module performs I/O; network fetches, persistence, and
//! rendering live in the collaborator modules and feed results in through
//! the application update loop.

pub mod batch;
pub mod overlay;
pub mod rotation;
pub mod transition;
pub mod trivia;

pub use batch::{BatchStore, ImageBatch, ImageRecord};
pub use overlay::{caption_delay, OverlayController, ShowTrigger};
pub use rotation::{RotationEngine, RotationOutcome};
pub use transition::{StyleSelector, TransitionMode, TransitionStyle};
pub use trivia::TriviaScheduler;
