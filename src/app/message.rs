// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use crate::error::Error;
use crate::slideshow::ImageRecord;
use iced::widget::image;
use std::path::PathBuf;
use std::time::Instant;

/// Top-level messages consumed by `App::update`. Scheduled ticks, network
/// completions, and user stimuli all funnel through this single entrypoint,
/// so every state transition happens on the update loop.
#[derive(Debug, Clone)]
pub enum Message {
    /// Fixed-cadence automatic rotation step.
    RotationTick(Instant),
    /// Fast tick that polls overlay/trivia deadlines and drives animation.
    PollTick(Instant),
    /// Ask the batch store for a batch, fetching fresh only when stale.
    RefreshBatch,
    /// Completed batch fetch.
    BatchFetched(Result<Vec<ImageRecord>, Error>),
    /// Completed image byte download for the given URL.
    ImageFetched {
        url: String,
        result: Result<image::Handle, Error>,
    },
    /// Completed fact generation for the image with the given date key.
    FactsFetched {
        date: String,
        result: Result<Vec<String>, Error>,
    },
    /// Completed download-to-disk of the current image.
    DownloadFinished(Result<PathBuf, Error>),
    /// Pointer movement anywhere over the window.
    PointerMoved,
    /// Manual navigation.
    NextImage,
    PreviousImage,
    /// Keyboard toggles.
    ToggleFullscreen,
    DownloadImage,
    ToggleMotion,
    TogglePopups,
    ToggleFavorite,
}

/// Runtime flags passed in from the CLI to tweak startup behavior.
#[derive(Debug, Default)]
pub struct Flags {
    /// NASA API key override; falls back to the config file, then the
    /// shared demo key.
    pub api_key: Option<String>,
    /// Optional data directory override (for the state file).
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    pub config_dir: Option<String>,
}
