// SPDX-License-Identifier: MPL-2.0
//! Durable application state in CBOR format.
//!
//! The state file carries everything that must survive a restart: the
//! cached image batch with its fetch timestamp, the last-viewed image date,
//! and the favorite set. It is read once at startup and written on every
//! relevant change. A malformed or unreadable file degrades to the default
//! state, which downstream code treats as a plain cache miss.
//!
//! # Path Resolution
//!
//! The state file location can be customized for testing or portable
//! deployments:
//! 1. Use `load_from()`/`save_to()` with explicit path override
//! 2. Set `ICED_APOD_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::paths;
use crate::slideshow::ImageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    /// The last successfully fetched batch, replayed at startup so the
    /// slideshow starts without waiting on the network.
    #[serde(default)]
    pub cached_batch: Vec<ImageRecord>,

    /// When `cached_batch` was fetched, as milliseconds since the epoch.
    #[serde(default)]
    pub fetched_at_ms: Option<u64>,

    /// Date key of the image on screen when the state was last written.
    #[serde(default)]
    pub last_viewed: Option<String>,

    /// Date keys the user marked as favorites.
    #[serde(default)]
    pub favorites: BTreeSet<String>,
}

impl AppState {
    /// Loads state from the default location; any failure degrades to the
    /// default state.
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// Loads state from a custom base directory (tests).
    pub fn load_from(base_dir: Option<PathBuf>) -> Self {
        let Some(path) = Self::state_file_path(base_dir) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match fs::File::open(&path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(state) => state,
                Err(err) => {
                    log::warn!("discarding malformed state file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("could not read state file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Writes state to the default location. Failures are logged and
    /// swallowed; losing a state write is never fatal.
    pub fn save(&self) {
        self.save_to(None);
    }

    /// Writes state to a custom base directory (tests).
    pub fn save_to(&self, base_dir: Option<PathBuf>) {
        let Some(path) = Self::state_file_path(base_dir) else {
            log::warn!("no data directory available; state not persisted");
            return;
        };

        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("could not create {}: {err}", parent.display());
                return;
            }
        }

        match fs::File::create(&path) {
            Ok(file) => {
                if let Err(err) = ciborium::into_writer(self, BufWriter::new(file)) {
                    log::warn!("could not write state file {}: {err}", path.display());
                }
            }
            Err(err) => {
                log::warn!("could not create state file {}: {err}", path.display());
            }
        }
    }

    fn state_file_path(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STATE_FILE);
            path
        })
    }

    /// Records a freshly fetched batch and its timestamp.
    pub fn record_batch(&mut self, records: &[ImageRecord], fetched_at: SystemTime) {
        self.cached_batch = records.to_vec();
        self.fetched_at_ms = fetched_at
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_millis() as u64);
    }

    /// The cached batch's fetch time, when one is recorded.
    pub fn cached_fetched_at(&self) -> Option<SystemTime> {
        self.fetched_at_ms
            .map(|ms| UNIX_EPOCH + Duration::from_millis(ms))
    }

    /// Whether the cached batch is usable: non-empty and timestamped.
    pub fn has_valid_cache(&self) -> bool {
        !self.cached_batch.is_empty() && self.fetched_at_ms.is_some()
    }

    pub fn is_favorite(&self, date: &str) -> bool {
        self.favorites.contains(date)
    }

    /// Toggles a date in the favorite set; returns whether it is now a
    /// favorite.
    pub fn toggle_favorite(&mut self, date: &str) -> bool {
        if self.favorites.remove(date) {
            false
        } else {
            self.favorites.insert(date.to_string());
            true
        }
    }
}
