// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and
//! saving user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use iced_apod::config;
//!
//! // Load existing configuration
//! let mut config = config::load();
//!
//! // Modify a setting
//! config.rotation_interval_secs = Some(120);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

use crate::app::paths;
use crate::error::Result;
use crate::slideshow::{TransitionMode, TransitionStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;
pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// NASA API key; the shared demo key is used when absent.
    pub api_key: Option<String>,
    #[serde(default)]
    pub image_count: Option<usize>,
    #[serde(default)]
    pub rotation_interval_secs: Option<u64>,
    #[serde(default)]
    pub transition_mode: Option<TransitionMode>,
    #[serde(default)]
    pub manual_style: Option<TransitionStyle>,
    #[serde(default)]
    pub popups_enabled: Option<bool>,
    #[serde(default)]
    pub motion_enabled: Option<bool>,
    /// Endpoint of the trivia text-generation service. Pop-ups fall back to
    /// a generic fact when unset.
    #[serde(default)]
    pub facts_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            image_count: Some(DEFAULT_IMAGE_COUNT),
            rotation_interval_secs: Some(DEFAULT_ROTATION_INTERVAL_SECS),
            transition_mode: None,
            manual_style: None,
            popups_enabled: Some(true),
            motion_enabled: Some(false),
            facts_endpoint: None,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Config {
    if let Some(path) = default_config_path() {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return config,
                Err(err) => {
                    log::warn!("could not read {}: {err}", path.display());
                }
            }
        }
    }
    Config::default()
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
