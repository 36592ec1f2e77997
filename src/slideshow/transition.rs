// SPDX-License-Identifier: MPL-2.0
//! Per-change visual transition selection.
//!
//! The selector is a pure function of its mode and cursor: sequential mode
//! cycles through the enumerated styles, random mode draws uniformly, and
//! manual mode pins the configured style. It is re-run once per index change
//! and nothing else ever consults it.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Enumerated visual transition styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionStyle {
    #[default]
    CrossFade,
    SlideLeft,
    SlideRight,
    ZoomIn,
    ZoomOut,
}

impl TransitionStyle {
    pub const ALL: [TransitionStyle; 5] = [
        TransitionStyle::CrossFade,
        TransitionStyle::SlideLeft,
        TransitionStyle::SlideRight,
        TransitionStyle::ZoomIn,
        TransitionStyle::ZoomOut,
    ];

    pub fn index(self) -> usize {
        match self {
            TransitionStyle::CrossFade => 0,
            TransitionStyle::SlideLeft => 1,
            TransitionStyle::SlideRight => 2,
            TransitionStyle::ZoomIn => 3,
            TransitionStyle::ZoomOut => 4,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// How the next transition style is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionMode {
    Sequential,
    #[default]
    Random,
    Manual,
}

#[derive(Debug, Clone)]
pub struct StyleSelector {
    mode: TransitionMode,
    /// Display cursor into [`TransitionStyle::ALL`]; under manual mode the
    /// effective style always derives from `manual_style` instead.
    style_index: usize,
    manual_style: TransitionStyle,
}

impl StyleSelector {
    pub fn new(mode: TransitionMode, manual_style: TransitionStyle) -> Self {
        Self {
            mode,
            style_index: 0,
            manual_style,
        }
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransitionMode) {
        self.mode = mode;
    }

    pub fn set_manual_style(&mut self, style: TransitionStyle) {
        self.manual_style = style;
    }

    /// The style chosen by the most recent pick.
    pub fn current(&self) -> TransitionStyle {
        match self.mode {
            TransitionMode::Manual => self.manual_style,
            _ => TransitionStyle::from_index(self.style_index),
        }
    }

    /// Picks the style for a new image change.
    pub fn pick(&mut self, rng: &mut impl Rng) -> TransitionStyle {
        let count = TransitionStyle::ALL.len();
        match self.mode {
            TransitionMode::Sequential => {
                self.style_index = (self.style_index + 1) % count;
            }
            TransitionMode::Random => {
                self.style_index = rng.random_range(0..count);
            }
            TransitionMode::Manual => {
                self.style_index = self.manual_style.index();
            }
        }
        self.current()
    }
}

impl Default for StyleSelector {
    fn default() -> Self {
        Self::new(TransitionMode::default(), TransitionStyle::default())
    }
}
