// SPDX-License-Identifier: MPL-2.0
//! `iced_apod` is a fullscreen astronomy slideshow built with the Iced GUI
//! framework.
//!
//! It cycles through a rotating batch of NASA "Astronomy Picture of the
//! Day" records, overlays captions for a content-dependent duration, and
//! periodically surfaces trivia pop-ups generated by an external text
//! service. The scheduling engine itself lives in [`slideshow`] and is
//! plain state-machine code; everything network- or platform-facing is a
//! thin collaborator around it.

#![doc(html_root_url = "https://docs.rs/iced_apod/0.2.0")]

pub mod apod;
pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod facts;
pub mod slideshow;
