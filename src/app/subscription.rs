// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Three sources feed the update loop: the rotation cadence, a fast
//! deadline-polling tick that only runs while some timer is live, and the
//! raw window event stream mapped to one semantic message per stimulus.

use super::Message;
use crate::config::POLL_TICK_MS;
use iced::{event, keyboard, mouse, time, Subscription};
use std::time::Duration;

/// The automatic rotation tick, active only while a batch is anchored.
pub fn rotation_cadence(active: bool, interval: Duration) -> Subscription<Message> {
    if active {
        time::every(interval).map(Message::RotationTick)
    } else {
        Subscription::none()
    }
}

/// Fast tick for overlay auto-hide, trivia fires, and transition animation.
/// Suspended entirely while nothing is pending so an idle slideshow does
/// not spin.
pub fn poll_tick(needed: bool) -> Subscription<Message> {
    if needed {
        time::every(Duration::from_millis(POLL_TICK_MS)).map(Message::PollTick)
    } else {
        Subscription::none()
    }
}

/// Maps raw window events to the semantic stimulus messages the core
/// understands. The core owns no rendering; these handlers are its entire
/// input surface.
pub fn stimuli() -> Subscription<Message> {
    event::listen_with(|event, _status, _window| match event {
        event::Event::Mouse(mouse::Event::CursorMoved { .. }) => Some(Message::PointerMoved),
        event::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            on_key_pressed(key, modifiers)
        }
        _ => None,
    })
}

fn on_key_pressed(key: keyboard::Key, modifiers: keyboard::Modifiers) -> Option<Message> {
    if modifiers.command() || modifiers.alt() {
        return None;
    }
    match key {
        keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => Some(Message::PreviousImage),
        keyboard::Key::Named(keyboard::key::Named::ArrowRight) => Some(Message::NextImage),
        keyboard::Key::Named(keyboard::key::Named::F11) => Some(Message::ToggleFullscreen),
        keyboard::Key::Character(c) => match c.as_str() {
            "f" | "F" => Some(Message::ToggleFullscreen),
            "d" | "D" => Some(Message::DownloadImage),
            "m" | "M" => Some(Message::ToggleMotion),
            "t" | "T" => Some(Message::TogglePopups),
            "s" | "S" => Some(Message::ToggleFavorite),
            _ => None,
        },
        _ => None,
    }
}
