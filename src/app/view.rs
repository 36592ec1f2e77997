// SPDX-License-Identifier: MPL-2.0
//! Thin rendering layer.
//!
//! The view stacks four layers: the current image (with its opacity and
//! offset shaped by the active transition style), the caption overlay, the
//! trivia fact bubble, and the favorite marker. All timing decisions live
//! in the engine; this module only reads state.

use super::{App, Message};
use crate::config::TRANSITION_FADE_MS;
use crate::slideshow::TransitionStyle;
use chrono::NaiveDate;
use iced::widget::{column, container, image, stack, text};
use iced::{border, Alignment, Color, Element, Length, Padding, Theme};
use std::time::Instant;

/// Amplitude of the ambient-motion drift, in logical pixels.
const MOTION_AMPLITUDE: f32 = 24.0;

/// Period of one full ambient-motion cycle.
const MOTION_PERIOD_SECS: f32 = 20.0;

/// Largest offset applied by the slide transitions.
const SLIDE_DISTANCE: f32 = 120.0;

pub(super) fn view(app: &App) -> Element<'_, Message> {
    let Some(record) = app.current_record() else {
        return empty_state();
    };

    let now = Instant::now();
    let progress = transition_progress(app.image_shown_at, now);

    let image_layer: Element<'_, Message> = match &app.current_handle {
        Some(handle) => {
            let img = image(handle.clone())
                .content_fit(iced::ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .opacity(transition_opacity(app.selector.current(), progress));
            container(img)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(image_padding(app, progress, now))
                .into()
        }
        None => container(text("Loading image…").size(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::Center)
            .into(),
    };

    let mut layers = stack![image_layer]
        .width(Length::Fill)
        .height(Length::Fill);

    if app.overlay.is_visible() {
        let mut caption = column![text(record.title.clone()).size(28)].spacing(6);
        if let Some(date) = display_date(&record.date) {
            caption = caption.push(text(date).size(15));
        }
        if !record.explanation.is_empty() {
            caption = caption.push(text(record.explanation.clone()).size(16));
        }

        layers = layers.push(
            container(
                container(caption)
                    .padding(20)
                    .max_width(900)
                    .style(caption_box),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Alignment::Center)
            .align_y(Alignment::End)
            .padding(32),
        );
    }

    if let Some(fact) = app.trivia.active_fact() {
        layers = layers.push(
            container(
                container(text(fact.to_string()).size(17))
                    .padding(14)
                    .max_width(420)
                    .style(fact_bubble),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(cell_alignment(app.fact_cell.0))
            .align_y(cell_alignment(app.fact_cell.1))
            .padding(72),
        );
    }

    if app.state.is_favorite(&record.date) {
        layers = layers.push(
            container(text("★").size(26).color(Color::from_rgb(1.0, 0.8, 0.2)))
                .width(Length::Fill)
                .align_x(Alignment::End)
                .padding(18),
        );
    }

    container(layers)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(backdrop)
        .into()
}

fn empty_state<'a>() -> Element<'a, Message> {
    let content = column![
        text("Fetching astronomy images…").size(22),
        text("The slideshow starts as soon as a batch arrives.").size(14),
    ]
    .spacing(10)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(backdrop)
        .into()
}

/// Progress of the entry transition in `[0, 1]`.
fn transition_progress(shown_at: Option<Instant>, now: Instant) -> f32 {
    match shown_at {
        Some(shown_at) => {
            let elapsed = now.saturating_duration_since(shown_at).as_millis() as f32;
            (elapsed / TRANSITION_FADE_MS as f32).min(1.0)
        }
        None => 1.0,
    }
}

fn transition_opacity(style: TransitionStyle, progress: f32) -> f32 {
    match style {
        TransitionStyle::CrossFade | TransitionStyle::ZoomIn | TransitionStyle::ZoomOut => progress,
        // Slides arrive at full opacity; the movement carries the effect.
        TransitionStyle::SlideLeft | TransitionStyle::SlideRight => 0.4 + 0.6 * progress,
    }
}

/// Container padding that realizes the slide/zoom offsets plus the ambient
/// drift when motion is enabled.
fn image_padding(app: &App, progress: f32, now: Instant) -> Padding {
    let mut left = 0.0f32;
    let mut right = 0.0f32;
    let mut top = 0.0f32;
    let mut bottom = 0.0f32;

    match app.selector.current() {
        TransitionStyle::SlideLeft => {
            left += SLIDE_DISTANCE * (1.0 - progress);
        }
        TransitionStyle::SlideRight => {
            right += SLIDE_DISTANCE * (1.0 - progress);
        }
        TransitionStyle::ZoomIn => {
            let inset = 48.0 * (1.0 - progress);
            left += inset;
            right += inset;
            top += inset;
            bottom += inset;
        }
        TransitionStyle::CrossFade | TransitionStyle::ZoomOut => {}
    }

    if app.motion_enabled {
        if let Some(shown_at) = app.image_shown_at {
            let t = now.saturating_duration_since(shown_at).as_secs_f32();
            let phase = t * std::f32::consts::TAU / MOTION_PERIOD_SECS;
            let dx = MOTION_AMPLITUDE * (1.0 + phase.sin());
            let dy = MOTION_AMPLITUDE * (1.0 + phase.cos()) * 0.5;
            left += dx;
            right += 2.0 * MOTION_AMPLITUDE - dx;
            top += dy;
            bottom += MOTION_AMPLITUDE - dy;
        }
    }

    Padding {
        top,
        right,
        bottom,
        left,
    }
}

/// Maps a grid cell index to a layout alignment.
fn cell_alignment(cell: u8) -> Alignment {
    match cell {
        0 => Alignment::Start,
        1 => Alignment::Center,
        _ => Alignment::End,
    }
}

/// `YYYY-MM-DD` rendered as a human-readable date; `None` hides the line.
fn display_date(date: &str) -> Option<String> {
    if date.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => Some(parsed.format("%B %e, %Y").to_string()),
        Err(_) => Some(date.to_string()),
    }
}

fn backdrop(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Color::BLACK.into()),
        text_color: Some(Color::WHITE),
        ..container::Style::default()
    }
}

fn caption_box(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(
            Color {
                a: 0.65,
                ..Color::BLACK
            }
            .into(),
        ),
        text_color: Some(Color::WHITE),
        border: border::rounded(10),
        ..container::Style::default()
    }
}

fn fact_bubble(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(
            Color {
                a: 0.85,
                ..Color::from_rgb(0.09, 0.11, 0.25)
            }
            .into(),
        ),
        text_color: Some(Color::WHITE),
        border: border::rounded(14),
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_progress_ramps_and_saturates() {
        let now = Instant::now();
        assert_eq!(transition_progress(None, now), 1.0);
        assert_eq!(transition_progress(Some(now), now), 0.0);

        let done = now + std::time::Duration::from_millis(TRANSITION_FADE_MS * 2);
        assert_eq!(transition_progress(Some(now), done), 1.0);
    }

    #[test]
    fn display_date_formats_iso_dates() {
        assert_eq!(
            display_date("2026-03-09"),
            Some("March  9, 2026".to_string())
        );
        assert_eq!(display_date(""), None);
        // Unparseable dates pass through untouched.
        assert_eq!(display_date("soon"), Some("soon".to_string()));
    }

    #[test]
    fn cell_alignment_covers_the_grid() {
        assert!(Alignment::Start == cell_alignment(0));
        assert!(Alignment::Center == cell_alignment(1));
        assert!(Alignment::End == cell_alignment(2));
    }
}
