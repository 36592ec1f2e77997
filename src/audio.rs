// SPDX-License-Identifier: MPL-2.0
//! Best-effort notification chime for trivia pop-ups.
//!
//! Plays a short decaying sine tone on the default output device. Audio is
//! strictly optional: any failure (no device, unsupported format) is logged
//! at debug level and otherwise ignored.

use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::f32::consts::TAU;
use std::time::Duration;

const CHIME_FREQUENCY_HZ: f32 = 880.0;
const CHIME_DURATION_MS: u64 = 250;
const CHIME_GAIN: f32 = 0.2;

/// Fire-and-forget chime. Returns immediately; playback happens on a
/// short-lived background thread.
pub fn play_chime() {
    std::thread::spawn(|| {
        if let Err(err) = chime_blocking() {
            log::debug!("notification chime unavailable: {err}");
        }
    });
}

fn chime_blocking() -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device".into()))?;
    let config = device
        .default_output_config()
        .map_err(|err| Error::Audio(err.to_string()))?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    let total_frames = (sample_rate * CHIME_DURATION_MS as f32 / 1_000.0) as u32;
    let mut frame_clock = 0u32;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                for frame in data.chunks_mut(channels) {
                    let t = frame_clock as f32 / sample_rate;
                    // Linear fade-out keeps the tone from clicking at the end.
                    let envelope = 1.0 - (frame_clock as f32 / total_frames as f32).min(1.0);
                    let value = (TAU * CHIME_FREQUENCY_HZ * t).sin() * envelope * CHIME_GAIN;
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                    frame_clock = frame_clock.saturating_add(1);
                }
            },
            |err| log::debug!("chime stream error: {err}"),
            None,
        )
        .map_err(|err| Error::Audio(err.to_string()))?;

    stream.play().map_err(|err| Error::Audio(err.to_string()))?;

    // Keep the stream alive until the tone has finished.
    std::thread::sleep(Duration::from_millis(CHIME_DURATION_MS + 50));
    Ok(())
}
