// SPDX-License-Identifier: MPL-2.0
//! Message handlers for the application update loop.
//!
//! A rotation tick always completes its seen-set update and index search
//! before any dependent overlay or trivia rescheduling happens: the
//! handlers below run to completion on the single update thread, so the
//! ordering is structural. External failures never escape this module;
//! the engine only ever observes "no update happened" or "fallback data
//! used".

use super::{App, Message};
use crate::audio;
use crate::config;
use crate::error::{Error, Result};
use crate::facts;
use crate::slideshow::{ImageRecord, RotationOutcome, ShowTrigger};
use iced::widget::image;
use iced::{window, Task};
use rand::Rng;
use std::path::PathBuf;
use std::time::{Instant, SystemTime};

impl App {
    pub(super) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::RotationTick(_) => {
                let outcome = match self.store.cached() {
                    Some(batch) => self.rotation.tick(batch),
                    None => RotationOutcome::Idle,
                };
                match outcome {
                    RotationOutcome::Advanced(_) => {
                        self.on_index_changed(ShowTrigger::ImageChange)
                    }
                    RotationOutcome::Exhausted => Task::batch([
                        self.on_index_changed(ShowTrigger::ImageChange),
                        Task::done(Message::RefreshBatch),
                    ]),
                    RotationOutcome::Idle => Task::none(),
                }
            }

            Message::PollTick(now) => {
                if self.overlay.poll(now) {
                    // Caption just hid; pop-ups may begin.
                    self.trivia.activate(now, &mut rand::rng());
                }
                // Pop-ups never fire while the caption is on screen.
                if !self.overlay.is_visible() {
                    let interval = self.rotation.interval();
                    if self.trivia.poll(now, interval, &mut rand::rng()).is_some() {
                        self.place_fact_bubble();
                        audio::play_chime();
                    }
                }
                Task::none()
            }

            Message::RefreshBatch => self.request_batch(),

            Message::BatchFetched(result) => {
                self.fetching_batch = false;
                match result {
                    Ok(records) => {
                        if records.is_empty() {
                            log::warn!(
                                "image batch fetch returned no usable records; keeping previous batch"
                            );
                            return Task::none();
                        }
                        let now = SystemTime::now();
                        if self.store.install(records.clone(), now) {
                            self.state.record_batch(&records, now);
                            self.state.save();
                            return self.anchor_rotation();
                        }
                        Task::none()
                    }
                    Err(err) => {
                        log::warn!("image batch fetch failed: {err}");
                        Task::none()
                    }
                }
            }

            Message::ImageFetched { url, result } => {
                match result {
                    Ok(handle) => {
                        self.images.put(url.clone(), handle.clone());
                        let is_current = self
                            .current_record()
                            .map(|record| record.url == url)
                            .unwrap_or(false);
                        if is_current {
                            self.current_handle = Some(handle);
                        }
                    }
                    Err(err) => log::warn!("image fetch failed for {url}: {err}"),
                }
                Task::none()
            }

            Message::FactsFetched { date, result } => {
                let current = self
                    .current_record()
                    .map(|record| (record.date.clone(), record.title.clone()));
                let Some((current_date, title)) = current else {
                    return Task::none();
                };
                if current_date != date {
                    // Completion for an image that is no longer on screen.
                    return Task::none();
                }

                let fact_list = match result {
                    Ok(fact_list) => fact_list,
                    Err(err) => {
                        log::info!("fact generation failed, using fallback: {err}");
                        facts::fallback_facts(&title)
                    }
                };
                self.trivia.set_facts(fact_list);
                if !self.overlay.is_visible() {
                    // The caption already hid while facts were loading;
                    // start the sequence now instead of never.
                    self.trivia.activate(Instant::now(), &mut rand::rng());
                }
                Task::none()
            }

            Message::DownloadFinished(result) => {
                match result {
                    Ok(path) => log::info!("saved image to {}", path.display()),
                    Err(err) => log::warn!("image download failed: {err}"),
                }
                Task::none()
            }

            Message::PointerMoved => {
                let word_count = match self.current_record() {
                    Some(record) => record.word_count(),
                    None => return Task::none(),
                };
                self.overlay
                    .show(ShowTrigger::UserActivity, word_count, Instant::now());
                // A re-shown caption invalidates any scheduled pop-ups.
                self.trivia.cancel_all();
                Task::none()
            }

            Message::NextImage => {
                let moved = match self.store.cached() {
                    Some(batch) => self.rotation.next(batch).is_some(),
                    None => false,
                };
                if moved {
                    self.on_index_changed(ShowTrigger::UserActivity)
                } else {
                    Task::none()
                }
            }

            Message::PreviousImage => {
                let moved = match self.store.cached() {
                    Some(batch) => self.rotation.previous(batch).is_some(),
                    None => false,
                };
                if moved {
                    self.on_index_changed(ShowTrigger::UserActivity)
                } else {
                    Task::none()
                }
            }

            Message::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                let mode = if self.fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };
                window::latest().and_then(move |id| window::set_mode(id, mode))
            }

            Message::DownloadImage => {
                let Some(record) = self.current_record().cloned() else {
                    return Task::none();
                };
                let api = self.api.clone();
                Task::perform(
                    async move { save_image_to_disk(&api, &record).await },
                    Message::DownloadFinished,
                )
            }

            Message::ToggleMotion => {
                self.motion_enabled = !self.motion_enabled;
                self.config.motion_enabled = Some(self.motion_enabled);
                self.persist_config();
                Task::none()
            }

            Message::TogglePopups => {
                let enabled = !self.trivia.is_enabled();
                self.trivia.set_enabled(enabled);
                self.config.popups_enabled = Some(enabled);
                self.persist_config();
                Task::none()
            }

            Message::ToggleFavorite => {
                let date = self
                    .current_record()
                    .map(|record| record.date.clone())
                    .filter(|date| !date.is_empty());
                if let Some(date) = date {
                    self.state.toggle_favorite(&date);
                    self.state.save();
                }
                Task::none()
            }
        }
    }

    /// Anchors the rotation engine to the freshly installed batch and
    /// presents the anchored image.
    pub(super) fn anchor_rotation(&mut self) -> Task<Message> {
        let last_viewed = self.state.last_viewed.clone();
        match self.store.cached() {
            Some(batch) => self.rotation.anchor(batch, last_viewed.as_deref()),
            None => return Task::none(),
        }
        self.on_index_changed(ShowTrigger::ImageChange)
    }

    /// Asks the batch store for a batch. A fetch only goes out when the
    /// cache is stale or missing and no fetch is already in flight; a
    /// fresh cache answers immediately (rotation simply restarts over it).
    pub(super) fn request_batch(&mut self) -> Task<Message> {
        if self.fetching_batch || !self.store.needs_refresh(SystemTime::now()) {
            return Task::none();
        }
        self.fetching_batch = true;
        let api = self.api.clone();
        let count = self.image_count;
        Task::perform(
            async move { api.fetch_batch(count).await },
            Message::BatchFetched,
        )
    }

    /// Side effects common to every index change, automatic or manual:
    /// overlay re-display, transition re-pick, trivia invalidation, fact
    /// and image fetches, and last-viewed persistence.
    pub(super) fn on_index_changed(&mut self, trigger: ShowTrigger) -> Task<Message> {
        let Some(record) = self.current_record().cloned() else {
            return Task::none();
        };
        let now = Instant::now();

        self.overlay.show(trigger, record.word_count(), now);
        self.selector.pick(&mut rand::rng());
        self.image_shown_at = Some(now);
        // The old image's facts and timers must not survive the change.
        self.trivia.set_facts(Vec::new());

        if !record.date.is_empty() {
            self.state.last_viewed = Some(record.date.clone());
            self.state.save();
        }

        let mut tasks = Vec::new();

        match self.images.get(&record.url) {
            Some(handle) => self.current_handle = Some(handle.clone()),
            None => {
                self.current_handle = None;
                let api = self.api.clone();
                let url = record.url.clone();
                tasks.push(Task::perform(
                    async move {
                        let result = api.fetch_image(&url).await.map(image::Handle::from_bytes);
                        (url, result)
                    },
                    |(url, result)| Message::ImageFetched { url, result },
                ));
            }
        }

        let client = self.facts_client.clone();
        let title = record.title.clone();
        let date = record.date.clone();
        let description = if record.date.is_empty() {
            record.explanation.clone()
        } else {
            format!("{} ({})", record.explanation, record.date)
        };
        tasks.push(Task::perform(
            async move {
                let result = client.fetch_facts(&title, &description).await;
                (date, result)
            },
            |(date, result)| Message::FactsFetched { date, result },
        ));

        Task::batch(tasks)
    }

    fn persist_config(&self) {
        if let Err(err) = config::save(&self.config) {
            log::warn!("could not persist settings: {err}");
        }
    }

    /// Re-rolls the fact bubble's position for a newly fired fact.
    fn place_fact_bubble(&mut self) {
        let mut rng = rand::rng();
        self.fact_cell = (rng.random_range(0..3), rng.random_range(0..3));
    }
}

/// File name for a downloaded image: the URL's final path segment when it
/// looks like a file name, otherwise one derived from the record's date.
fn download_file_name(record: &ImageRecord) -> String {
    let from_url = record
        .url
        .rsplit('/')
        .next()
        .and_then(|segment| segment.split('?').next())
        .filter(|name| !name.is_empty() && name.contains('.'));
    match from_url {
        Some(name) => name.to_string(),
        None if !record.date.is_empty() => format!("apod-{}.jpg", record.date),
        None => "apod.jpg".to_string(),
    }
}

async fn save_image_to_disk(
    api: &crate::apod::ApodClient,
    record: &ImageRecord,
) -> Result<PathBuf> {
    let bytes = api.fetch_image(&record.url).await?;
    let dir = dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| Error::Io("no download directory available".into()))?;
    let path = dir.join(download_file_name(record));
    std::fs::write(&path, &bytes)?;
    Ok(path)
}
