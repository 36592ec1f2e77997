// SPDX-License-Identifier: MPL-2.0
//! Application root state and orchestration of the scheduling engine.
//!
//! The `App` struct wires the engine components (batch store, rotation,
//! overlay, transition selector, trivia scheduler) to their collaborators
//! (APOD client, fact client, persistence) and translates messages into
//! side effects. All state transitions run on the single-threaded Iced
//! update loop, which is what makes the engine's cooperative scheduling
//! model sound without locks.

pub mod message;
pub mod paths;
pub mod persisted_state;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};

use crate::apod::{self, ApodClient};
use crate::config::{self, Config};
use crate::facts::FactsClient;
use crate::slideshow::{
    BatchStore, ImageRecord, OverlayController, RotationEngine, StyleSelector, TriviaScheduler,
};
use iced::widget::image;
use iced::{window, Element, Subscription, Task, Theme};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

pub const WINDOW_DEFAULT_WIDTH: u32 = 1280;
pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const MIN_WINDOW_WIDTH: u32 = 640;
pub const MIN_WINDOW_HEIGHT: u32 = 480;

/// Decoded image handles kept around so revisited records do not re-fetch.
const IMAGE_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(16).unwrap();

/// Root Iced application state bridging the scheduling engine, network
/// collaborators, and persisted preferences.
pub struct App {
    config: Config,
    api: ApodClient,
    facts_client: FactsClient,
    store: BatchStore,
    rotation: RotationEngine,
    overlay: OverlayController,
    selector: StyleSelector,
    trivia: TriviaScheduler,
    state: persisted_state::AppState,
    images: LruCache<String, image::Handle>,
    current_handle: Option<image::Handle>,
    /// When the current image went on screen; drives transition animation.
    image_shown_at: Option<Instant>,
    image_count: usize,
    motion_enabled: bool,
    fullscreen: bool,
    fetching_batch: bool,
    /// Fact bubble placement as a (column, row) cell in a 3x3 grid,
    /// re-rolled for every fired fact.
    fact_cell: (u8, u8),
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("batch_len", &self.store.cached().map(|b| b.len()))
            .field("current_index", &self.rotation.current_index())
            .field("overlay_visible", &self.overlay.is_visible())
            .finish()
    }
}

/// Builds the window settings.
pub fn window_settings() -> window::Settings {
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // Wrap flags in RefCell<Option<_>> to satisfy Fn trait requirement
    // while only consuming flags once (iced 0.14 requires Fn, not FnOnce)
    let boot_state = RefCell::new(Some(flags));
    let boot = move || {
        let flags = boot_state
            .borrow_mut()
            .take()
            .expect("Boot function called more than once");
        App::new(flags)
    };

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl Default for App {
    fn default() -> Self {
        let config = Config::default();
        Self {
            api: ApodClient::new(apod::DEMO_API_KEY),
            facts_client: FactsClient::new(None),
            store: BatchStore::with_default_ttl(),
            rotation: RotationEngine::new(Duration::from_secs(
                config::DEFAULT_ROTATION_INTERVAL_SECS,
            )),
            overlay: OverlayController::new(),
            selector: StyleSelector::default(),
            trivia: TriviaScheduler::new(true),
            state: persisted_state::AppState::default(),
            images: LruCache::new(IMAGE_CACHE_CAPACITY),
            current_handle: None,
            image_shown_at: None,
            image_count: config::DEFAULT_IMAGE_COUNT,
            motion_enabled: false,
            fullscreen: false,
            fetching_batch: false,
            fact_cell: (1, 1),
            config,
        }
    }
}

impl App {
    /// Initializes application state from config and persisted state, then
    /// replays the cached batch and requests a fresh one when stale.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        let config = config::load();
        let state = persisted_state::AppState::load();

        let api_key = flags
            .api_key
            .or_else(|| config.api_key.clone())
            .unwrap_or_else(|| apod::DEMO_API_KEY.to_string());
        let interval_secs = config
            .rotation_interval_secs
            .unwrap_or(config::DEFAULT_ROTATION_INTERVAL_SECS)
            .clamp(
                config::MIN_ROTATION_INTERVAL_SECS,
                config::MAX_ROTATION_INTERVAL_SECS,
            );
        let image_count = config
            .image_count
            .unwrap_or(config::DEFAULT_IMAGE_COUNT)
            .clamp(config::MIN_IMAGE_COUNT, config::MAX_IMAGE_COUNT);

        let mut app = App {
            api: ApodClient::new(api_key),
            facts_client: FactsClient::new(config.facts_endpoint.clone()),
            rotation: RotationEngine::new(Duration::from_secs(interval_secs)),
            selector: StyleSelector::new(
                config.transition_mode.unwrap_or_default(),
                config.manual_style.unwrap_or_default(),
            ),
            trivia: TriviaScheduler::new(config.popups_enabled.unwrap_or(true)),
            motion_enabled: config.motion_enabled.unwrap_or(false),
            image_count,
            state,
            config,
            ..App::default()
        };

        // Replay the persisted batch so the slideshow starts offline;
        // records are shape-checked again in case the file was edited.
        if app.state.has_valid_cache() {
            let records: Vec<ImageRecord> = app
                .state
                .cached_batch
                .iter()
                .filter(|record| !record.url.is_empty())
                .cloned()
                .collect();
            if let Some(fetched_at) = app.state.cached_fetched_at() {
                app.store.install(records, fetched_at);
            }
        }

        let mut startup = Vec::new();
        if app.store.cached().is_some() {
            startup.push(app.anchor_rotation());
        }
        // No-op when the replayed cache is still fresh.
        startup.push(app.request_batch());

        (app, Task::batch(startup))
    }

    fn title(&self) -> String {
        match self.current_record() {
            Some(record) if !record.title.is_empty() => format!("{} - IcedApod", record.title),
            _ => String::from("IcedApod"),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let rotation = subscription::rotation_cadence(
            self.rotation.is_active() && self.store.cached().is_some(),
            self.rotation.interval(),
        );

        let animating = self
            .image_shown_at
            .map(|shown_at| {
                shown_at.elapsed() < Duration::from_millis(config::TRANSITION_FADE_MS)
            })
            .unwrap_or(false);
        let poll_needed = self.overlay.is_visible()
            || self.trivia.has_pending()
            || animating
            || (self.motion_enabled && self.current_handle.is_some());

        Subscription::batch([
            rotation,
            subscription::poll_tick(poll_needed),
            subscription::stimuli(),
        ])
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }

    /// The record at the rotation engine's current index, if a batch is
    /// anchored.
    fn current_record(&self) -> Option<&ImageRecord> {
        let batch = self.store.cached()?;
        batch.get(self.rotation.current_index()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    /// Points both app directories at temp dirs so tests never touch the
    /// real config or state files.
    fn with_temp_dirs<F: FnOnce()>(test: F) {
        let _guard = env_lock().lock().expect("failed to lock env mutex");
        let data_dir = tempdir().expect("failed to create temp data dir");
        let config_dir = tempdir().expect("failed to create temp config dir");
        std::env::set_var(paths::ENV_DATA_DIR, data_dir.path());
        std::env::set_var(paths::ENV_CONFIG_DIR, config_dir.path());

        test();

        std::env::remove_var(paths::ENV_DATA_DIR);
        std::env::remove_var(paths::ENV_CONFIG_DIR);
    }

    fn records(dates: &[&str]) -> Vec<ImageRecord> {
        dates
            .iter()
            .map(|date| ImageRecord {
                url: format!("https://apod.test/{date}.jpg"),
                title: format!("Image {date}"),
                date: date.to_string(),
                explanation: "An explanation of the image".to_string(),
            })
            .collect()
    }

    #[test]
    fn batch_fetched_installs_and_anchors() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b", "c"]))));

            assert_eq!(app.store.cached().map(|b| b.len()), Some(3));
            assert_eq!(app.rotation.current_index(), Some(0));
            assert!(app.overlay.is_visible());
            assert_eq!(app.state.cached_batch.len(), 3);
        });
    }

    #[test]
    fn batch_fetch_error_keeps_previous_batch() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b"]))));

            let _ = app.update(Message::BatchFetched(Err(Error::Http("boom".into()))));

            assert_eq!(app.store.cached().map(|b| b.len()), Some(2));
            assert_eq!(app.rotation.current_index(), Some(0));
        });
    }

    #[test]
    fn empty_batch_is_not_adopted() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            let _ = app.update(Message::BatchFetched(Ok(Vec::new())));

            assert_eq!(app.store.cached().map(|b| b.len()), Some(1));
        });
    }

    #[test]
    fn rotation_stays_idle_without_a_batch() {
        let mut app = App::default();
        let _ = app.update(Message::RotationTick(Instant::now()));
        assert!(!app.rotation.is_active());
        assert!(app.current_record().is_none());
    }

    #[test]
    fn batch_anchor_resumes_at_last_viewed() {
        with_temp_dirs(|| {
            let mut app = App::default();
            app.state.last_viewed = Some("b".to_string());
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b", "c"]))));

            assert_eq!(app.rotation.current_index(), Some(1));
        });
    }

    #[test]
    fn manual_navigation_moves_without_marking_seen() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b", "c"]))));

            let _ = app.update(Message::NextImage);
            assert_eq!(app.rotation.current_index(), Some(1));

            let _ = app.update(Message::PreviousImage);
            let _ = app.update(Message::PreviousImage);
            assert_eq!(app.rotation.current_index(), Some(2));
            assert_eq!(app.rotation.seen_count(), 0);
        });
    }

    #[test]
    fn stale_facts_completion_is_dropped() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b"]))));

            let _ = app.update(Message::FactsFetched {
                date: "b".to_string(),
                result: Ok(vec!["stale fact".to_string()]),
            });

            assert!(app.trivia.facts().is_empty());
        });
    }

    #[test]
    fn facts_error_degrades_to_fallback() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));

            let _ = app.update(Message::FactsFetched {
                date: "a".to_string(),
                result: Err(Error::Http("generation down".into())),
            });

            assert_eq!(app.trivia.facts().len(), 1);
            assert!(app.trivia.facts()[0].contains("Image a"));
        });
    }

    #[test]
    fn facts_arriving_after_overlay_hid_start_a_sequence() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            app.overlay.hide();

            let _ = app.update(Message::FactsFetched {
                date: "a".to_string(),
                result: Ok(vec!["f0".to_string(), "f1".to_string()]),
            });

            assert!(app.trivia.has_pending());
        });
    }

    #[test]
    fn facts_arriving_while_overlay_visible_do_not_activate() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            assert!(app.overlay.is_visible());

            let _ = app.update(Message::FactsFetched {
                date: "a".to_string(),
                result: Ok(vec!["f0".to_string()]),
            });

            assert!(!app.trivia.has_pending());
            assert_eq!(app.trivia.facts().len(), 1);
        });
    }

    #[test]
    fn pointer_movement_reshows_overlay_and_cancels_trivia() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            app.overlay.hide();
            let _ = app.update(Message::FactsFetched {
                date: "a".to_string(),
                result: Ok(vec!["f0".to_string()]),
            });
            assert!(app.trivia.has_pending());

            let _ = app.update(Message::PointerMoved);

            assert!(app.overlay.is_visible());
            assert!(!app.trivia.has_pending());
        });
    }

    #[test]
    fn toggling_popups_off_cancels_pending_fires() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            app.overlay.hide();
            let _ = app.update(Message::FactsFetched {
                date: "a".to_string(),
                result: Ok(vec!["f0".to_string()]),
            });
            assert!(app.trivia.has_pending());

            let _ = app.update(Message::TogglePopups);

            assert!(!app.trivia.is_enabled());
            assert!(!app.trivia.has_pending());
        });
    }

    #[test]
    fn toggle_favorite_round_trips_through_state() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));

            let _ = app.update(Message::ToggleFavorite);
            assert!(app.state.is_favorite("a"));

            let _ = app.update(Message::ToggleFavorite);
            assert!(!app.state.is_favorite("a"));
        });
    }

    #[test]
    fn automatic_tick_advances_and_exhaustion_restarts_at_zero() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b"]))));

            let _ = app.update(Message::RotationTick(Instant::now()));
            assert_eq!(app.rotation.current_index(), Some(1));

            let _ = app.update(Message::RotationTick(Instant::now()));
            assert_eq!(app.rotation.current_index(), Some(0));
            assert_eq!(app.rotation.seen_count(), 0);
        });
    }

    #[test]
    fn image_fetched_for_current_url_sets_handle() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b"]))));
            assert!(app.current_handle.is_none());

            let handle = image::Handle::from_rgba(1, 1, vec![0, 0, 0, 255]);
            let _ = app.update(Message::ImageFetched {
                url: "https://apod.test/a.jpg".to_string(),
                result: Ok(handle),
            });
            assert!(app.current_handle.is_some());
        });
    }

    #[test]
    fn image_fetched_for_other_url_is_cached_but_not_shown() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a", "b"]))));

            let handle = image::Handle::from_rgba(1, 1, vec![0, 0, 0, 255]);
            let _ = app.update(Message::ImageFetched {
                url: "https://apod.test/b.jpg".to_string(),
                result: Ok(handle),
            });
            assert!(app.current_handle.is_none());
            assert!(app.images.contains(&"https://apod.test/b.jpg".to_string()));
        });
    }

    #[test]
    fn image_fetch_error_leaves_previous_handle() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            let _ = app.update(Message::ImageFetched {
                url: "https://apod.test/a.jpg".to_string(),
                result: Err(Error::Http("timeout".into())),
            });
            assert!(app.current_handle.is_none());
        });
    }

    #[test]
    fn overlay_poll_transition_activates_trivia() {
        with_temp_dirs(|| {
            let mut app = App::default();
            let _ = app.update(Message::BatchFetched(Ok(records(&["a"]))));
            app.trivia.set_facts(vec!["f0".to_string()]);

            // Far enough in the future that any caption deadline passed.
            let later = Instant::now() + Duration::from_secs(3600);
            let _ = app.update(Message::PollTick(later));

            assert!(!app.overlay.is_visible());
            assert!(app.trivia.has_pending());
        });
    }
}
