// SPDX-License-Identifier: MPL-2.0
//! Image batch data model and the cached-or-fresh batch store.
//!
//! A batch is a fetched, ordered collection of image records treated as one
//! atomic dataset until replaced wholesale. The `BatchStore` holds the
//! current batch together with its fetch timestamp and answers the single
//! question the application needs: is the cache still fresh, or must a new
//! fetch be performed?

use crate::config::BATCH_TTL_SECS;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// One astronomy image and its metadata. Immutable once fetched.
///
/// The `date` is the unique key of a record within its batch; records with
/// missing upstream text fields carry empty strings instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub explanation: String,
}

impl ImageRecord {
    /// Number of whitespace-separated words in the description, used to
    /// scale the caption overlay display time.
    pub fn word_count(&self) -> usize {
        self.explanation.split_whitespace().count()
    }
}

/// An ordered sequence of image records plus the time it was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    records: Vec<ImageRecord>,
    fetched_at: SystemTime,
}

impl ImageBatch {
    pub fn new(records: Vec<ImageRecord>, fetched_at: SystemTime) -> Self {
        Self {
            records,
            fetched_at,
        }
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    /// Index of the record with the given date key, if present.
    pub fn position_of(&self, date: &str) -> Option<usize> {
        self.records.iter().position(|record| record.date == date)
    }

    pub fn fetched_at(&self) -> SystemTime {
        self.fetched_at
    }
}

/// Holds the active batch and decides when it has gone stale.
///
/// The store never fetches by itself; the application layer performs the
/// asynchronous fetch and calls [`BatchStore::install`] with the sanitized
/// result. A failed fetch simply leaves the previous batch in place.
#[derive(Debug)]
pub struct BatchStore {
    batch: Option<ImageBatch>,
    ttl: Duration,
}

impl BatchStore {
    pub fn new(ttl: Duration) -> Self {
        Self { batch: None, ttl }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(BATCH_TTL_SECS))
    }

    pub fn cached(&self) -> Option<&ImageBatch> {
        self.batch.as_ref()
    }

    /// True when no batch is held or the held batch has outlived the TTL.
    ///
    /// A fetch timestamp in the future (clock rollback) counts as fresh.
    pub fn needs_refresh(&self, now: SystemTime) -> bool {
        match &self.batch {
            None => true,
            Some(batch) => now
                .duration_since(batch.fetched_at)
                .map(|age| age >= self.ttl)
                .unwrap_or(false),
        }
    }

    /// Adopts a new batch, replacing the previous one wholesale.
    ///
    /// An empty record list is rejected and the previous batch (possibly
    /// none) stays current; returns whether the batch was adopted.
    pub fn install(&mut self, records: Vec<ImageRecord>, now: SystemTime) -> bool {
        if records.is_empty() {
            return false;
        }
        self.batch = Some(ImageBatch::new(records, now));
        true
    }
}

impl Default for BatchStore {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}
