// SPDX-License-Identifier: MPL-2.0
//! NASA "Astronomy Picture of the Day" client.
//!
//! Fetches batches of image metadata and raw image bytes. Payload
//! sanitization is separated from transport so it can be tested without a
//! network: entries without a URL are dropped, and missing text fields
//! default to empty strings before a record enters the batch store.

use crate::error::Result;
use crate::slideshow::ImageRecord;
use serde::Deserialize;

const APOD_ENDPOINT: &str = "https://api.nasa.gov/planetary/apod";

/// Shared rate-limited key NASA provides for unauthenticated use.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// One raw entry as returned by the APOD endpoint. Every field is optional
/// on the wire; video-of-the-day entries, for example, carry no `url`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApodEntry {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Turns raw wire entries into well-formed image records.
pub fn sanitize_entries(entries: Vec<ApodEntry>) -> Vec<ImageRecord> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let url = entry.url.filter(|url| !url.is_empty())?;
            Some(ImageRecord {
                url,
                title: entry.title.unwrap_or_default(),
                date: entry.date.unwrap_or_default(),
                explanation: entry.explanation.unwrap_or_default(),
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ApodClient {
    http: reqwest::Client,
    api_key: String,
}

impl ApodClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Fetches `count` random records and sanitizes them. The result may be
    /// smaller than `count`, or empty, when the service returns entries
    /// without image URLs.
    pub async fn fetch_batch(&self, count: usize) -> Result<Vec<ImageRecord>> {
        let entries: Vec<ApodEntry> = self
            .http
            .get(APOD_ENDPOINT)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("count", count.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(sanitize_entries(entries))
    }

    /// Downloads the raw bytes of one image.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<ApodEntry> {
        serde_json::from_str(json).expect("fixture should parse")
    }

    #[test]
    fn sanitize_drops_entries_without_url() {
        let entries = parse(
            r#"[
                {"url": "https://apod.test/a.jpg", "title": "A", "date": "2026-01-01", "explanation": "first"},
                {"title": "No image", "date": "2026-01-02", "explanation": "video day"},
                {"url": "", "title": "Empty", "date": "2026-01-03"},
                {"url": "https://apod.test/b.jpg", "title": "B", "date": "2026-01-04", "explanation": "second"}
            ]"#,
        );

        let records = sanitize_entries(entries);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, "2026-01-01");
        assert_eq!(records[1].date, "2026-01-04");
    }

    #[test]
    fn sanitize_defaults_missing_text_fields_to_empty() {
        let entries = parse(r#"[{"url": "https://apod.test/bare.jpg"}]"#);

        let records = sanitize_entries(entries);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].date, "");
        assert_eq!(records[0].explanation, "");
    }

    #[test]
    fn sanitize_preserves_order() {
        let entries = parse(
            r#"[
                {"url": "https://apod.test/1.jpg", "date": "d1"},
                {"url": "https://apod.test/2.jpg", "date": "d2"},
                {"url": "https://apod.test/3.jpg", "date": "d3"}
            ]"#,
        );

        let dates: Vec<String> = sanitize_entries(entries)
            .into_iter()
            .map(|r| r.date)
            .collect();
        assert_eq!(dates, vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn unknown_wire_fields_are_ignored() {
        let entries = parse(
            r#"[{"url": "https://apod.test/x.jpg", "media_type": "image", "hdurl": "https://apod.test/x-hd.jpg", "copyright": "someone"}]"#,
        );
        assert_eq!(sanitize_entries(entries).len(), 1);
    }
}
