// SPDX-License-Identifier: MPL-2.0
//! Trivia fact generation client.
//!
//! Facts come from an external text-generation endpoint that answers a
//! prompt with `{"facts": [...]}`, where the array is sometimes encoded as
//! a JSON string inside the field. Any failure, from a missing endpoint to
//! a malformed response, degrades to a single generic fallback fact; the
//! client never retries on its own.

use crate::error::{Error, Result};
use serde_json::Value;

/// Number of facts requested per image.
const FACTS_PER_IMAGE: usize = 5;

/// The single-element list substituted whenever generation fails.
pub fn fallback_facts(title: &str) -> Vec<String> {
    vec![format!(
        "This is a fascinating astronomical image titled \"{title}\"."
    )]
}

fn build_prompt(title: &str, description: &str) -> String {
    format!(
        "Generate exactly {FACTS_PER_IMAGE} fun, interesting trivia facts about this NASA \
         astronomy image titled \"{title}\" with the following description: \"{description}\". \
         Each fact should be a single sentence, scientifically accurate, and should not repeat \
         details already mentioned in the description; instead, provide novel insights that \
         expand upon it. Return only the facts as a JSON array of strings."
    )
}

/// Extracts the fact list from a response body, accepting both a plain
/// array and an array serialized as a JSON string.
pub fn parse_facts(body: &Value) -> Option<Vec<String>> {
    let raw = body.get("facts")?;
    let items: Vec<Value> = match raw {
        Value::Array(items) => items.clone(),
        Value::String(encoded) => serde_json::from_str::<Value>(encoded)
            .ok()?
            .as_array()?
            .clone(),
        _ => return None,
    };

    let facts: Vec<String> = items
        .into_iter()
        .filter_map(|item| item.as_str().map(str::to_owned))
        .collect();
    if facts.is_empty() {
        None
    } else {
        Some(facts)
    }
}

#[derive(Debug, Clone)]
pub struct FactsClient {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl FactsClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Requests facts for an image. `description` should already carry the
    /// record's date suffix so the generated facts can reference it.
    pub async fn fetch_facts(&self, title: &str, description: &str) -> Result<Vec<String>> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| Error::Http("no fact endpoint configured".into()))?;
        let prompt = build_prompt(title, description);

        let body: Value = self
            .http
            .post(&endpoint)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_facts(&body).ok_or_else(|| Error::Http("fact response had no usable facts".into()))
    }
}
