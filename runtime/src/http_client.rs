// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Async JSON-over-HTTP client wrapping reqwest.
//!
//! One request per call: no retries, no backoff. A failed request is simply
//! retried on the next scheduled cycle.

use serde_json::{Map, Value};
use std::time::Duration;
use stockwatch::FetchFailure;

/// Response from a JSON request, decoded but not yet shape-checked.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    /// Requested URL.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body parsed as JSON.
    pub body: Value,
}

/// HTTP client shared by the poll, weather, and relay paths.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client with a per-request timeout.
    pub fn new(timeout_ms: u64) -> Self {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("stockwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// GET a URL that must answer 200 with a JSON object.
    pub async fn get_object(&self, url: &str) -> Result<Map<String, Value>, FetchFailure> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(format!("GET {url}: {e}")))?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(FetchFailure::Transport(format!("GET {url}: HTTP {status}")));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(format!("GET {url}: reading body: {e}")))?;

        into_object(decode(url, &text)?, url)
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// Any non-2xx status is a transport failure.
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<JsonResponse, FetchFailure> {
        let resp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(format!("POST {url}: {e}")))?;

        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        if !(200..300).contains(&status) {
            return Err(FetchFailure::Transport(format!(
                "POST {url}: HTTP {status}: {}",
                truncate(&text, 200)
            )));
        }

        Ok(JsonResponse {
            url: url.to_string(),
            status,
            body: decode(url, &text)?,
        })
    }
}

fn decode(url: &str, text: &str) -> Result<Value, FetchFailure> {
    serde_json::from_str(text).map_err(|e| FetchFailure::Decode(format!("{url}: {e}")))
}

fn into_object(body: Value, url: &str) -> Result<Map<String, Value>, FetchFailure> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(FetchFailure::Decode(format!("{url}: body is not a JSON object"))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
