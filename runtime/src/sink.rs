// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Where fetched payloads go.
//!
//! A co-located scheduler ingests straight into the server's cache. A
//! scheduler running as a separate scraper process relays the raw payload
//! to the server's ingest endpoint instead.

use crate::http_client::HttpClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use stockwatch::{normalize, FetchFailure, IngestOutcome, ItemShape, StockCache};

/// What a sink did with a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkReport {
    /// Normalized and offered to the local cache.
    Local(IngestOutcome),
    /// Delivered to a remote ingest endpoint, with its JSON reply.
    Relayed { status: u16, response: Value },
}

/// Destination for raw payloads produced by a fetcher.
#[async_trait]
pub trait IngestSink: Send + Sync {
    async fn deliver(&self, raw: Value) -> Result<SinkReport, FetchFailure>;
}

/// Normalizes and ingests into an in-process cache.
pub struct LocalSink<T> {
    cache: Arc<StockCache<T>>,
}

impl<T: ItemShape> LocalSink<T> {
    pub fn new(cache: Arc<StockCache<T>>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl<T: ItemShape> IngestSink for LocalSink<T> {
    async fn deliver(&self, raw: Value) -> Result<SinkReport, FetchFailure> {
        let payload = normalize::<T>(&raw);
        Ok(SinkReport::Local(self.cache.ingest(payload)))
    }
}

/// Posts raw payloads to a server's ingest endpoint.
pub struct RelaySink {
    client: HttpClient,
    upload_url: String,
}

impl RelaySink {
    pub fn new(client: HttpClient, upload_url: impl Into<String>) -> Self {
        Self {
            client,
            upload_url: upload_url.into(),
        }
    }
}

#[async_trait]
impl IngestSink for RelaySink {
    async fn deliver(&self, raw: Value) -> Result<SinkReport, FetchFailure> {
        let resp = self.client.post_json(&self.upload_url, &raw).await?;
        tracing::info!(url = %resp.url, response = %resp.body, "relayed payload");
        Ok(SinkReport::Relayed {
            status: resp.status,
            response: resp.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stockwatch::MergePolicy;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_local_sink_normalizes_before_ingest() {
        let cache = Arc::new(StockCache::<String>::new(MergePolicy::Replace));
        let sink = LocalSink::new(Arc::clone(&cache));

        let report = sink
            .deliver(json!({"gears": ["Trowel **x2**", 7], "seed": ["Corn **x1**"]}))
            .await
            .unwrap();
        assert_eq!(report, SinkReport::Local(IngestOutcome::Applied { items: 2 }));
        assert_eq!(cache.read().gear, vec!["Trowel **x2**".to_string()]);
        assert_eq!(cache.read().seeds, vec!["Corn **x1**".to_string()]);
    }

    #[tokio::test]
    async fn test_local_sink_skips_garbage() {
        let cache = Arc::new(StockCache::<String>::default());
        let sink = LocalSink::new(Arc::clone(&cache));
        let report = sink.deliver(json!("not a payload")).await.unwrap();
        assert_eq!(report, SinkReport::Local(IngestOutcome::Skipped));
    }

    #[tokio::test]
    async fn test_relay_posts_raw_payload() {
        let server = MockServer::start().await;
        let raw = json!({"gears": [], "seeds": [{"name": "Carrot", "quantity": "x21"}], "eggs": []});
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .and(body_json(raw.clone()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success", "received_items": 3})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let sink = RelaySink::new(
            HttpClient::new(5000),
            format!("{}/api/upload", server.uri()),
        );
        let report = sink.deliver(raw).await.unwrap();
        assert_eq!(
            report,
            SinkReport::Relayed {
                status: 200,
                response: json!({"status": "success", "received_items": 3}),
            }
        );
    }

    #[tokio::test]
    async fn test_relay_rejection_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"status": "error"})))
            .mount(&server)
            .await;

        let sink = RelaySink::new(HttpClient::new(5000), server.uri());
        let err = sink.deliver(json!({})).await.unwrap_err();
        assert!(matches!(err, FetchFailure::Transport(_)));
    }
}
