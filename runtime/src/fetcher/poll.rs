//! Poll strategy: a single GET against a JSON endpoint.

use super::Fetcher;
use crate::http_client::HttpClient;
use async_trait::async_trait;
use serde_json::Value;
use stockwatch::FetchFailure;

/// Fetches a JSON object from a fixed URL.
///
/// Used for both the stock endpoint and the weather endpoint.
pub struct PollFetcher {
    client: HttpClient,
    url: String,
}

impl PollFetcher {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Fetcher for PollFetcher {
    fn name(&self) -> &'static str {
        "poll"
    }

    async fn fetch(&self) -> Result<Value, FetchFailure> {
        self.client.get_object(&self.url).await.map(Value::Object)
    }
}
