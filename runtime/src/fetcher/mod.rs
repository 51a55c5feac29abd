// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fetch strategies.
//!
//! A fetcher performs one remote retrieval and returns the raw payload, or a
//! typed [`FetchFailure`]. Failures never escape as panics or `anyhow`
//! errors; the scheduler matches on them and moves on.

pub mod poll;
pub mod render;

use async_trait::async_trait;
use serde_json::Value;
use stockwatch::FetchFailure;

pub use poll::PollFetcher;
pub use render::{RenderFetcher, RenderTimeouts};

/// One retrieval cycle against an upstream source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Retrieve one raw payload.
    async fn fetch(&self) -> Result<Value, FetchFailure>;
}
