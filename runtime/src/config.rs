// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration: command-line flags with environment fallbacks.

use crate::fetcher::render::DEFAULT_PAGE_URL;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use stockwatch::MergePolicy;

/// Legacy name for the API base URL, still honored.
const LEGACY_API_URL_ENV: &str = "API_URL";

/// How stock is retrieved upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// GET a JSON stock endpoint.
    Poll,
    /// Render the stock page in headless Chromium and scrape it.
    Render,
}

/// Element type stored in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ItemKind {
    /// `{name, quantity}` objects.
    Structured,
    /// `"Name **xN**"` strings.
    Encoded,
}

impl Strategy {
    /// The item shape each strategy produces.
    pub fn default_item_kind(self) -> ItemKind {
        match self {
            Self::Poll => ItemKind::Encoded,
            Self::Render => ItemKind::Structured,
        }
    }
}

/// Upstream feed settings shared by `serve` and `scrape`.
#[derive(Debug, Clone, Args)]
pub struct FeedArgs {
    /// Base URL of the stock API (poll) or of the stock server to relay to (render).
    /// Without it the ingestion loop is disabled.
    #[arg(long, env = "STOCKWATCH_API_URL")]
    pub api_url: Option<String>,

    /// Fetch strategy
    #[arg(long, env = "STOCKWATCH_STRATEGY", value_enum, default_value_t = Strategy::Poll)]
    pub strategy: Strategy,

    /// Seconds to sleep between cycles (at least 1)
    #[arg(
        long,
        env = "STOCKWATCH_INTERVAL_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Path of the stock endpoint under the API URL (poll strategy)
    #[arg(long, env = "STOCKWATCH_STOCK_PATH", default_value = "/api/stock")]
    pub stock_path: String,

    /// Weather endpoint. Defaults to `<api-url>/api/weather` under the poll strategy.
    #[arg(long, env = "STOCKWATCH_WEATHER_URL")]
    pub weather_url: Option<String>,

    /// Disable the weather feed
    #[arg(long)]
    pub no_weather: bool,

    /// Stock page to render (render strategy)
    #[arg(long, env = "STOCKWATCH_PAGE_URL", default_value = DEFAULT_PAGE_URL)]
    pub page_url: String,

    /// Per-request HTTP timeout in milliseconds
    #[arg(long, env = "STOCKWATCH_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,
}

impl FeedArgs {
    /// The API base URL, validated, without a trailing slash.
    pub fn api_base(&self) -> Result<Option<String>> {
        let raw = self
            .api_url
            .clone()
            .or_else(|| std::env::var(LEGACY_API_URL_ENV).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match raw {
            Some(base) => {
                url::Url::parse(&base).with_context(|| format!("invalid API URL `{base}`"))?;
                Ok(Some(base.trim_end_matches('/').to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn stock_url(&self, base: &str) -> String {
        join(base, &self.stock_path)
    }

    /// Ingest endpoint on a stock server.
    pub fn upload_url(&self, base: &str) -> String {
        join(base, "/api/upload")
    }

    /// Weather endpoint, if the weather feed is enabled.
    pub fn weather_url(&self, base: &str) -> Option<String> {
        if self.no_weather {
            return None;
        }
        match (&self.weather_url, self.strategy) {
            (Some(url), _) => Some(url.clone()),
            (None, Strategy::Poll) => Some(join(base, "/api/weather")),
            (None, Strategy::Render) => None,
        }
    }
}

/// Settings for `stockwatch serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Address to bind
    #[arg(long, env = "STOCKWATCH_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "STOCKWATCH_PORT", default_value_t = 8000)]
    pub port: u16,

    /// How non-empty payloads update the cache (merge|replace)
    #[arg(long, env = "STOCKWATCH_MERGE_POLICY", default_value = "merge")]
    pub merge_policy: MergePolicy,

    /// Cached item shape. Defaults to the strategy's native shape.
    #[arg(long, env = "STOCKWATCH_ITEM_SHAPE", value_enum)]
    pub item_shape: Option<ItemKind>,

    /// Post fetched payloads to this server's ingest endpoint instead of
    /// ingesting in-process
    #[arg(long)]
    pub relay: bool,

    /// JSON payload file shown by the HTML view while no stock is cached
    #[arg(long, env = "STOCKWATCH_PLACEHOLDER")]
    pub placeholder: Option<PathBuf>,
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn item_kind(&self) -> ItemKind {
        self.item_shape
            .unwrap_or_else(|| self.feed.strategy.default_item_kind())
    }
}

/// Settings for `stockwatch scrape`.
#[derive(Debug, Clone, Args)]
pub struct ScrapeArgs {
    #[command(flatten)]
    pub feed: FeedArgs,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
