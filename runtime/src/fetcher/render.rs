//! Render strategy: load the stock page in a headless browser and scrape it.
//!
//! Each fetch launches its own browser, waits for the required selectors,
//! captures the HTML, and always tears the browser down again.

use super::Fetcher;
use crate::extract::{self, REQUIRED_SELECTORS};
use crate::renderer::{Launcher, RenderContext};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use stockwatch::FetchFailure;
use tokio::time::Instant;
use tracing::debug;

/// Default stock page.
pub const DEFAULT_PAGE_URL: &str = "https://growagardenvalues.com/stock/stocks.php";

/// Timeouts for one render cycle.
#[derive(Debug, Clone, Copy)]
pub struct RenderTimeouts {
    /// Page navigation budget.
    pub navigation_ms: u64,
    /// Budget per required selector.
    pub selector_ms: u64,
    /// Delay between selector probes.
    pub probe_every: Duration,
}

impl Default for RenderTimeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 60_000,
            selector_ms: 10_000,
            probe_every: Duration::from_millis(250),
        }
    }
}

/// Scrapes the stock page through a [`Launcher`].
pub struct RenderFetcher {
    launcher: Arc<dyn Launcher>,
    page_url: String,
    timeouts: RenderTimeouts,
}

impl RenderFetcher {
    pub fn new(launcher: Arc<dyn Launcher>, page_url: impl Into<String>) -> Self {
        Self {
            launcher,
            page_url: page_url.into(),
            timeouts: RenderTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: RenderTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Navigate and wait until the page is ready, returning its HTML.
    async fn load(&self, ctx: &mut dyn RenderContext) -> Result<String, FetchFailure> {
        let nav = ctx
            .navigate(&self.page_url, self.timeouts.navigation_ms)
            .await
            .map_err(|e| FetchFailure::Transport(format!("{e:#}")))?;
        debug!(url = %nav.final_url, load_ms = nav.load_time_ms, "stock page loaded");

        for selector in REQUIRED_SELECTORS {
            self.wait_for_selector(ctx, selector).await?;
        }

        ctx.get_html()
            .await
            .map_err(|e| FetchFailure::Transport(format!("{e:#}")))
    }

    async fn wait_for_selector(
        &self,
        ctx: &dyn RenderContext,
        selector: &str,
    ) -> Result<(), FetchFailure> {
        let deadline = Instant::now() + Duration::from_millis(self.timeouts.selector_ms);
        loop {
            match ctx.has_selector(selector).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => return Err(FetchFailure::Transport(format!("{e:#}"))),
            }
            if Instant::now() >= deadline {
                return Err(FetchFailure::SelectorTimeout {
                    selector: selector.to_string(),
                    timeout_ms: self.timeouts.selector_ms,
                });
            }
            tokio::time::sleep(self.timeouts.probe_every).await;
        }
    }
}

#[async_trait]
impl Fetcher for RenderFetcher {
    fn name(&self) -> &'static str {
        "render"
    }

    async fn fetch(&self) -> Result<Value, FetchFailure> {
        let renderer = self
            .launcher
            .launch()
            .await
            .map_err(|e| FetchFailure::Transport(format!("browser launch: {e:#}")))?;

        let html = match renderer.new_context().await {
            Ok(mut ctx) => {
                let html = self.load(ctx.as_mut()).await;
                if let Err(e) = ctx.close().await {
                    debug!("context close: {e:#}");
                }
                html
            }
            Err(e) => Err(FetchFailure::Transport(format!("{e:#}"))),
        };

        if let Err(e) = renderer.shutdown().await {
            debug!("browser shutdown: {e:#}");
        }

        Ok(extract::extract_payload(&html?))
    }
}
