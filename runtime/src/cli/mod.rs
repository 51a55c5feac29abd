//! CLI subcommand implementations for the stockwatch binary.

pub mod doctor;
pub mod scrape;
pub mod serve;

use crate::config::{FeedArgs, Strategy};
use crate::fetcher::{Fetcher, PollFetcher, RenderFetcher};
use crate::http_client::HttpClient;
use crate::renderer::chromium::ChromiumLauncher;
use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` overrides the default directives.
pub fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("stockwatch={level}").parse()?)
        .add_directive(format!("stockwatch_runtime={level}").parse()?);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

/// Build the stock fetcher for the configured strategy.
pub fn stock_fetcher(feed: &FeedArgs, base: &str, client: &HttpClient) -> Arc<dyn Fetcher> {
    match feed.strategy {
        Strategy::Poll => Arc::new(PollFetcher::new(client.clone(), feed.stock_url(base))),
        Strategy::Render => Arc::new(RenderFetcher::new(
            Arc::new(ChromiumLauncher),
            feed.page_url.clone(),
        )),
    }
}
