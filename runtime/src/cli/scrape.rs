//! Standalone scraper: fetch upstream and relay to a stock server.

use crate::config::ScrapeArgs;
use crate::http_client::HttpClient;
use crate::scheduler::Scheduler;
use crate::sink::{RelaySink, SinkReport};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::info;

/// Run the scraper loop, or one cycle with `--once`.
pub async fn run(args: ScrapeArgs) -> Result<()> {
    let Some(base) = args.feed.api_base()? else {
        bail!("API URL not set: pass --api-url or set STOCKWATCH_API_URL");
    };

    let client = HttpClient::new(args.feed.request_timeout_ms);
    let fetcher = super::stock_fetcher(&args.feed, &base, &client);
    let sink = Arc::new(RelaySink::new(client, args.feed.upload_url(&base)));
    let scheduler = Scheduler::new(fetcher, sink).with_interval(args.feed.interval());

    if !args.once {
        scheduler.run().await;
        return Ok(());
    }

    match scheduler.run_cycle().await.stock {
        Ok(SinkReport::Relayed { status, response }) => {
            info!(status, %response, "scrape relayed");
            println!("{response}");
            Ok(())
        }
        Ok(other) => {
            info!(?other, "scrape delivered");
            Ok(())
        }
        Err(e) => bail!("scrape failed ({}): {e}", e.kind()),
    }
}
