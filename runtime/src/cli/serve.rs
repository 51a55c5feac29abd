//! Run the stock server, with the ingestion loop when an API URL is set.

use crate::config::{ItemKind, ServeArgs};
use crate::http_client::HttpClient;
use crate::rest;
use crate::scheduler::{LoopStatus, Scheduler, WeatherFeed};
use crate::sink::{IngestSink, LocalSink, RelaySink};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use stockwatch::{try_normalize, ItemShape, Payload, StockCache, StockItem, WeatherState};
use tracing::{info, warn};

/// Start serving. Never returns unless the listener fails.
pub async fn run(args: ServeArgs) -> Result<()> {
    match args.item_kind() {
        ItemKind::Structured => serve::<StockItem>(args).await,
        ItemKind::Encoded => serve::<String>(args).await,
    }
}

async fn serve<T: ItemShape>(args: ServeArgs) -> Result<()> {
    info!(
        "starting stockwatch v{} ({} items, {} policy)",
        env!("CARGO_PKG_VERSION"),
        T::SHAPE,
        args.merge_policy
    );

    let cache = Arc::new(StockCache::<T>::new(args.merge_policy));
    let weather = Arc::new(WeatherState::new());
    let status = Arc::new(LoopStatus::default());

    let placeholder = match &args.placeholder {
        Some(path) => Some(load_placeholder::<T>(path)?),
        None => None,
    };

    let loop_enabled = match args.feed.api_base()? {
        Some(base) => {
            let scheduler = build_scheduler(&args, &base, &cache, &weather, &status);
            tokio::spawn(scheduler.run());
            true
        }
        None => {
            warn!("API URL not set (STOCKWATCH_API_URL or API_URL), ingestion loop will NOT run");
            false
        }
    };

    let state = Arc::new(
        AppState::new(cache, weather)
            .with_status(status, loop_enabled)
            .with_placeholder(placeholder),
    );

    rest::start(args.addr(), state).await
}

fn build_scheduler<T: ItemShape>(
    args: &ServeArgs,
    base: &str,
    cache: &Arc<StockCache<T>>,
    weather: &Arc<WeatherState>,
    status: &Arc<LoopStatus>,
) -> Scheduler {
    let client = HttpClient::new(args.feed.request_timeout_ms);
    let fetcher = super::stock_fetcher(&args.feed, base, &client);

    let sink: Arc<dyn IngestSink> = if args.relay {
        let url = args.feed.upload_url(base);
        info!("relaying payloads to {url}");
        Arc::new(RelaySink::new(client.clone(), url))
    } else {
        Arc::new(LocalSink::new(Arc::clone(cache)))
    };

    let mut scheduler = Scheduler::new(fetcher, sink)
        .with_interval(args.feed.interval())
        .with_status(Arc::clone(status));

    if let Some(url) = args.feed.weather_url(base) {
        info!("weather feed enabled: {url}");
        scheduler = scheduler.with_weather(WeatherFeed {
            fetcher: Arc::new(crate::fetcher::PollFetcher::new(client, url)),
            state: Arc::clone(weather),
        });
    }

    scheduler
}

/// Read a placeholder payload file, normalized like any other payload.
pub fn load_placeholder<T: ItemShape>(path: &Path) -> Result<Payload<T>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read placeholder file: {}", path.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("placeholder file is not JSON: {}", path.display()))?;
    let payload = try_normalize::<T>(&raw)
        .with_context(|| format!("invalid placeholder payload: {}", path.display()))?;
    if payload.is_empty() {
        warn!("placeholder file {} has no items, ignoring", path.display());
    }
    Ok(payload)
}
