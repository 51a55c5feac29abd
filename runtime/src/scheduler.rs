// Copyright 2026 Stockwatch Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed-interval ingestion loop.
//!
//! Each cycle runs the stock fetch and the weather fetch concurrently, then
//! sleeps for the full interval. There is no backoff, jitter, or retry cap:
//! a failed cycle is logged and the next one runs on schedule.

use crate::fetcher::Fetcher;
use crate::sink::{IngestSink, SinkReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use stockwatch::{FetchFailure, WeatherState};
use tracing::{debug, info, warn};

/// Default cycle interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Weather enrichment feed: a fetcher plus the state it overwrites.
pub struct WeatherFeed {
    pub fetcher: Arc<dyn Fetcher>,
    pub state: Arc<WeatherState>,
}

/// Outcome of one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub stock: Result<SinkReport, FetchFailure>,
    /// `None` when no weather feed is configured.
    pub weather: Option<Result<(), FetchFailure>>,
}

/// Counters exposed on the health endpoint.
#[derive(Debug, Default)]
pub struct LoopStatus {
    cycles: AtomicU64,
    stock_failures: AtomicU64,
    weather_failures: AtomicU64,
    last_stock_success: Mutex<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopStatusSnapshot {
    pub cycles: u64,
    pub stock_failures: u64,
    pub weather_failures: u64,
    pub last_stock_success: Option<DateTime<Utc>>,
}

impl LoopStatus {
    fn record(&self, report: &CycleReport) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        match &report.stock {
            Ok(_) => {
                *self
                    .last_stock_success
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
            }
            Err(_) => {
                self.stock_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        if let Some(Err(_)) = report.weather {
            self.weather_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> LoopStatusSnapshot {
        LoopStatusSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            stock_failures: self.stock_failures.load(Ordering::Relaxed),
            weather_failures: self.weather_failures.load(Ordering::Relaxed),
            last_stock_success: *self
                .last_stock_success
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }
}

/// Drives fetch → sink on a fixed interval.
pub struct Scheduler {
    interval: Duration,
    fetcher: Arc<dyn Fetcher>,
    sink: Arc<dyn IngestSink>,
    weather: Option<WeatherFeed>,
    status: Arc<LoopStatus>,
}

impl Scheduler {
    pub fn new(fetcher: Arc<dyn Fetcher>, sink: Arc<dyn IngestSink>) -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            fetcher,
            sink,
            weather: None,
            status: Arc::new(LoopStatus::default()),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_weather(mut self, weather: WeatherFeed) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_status(mut self, status: Arc<LoopStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> Arc<LoopStatus> {
        Arc::clone(&self.status)
    }

    /// Run one cycle: stock and weather concurrently, independent outcomes.
    pub async fn run_cycle(&self) -> CycleReport {
        let (stock, weather) = tokio::join!(self.stock_cycle(), self.weather_cycle());
        let report = CycleReport { stock, weather };
        self.status.record(&report);
        report
    }

    /// Run forever.
    pub async fn run(self) {
        info!(
            strategy = self.fetcher.name(),
            interval_secs = self.interval.as_secs_f64(),
            weather = self.weather.is_some(),
            "ingestion loop started"
        );
        loop {
            let report = self.run_cycle().await;
            log_report(&report);
            tokio::time::sleep(self.interval).await;
        }
    }

    async fn stock_cycle(&self) -> Result<SinkReport, FetchFailure> {
        let raw = self.fetcher.fetch().await?;
        self.sink.deliver(raw).await
    }

    async fn weather_cycle(&self) -> Option<Result<(), FetchFailure>> {
        let feed = self.weather.as_ref()?;
        let result = match feed.fetcher.fetch().await {
            Ok(Value::Object(map)) => {
                feed.state.set(map);
                Ok(())
            }
            Ok(_) => Err(FetchFailure::ShapeMismatch(
                "weather payload is not an object".to_string(),
            )),
            Err(e) => Err(e),
        };
        Some(result)
    }
}

fn log_report(report: &CycleReport) {
    match &report.stock {
        Ok(SinkReport::Local(outcome)) => debug!(?outcome, "stock cycle ok"),
        Ok(SinkReport::Relayed { status, .. }) => debug!(status, "stock cycle relayed"),
        Err(e) => warn!(kind = e.kind(), "stock fetch failed: {e}"),
    }
    if let Some(Err(e)) = &report.weather {
        warn!(kind = e.kind(), "weather fetch failed: {e}");
    }
}
