//! State shared by the HTTP handlers.

use crate::scheduler::LoopStatus;
use std::sync::Arc;
use std::time::Instant;
use stockwatch::{ItemShape, Payload, StockCache, WeatherState};

/// Everything the read API needs, constructed once at startup.
pub struct AppState<T> {
    pub cache: Arc<StockCache<T>>,
    pub weather: Arc<WeatherState>,
    pub status: Arc<LoopStatus>,
    /// Shown by the HTML view only, and only when the cache has nothing.
    pub placeholder: Option<Payload<T>>,
    pub loop_enabled: bool,
    pub started_at: Instant,
}

impl<T: ItemShape> AppState<T> {
    pub fn new(cache: Arc<StockCache<T>>, weather: Arc<WeatherState>) -> Self {
        Self {
            cache,
            weather,
            status: Arc::new(LoopStatus::default()),
            placeholder: None,
            loop_enabled: false,
            started_at: Instant::now(),
        }
    }

    pub fn with_status(mut self, status: Arc<LoopStatus>, loop_enabled: bool) -> Self {
        self.status = status;
        self.loop_enabled = loop_enabled;
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<Payload<T>>) -> Self {
        self.placeholder = placeholder.filter(|p| !p.is_empty());
        self
    }

    /// Payload for the HTML view, and whether it is placeholder data.
    pub fn view_payload(&self) -> (Payload<T>, bool) {
        let payload = self.cache.read();
        match &self.placeholder {
            Some(sample) if payload.is_empty() => (sample.clone(), true),
            _ => (payload, false),
        }
    }
}
