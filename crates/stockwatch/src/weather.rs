//! Last-write-wins weather state.

use serde_json::{json, Map, Value};
use std::sync::{Arc, PoisonError, RwLock};

/// Latest successfully fetched weather mapping.
///
/// Unlike the stock cache there is no fallback: a successful fetch
/// overwrites the whole mapping, a failed one leaves it alone.
#[derive(Default)]
pub struct WeatherState {
    latest: RwLock<Option<Arc<Map<String, Value>>>>,
}

impl WeatherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, weather: Map<String, Value>) {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *latest = Some(Arc::new(weather));
    }

    pub fn get(&self) -> Option<Arc<Map<String, Value>>> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The stored mapping, or `{"status": "unknown"}` if nothing has arrived.
    pub fn read(&self) -> Value {
        match self.get() {
            Some(map) => Value::Object((*map).clone()),
            None => json!({ "status": "unknown" }),
        }
    }
}
