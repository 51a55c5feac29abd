//! Two-generation stock cache with an emptiness gate.
//!
//! ## Invariants
//!
//! - An empty payload never changes either generation.
//! - A non-empty ingest moves `current` into `previous` before replacing it.
//! - `read()` serves `current` unless it is empty, in which case it serves
//!   `previous`.
//!
//! The `(current, previous)` pair is immutable once built. Ingest holds the
//! write lock while it snapshots `current`, builds the next pair and swaps
//! it in, so concurrent writers are serialized. Readers only clone the
//! `Arc` under the read lock and always see a whole pair.

use crate::types::{Category, ItemShape, Payload};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// How a non-empty payload is applied to `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Replace `current` wholesale.
    Replace,
    /// Replace only the categories that arrived non-empty; keep the rest.
    #[default]
    Merge,
}

impl MergePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "merge" => Ok(Self::Merge),
            other => Err(format!("unknown merge policy `{other}` (expected merge|replace)")),
        }
    }
}

/// The two retained generations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "T: ItemShape")]
pub struct Generations<T> {
    pub current: Payload<T>,
    pub previous: Payload<T>,
}

impl<T> Default for Generations<T> {
    fn default() -> Self {
        Self {
            current: Payload::empty(),
            previous: Payload::empty(),
        }
    }
}

impl<T: Clone> Generations<T> {
    /// The payload a reader should see.
    pub fn resolve(&self) -> &Payload<T> {
        if self.current.is_empty() {
            &self.previous
        } else {
            &self.current
        }
    }
}

/// Result of a single ingest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Payload was empty; nothing changed.
    Skipped,
    /// Payload was applied; `items` is its total entry count.
    Applied { items: usize },
}

impl IngestOutcome {
    pub fn applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Stock cache shared between the ingestion loop and readers.
pub struct StockCache<T> {
    policy: MergePolicy,
    slots: RwLock<Arc<Generations<T>>>,
}

impl<T: ItemShape> StockCache<T> {
    /// Create a cache with both generations empty.
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            slots: RwLock::new(Arc::new(Generations::default())),
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Apply a normalized payload under the emptiness gate.
    pub fn ingest(&self, payload: Payload<T>) -> IngestOutcome {
        if payload.is_empty() {
            debug!("ingest skipped: empty payload");
            return IngestOutcome::Skipped;
        }
        let items = payload.total_items();

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let previous = slots.current.clone();
        let current = match self.policy {
            MergePolicy::Replace => payload,
            MergePolicy::Merge => merge(&previous, payload),
        };
        *slots = Arc::new(Generations { current, previous });
        drop(slots);

        debug!(items, policy = %self.policy, "ingest applied");
        IngestOutcome::Applied { items }
    }

    /// The fallback-resolved payload.
    pub fn read(&self) -> Payload<T> {
        self.generations().resolve().clone()
    }

    /// Snapshot of both generations.
    pub fn generations(&self) -> Arc<Generations<T>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slots)
    }
}

impl<T: ItemShape> Default for StockCache<T> {
    fn default() -> Self {
        Self::new(MergePolicy::default())
    }
}

fn merge<T: Clone>(existing: &Payload<T>, mut incoming: Payload<T>) -> Payload<T> {
    for category in Category::ALL {
        let slot = incoming.get_mut(category);
        if slot.is_empty() {
            *slot = existing.get(category).to_vec();
        }
    }
    incoming
}
