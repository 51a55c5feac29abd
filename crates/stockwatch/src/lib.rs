//! Stockwatch: a staleness-tolerant cache for an unreliable stock feed.
//!
//! Raw payloads are normalized into a fixed three-category shape, gated on
//! emptiness, and kept in a two-generation cache so readers never see a
//! blank snapshot caused by a single bad fetch.

pub mod cache;
pub mod encoded;
pub mod error;
pub mod normalize;
pub mod types;
pub mod weather;

pub use cache::{Generations, IngestOutcome, MergePolicy, StockCache};
pub use encoded::parse_encoded;
pub use error::{FetchFailure, StockError};
pub use normalize::{normalize, try_normalize};
pub use types::*;
pub use weather::WeatherState;
