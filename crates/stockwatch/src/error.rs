//! Error types for stock ingestion.

/// Why a fetch cycle produced no payload.
///
/// Every variant degrades to "skip this ingest"; none of them reach readers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Body was not valid JSON, or not a JSON object.
    #[error("decode failure: {0}")]
    Decode(String),

    /// Network error, timeout, or non-success HTTP status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A required selector never appeared on the rendered page.
    #[error("selector `{selector}` did not appear within {timeout_ms}ms")]
    SelectorTimeout { selector: String, timeout_ms: u64 },

    /// Expected fields were absent or had the wrong type.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

impl FetchFailure {
    /// Stable short label for logs and status output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Transport(_) => "transport",
            Self::SelectorTimeout { .. } => "selector_timeout",
            Self::ShapeMismatch(_) => "shape_mismatch",
        }
    }
}

/// Errors raised while accepting an inbound payload.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    #[error("payload must be a JSON object, got {0}")]
    NotAMapping(&'static str),
}

pub type Result<T> = std::result::Result<T, StockError>;
