//! Error types for the notification pipeline.
//!
//! None of these ever escape the event handler. They exist so collaborators
//! can report what went wrong, and so the pipeline can log it before moving
//! on to the next sink.

use std::io;

/// Failure reported by a delivery sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The backend behind the sink is not loaded or not reachable.
    #[error("sink unavailable")]
    Unavailable,

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Failure reported by a cooperating drop-management system.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable")]
    Unavailable,

    #[error("provider call failed: {0}")]
    Failed(String),
}

/// Failure turning raw input into a [`SimEvent`](super::model::SimEvent).
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
