// src/error.rs

//! Errors at the ingest boundary. The query engine itself is total and has no
//! error type.

use thiserror::Error;

/// Result type alias for listing fetches.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Why a fetch from the listing service produced no postings.
///
/// `Fetch` and `Status` are transport failures, `Parse` is a malformed body.
/// The session surfaces all of them the same way: one error state, no retry.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Network error, timeout, or unreadable body
    #[error("HTTP error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Listing service answered with a non-success status
    #[error("listing service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not a JSON array of posting objects
    #[error("malformed listing response: {0}")]
    Parse(String),
}

impl IngestError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl std::fmt::Display) -> Self {
        Self::Parse(message.to_string())
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) | Self::Status { .. } => "fetch",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<serde_json::Error> for IngestError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(e)
    }
}
