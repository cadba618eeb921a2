use crate::codec::TimeParseError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The date index could not be retrieved or decoded; fatal to a build
    #[error("Snapshot index unavailable: {0}")]
    IndexUnavailable(String),

    /// One day's snapshot could not be retrieved or decoded
    #[error("Snapshot for {date} unavailable: {reason}")]
    SnapshotUnavailable { date: String, reason: String },

    /// A ranking mark is not a valid race time
    #[error("Time parse error: {0}")]
    Parse(#[from] TimeParseError),

    /// No snapshot produced a cutoff for the query
    #[error("No cutoff data for {event} ({gender})")]
    EmptySeries { event: String, gender: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart rendering errors
    #[error("Render error: {0}")]
    Render(String),

    /// Qualifying list scraping errors
    #[error("Collect error: {0}")]
    Collect(String),

    /// Filesystem errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Message(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Build a `SnapshotUnavailable` from any displayable cause
    pub fn snapshot_unavailable(date: impl ToString, reason: impl ToString) -> Self {
        AppError::SnapshotUnavailable {
            date: date.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Check if the error aborts a whole series build.
    ///
    /// Per-day failures are skipped by the builder instead.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::SnapshotUnavailable { .. } | AppError::Parse(_)
        )
    }

    /// Check if error is an empty-series error
    pub fn is_empty_series(&self) -> bool {
        matches!(self, AppError::EmptySeries { .. })
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 2,
            AppError::IndexUnavailable(_) | AppError::Http(_) => 3,
            AppError::EmptySeries { .. } => 4,
            _ => 1,
        }
    }
}
