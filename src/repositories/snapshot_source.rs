use crate::error::AppResult;
use async_trait::async_trait;

/// Read-only access to the date index and the per-date snapshot payloads.
///
/// Implementations only move bytes; decoding happens in the loader so every
/// source reports failures the same way.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Raw JSON of the date index
    async fn fetch_index(&self) -> AppResult<Vec<u8>>;

    /// Raw JSON of one day's snapshot, addressed by its index identifier
    async fn fetch_snapshot(&self, id: &str) -> AppResult<Vec<u8>>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}
