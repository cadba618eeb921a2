pub mod file_source;
pub mod http_source;
pub mod snapshot_source;

// Re-export all sources for convenient access
pub use file_source::FileSnapshotSource;
pub use http_source::HttpSnapshotSource;
pub use snapshot_source::SnapshotSource;

use crate::config::SourceConfig;
use crate::error::AppResult;
use std::sync::Arc;

/// Pick the snapshot source matching `DATA_SOURCE` (URL or directory)
pub fn source_from_config(config: &SourceConfig) -> AppResult<Arc<dyn SnapshotSource>> {
    if config.is_remote() {
        Ok(Arc::new(HttpSnapshotSource::new(config)?))
    } else {
        Ok(Arc::new(FileSnapshotSource::new(config)))
    }
}
