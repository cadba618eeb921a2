use crate::config::SourceConfig;
use crate::error::{AppError, AppResult};
use crate::repositories::SnapshotSource;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Snapshots stored as JSON files in one directory
pub struct FileSnapshotSource {
    dir: PathBuf,
    config: SourceConfig,
}

impl FileSnapshotSource {
    /// Create a new FileSnapshotSource rooted at `config.location`
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.location),
            config: config.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, name: &str) -> AppResult<Vec<u8>> {
        let path = self.dir.join(name);
        debug!("Reading {:?}", path);
        tokio::fs::read(&path)
            .await
            .map_err(|e| AppError::Message(format!("{}: {}", path.display(), e)))
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_index(&self) -> AppResult<Vec<u8>> {
        self.read(&self.config.index_file).await
    }

    async fn fetch_snapshot(&self, id: &str) -> AppResult<Vec<u8>> {
        let name = self.config.snapshot_file_name(id);
        self.read(&name).await
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}
