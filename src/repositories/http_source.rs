use crate::config::SourceConfig;
use crate::error::{AppError, AppResult};
use crate::repositories::SnapshotSource;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

/// Snapshots served over HTTP from a common base URL
pub struct HttpSnapshotSource {
    client: Client,
    base: Url,
    config: SourceConfig,
}

impl HttpSnapshotSource {
    /// Create a new HttpSnapshotSource; `config.location` is the base URL
    pub fn new(config: &SourceConfig) -> AppResult<Self> {
        // Url::join replaces the last segment unless the base ends with '/'
        let mut location = config.location.clone();
        if !location.ends_with('/') {
            location.push('/');
        }

        let base = Url::parse(&location)
            .map_err(|e| AppError::Config(format!("Invalid DATA_SOURCE URL {}: {}", location, e)))?;

        let client = Client::builder().timeout(config.fetch_timeout()).build()?;

        Ok(Self {
            client,
            base,
            config: config.clone(),
        })
    }

    /// Absolute URL of a resource under the base
    pub fn resource_url(&self, name: &str) -> AppResult<Url> {
        self.base
            .join(name)
            .map_err(|e| AppError::Message(format!("Invalid resource name {}: {}", name, e)))
    }

    async fn get(&self, name: &str) -> AppResult<Vec<u8>> {
        let url = self.resource_url(name)?;
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Message(format!("HTTP {} for {}", status, url)));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_index(&self) -> AppResult<Vec<u8>> {
        self.get(&self.config.index_file).await
    }

    async fn fetch_snapshot(&self, id: &str) -> AppResult<Vec<u8>> {
        let name = self.config.snapshot_file_name(id);
        self.get(&name).await
    }

    fn describe(&self) -> String {
        format!("url {}", self.base)
    }
}
