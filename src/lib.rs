//! Cutoff Tracker Library
//!
//! Loads daily ranking snapshots, extracts the 16th-place cutoff per event
//! and charts it over time. Exposed as a library for the CLI and the tests.

pub mod chart;
pub mod codec;
pub mod config;
pub mod error;
pub mod html;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};

use chart::ChartSurface;
use repositories::{source_from_config, SnapshotSource};
use services::{GraphService, SeriesBuilder, SnapshotLoader};
use std::path::Path;
use std::sync::Arc;

/// Application state: configuration plus the snapshot source it selects
pub struct AppState {
    pub config: AppConfig,
    pub source: Arc<dyn SnapshotSource>,
}

impl AppState {
    /// Create a new AppState around an explicit source
    pub fn new(config: AppConfig, source: Arc<dyn SnapshotSource>) -> Self {
        Self { config, source }
    }

    /// Create a new AppState with the source named by `DATA_SOURCE`
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let source = source_from_config(&config.source)?;
        Ok(Self::new(config, source))
    }

    pub fn loader(&self) -> SnapshotLoader {
        SnapshotLoader::new(self.source.clone())
            .with_max_concurrent_fetches(self.config.source.max_concurrent_fetches)
    }

    pub fn series_builder(&self) -> SeriesBuilder {
        SeriesBuilder::from_config(self.loader(), &self.config)
    }

    /// Graph service drawing to `output`, or the configured chart output
    pub fn graph_service(&self, output: Option<&Path>) -> AppResult<GraphService> {
        let surface = match output {
            Some(path) => ChartSurface::with_target(&self.config.chart, path)?,
            None => ChartSurface::from_config(&self.config.chart)?,
        };
        Ok(GraphService::new(self.series_builder(), surface))
    }
}
