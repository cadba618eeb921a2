use crate::error::AppResult;
use crate::services::GraphService;
use std::time::Duration;
use tokio::time;
use tracing::{error, info};

/// Shortest refresh interval; `tokio::time::interval` rejects zero
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Re-renders one query's chart on a fixed interval as new snapshots land
pub struct Watcher {
    service: GraphService,
    event_name: String,
    gender: String,
    refresh_interval: Duration,
}

impl Watcher {
    /// Create a new watcher (default: hourly)
    pub fn new(service: GraphService, event_name: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            service,
            event_name: event_name.into(),
            gender: gender.into(),
            refresh_interval: Duration::from_secs(3600),
        }
    }

    /// Set refresh interval, raised to [`MIN_REFRESH_INTERVAL`] if shorter
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval.max(MIN_REFRESH_INTERVAL);
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Run one refresh
    pub async fn refresh(&mut self) -> AppResult<usize> {
        let handle = self.service.show(&self.event_name, &self.gender).await?;
        Ok(handle.points())
    }

    /// Refresh forever; failures are logged and retried next tick
    pub async fn start(mut self) {
        let mut interval = time::interval(self.refresh_interval);
        info!(
            "Watcher started for {} ({}), refreshing every {:?}",
            self.event_name, self.gender, self.refresh_interval
        );

        loop {
            interval.tick().await;

            match self.refresh().await {
                Ok(points) => info!("Chart refreshed with {} points", points),
                Err(e) => error!("Error refreshing chart: {}", e),
            }
        }
    }

    pub fn service(&self) -> &GraphService {
        &self.service
    }
}
