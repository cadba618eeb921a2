use crate::config::{AppConfig, EmptySeriesPolicy};
use crate::error::{AppError, AppResult};
use crate::models::Series;
use crate::services::{CutoffExtractor, DayLoad, SnapshotLoader};
use tracing::{debug, info, warn};

/// Turns every available snapshot into a date-ordered cutoff series
pub struct SeriesBuilder {
    loader: SnapshotLoader,
    extractor: CutoffExtractor,
    empty_series_policy: EmptySeriesPolicy,
}

impl SeriesBuilder {
    /// Create a new SeriesBuilder
    pub fn new(loader: SnapshotLoader, extractor: CutoffExtractor) -> Self {
        Self {
            loader,
            extractor,
            empty_series_policy: EmptySeriesPolicy::Render,
        }
    }

    /// Builder wired from configuration
    pub fn from_config(loader: SnapshotLoader, config: &AppConfig) -> Self {
        Self::new(loader, CutoffExtractor::new(config.cutoff_rank))
            .with_empty_series_policy(config.empty_series_policy)
    }

    /// Set what an empty result means
    pub fn with_empty_series_policy(mut self, policy: EmptySeriesPolicy) -> Self {
        self.empty_series_policy = policy;
        self
    }

    pub fn cutoff_rank(&self) -> u32 {
        self.extractor.rank()
    }

    /// Build the cutoff series for one event/gender.
    ///
    /// Only an unreadable index is fatal. Days that fail to load, lack the
    /// event or carry an unreadable mark are skipped.
    pub async fn build(&self, event_name: &str, gender: &str) -> AppResult<Series> {
        info!("Building cutoff series: event={}, gender={}", event_name, gender);

        let dates = self.loader.list_available_dates().await?;
        let loads = self.loader.load_all(&dates).await;

        let mut points = Vec::with_capacity(loads.len());
        let mut failed = 0usize;
        let mut missing = 0usize;

        for DayLoad { date, result } in loads {
            let extracted = result.and_then(|snapshot| {
                self.extractor
                    .extract(&snapshot, event_name, gender)
                    .map_err(AppError::from)
            });

            match extracted {
                Ok(Some(point)) => points.push(point),
                Ok(None) => {
                    debug!("No rank {} entry for {} ({}) on {}", self.extractor.rank(), event_name, gender, date);
                    missing += 1;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("Skipping {}: {}", date, e);
                    failed += 1;
                }
            }
        }

        let series = Series::new(event_name, gender, points);

        info!(
            "Series {}: {} points from {} dates ({} without cutoff, {} skipped)",
            series.title(),
            series.len(),
            dates.len(),
            missing,
            failed
        );

        if series.is_empty() {
            warn!(
                "No cutoff data for {} (empty series policy: {})",
                series.title(),
                self.empty_series_policy.as_str()
            );
            if self.empty_series_policy == EmptySeriesPolicy::Fail {
                return Err(AppError::EmptySeries {
                    event: event_name.to_string(),
                    gender: gender.to_string(),
                });
            }
        }

        Ok(series)
    }
}
