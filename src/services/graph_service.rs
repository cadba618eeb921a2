use crate::chart::{ChartHandle, ChartSpec, ChartSurface};
use crate::error::{AppError, AppResult};
use crate::models::Series;
use crate::services::SeriesBuilder;
use tracing::{error, warn};

/// Serves "chart the cutoff for event X, gender Y" requests onto one surface
pub struct GraphService {
    builder: SeriesBuilder,
    surface: ChartSurface,
}

impl GraphService {
    pub fn new(builder: SeriesBuilder, surface: ChartSurface) -> Self {
        Self { builder, surface }
    }

    /// Build the series without drawing it
    pub async fn series(&self, event_name: &str, gender: &str) -> AppResult<Series> {
        self.builder.build(event_name, gender).await
    }

    /// Build and draw the chart, replacing the one on the surface.
    ///
    /// On failure nothing is left on the surface: the previous chart belongs
    /// to a different query and must not stay on screen.
    pub async fn show(&mut self, event_name: &str, gender: &str) -> AppResult<&ChartHandle> {
        let series = match self.builder.build(event_name, gender).await {
            Ok(series) => series,
            Err(e) => return Err(self.fail(event_name, gender, e)),
        };

        let spec = ChartSpec::from_series(&series, self.builder.cutoff_rank());
        let rendered = self.surface.render(&spec).map(|_| ());
        if let Err(e) = rendered {
            return Err(self.fail(event_name, gender, e));
        }

        self.surface
            .current()
            .ok_or_else(|| AppError::Render("surface empty after render".to_string()))
    }

    pub fn surface(&self) -> &ChartSurface {
        &self.surface
    }

    fn fail(&mut self, event_name: &str, gender: &str, e: AppError) -> AppError {
        error!("Graph error for {} ({}): {}", event_name, gender, e);
        if let Err(clear_err) = self.surface.clear() {
            warn!("Could not tear down previous chart: {}", clear_err);
        }
        e
    }
}
