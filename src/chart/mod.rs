//! Rendering collaborator for cutoff series.
//!
//! A [`ChartSurface`] is the display target: it owns at most one live
//! [`ChartHandle`] and destroys it before anything new is drawn.

pub mod json;
pub mod spec;
pub mod surface;
pub mod svg;

pub use json::JsonChartRenderer;
pub use spec::{tick_label, tooltip_label, ChartSpec, ValueFormatter};
pub use surface::{render_chart, ChartHandle, ChartSurface};
pub use svg::SvgChartRenderer;

use crate::config::ChartConfig;
use crate::error::{AppError, AppResult};
use std::path::Path;

/// Draws a finished chart spec onto a target file
pub trait ChartRenderer: Send + Sync {
    fn draw(&self, spec: &ChartSpec, target: &Path) -> AppResult<()>;

    fn name(&self) -> &'static str;
}

/// Pick a renderer from the output extension (`.svg` or `.json`)
pub fn renderer_for_path(path: &Path, config: &ChartConfig) -> AppResult<Box<dyn ChartRenderer>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("svg") => Ok(Box::new(SvgChartRenderer::new(config.width, config.height))),
        Some("json") => Ok(Box::new(JsonChartRenderer::default())),
        _ => Err(AppError::Config(format!(
            "Unsupported chart output {}: expected .svg or .json",
            path.display()
        ))),
    }
}

/// Create the parent directory of an output file if needed
pub(crate) fn ensure_parent(path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
