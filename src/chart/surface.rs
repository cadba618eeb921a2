use crate::chart::{renderer_for_path, ChartRenderer, ChartSpec};
use crate::config::ChartConfig;
use crate::error::AppResult;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A chart that is currently drawn on a surface
#[derive(Debug)]
pub struct ChartHandle {
    path: PathBuf,
    title: String,
    points: usize,
}

impl ChartHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of data points drawn
    pub fn points(&self) -> usize {
        self.points
    }

    /// Release the chart, removing its rendered artifact.
    ///
    /// The owner drops the handle only after this succeeds.
    pub fn destroy(&self) -> AppResult<()> {
        debug!("Destroying chart {:?} at {:?}", self.title, self.path);
        remove_if_present(&self.path)
    }
}

// already gone is as good as removed
fn remove_if_present(path: &Path) -> AppResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Draw `spec` onto `target`, destroying the chart in `previous` first.
///
/// `previous` is emptied only once its chart is really gone, so a failed
/// teardown leaves it tracked for the next attempt. A failed draw removes
/// whatever the renderer managed to write. The returned handle is the only
/// live chart for `target`.
pub fn render_chart(
    renderer: &dyn ChartRenderer,
    target: &Path,
    previous: &mut Option<ChartHandle>,
    spec: &ChartSpec,
) -> AppResult<ChartHandle> {
    if let Some(handle) = previous.as_ref() {
        handle.destroy()?;
    }
    *previous = None;

    if let Err(e) = renderer.draw(spec, target) {
        if let Err(cleanup) = remove_if_present(target) {
            warn!("Could not remove partial chart {:?}: {}", target, cleanup);
        }
        return Err(e);
    }

    info!(
        "Rendered {} chart {:?} ({} points) to {:?}",
        renderer.name(),
        spec.title,
        spec.values.len(),
        target
    );

    Ok(ChartHandle {
        path: target.to_path_buf(),
        title: spec.title.clone(),
        points: spec.values.len(),
    })
}

/// Display surface holding at most one live chart
pub struct ChartSurface {
    target: PathBuf,
    renderer: Box<dyn ChartRenderer>,
    current: Option<ChartHandle>,
}

impl ChartSurface {
    /// Create a new ChartSurface drawing to `target`
    pub fn new(target: impl Into<PathBuf>, renderer: Box<dyn ChartRenderer>) -> Self {
        Self {
            target: target.into(),
            renderer,
            current: None,
        }
    }

    /// Surface for the configured output, renderer picked by extension
    pub fn from_config(config: &ChartConfig) -> AppResult<Self> {
        let renderer = renderer_for_path(&config.output, config)?;
        Ok(Self::new(config.output.clone(), renderer))
    }

    /// Same surface, different output file
    pub fn with_target(config: &ChartConfig, target: &Path) -> AppResult<Self> {
        let renderer = renderer_for_path(target, config)?;
        Ok(Self::new(target, renderer))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn current(&self) -> Option<&ChartHandle> {
        self.current.as_ref()
    }

    /// Replace whatever is on the surface with a new chart
    pub fn render(&mut self, spec: &ChartSpec) -> AppResult<&ChartHandle> {
        let handle = render_chart(self.renderer.as_ref(), &self.target, &mut self.current, spec)?;
        Ok(&*self.current.insert(handle))
    }

    /// Tear down the live chart, if any. It stays tracked if removal fails.
    pub fn clear(&mut self) -> AppResult<()> {
        if let Some(handle) = self.current.as_ref() {
            handle.destroy()?;
        }
        self.current = None;
        Ok(())
    }
}
