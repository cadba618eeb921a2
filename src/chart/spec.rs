use crate::codec::format_time;
use crate::models::Series;

/// `(seconds) -> display string` callback used for axis ticks and tooltips
pub type ValueFormatter = fn(f64) -> String;

/// Y-axis tick text: the bare `M:SS.ss` time
pub fn tick_label(seconds: f64) -> String {
    format_time(seconds)
}

/// Hover/annotation text for one point
pub fn tooltip_label(seconds: f64) -> String {
    format!("Cutoff: {}", format_time(seconds))
}

/// Everything a renderer needs to draw one cutoff chart
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// `"Mile (Men)"`
    pub title: String,
    /// `"16th Place Cutoff - Mile (Men)"`
    pub dataset_label: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    /// Date labels, index-aligned with `values`
    pub labels: Vec<String>,
    /// Seconds, index-aligned with `labels`
    pub values: Vec<f64>,
    pub tick_formatter: ValueFormatter,
    pub tooltip_formatter: ValueFormatter,
}

impl ChartSpec {
    /// Build the spec for a cutoff series
    pub fn from_series(series: &Series, cutoff_rank: u32) -> Self {
        let title = series.title();
        Self {
            dataset_label: format!("{} Place Cutoff - {}", ordinal(cutoff_rank), title),
            title,
            x_axis_title: "Date".to_string(),
            y_axis_title: "Time (MM:SS.ss)".to_string(),
            labels: series.labels(),
            values: series.values(),
            tick_formatter: tick_label,
            tooltip_formatter: tooltip_label,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn tick(&self, seconds: f64) -> String {
        (self.tick_formatter)(seconds)
    }

    pub fn tooltip(&self, seconds: f64) -> String {
        (self.tooltip_formatter)(seconds)
    }

    /// Padded y range covering every value; never below zero
    pub fn value_range(&self) -> (f64, f64) {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if !min.is_finite() || !max.is_finite() {
            return (0.0, 60.0);
        }

        let pad = ((max - min) * 0.1).max(1.0);
        ((min - pad).max(0.0), max + pad)
    }
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
