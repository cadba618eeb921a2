use crate::chart::{ensure_parent, ChartRenderer, ChartSpec};
use crate::error::AppResult;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct Tick {
    value: f64,
    label: String,
}

#[derive(Debug, Serialize)]
struct ChartDocument<'a> {
    title: &'a str,
    dataset_label: &'a str,
    x_axis_title: &'a str,
    y_axis_title: &'a str,
    labels: &'a [String],
    values: &'a [f64],
    tooltips: Vec<String>,
    y_ticks: Vec<Tick>,
}

/// Writes the chart as JSON for a browser front-end.
///
/// Tick and tooltip text is pre-formatted so the page never has to
/// re-implement the time format.
#[derive(Debug, Clone)]
pub struct JsonChartRenderer {
    tick_count: usize,
}

impl JsonChartRenderer {
    pub fn new(tick_count: usize) -> Self {
        Self {
            tick_count: tick_count.max(2),
        }
    }

    fn ticks(&self, spec: &ChartSpec) -> Vec<Tick> {
        let (lo, hi) = spec.value_range();
        let step = (hi - lo) / (self.tick_count - 1) as f64;
        (0..self.tick_count)
            .map(|i| {
                let value = lo + step * i as f64;
                Tick {
                    value,
                    label: spec.tick(value),
                }
            })
            .collect()
    }
}

impl Default for JsonChartRenderer {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ChartRenderer for JsonChartRenderer {
    fn draw(&self, spec: &ChartSpec, target: &Path) -> AppResult<()> {
        ensure_parent(target)?;

        let document = ChartDocument {
            title: &spec.title,
            dataset_label: &spec.dataset_label,
            x_axis_title: &spec.x_axis_title,
            y_axis_title: &spec.y_axis_title,
            labels: &spec.labels,
            values: &spec.values,
            tooltips: spec.values.iter().map(|v| spec.tooltip(*v)).collect(),
            y_ticks: self.ticks(spec),
        };

        let mut writer = BufWriter::new(File::create(target)?);
        serde_json::to_writer_pretty(&mut writer, &document)?;
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TimeValue;
    use crate::models::{CutoffPoint, Series, SnapshotDate};

    #[test]
    fn test_json_document() {
        let series = Series::new(
            "Mile",
            "Men",
            vec![CutoffPoint::new(
                SnapshotDate::parse("2024-01-01").unwrap(),
                TimeValue::new(241.2).unwrap(),
            )],
        );
        let spec = ChartSpec::from_series(&series, 16);

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("chart.json");
        JsonChartRenderer::new(3).draw(&spec, &target).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(doc["dataset_label"], "16th Place Cutoff - Mile (Men)");
        assert_eq!(doc["labels"][0], "2024-01-01");
        assert_eq!(doc["values"][0], 241.2);
        assert_eq!(doc["tooltips"][0], "Cutoff: 4:01.20");
        assert_eq!(doc["y_ticks"].as_array().unwrap().len(), 3);
        assert_eq!(doc["y_ticks"][0]["label"], "4:00.20");
    }
}
