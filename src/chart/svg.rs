use crate::chart::{ensure_parent, ChartRenderer, ChartSpec};
use crate::error::{AppError, AppResult};
use crate::models::{SnapshotDate, DATE_FORMAT};
use anyhow::Result;
use chrono::Duration;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const LINE_COLOR: RGBColor = RGBColor(0, 48, 135);

/// Line chart rendered to SVG with plotters
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    width: u32,
    height: u32,
}

impl SvgChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn draw(&self, spec: &ChartSpec, target: &Path) -> AppResult<()> {
        ensure_parent(target)?;

        let root = SVGBackend::new(target, (self.width, self.height)).into_drawing_area();
        draw_cutoff_chart(root, spec).map_err(|e| AppError::Render(format!("plotting error: {:#}", e)))
    }

    fn name(&self) -> &'static str {
        "svg"
    }
}

/// Days since the first label, so the x axis spaces points by real dates
fn day_offsets(labels: &[String]) -> Result<(SnapshotDate, Vec<i64>)> {
    let dates = labels
        .iter()
        .map(|l| SnapshotDate::parse(l))
        .collect::<Result<Vec<_>, _>>()?;

    let first = dates.first().copied().unwrap_or_else(SnapshotDate::today);
    let offsets = dates.iter().map(|d| d.days_since(first)).collect();

    Ok((first, offsets))
}

fn draw_cutoff_chart<DB>(root: DrawingArea<DB, Shift>, spec: &ChartSpec) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (first, offsets) = day_offsets(&spec.labels)?;
    let points: Vec<(i64, f64)> = offsets
        .iter()
        .copied()
        .zip(spec.values.iter().copied())
        .collect();

    let x_max = offsets.last().copied().unwrap_or(0).max(1);
    let (y_min, y_max) = spec.value_range();

    root.fill(&WHITE)?;

    let caption = if spec.is_empty() {
        format!("{} (no data)", spec.dataset_label)
    } else {
        spec.dataset_label.clone()
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24).into_font())
        .margin(25)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(0i64..x_max, y_min..y_max)?;

    let x_label = |d: &i64| (first.date() + Duration::days(*d)).format(DATE_FORMAT).to_string();
    let y_label = |v: &f64| spec.tick(*v);

    chart
        .configure_mesh()
        .x_desc(spec.x_axis_title.as_str())
        .y_desc(spec.y_axis_title.as_str())
        .x_labels((x_max as usize + 1).min(10))
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    if spec.is_empty() {
        root.present()?;
        return Ok(());
    }

    chart.draw_series(AreaSeries::new(
        points.iter().copied(),
        y_min,
        LINE_COLOR.mix(0.1),
    ))?;

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            LINE_COLOR.stroke_width(3),
        ))?
        .label(spec.dataset_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], LINE_COLOR.stroke_width(3)));

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 5, LINE_COLOR.filled())),
    )?;

    // SVG has no hover, so the latest cutoff carries the tooltip text
    if let Some(&(x, y)) = points.last() {
        chart.draw_series(std::iter::once(
            EmptyElement::at((x, y))
                + Text::new(spec.tooltip(y), (-60, -25), ("sans-serif", 16).into_font()),
        ))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_offsets_follow_calendar() {
        let labels = vec![
            "2024-01-30".to_string(),
            "2024-02-01".to_string(),
            "2024-02-10".to_string(),
        ];
        let (first, offsets) = day_offsets(&labels).unwrap();
        assert_eq!(first.to_string(), "2024-01-30");
        assert_eq!(offsets, vec![0, 2, 11]);
    }

    #[test]
    fn test_day_offsets_rejects_bad_label() {
        assert!(day_offsets(&["Jan 1".to_string()]).is_err());
    }
}
