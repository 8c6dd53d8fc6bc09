//! Static Chart Renderer
//! Renders the aggregate views as PNG charts with Plotters.
//!
//! Styles: skyblue/salmon category bars, an orange seasonal bar, marker
//! line charts for monthly trends, and dual-axis charts combining release
//! counts (bars, left axis) with viewership hours (line, right axis).

use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use thiserror::Error as ThisError;

use crate::calendar::{MONTH_ABBR, WEEKDAY_ORDER};

pub const SKYBLUE: RGBColor = RGBColor(135, 206, 235);
pub const SALMON: RGBColor = RGBColor(250, 128, 114);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);

const SERIES_PALETTE: [RGBColor; 4] = [SKYBLUE, SALMON, ORANGE, RGBColor(46, 204, 113)];

const CHART_SIZE: (u32, u32) = (1000, 620);

#[derive(ThisError, Debug)]
pub enum ChartError {
    #[error("failed to render {path}: {message}")]
    Render { path: String, message: String },
}

impl ChartError {
    fn render(path: &Path, err: Box<dyn Error>) -> Self {
        ChartError::Render {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

fn month_label(x: &f64) -> String {
    let month = x.round() as i64;
    if (x - month as f64).abs() < 0.01 && (1..=12).contains(&month) {
        MONTH_ABBR[(month - 1) as usize].to_string()
    } else {
        String::new()
    }
}

fn weekday_label(x: &f64) -> String {
    let day = x.round() as i64;
    if (x - day as f64).abs() < 0.01 && (1..=7).contains(&day) {
        WEEKDAY_ORDER[(day - 1) as usize].to_string()
    } else {
        String::new()
    }
}

fn y_ceiling(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0f64, f64::max).max(1.0) * 1.1
}

/// Vertical bar chart over arbitrary category labels, colors cycling
/// through `palette`.
pub fn bar_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    data: &[(String, f64)],
    palette: &[RGBColor],
) -> Result<(), ChartError> {
    draw_bars(path, title, y_desc, data, palette).map_err(|e| ChartError::render(path, e))
}

fn draw_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    data: &[(String, f64)],
    palette: &[RGBColor],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let labels: Vec<&str> = data.iter().map(|(label, _)| label.as_str()).collect();
    let y_max = y_ceiling(data.iter().map(|(_, v)| *v));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(55)
        .y_label_area_size(90)
        .build_cartesian_2d((0..data.len()).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(data.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(i) if *i < labels.len() => labels[*i].to_string(),
            _ => String::new(),
        })
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(data.iter().enumerate().map(|(i, (_, value))| {
        let color = palette[i % palette.len()];
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), *value),
            ],
            color.filled(),
        );
        bar.set_margin(0, 0, 14, 14);
        bar
    }))?;

    root.present()?;
    Ok(())
}

/// Marker line chart over the twelve months.
pub fn month_line_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    values: &[f64; 12],
) -> Result<(), ChartError> {
    draw_month_line(path, title, y_desc, values).map_err(|e| ChartError::render(path, e))
}

fn draw_month_line(
    path: &Path,
    title: &str,
    y_desc: &str,
    values: &[f64; 12],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = y_ceiling(values.iter().copied());

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(90)
        .build_cartesian_2d(0.5f64..12.5f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&month_label)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(LineSeries::new(
        (1..=12).map(|m| (m as f64, values[m - 1])),
        ORANGE.stroke_width(2),
    ))?;
    chart.draw_series(
        (1..=12).map(|m| Circle::new((m as f64, values[m - 1]), 4, ORANGE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// One marker line per series over the twelve months, with a legend.
pub fn month_multi_line_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    series: &[(String, [f64; 12])],
) -> Result<(), ChartError> {
    draw_month_multi_line(path, title, y_desc, series).map_err(|e| ChartError::render(path, e))
}

fn draw_month_multi_line(
    path: &Path,
    title: &str,
    y_desc: &str,
    series: &[(String, [f64; 12])],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = y_ceiling(series.iter().flat_map(|(_, values)| values.iter().copied()));

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(90)
        .build_cartesian_2d(0.5f64..12.5f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&month_label)
        .y_desc(y_desc)
        .draw()?;

    for (i, (name, values)) in series.iter().enumerate() {
        let color = SERIES_PALETTE[i % SERIES_PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                (1..=12).map(|m| (m as f64, values[m - 1])),
                color.stroke_width(2),
            ))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
        chart.draw_series(
            (1..=12).map(|m| Circle::new((m as f64, values[m - 1]), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// Monthly release counts (bars, left axis) against viewership hours
/// (marker line, right axis).
pub fn month_dual_chart(
    path: &Path,
    title: &str,
    releases: &[u64; 12],
    hours: &[f64; 12],
) -> Result<(), ChartError> {
    draw_dual(
        path,
        title,
        12,
        &month_label,
        &releases.map(|c| c as f64),
        hours,
    )
    .map_err(|e| ChartError::render(path, e))
}

/// Weekday release counts (bars, left axis) against viewership hours
/// (marker line, right axis), Monday through Sunday.
pub fn weekday_dual_chart(
    path: &Path,
    title: &str,
    releases: &[u64; 7],
    hours: &[f64; 7],
) -> Result<(), ChartError> {
    draw_dual(
        path,
        title,
        7,
        &weekday_label,
        &releases.map(|c| c as f64),
        hours,
    )
    .map_err(|e| ChartError::render(path, e))
}

fn draw_dual(
    path: &Path,
    title: &str,
    slots: usize,
    x_label: &dyn Fn(&f64) -> String,
    counts: &[f64],
    hours: &[f64],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let count_max = y_ceiling(counts.iter().copied());
    let hours_max = y_ceiling(hours.iter().copied());
    let x_range = 0.5f64..slots as f64 + 0.5;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(55)
        .y_label_area_size(70)
        .right_y_label_area_size(90)
        .build_cartesian_2d(x_range.clone(), 0f64..count_max)?
        .set_secondary_coord(x_range, 0f64..hours_max);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(x_label)
        .y_desc("Content Released")
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Viewership Hours")
        .draw()?;

    chart.draw_series((0..slots).map(|i| {
        let x = (i + 1) as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, counts[i])], SKYBLUE.filled())
    }))?;

    chart.draw_secondary_series(LineSeries::new(
        (0..slots).map(|i| ((i + 1) as f64, hours[i])),
        ORANGE.stroke_width(2),
    ))?;
    chart.draw_secondary_series(
        (0..slots).map(|i| Circle::new(((i + 1) as f64, hours[i]), 4, ORANGE.filled())),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renders_bar_chart_to_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bars.png");
        let data = vec![("Movie".to_string(), 1.0e9), ("Show".to_string(), 2.5e9)];
        bar_chart(&path, "Hours by Content Type", "Hours", &data, &[SKYBLUE, SALMON]).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn renders_dual_axis_chart_to_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dual.png");
        let releases = [10u64, 4, 0, 7, 3, 9, 2, 1, 5, 8, 6, 11];
        let hours = [1.0, 2.0, 0.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];
        month_dual_chart(&path, "Monthly Releases and Hours", &releases, &hours).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn render_failure_reports_the_path() {
        let path = Path::new("/nonexistent-dir/chart.png");
        let err = month_line_chart(path, "t", "y", &[0.0; 12]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/chart.png"));
    }
}
