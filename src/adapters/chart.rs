//! PNG charts for the seismic reports.
//!
//! Charts are drawn with the [`plotters`] bitmap backend. Text goes through
//! the `ab_glyph` font backend using the DejaVu Sans face embedded in the
//! binary, so rendering never depends on system fonts.

use crate::domain::model::{DailyCount, TimeWindow, WindowCounts, YearCount};
use crate::utils::error::{EtlError, Result};
use chrono::Duration;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;
use std::sync::OnceLock;

const SERIES_SIZE: (u32, u32) = (1200, 600);
const COMPARISON_SIZE: (u32, u32) = (1400, 800);
const FONT: &str = "sans-serif";
const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static FONT_READY: OnceLock<std::result::Result<(), String>> = OnceLock::new();

fn chart_err<E: std::fmt::Display>(e: E) -> EtlError {
    EtlError::ChartError(e.to_string())
}

/// Registers the embedded face under [`FONT`] once per process.
fn ensure_font() -> Result<()> {
    FONT_READY
        .get_or_init(|| {
            register_font(FONT, FontStyle::Normal, DEJAVU_SANS)
                .map_err(|_| "embedded chart font could not be loaded".to_string())
        })
        .clone()
        .map_err(EtlError::ChartError)
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Headroom above the tallest point so annotations stay inside the plot.
fn y_upper(max: usize) -> u32 {
    let max = to_u32(max);
    max.saturating_add(max / 10).max(max.saturating_add(1))
}

/// Renders through `render` into a scratch PNG file and returns its bytes.
///
/// Runs on the blocking pool; the scratch file is removed afterwards.
pub async fn render_png<F>(render: F) -> Result<Vec<u8>>
where
    F: FnOnce(&Path) -> Result<()> + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let scratch = tempfile::Builder::new()
            .prefix("sismo-chart-")
            .suffix(".png")
            .tempfile()?;
        render(scratch.path())?;
        Ok(std::fs::read(scratch.path())?)
    })
    .await
    .map_err(chart_err)?
}

/// Per-year event counts as a line with markers and a value label above
/// each point.
pub fn render_year_series(series: &[YearCount], title: &str, output_path: &Path) -> Result<()> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(f), Some(l)) => (f.year, l.year),
        _ => return Err(EtlError::ChartError("year series is empty".to_string())),
    };
    ensure_font()?;
    let y_max = y_upper(series.iter().map(|p| p.count).max().unwrap_or(0));

    let root = BitMapBackend::new(output_path, SERIES_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 25))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((first - 1)..(last + 1), 0u32..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Año")
        .y_desc("Número de Sismos")
        .x_labels(series.len() + 2)
        .x_label_formatter(&|y| y.to_string())
        .draw()
        .map_err(chart_err)?;

    let points: Vec<(i32, u32)> = series.iter().map(|p| (p.year, to_u32(p.count))).collect();

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(chart_err)?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 5, BLUE.filled())))
        .map_err(chart_err)?;
    chart
        .draw_series(points.iter().map(|&(x, y)| {
            EmptyElement::at((x, y)) + Text::new(y.to_string(), (-6, -22), (FONT, 14).into_font())
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Grouped bars: week before (blue), holy week (red), week after (green).
pub fn render_window_comparison(
    comparison: &[WindowCounts],
    title: &str,
    output_path: &Path,
) -> Result<()> {
    if comparison.is_empty() {
        return Err(EtlError::ChartError("comparison table is empty".to_string()));
    }
    ensure_font()?;
    let y_max = y_upper(
        comparison
            .iter()
            .map(|c| c.before.max(c.during).max(c.after))
            .max()
            .unwrap_or(0),
    );

    let root = BitMapBackend::new(output_path, COMPARISON_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    // 每年三根長條, 以年份為中心
    let width = 0.25;
    let first = comparison[0].year as f64;
    let last = comparison[comparison.len() - 1].year as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 25))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((first - 1.0)..(last + 1.0), 0u32..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Año")
        .y_desc("Número de sismos")
        .x_labels(comparison.len() + 2)
        .x_label_formatter(&|x| {
            if x.fract().abs() < 1e-6 {
                format!("{:.0}", x)
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(chart_err)?;

    let groups: [(&str, RGBColor, fn(&WindowCounts) -> usize); 3] = [
        ("Semana previa", BLUE, |c| c.before),
        ("Semana Santa", RED, |c| c.during),
        ("Semana posterior", GREEN, |c| c.after),
    ];

    for (offset, (label, color, pick)) in groups.iter().enumerate() {
        let color = *color;
        chart
            .draw_series(comparison.iter().map(|c| {
                let x0 = c.year as f64 - 1.5 * width + offset as f64 * width;
                Rectangle::new([(x0, 0), (x0 + width, to_u32(pick(c)))], color.filled())
            }))
            .map_err(chart_err)?
            .label(*label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Events per day as a thin line with black-edged markers, limited to the
/// days inside `x_range`.
pub fn render_daily_counts(
    days: &[DailyCount],
    x_range: TimeWindow,
    title: &str,
    output_path: &Path,
) -> Result<()> {
    if days.is_empty() {
        return Err(EtlError::ChartError("no days to plot".to_string()));
    }
    ensure_font()?;

    let first = x_range.start;
    let last = if x_range.end <= first {
        first + Duration::days(1)
    } else {
        x_range.end
    };
    let points: Vec<(chrono::NaiveDate, u32)> = days
        .iter()
        .filter(|d| x_range.contains(d.date))
        .map(|d| (d.date, to_u32(d.count)))
        .collect();
    let y_max = y_upper(points.iter().map(|&(_, c)| c as usize).max().unwrap_or(0));

    let root = BitMapBackend::new(output_path, SERIES_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(first..last, 0u32..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Number of Events")
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(1)))
        .map_err(chart_err)?;
    chart
        .draw_series(points.iter().map(|&p| {
            EmptyElement::at(p)
                + Circle::new((0, 0), 3, BLUE.filled())
                + Circle::new((0, 0), 3, BLACK.stroke_width(1))
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}
