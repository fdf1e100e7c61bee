//! PNG rendering backend built on `plotters`.

use std::ops::Range;
use std::path::{Path, PathBuf};

use cell_core::error::{CellError, Result};
use plotters::prelude::*;
use tracing::debug;

use crate::sink::{ChartSink, FigureSpec, SeriesSpec, SeriesStyle};

/// Series colors, cycled in order.
const PALETTE: [RGBColor; 10] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
    RGBColor(0xbc, 0xbd, 0x22),
    RGBColor(0x17, 0xbe, 0xcf),
];

const FIGURE_SIZE: (u32, u32) = (800, 600);

/// Renders each figure as `<slug>.png` under the output directory.
pub struct PlottersSink {
    output_dir: PathBuf,
}

impl PlottersSink {
    /// Create a sink writing into `output_dir`, creating it if absent.
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Path the given figure will be written to.
    pub fn output_path(&self, figure: &FigureSpec) -> PathBuf {
        self.output_dir.join(format!("{}.png", figure.slug))
    }
}

impl ChartSink for PlottersSink {
    fn render(&mut self, figure: &FigureSpec) -> Result<()> {
        let path = self.output_path(figure);
        draw_png(&path, figure)
            .map_err(|e| CellError::ChartRender(format!("{}: {}", path.display(), e)))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

/// Finite points of one series; NaN and infinite coordinates are skipped at
/// the rendering surface, never in the analyses.
fn finite_points(series: &SeriesSpec) -> Vec<(f64, f64)> {
    series
        .trace
        .points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect()
}

/// Axis ranges covering every finite point, padded by 5%, falling back to the
/// unit square when nothing finite remains.
fn axis_ranges(figure: &FigureSpec) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for series in &figure.series {
        for (x, y) in finite_points(series) {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !x_min.is_finite() || !y_min.is_finite() {
        return (0.0..1.0, 0.0..1.0);
    }
    (pad_range(x_min, x_max), pad_range(y_min, y_max))
}

/// Widen `[min, max]` by 5% on both sides; a degenerate span widens by ±0.5.
fn pad_range(min: f64, max: f64) -> Range<f64> {
    let span = max - min;
    if span <= 0.0 {
        return (min - 0.5)..(max + 0.5);
    }
    (min - span * 0.05)..(max + span * 0.05)
}

fn draw_png(
    path: &Path,
    figure: &FigureSpec,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let (x_range, y_range) = axis_ranges(figure);

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(figure.title.as_str(), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .draw()?;

    for (i, series) in figure.series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points = finite_points(series);
        match series.style {
            SeriesStyle::Line => {
                chart
                    .draw_series(LineSeries::new(points, color))?
                    .label(series.trace.label.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color)
                    });
            }
            SeriesStyle::Scatter => {
                chart
                    .draw_series(
                        points
                            .into_iter()
                            .map(|p| Circle::new(p, 3, color.filled())),
                    )?
                    .label(series.trace.label.as_str())
                    .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
            }
        }
    }

    if figure.series.iter().any(|s| !s.trace.label.is_empty()) {
        chart
            .configure_series_labels()
            .background_style(WHITE)
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
