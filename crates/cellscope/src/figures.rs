//! Figure enumeration: converts per-cell analysis reports into the figures
//! the chart sink renders. Nine figures per cell, titled and labelled the way
//! the diagnostic plots are read in the lab.

use cell_charts::{ChartSink, FigureSpec};
use cell_core::error::Result;
use cell_data::analysis::{CellAnalysis, CellReport};

/// File-name slug for one cell's figure: `cell-<id>_<metric>`, with any
/// path-hostile characters in the id replaced.
fn slug(cell_id: &str, metric: &str) -> String {
    let safe: String = cell_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("cell-{safe}_{metric}")
}

/// Build the nine figures for one cell.
pub fn build_figures(report: &CellReport) -> Vec<FigureSpec> {
    let cell = &report.cell_id;
    let mut figures = Vec::with_capacity(9);

    // Voltage vs. state of charge, one curve per sampled cycle.
    let mut soc = FigureSpec::new(slug(cell, "soc"), "SOC", "SOC", "Voltage (V)");
    for curve in &report.soc.curves {
        soc = soc.line(curve.clone());
    }
    figures.push(soc);

    // Observed and fitted peak capacity per cycle.
    figures.push(
        FigureSpec::new(
            slug(cell, "capacity_fade"),
            "Discharge capacity change with cycle",
            "Cycle Number",
            "Discharge Capacity (Ah)",
        )
        .line(report.fade.observed.clone())
        .line(report.fade.predicted.clone()),
    );

    // Raw capacity/temperature samples of the sampled cycles.
    let mut cycle_scatter = FigureSpec::new(
        slug(cell, "cycle_capacity_temperature"),
        "Discharge capacity change with temperature within each cycle",
        "Temperature",
        "Discharge Capacity (Ah)",
    );
    for trace in &report.thermal.sampled_cycle_scatter {
        cycle_scatter = cycle_scatter.scatter(trace.clone());
    }
    figures.push(cycle_scatter);

    figures.push(
        FigureSpec::new(
            slug(cell, "capacity_temperature"),
            "Discharge capacity change with temperature",
            "Temperature",
            "Discharge Capacity (Ah)",
        )
        .scatter(report.thermal.capacity_vs_temperature.clone()),
    );

    figures.push(
        FigureSpec::new(
            slug(cell, "capacity_loss_temperature"),
            "Discharge capacity loss change with temperature",
            "Temperature",
            "Discharge Capacity Loss (%)",
        )
        .line(report.thermal.loss_percent_vs_temperature.clone()),
    );

    figures.push(
        FigureSpec::new(
            slug(cell, "loss_rate_temperature"),
            "Capacity loss rate change with temperature",
            "Temperature",
            "Capacity Loss Rate",
        )
        .line(report.thermal.loss_rate_vs_temperature.clone()),
    );

    figures.push(
        FigureSpec::new(
            slug(cell, "max_temperature"),
            "Maximum temperature change with cycle",
            "Cycle Number",
            "Maximum Temperature Each Cycle (degree C)",
        )
        .line(report.thermal.max_temperature_per_cycle.clone()),
    );

    // Raw resistance/temperature samples of the sampled cycles.
    let mut resistance_scatter = FigureSpec::new(
        slug(cell, "resistance_temperature"),
        "Internal Resistance vs. Temperature",
        "Temperature",
        "Internal Resistance",
    );
    for trace in &report.resistance.sampled_cycle_scatter {
        resistance_scatter = resistance_scatter.scatter(trace.clone());
    }
    figures.push(resistance_scatter);

    figures.push(
        FigureSpec::new(
            slug(cell, "resistance_cycle"),
            "Internal Resistance vs. Cycle",
            "Cycle Number",
            "Internal Resistance (Ohm)",
        )
        .line(report.resistance.mean_per_cycle.clone()),
    );

    figures
}

/// Render every figure of every cell through the sink. Returns the number of
/// figures rendered.
pub fn render_all(analysis: &CellAnalysis, sink: &mut dyn ChartSink) -> Result<usize> {
    let mut rendered = 0usize;
    for report in &analysis.cells {
        for figure in build_figures(report) {
            sink.render(&figure)?;
            rendered += 1;
        }
    }
    Ok(rendered)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
