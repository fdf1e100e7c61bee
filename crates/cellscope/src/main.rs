mod bootstrap;
mod figures;

use anyhow::Result;
use cell_charts::PlottersSink;
use cell_core::formatting::{format_count, format_elapsed};
use cell_core::settings::Settings;
use cell_data::analysis::analyze_cells;

fn main() -> Result<()> {
    let start = std::time::Instant::now();

    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("cellscope v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, output dir: {}",
        settings.data_dir.display(),
        settings.output_dir.display()
    );

    let analysis = analyze_cells(&settings.data_dir)?;
    tracing::info!(
        "{} discharge records across {} cells",
        format_count(analysis.metadata.records_retained as u64),
        analysis.metadata.cells_analyzed
    );

    let mut sink = PlottersSink::new(&settings.output_dir)?;
    let rendered = figures::render_all(&analysis, &mut sink)?;
    tracing::info!(
        "Rendered {} figures into {}",
        rendered,
        settings.output_dir.display()
    );

    let elapsed = start.elapsed().as_secs();
    println!(
        "Cell performance analysis processing time: {}",
        format_elapsed(elapsed)
    );

    Ok(())
}
