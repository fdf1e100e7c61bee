//! Top-level analysis pipeline for the cell performance analyzer.
//!
//! Orchestrates loading, grouping and the four analysis passes, returning a
//! [`CellAnalysis`] ready for the chart layer. Rendering never appears here;
//! the pipeline is a pure function of the data directory.

use std::path::Path;

use cell_core::error::Result;
use chrono::Utc;
use tracing::info;

use crate::fade::{analyze_capacity_fade, CapacityFade};
use crate::grouping::CellGroups;
use crate::reader::load_cycling_records;
use crate::resistance::{analyze_resistance, ResistanceReport};
use crate::soc::{build_soc_curves, SocCurves};
use crate::thermal::{analyze_thermal, ThermalReport};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of CSV files read.
    pub files_loaded: usize,
    /// Number of discharge records retained after filtering.
    pub records_retained: usize,
    /// Number of distinct cells analyzed.
    pub cells_analyzed: usize,
    /// Wall-clock seconds spent loading the CSV files.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent grouping and analyzing.
    pub analysis_time_seconds: f64,
}

/// One cell's complete set of derived series.
#[derive(Debug, Clone)]
pub struct CellReport {
    pub cell_id: String,
    pub soc: SocCurves,
    pub fade: CapacityFade,
    pub thermal: ThermalReport,
    pub resistance: ResistanceReport,
}

/// The complete output of [`analyze_cells`].
#[derive(Debug, Clone)]
pub struct CellAnalysis {
    /// Per-cell reports in ascending cell-identifier order.
    pub cells: Vec<CellReport>,
    /// Metadata about this analysis run.
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full analysis pipeline over a directory of cycling-test CSVs.
///
/// 1. Load discharge records from every CSV under `data_path`.
/// 2. Group them by cell and cycle.
/// 3. Run the SOC, fade, thermal and resistance passes.
/// 4. Return a [`CellAnalysis`].
///
/// A malformed input file aborts the whole run; an empty directory yields an
/// empty (but valid) analysis.
pub fn analyze_cells(data_path: &Path) -> Result<CellAnalysis> {
    // ── Step 1: Load records ──────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let loaded = load_cycling_records(data_path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Group and analyze ─────────────────────────────────────────────
    let analysis_start = std::time::Instant::now();
    let groups = CellGroups::from_records(&loaded.records);

    let soc = build_soc_curves(&groups);
    let fade = analyze_capacity_fade(&groups);
    let thermal = analyze_thermal(&groups);
    let resistance = analyze_resistance(&groups);

    // All four passes iterate the same grouping, so the per-cell vectors are
    // parallel and ordered identically.
    let cells: Vec<CellReport> = soc
        .into_iter()
        .zip(fade)
        .zip(thermal)
        .zip(resistance)
        .map(|(((soc, fade), thermal), resistance)| CellReport {
            cell_id: soc.cell_id.clone(),
            soc,
            fade,
            thermal,
            resistance,
        })
        .collect();
    let analysis_time = analysis_start.elapsed().as_secs_f64();

    info!(
        "Analyzed {} cells from {} records in {} files",
        cells.len(),
        loaded.records.len(),
        loaded.files_loaded
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        files_loaded: loaded.files_loaded,
        records_retained: loaded.records.len(),
        cells_analyzed: cells.len(),
        load_time_seconds: load_time,
        analysis_time_seconds: analysis_time,
    };

    Ok(CellAnalysis { cells, metadata })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
