//! Capacity-fade trend analysis.

use cell_core::calculations::{peak, CycleSamples, PolyFit};
use cell_core::models::Trace;
use tracing::debug;

use crate::grouping::CellGroups;

/// Order of the capacity-fade trend polynomial. Fixed, not configurable.
const FADE_FIT_DEGREE: usize = 3;

/// Per-cell capacity fade: observed peaks and the fitted trend.
#[derive(Debug, Clone)]
pub struct CapacityFade {
    pub cell_id: String,
    /// (cycle, peak discharge capacity) across all cycles, ascending.
    pub observed: Trace,
    /// Cubic least-squares fit evaluated at the same cycles. Empty when the
    /// fit could not be computed (non-finite peaks).
    pub predicted: Trace,
}

/// Compute the capacity-fade trend for every cell.
///
/// Unlike the subsampled series, the fade sequence covers every cycle.
pub fn analyze_capacity_fade(groups: &CellGroups) -> Vec<CapacityFade> {
    groups
        .iter()
        .map(|(cell_id, cycles)| {
            let xs: Vec<f64> = cycles.keys().map(|&c| f64::from(c)).collect();
            let peaks: Vec<f64> = cycles
                .values()
                .map(|group| peak(group.discharge_capacity()))
                .collect();

            let predicted = match PolyFit::fit(&xs, &peaks, FADE_FIT_DEGREE) {
                Some(fit) => Trace::from_xy(
                    format!("cell {cell_id} fit"),
                    &xs,
                    &fit.predict(&xs),
                ),
                None => {
                    debug!("Cell {}: capacity-fade fit not computable", cell_id);
                    Trace::new(format!("cell {cell_id} fit"))
                }
            };

            CapacityFade {
                cell_id: cell_id.to_string(),
                observed: Trace::from_xy(format!("cell {cell_id}"), &xs, &peaks),
                predicted,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
