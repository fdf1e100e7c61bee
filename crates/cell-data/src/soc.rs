//! State-of-charge curve construction.

use cell_core::calculations::{state_of_charge, CycleSamples};
use cell_core::models::Trace;
use tracing::debug;

use crate::grouping::{is_sampled_cycle, CellGroups};

/// SOC curves for one cell: one voltage-vs-SOC trace per sampled cycle.
#[derive(Debug, Clone)]
pub struct SocCurves {
    pub cell_id: String,
    /// One trace per cycle divisible by 50, ascending by cycle.
    pub curves: Vec<Trace>,
}

/// Build voltage-vs-SOC curves for every cell.
///
/// For each cycle divisible by 50, discharge capacity is normalized by that
/// cycle's peak and paired with voltage. A zero peak yields NaN SOC values
/// which are passed through to the rendering stage.
pub fn build_soc_curves(groups: &CellGroups) -> Vec<SocCurves> {
    groups
        .iter()
        .map(|(cell_id, cycles)| {
            let curves: Vec<Trace> = cycles
                .iter()
                .filter(|(cycle, _)| is_sampled_cycle(**cycle))
                .map(|(cycle, group)| {
                    let soc = state_of_charge(group.discharge_capacity());
                    Trace::from_xy(format!("cycle {cycle}"), &soc, group.voltage())
                })
                .collect();

            debug!("Cell {}: {} SOC curves", cell_id, curves.len());
            SocCurves {
                cell_id: cell_id.to_string(),
                curves,
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
