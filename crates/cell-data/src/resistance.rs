//! Internal-resistance correlation analysis.

use cell_core::calculations::{mean, CycleSamples};
use cell_core::models::Trace;

use crate::grouping::{is_sampled_cycle, CellGroups};

/// Per-cell internal-resistance series.
#[derive(Debug, Clone)]
pub struct ResistanceReport {
    pub cell_id: String,
    /// Raw (temperature, resistance) samples of cycle 1 and every cycle
    /// divisible by 50, one trace per sampled cycle.
    pub sampled_cycle_scatter: Vec<Trace>,
    /// (cycle, mean internal resistance) per cycle.
    pub mean_per_cycle: Trace,
}

/// Compute the resistance correlation series for every cell.
///
/// Note the sampling rule differs from the thermal pass: cycle 1 is always
/// included alongside the every-50th cycles.
pub fn analyze_resistance(groups: &CellGroups) -> Vec<ResistanceReport> {
    groups
        .iter()
        .map(|(cell_id, cycles)| {
            let mut report = ResistanceReport {
                cell_id: cell_id.to_string(),
                sampled_cycle_scatter: Vec::new(),
                mean_per_cycle: Trace::new(format!("cell {cell_id}")),
            };

            for (&cycle, group) in cycles {
                report
                    .mean_per_cycle
                    .points
                    .push((f64::from(cycle), mean(group.internal_resistance())));

                if cycle == 1 || is_sampled_cycle(cycle) {
                    report.sampled_cycle_scatter.push(Trace::from_xy(
                        format!("cycle {cycle}"),
                        group.temperature(),
                        group.internal_resistance(),
                    ));
                }
            }

            report
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cell_core::models::CyclingRecord;

    fn record(cell: &str, cycle: u32, resistance: f64, temperature: f64) -> CyclingRecord {
        CyclingRecord {
            cell_id: cell.to_string(),
            cycle,
            current: -1.0,
            voltage: 3.7,
            discharge_capacity: 1.5,
            temperature,
            internal_resistance: resistance,
        }
    }

    /// Cycles 1..=n with two samples per cycle.
    fn cell_with_cycles(cell: &str, n: u32) -> CellGroups {
        let mut records = Vec::new();
        for cycle in 1..=n {
            let base = 0.02 + 0.0001 * f64::from(cycle);
            records.push(record(cell, cycle, base, 24.0));
            records.push(record(cell, cycle, base + 0.01, 26.0));
        }
        CellGroups::from_records(&records)
    }

    #[test]
    fn test_mean_trend_has_one_point_per_cycle() {
        let reports = analyze_resistance(&cell_with_cycles("A", 60));
        assert_eq!(reports[0].mean_per_cycle.len(), 60);
        assert_eq!(reports[0].mean_per_cycle.points[0].0, 1.0);
        assert_eq!(reports[0].mean_per_cycle.points[59].0, 60.0);
    }

    #[test]
    fn test_mean_is_average_over_cycle_samples() {
        let reports = analyze_resistance(&cell_with_cycles("A", 1));
        let (_, mean_ir) = reports[0].mean_per_cycle.points[0];
        assert!((mean_ir - (0.0201 + 0.0301) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_scatter_sampled_at_cycle_one_and_fiftieths() {
        let reports = analyze_resistance(&cell_with_cycles("A", 120));
        let labels: Vec<&str> = reports[0]
            .sampled_cycle_scatter
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(labels, vec!["cycle 1", "cycle 50", "cycle 100"]);
    }

    #[test]
    fn test_scatter_length_equals_raw_row_count() {
        let reports = analyze_resistance(&cell_with_cycles("A", 50));
        for trace in &reports[0].sampled_cycle_scatter {
            assert_eq!(trace.len(), 2);
        }
    }

    #[test]
    fn test_scatter_pairs_temperature_with_resistance() {
        let reports = analyze_resistance(&cell_with_cycles("A", 1));
        let points = &reports[0].sampled_cycle_scatter[0].points;
        assert!((points[0].0 - 24.0).abs() < 1e-12);
        assert!((points[0].1 - 0.0201).abs() < 1e-9);
        assert!((points[1].0 - 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_cells_reported_in_ascending_order() {
        let mut records = Vec::new();
        records.extend(
            (1..=2).map(|c| record("B", c, 0.02, 25.0)),
        );
        records.extend(
            (1..=2).map(|c| record("A", c, 0.03, 25.0)),
        );
        let reports = analyze_resistance(&CellGroups::from_records(&records));
        assert_eq!(reports[0].cell_id, "A");
        assert_eq!(reports[1].cell_id, "B");
    }
}
