//! Temperature correlation analysis.
//!
//! Correlates per-cycle capacity behavior with the temperature recorded at
//! the moment of peak discharge capacity, and tracks the per-cycle maximum
//! temperature independently of that sample.

use cell_core::calculations::{
    argmax, capacity_loss_percent, capacity_loss_rate, peak, CycleSamples,
};
use cell_core::models::Trace;

use crate::grouping::{is_sampled_cycle, CellGroups, CycleGroup};

/// Per-cell temperature correlation series.
#[derive(Debug, Clone)]
pub struct ThermalReport {
    pub cell_id: String,
    /// Raw (temperature, capacity) samples of each cycle divisible by 50,
    /// one trace per cycle.
    pub sampled_cycle_scatter: Vec<Trace>,
    /// (temperature at peak-capacity sample, peak capacity) per cycle.
    pub capacity_vs_temperature: Trace,
    /// (temperature at peak-capacity sample, capacity loss %) per cycle.
    pub loss_percent_vs_temperature: Trace,
    /// (temperature at peak-capacity sample, loss rate) per sampled cycle.
    pub loss_rate_vs_temperature: Trace,
    /// (cycle, maximum temperature) per cycle.
    pub max_temperature_per_cycle: Trace,
}

/// Peak discharge capacity and the temperature at the sample where that peak
/// occurs. Both NaN when the group has no usable capacity sample.
fn peak_sample<C: CycleSamples>(group: &C) -> (f64, f64) {
    let peak_capacity = peak(group.discharge_capacity());
    let temp_at_peak = argmax(group.discharge_capacity())
        .map(|i| group.temperature()[i])
        .unwrap_or(f64::NAN);
    (peak_capacity, temp_at_peak)
}

/// Peak capacity of the cell's reference cycle: cycle 1 when present,
/// otherwise the first cycle in ascending order.
fn reference_capacity(cycles: &std::collections::BTreeMap<u32, CycleGroup>) -> f64 {
    cycles
        .get(&1)
        .or_else(|| cycles.values().next())
        .map(|group| peak(group.discharge_capacity()))
        .unwrap_or(f64::NAN)
}

/// Compute the five temperature correlation series for every cell.
pub fn analyze_thermal(groups: &CellGroups) -> Vec<ThermalReport> {
    groups
        .iter()
        .map(|(cell_id, cycles)| {
            let reference = reference_capacity(cycles);

            let mut report = ThermalReport {
                cell_id: cell_id.to_string(),
                sampled_cycle_scatter: Vec::new(),
                capacity_vs_temperature: Trace::new(format!("cell {cell_id}")),
                loss_percent_vs_temperature: Trace::new(format!("cell {cell_id}")),
                loss_rate_vs_temperature: Trace::new(format!("cell {cell_id}")),
                max_temperature_per_cycle: Trace::new(format!("cell {cell_id}")),
            };

            for (&cycle, group) in cycles {
                let (peak_capacity, temp_at_peak) = peak_sample(group);

                report
                    .capacity_vs_temperature
                    .points
                    .push((temp_at_peak, peak_capacity));
                report.loss_percent_vs_temperature.points.push((
                    temp_at_peak,
                    capacity_loss_percent(peak_capacity, reference),
                ));
                report
                    .max_temperature_per_cycle
                    .points
                    .push((f64::from(cycle), peak(group.temperature())));

                if is_sampled_cycle(cycle) {
                    report.loss_rate_vs_temperature.points.push((
                        temp_at_peak,
                        capacity_loss_rate(peak_capacity, reference, cycle),
                    ));
                    report.sampled_cycle_scatter.push(Trace::from_xy(
                        format!("cycle {cycle}"),
                        group.temperature(),
                        group.discharge_capacity(),
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

    fn record(cell: &str, cycle: u32, capacity: f64, temperature: f64) -> CyclingRecord {
        CyclingRecord {
            cell_id: cell.to_string(),
            cycle,
            current: -1.0,
            voltage: 3.7,
            discharge_capacity: capacity,
            temperature,
            internal_resistance: 0.02,
        }
    }

    /// Cycles 1..=n. Per-cycle peak capacity decays by 0.005 Ah per cycle;
    /// the peak-capacity sample sits at 25 °C while a later hotter sample
    /// (30 °C) carries less capacity.
    fn decaying_cell(cell: &str, n: u32) -> CellGroups {
        let mut records = Vec::new();
        for cycle in 1..=n {
            let peak = 2.0 - 0.005 * f64::from(cycle - 1);
            records.push(record(cell, cycle, peak * 0.5, 22.0));
            records.push(record(cell, cycle, peak, 25.0));
            records.push(record(cell, cycle, peak * 0.9, 30.0));
        }
        CellGroups::from_records(&records)
    }

    #[test]
    fn test_loss_percent_zero_at_reference_cycle() {
        let reports = analyze_thermal(&decaying_cell("A", 10));
        let first = reports[0].loss_percent_vs_temperature.points[0];
        assert!(first.1.abs() < 1e-12);
    }

    #[test]
    fn test_loss_percent_non_negative_and_growing() {
        let reports = analyze_thermal(&decaying_cell("A", 100));
        let losses: Vec<f64> = reports[0]
            .loss_percent_vs_temperature
            .points
            .iter()
            .map(|p| p.1)
            .collect();
        assert!(losses.iter().all(|&l| l >= 0.0));
        assert!(losses[99] > losses[1]);
    }

    #[test]
    fn test_temperature_taken_at_peak_capacity_sample() {
        let reports = analyze_thermal(&decaying_cell("A", 1));
        // The hottest sample is 30 °C, but the peak-capacity sample is 25 °C.
        assert!((reports[0].capacity_vs_temperature.points[0].0 - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_temperature_tracked_independently() {
        let reports = analyze_thermal(&decaying_cell("A", 3));
        for &(_, max_temp) in &reports[0].max_temperature_per_cycle.points {
            assert!((max_temp - 30.0).abs() < 1e-12);
        }
        assert_eq!(reports[0].max_temperature_per_cycle.len(), 3);
    }

    #[test]
    fn test_loss_rate_sampled_every_fiftieth_cycle() {
        let reports = analyze_thermal(&decaying_cell("A", 150));
        // Cycles 50, 100, 150.
        assert_eq!(reports[0].loss_rate_vs_temperature.len(), 3);
        assert_eq!(reports[0].sampled_cycle_scatter.len(), 3);

        let labels: Vec<&str> = reports[0]
            .sampled_cycle_scatter
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(labels, vec!["cycle 50", "cycle 100", "cycle 150"]);
    }

    #[test]
    fn test_loss_rate_value() {
        let reports = analyze_thermal(&decaying_cell("A", 50));
        // Peak at cycle 50 is 2.0 - 0.005*49 = 1.755; loss 0.245 over 50
        // cycles.
        let (_, rate) = reports[0].loss_rate_vs_temperature.points[0];
        assert!((rate - 0.245 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_scatter_holds_raw_samples() {
        let reports = analyze_thermal(&decaying_cell("A", 50));
        // Three samples per cycle in the fixture.
        assert_eq!(reports[0].sampled_cycle_scatter[0].len(), 3);
    }

    #[test]
    fn test_reference_falls_back_to_first_cycle() {
        // Cell whose logging starts at cycle 10: the reference is cycle 10
        // and its own loss is zero.
        let records = vec![
            record("A", 10, 1.8, 25.0),
            record("A", 11, 1.7, 25.0),
        ];
        let reports = analyze_thermal(&CellGroups::from_records(&records));
        let losses: Vec<f64> = reports[0]
            .loss_percent_vs_temperature
            .points
            .iter()
            .map(|p| p.1)
            .collect();
        assert!(losses[0].abs() < 1e-12);
        assert!(losses[1] > 0.0);
    }

    #[test]
    fn test_per_cycle_series_cover_every_cycle() {
        let reports = analyze_thermal(&decaying_cell("A", 75));
        assert_eq!(reports[0].capacity_vs_temperature.len(), 75);
        assert_eq!(reports[0].loss_percent_vs_temperature.len(), 75);
        assert_eq!(reports[0].max_temperature_per_cycle.len(), 75);
        // Only cycle 50 qualifies for the subsampled series.
        assert_eq!(reports[0].loss_rate_vs_temperature.len(), 1);
    }
}
