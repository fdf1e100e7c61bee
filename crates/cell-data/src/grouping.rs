//! Cell and cycle grouping for loaded cycling records.
//!
//! The analyses all iterate the same two-level structure: cells in ascending
//! identifier order, and within a cell, cycles in ascending index order.
//! `BTreeMap` keys give both orderings for free.

use std::collections::BTreeMap;

use cell_core::calculations::CycleSamples;
use cell_core::models::CyclingRecord;

/// Cycles at this interval are singled out for the subsampled series.
pub const CYCLE_SAMPLE_INTERVAL: u32 = 50;

/// Whether a cycle participates in the subsampled (every-50th) series.
pub fn is_sampled_cycle(cycle: u32) -> bool {
    cycle % CYCLE_SAMPLE_INTERVAL == 0
}

/// All samples of one (cell, cycle) group, stored column-wise in load order.
///
/// Groups only exist for cycles with at least one retained discharge row, so
/// a constructed group is never empty.
#[derive(Debug, Clone, Default)]
pub struct CycleGroup {
    pub current: Vec<f64>,
    pub voltage: Vec<f64>,
    pub discharge_capacity: Vec<f64>,
    pub temperature: Vec<f64>,
    pub internal_resistance: Vec<f64>,
}

impl CycleGroup {
    fn push(&mut self, record: &CyclingRecord) {
        self.current.push(record.current);
        self.voltage.push(record.voltage);
        self.discharge_capacity.push(record.discharge_capacity);
        self.temperature.push(record.temperature);
        self.internal_resistance.push(record.internal_resistance);
    }

    /// Number of samples in the group.
    pub fn len(&self) -> usize {
        self.discharge_capacity.len()
    }

    /// Whether the group holds no samples.
    pub fn is_empty(&self) -> bool {
        self.discharge_capacity.is_empty()
    }
}

impl CycleSamples for CycleGroup {
    fn discharge_capacity(&self) -> &[f64] {
        &self.discharge_capacity
    }

    fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    fn internal_resistance(&self) -> &[f64] {
        &self.internal_resistance
    }
}

/// Records grouped by cell identifier, then by cycle index.
#[derive(Debug, Clone, Default)]
pub struct CellGroups {
    cells: BTreeMap<String, BTreeMap<u32, CycleGroup>>,
}

impl CellGroups {
    /// Group a loaded record set. Records are cloned column-wise; the input
    /// is not consumed.
    pub fn from_records(records: &[CyclingRecord]) -> Self {
        let mut cells: BTreeMap<String, BTreeMap<u32, CycleGroup>> = BTreeMap::new();
        for record in records {
            cells
                .entry(record.cell_id.clone())
                .or_default()
                .entry(record.cycle)
                .or_default()
                .push(record);
        }
        Self { cells }
    }

    /// Number of distinct cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cells were grouped.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<u32, CycleGroup>)> {
        self.cells.iter().map(|(id, cycles)| (id.as_str(), cycles))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
