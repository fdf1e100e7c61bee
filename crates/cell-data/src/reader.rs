//! CSV file discovery and loading for the cell performance analyzer.
//!
//! Reads cycling-test logs exported by the battery cycler, one CSV per run,
//! and converts their discharge rows into [`CyclingRecord`]s for downstream
//! grouping. A file that cannot be read, parsed, or mapped onto the expected
//! columns aborts the whole load; there is no partial-row recovery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cell_core::error::{CellError, Result};
use cell_core::models::CyclingRecord;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Result of loading a data directory.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// All retained discharge records, in file order.
    pub records: Vec<CyclingRecord>,
    /// Number of CSV files read.
    pub files_loaded: usize,
}

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Load every CSV under `data_path` into a single discharge-only record set.
///
/// Rows with `Current >= 0` (charging or idle) are dropped. Per-file record
/// batches are collected first and concatenated once at the end.
pub fn load_cycling_records(data_path: &Path) -> Result<LoadResult> {
    let files = find_csv_files(data_path);
    if files.is_empty() {
        warn!("No CSV files found in {}", data_path.display());
        return Ok(LoadResult {
            records: Vec::new(),
            files_loaded: 0,
        });
    }

    let mut batches: Vec<Vec<CyclingRecord>> = Vec::with_capacity(files.len());
    for file_path in &files {
        batches.push(load_single_file(file_path)?);
    }

    let total: usize = batches.iter().map(Vec::len).sum();
    let mut records = Vec::with_capacity(total);
    for batch in batches {
        records.extend(batch);
    }

    debug!(
        "Loaded {} discharge records from {} files",
        records.len(),
        files.len()
    );

    Ok(LoadResult {
        records,
        files_loaded: files.len(),
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Resolved column positions for one file.
struct ColumnIndex {
    cell_id: usize,
    cycle: usize,
    current: usize,
    voltage: usize,
    capacity: usize,
    temperature: usize,
    resistance: usize,
}

/// Normalize a header cell for lookup: trim whitespace, strip a UTF-8 BOM,
/// lowercase. Excel exports sometimes prefix the first header with a BOM.
fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// Map the file's headers onto the required columns, failing on the first
/// column that is absent.
fn resolve_columns(path: &Path, headers: &csv::StringRecord) -> Result<ColumnIndex> {
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header(name), idx))
        .collect();

    let lookup = |column: &str| -> Result<usize> {
        header_map
            .get(&normalize_header(column))
            .copied()
            .ok_or_else(|| CellError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };

    Ok(ColumnIndex {
        cell_id: lookup("Cell_id")?,
        cycle: lookup("Cycle_Index")?,
        current: lookup("Current")?,
        voltage: lookup("Voltage")?,
        capacity: lookup("Discharge_Capacity")?,
        temperature: lookup("Temperature")?,
        resistance: lookup("Internal_Resistance")?,
    })
}

/// Read one CSV file and return its discharge rows.
fn load_single_file(path: &Path) -> Result<Vec<CyclingRecord>> {
    let file = std::fs::File::open(path).map_err(|source| CellError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| CellError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let columns = resolve_columns(path, &headers)?;

    let mut records = Vec::new();
    let mut rows_read = 0u64;
    let mut rows_dropped = 0u64;

    for (idx, result) in reader.records().enumerate() {
        // +2: headers occupy line 1 and CSV lines are 1-based.
        let line = idx as u64 + 2;
        let record = result.map_err(|source| CellError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        rows_read += 1;

        let current = parse_number(&record, columns.current, path, line, "Current")?;
        if current >= 0.0 {
            rows_dropped += 1;
            continue;
        }

        let cycle_raw = parse_number(&record, columns.cycle, path, line, "Cycle_Index")?;
        let cycle = cycle_to_index(cycle_raw).ok_or_else(|| CellError::InvalidValue {
            path: path.to_path_buf(),
            line,
            column: "Cycle_Index".to_string(),
        })?;

        let cell_id = record
            .get(columns.cell_id)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CellError::InvalidValue {
                path: path.to_path_buf(),
                line,
                column: "Cell_id".to_string(),
            })?
            .to_string();

        records.push(CyclingRecord {
            cell_id,
            cycle,
            current,
            voltage: parse_number(&record, columns.voltage, path, line, "Voltage")?,
            discharge_capacity: parse_number(
                &record,
                columns.capacity,
                path,
                line,
                "Discharge_Capacity",
            )?,
            temperature: parse_number(&record, columns.temperature, path, line, "Temperature")?,
            internal_resistance: parse_number(
                &record,
                columns.resistance,
                path,
                line,
                "Internal_Resistance",
            )?,
        });
    }

    debug!(
        "File {}: {} rows read, {} charge/idle rows dropped, {} retained",
        path.display(),
        rows_read,
        rows_dropped,
        records.len()
    );

    Ok(records)
}

/// Parse one numeric field, failing with the offending file/line/column.
fn parse_number(
    record: &csv::StringRecord,
    idx: usize,
    path: &Path,
    line: u64,
    column: &str,
) -> Result<f64> {
    record
        .get(idx)
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| CellError::InvalidValue {
            path: path.to_path_buf(),
            line,
            column: column.to_string(),
        })
}

/// Convert a cycle-index value to an integer index.
///
/// Cyclers export the index as a float (`"7.0"`); the value must be finite
/// and non-negative.
fn cycle_to_index(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value.round() as u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str =
        "Cell_id,Cycle_Index,Current,Discharge_Capacity,Voltage,Temperature,Internal_Resistance";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn row(cell: &str, cycle: f64, current: f64, capacity: f64) -> String {
        format!("{cell},{cycle},{current},{capacity},3.7,25.0,0.02")
    }

    // ── find_csv_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_csv_files_in_flat_dir() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "a.csv", &[HEADER]);
        write_csv(dir.path(), "b.csv", &[HEADER]);
        write_csv(dir.path(), "notes.txt", &["not a csv"]);

        let files = find_csv_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_find_csv_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("batch-2");
        std::fs::create_dir_all(&sub).unwrap();
        write_csv(dir.path(), "c.csv", &[HEADER]);
        write_csv(&sub, "a.csv", &[HEADER]);

        let files = find_csv_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files[0] < files[1]);
    }

    #[test]
    fn test_find_csv_files_nonexistent_path() {
        assert!(find_csv_files(Path::new("/tmp/does-not-exist-cellscope-xyz")).is_empty());
    }

    // ── load_cycling_records ──────────────────────────────────────────────────

    #[test]
    fn test_load_basic_file() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "run.csv",
            &[HEADER, &row("A", 1.0, -1.5, 0.5), &row("A", 1.0, -1.5, 1.0)],
        );

        let loaded = load_cycling_records(dir.path()).unwrap();
        assert_eq!(loaded.files_loaded, 1);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].cell_id, "A");
        assert_eq!(loaded.records[0].cycle, 1);
        assert!((loaded.records[1].discharge_capacity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_load_drops_charge_and_idle_rows() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "run.csv",
            &[
                HEADER,
                &row("A", 1.0, -1.5, 0.5),
                &row("A", 1.0, 0.0, 0.6),
                &row("A", 1.0, 2.0, 0.7),
            ],
        );

        let loaded = load_cycling_records(dir.path()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.records.iter().all(|r| r.current < 0.0));
    }

    #[test]
    fn test_load_unifies_multiple_files() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "a.csv", &[HEADER, &row("A", 1.0, -1.0, 0.5)]);
        write_csv(dir.path(), "b.csv", &[HEADER, &row("B", 1.0, -1.0, 0.7)]);

        let loaded = load_cycling_records(dir.path()).unwrap();
        assert_eq!(loaded.files_loaded, 2);
        assert_eq!(loaded.records.len(), 2);
        // File order is the sorted path order.
        assert_eq!(loaded.records[0].cell_id, "A");
        assert_eq!(loaded.records[1].cell_id, "B");
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = TempDir::new().unwrap();
        let loaded = load_cycling_records(dir.path()).unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.files_loaded, 0);
    }

    #[test]
    fn test_missing_column_names_file_and_column() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "bad.csv",
            &["Cell_id,Cycle_Index,Current,Voltage", "A,1.0,-1.0,3.7"],
        );

        let err = load_cycling_records(dir.path()).unwrap_err();
        match err {
            CellError::MissingColumn { path, column } => {
                assert!(path.ends_with("bad.csv"));
                assert_eq!(column, "Discharge_Capacity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unparsable_number_aborts_load() {
        let dir = TempDir::new().unwrap();
        write_csv(
            dir.path(),
            "bad.csv",
            &[HEADER, "A,1.0,not-a-number,0.5,3.7,25.0,0.02"],
        );

        let err = load_cycling_records(dir.path()).unwrap_err();
        match err {
            CellError::InvalidValue { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "Current");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_file_invalidates_whole_run() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "a.csv", &[HEADER, &row("A", 1.0, -1.0, 0.5)]);
        write_csv(dir.path(), "b.csv", &["Cell_id,Current", "A,-1.0"]);

        assert!(load_cycling_records(dir.path()).is_err());
    }

    #[test]
    fn test_float_cycle_index_converted() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "run.csv", &[HEADER, &row("A", 50.0, -1.0, 1.9)]);

        let loaded = load_cycling_records(dir.path()).unwrap();
        assert_eq!(loaded.records[0].cycle, 50);
    }

    #[test]
    fn test_negative_cycle_index_rejected() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "run.csv", &[HEADER, &row("A", -3.0, -1.0, 1.9)]);

        let err = load_cycling_records(dir.path()).unwrap_err();
        assert!(matches!(err, CellError::InvalidValue { .. }));
    }

    #[test]
    fn test_bom_and_padding_in_headers_tolerated() {
        let dir = TempDir::new().unwrap();
        let header = "\u{feff}Cell_id, Cycle_Index ,Current,Discharge_Capacity,Voltage,Temperature,Internal_Resistance";
        write_csv(dir.path(), "run.csv", &[header, &row("A", 1.0, -1.0, 0.5)]);

        let loaded = load_cycling_records(dir.path()).unwrap();
        assert_eq!(loaded.records.len(), 1);
    }

    // ── cycle_to_index ────────────────────────────────────────────────────────

    #[test]
    fn test_cycle_to_index_rounds() {
        assert_eq!(cycle_to_index(7.0), Some(7));
        assert_eq!(cycle_to_index(7.4), Some(7));
        assert_eq!(cycle_to_index(0.0), Some(0));
    }

    #[test]
    fn test_cycle_to_index_rejects_bad_values() {
        assert_eq!(cycle_to_index(-1.0), None);
        assert_eq!(cycle_to_index(f64::NAN), None);
        assert_eq!(cycle_to_index(f64::INFINITY), None);
    }
}
