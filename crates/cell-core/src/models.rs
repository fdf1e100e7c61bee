use serde::{Deserialize, Serialize};

/// A single discharge sample read from a cycling-test CSV log.
///
/// One record corresponds to one retained row of the input: the loader drops
/// charging and idle rows (`current >= 0`) before records are constructed, so
/// every record in a loaded set has negative current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CyclingRecord {
    /// Identifier of the cell under test.
    pub cell_id: String,
    /// Cycle index within the cell's test protocol, starting at 1.
    pub cycle: u32,
    /// Applied current in amperes (negative during discharge).
    pub current: f64,
    /// Terminal voltage in volts.
    pub voltage: f64,
    /// Cumulative discharge capacity in ampere-hours.
    pub discharge_capacity: f64,
    /// Cell surface temperature in degrees Celsius.
    pub temperature: f64,
    /// Instantaneous internal resistance in ohms.
    pub internal_resistance: f64,
}

/// A labelled series of (x, y) points produced by one analysis routine.
///
/// Traces carry no styling; the chart layer decides how a trace is drawn.
/// Non-finite values are passed through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Legend label, e.g. `"cycle 50"` or `"cell A"`.
    pub label: String,
    /// The (x, y) points in emission order.
    pub points: Vec<(f64, f64)>,
}

impl Trace {
    /// Create an empty trace with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
        }
    }

    /// Create a trace from two parallel coordinate slices.
    ///
    /// The slices must have equal length.
    pub fn from_xy(label: impl Into<String>, xs: &[f64], ys: &[f64]) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        Self {
            label: label.into(),
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        }
    }

    /// Number of points in the trace.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trace holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
