//! Chart rendering layer for the cell performance analyzer.
//!
//! The analyses emit plain traces; this crate owns how they are drawn. The
//! [`ChartSink`] trait is the only surface the rest of the workspace sees,
//! so the numerical routines stay testable without a drawing backend.

pub mod plotters_sink;
pub mod sink;

pub use plotters_sink::PlottersSink;
pub use sink::{ChartSink, FigureSpec, RecordingSink, SeriesSpec, SeriesStyle};

pub use cell_core as core;
