//! Core domain layer for the cell performance analyzer.
//!
//! Holds the cycling-record model, the stateless numerical routines shared by
//! the analysis passes, the error taxonomy, CLI settings, and output
//! formatting helpers. This crate performs no file or chart I/O beyond
//! settings persistence.

pub mod calculations;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
