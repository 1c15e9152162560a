//! Error types for the invoice engine.
//!
//! Business-rule violations are data, not errors: they accumulate in a
//! [`ValidationErrors`] map returned to the caller for display. `EngineError`
//! is reserved for transport-level failures in the CSV harness.

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while loading feeds or writing results.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file arguments
    #[error("Missing input files. Usage: invoice-engine <catalog.csv> <order.csv>")]
    MissingArgument,
}

/// Field-keyed validation errors.
///
/// Keys name the offending form field (`items`, `payment[2].amount`,
/// `payments`); values are the user-facing message. Backed by a `BTreeMap`
/// so iteration order, and therefore rendered output, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// Creates an empty error map.
    pub fn new() -> Self {
        ValidationErrors(BTreeMap::new())
    }

    /// Records an error for a field, replacing any earlier message.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Returns the message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns `true` if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
