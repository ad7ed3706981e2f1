//! Error types for powertrace

use std::fmt;

use thiserror::Error;

/// Which edge of the series a range fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Lower => write!(f, "lower"),
            Bound::Upper => write!(f, "upper"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// Construction or selection received nothing to work on.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The source lacks the positional time/voltage/current/power layout.
    #[error("expected at least 4 columns (time, voltage, current, power), found {found}")]
    MissingTimeColumn { found: usize },

    /// Every row's time value failed numeric coercion.
    #[error("time column contains no usable numeric values")]
    NonNumericTime,

    /// Range start does not precede its end.
    #[error("start time {start:.3}s must be earlier than end time {end:.3}s")]
    InvalidOrder { start: f64, end: f64 },

    /// Range edge lies outside the loaded series.
    #[error("time {value:.3}s falls outside the series {bound} bound of {limit:.3}s")]
    OutOfBounds { bound: Bound, value: f64, limit: f64 },

    /// Range is narrower than the series resolution supports.
    #[error("time range spans {span:.6}s, below the minimum span of {min_span:.6}s")]
    RangeTooSmall { span: f64, min_span: f64 },

    /// A nominally valid range selected zero rows (sparse sampling gap).
    #[error("no samples found in time range [{start:.3}s, {end:.3}s]")]
    EmptyResult { start: f64, end: f64 },

    /// Statistics requested over a table with zero rows.
    #[error("cannot compute statistics over an empty table")]
    EmptyTable,

    /// A result label failed validation; the reason is user-facing.
    #[error("invalid label: {0}")]
    LabelInvalid(String),

    /// An import document is missing or mangling a required field.
    #[error("schema error: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
