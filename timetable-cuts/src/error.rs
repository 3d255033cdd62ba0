//! Error types for cut separation.

use thiserror::Error;

/// Errors that can occur while building or running cut separation.
#[derive(Error, Debug)]
pub enum CutError {
    /// Instance validation failed
    #[error("Invalid instance: {0}")]
    InvalidInstance(String),

    /// Pattern enumeration needs at least three periods per day
    #[error("Patterns need at least 3 periods per day, got {periods_per_day}")]
    DayTooShort {
        /// Requested day length.
        periods_per_day: usize,
    },

    /// Pattern enumeration would exceed the supported size
    #[error("Patterns support at most {max} periods per day, got {periods_per_day}")]
    DayTooLong {
        /// Requested day length.
        periods_per_day: usize,
        /// Largest supported day length.
        max: usize,
    },

    /// A pattern has entries other than -1 and +1
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// The host solver refused a cut
    #[error("Host rejected cut: {0}")]
    HostRejected(String),

    /// The pattern validator found a scenario above the stated bound
    #[error("Pattern cut {coefs:?} is unsound: lhs reaches {max_lhs}, penalty is {penalty}")]
    Unsound {
        /// Coefficients of the offending cut pattern.
        coefs: Vec<i8>,
        /// Penalty the cut claims as its bound.
        penalty: u32,
        /// Largest left-hand side observed.
        max_lhs: i64,
    },
}

/// Result type for cut separation operations.
pub type CutResult<T> = Result<T, CutError>;
