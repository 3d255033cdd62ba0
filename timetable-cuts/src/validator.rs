//! Offline soundness check of the isolated-lecture pattern cuts.
//!
//! Every cut pattern is evaluated against every day schedule of the same
//! length. A cut is sound when no schedule drives its left-hand side above
//! the pattern's penalty.

use serde::{Deserialize, Serialize};

use crate::error::{CutError, CutResult};
use crate::patterns::generate_all;

/// Result of checking one cut pattern against all schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCheck {
    pub coefs: Vec<i8>,
    pub penalty: u32,
    pub rhs: i32,

    /// Largest left-hand side over all schedules.
    pub max_lhs: i64,

    /// Schedules reaching `max_lhs`.
    pub attaining: Vec<Vec<i8>>,

    /// Schedules with a left-hand side above the penalty.
    pub exceeding: Vec<Vec<i8>>,
}

impl PatternCheck {
    pub fn is_sound(&self) -> bool {
        self.exceeding.is_empty() && self.max_lhs == self.penalty as i64
    }
}

/// Checks of every cut pattern of one day length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub day_length: usize,
    pub checks: Vec<PatternCheck>,
}

impl ValidationReport {
    pub fn is_sound(&self) -> bool {
        self.checks.iter().all(PatternCheck::is_sound)
    }

    /// Checks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &PatternCheck> {
        self.checks.iter().filter(|c| !c.is_sound())
    }

    /// Turn the first failure into an error.
    pub fn ensure_sound(&self) -> CutResult<()> {
        match self.failures().next() {
            Some(check) => Err(CutError::Unsound {
                coefs: check.coefs.clone(),
                penalty: check.penalty,
                max_lhs: check.max_lhs,
            }),
            None => Ok(()),
        }
    }
}

/// Check every cut pattern of `day_length` against every schedule.
///
/// Day lengths below three are rejected with `CutError::DayTooShort`.
pub fn validate_patterns(day_length: usize) -> CutResult<ValidationReport> {
    let all = generate_all(day_length)?;
    let mut checks = Vec::new();

    for pattern in all.iter().filter(|p| p.is_cut()) {
        let mut max_lhs = i64::MIN;
        let mut attaining = Vec::new();
        let mut exceeding = Vec::new();

        for scenario in &all {
            let lhs = pattern.lhs_for_scenario(scenario.coefs());
            if lhs > pattern.penalty() as i64 {
                exceeding.push(scenario.coefs().to_vec());
            }
            if lhs > max_lhs {
                max_lhs = lhs;
                attaining.clear();
            }
            if lhs == max_lhs {
                attaining.push(scenario.coefs().to_vec());
            }
        }

        log::debug!(
            "{:?}: penalty {} rhs {} max lhs {} ({} schedules)",
            pattern.coefs(),
            pattern.penalty(),
            pattern.rhs(),
            max_lhs,
            attaining.len()
        );

        checks.push(PatternCheck {
            coefs: pattern.coefs().to_vec(),
            penalty: pattern.penalty(),
            rhs: pattern.rhs(),
            max_lhs,
            attaining,
            exceeding,
        });
    }

    let report = ValidationReport { day_length, checks };
    let failed = report.failures().count();
    if failed == 0 {
        log::info!(
            "All {} cut patterns of length {} are sound",
            report.checks.len(),
            day_length
        );
    } else {
        log::warn!(
            "{} of {} cut patterns of length {} are unsound",
            failed,
            report.checks.len(),
            day_length
        );
    }
    Ok(report)
}
