//! Isolated-lecture pattern database.
//!
//! A pattern is a day-long sequence of signs in {-1, +1}. Read against a
//! curriculum's day, +1 marks a period the pattern expects to be taught and
//! -1 one it expects to be free. Each pattern is scored with the number of
//! isolated lectures that a day matching it exactly would contain:
//!
//! - the day opens with a taught period followed by a free one,
//! - the day closes with a free period followed by a taught one,
//! - every free/taught/free triple inside the day.
//!
//! With `y_p` the lectures of the curriculum in period `p` of the day and
//! `z` its isolated-lecture variable, every pattern with a positive penalty
//! gives the valid inequality
//!
//! ```text
//! penalty * (1 - rhs + sum_p coef_p * y_p) <= z
//! ```
//!
//! where `rhs` is the number of +1 entries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{CutError, CutResult};

/// Shortest day the structural checks are defined for.
pub const MIN_DAY_LENGTH: usize = 3;

/// Longest day enumerated (2^20 patterns).
pub const MAX_DAY_LENGTH: usize = 20;

/// A scored sign sequence.
///
/// `penalty` and `rhs` are always derived from `coefs`; there is no way to
/// build a pattern with values that disagree with recomputation. This
/// includes deserialization, which rescores `coefs` and rejects stored
/// values that differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredPattern")]
pub struct Pattern {
    coefs: Vec<i8>,
    penalty: u32,
    rhs: i32,
}

impl Pattern {
    /// Score a sign sequence.
    pub fn new(coefs: Vec<i8>) -> CutResult<Self> {
        check_day_length(coefs.len())?;
        if let Some(bad) = coefs.iter().find(|&&c| c != -1 && c != 1) {
            return Err(CutError::InvalidPattern(format!(
                "entry {} in {:?}",
                bad, coefs
            )));
        }
        let penalty = penalty_of(&coefs);
        let rhs = rhs_of(&coefs);
        Ok(Self {
            coefs,
            penalty,
            rhs,
        })
    }

    pub fn coefs(&self) -> &[i8] {
        &self.coefs
    }

    /// Isolated lectures implied by a day matching the pattern.
    pub fn penalty(&self) -> u32 {
        self.penalty
    }

    /// Number of +1 entries.
    pub fn rhs(&self) -> i32 {
        self.rhs
    }

    /// True when the pattern yields a cut.
    pub fn is_cut(&self) -> bool {
        self.penalty > 0
    }

    /// Cut left-hand side for a fractional day, `y` being the curriculum's
    /// lectures per period of the day.
    pub fn lhs(&self, y: impl IntoIterator<Item = f64>) -> f64 {
        let sum: f64 = self
            .coefs
            .iter()
            .zip(y)
            .map(|(&coef, y)| coef as f64 * y)
            .sum();
        self.penalty as f64 * (1.0 - self.rhs as f64 + sum)
    }

    /// Cut left-hand side when the day is taught exactly where `scenario`
    /// has +1.
    pub fn lhs_for_scenario(&self, scenario: &[i8]) -> i64 {
        let sum: i64 = self
            .coefs
            .iter()
            .zip(scenario)
            .filter(|(_, &s)| s > 0)
            .map(|(&coef, _)| coef as i64)
            .sum();
        self.penalty as i64 * (1 - self.rhs as i64 + sum)
    }
}

#[derive(Deserialize)]
struct StoredPattern {
    coefs: Vec<i8>,
    #[serde(default)]
    penalty: Option<u32>,
    #[serde(default)]
    rhs: Option<i32>,
}

impl TryFrom<StoredPattern> for Pattern {
    type Error = CutError;

    fn try_from(stored: StoredPattern) -> CutResult<Self> {
        let pattern = Pattern::new(stored.coefs)?;
        if stored.penalty.is_some_and(|p| p != pattern.penalty)
            || stored.rhs.is_some_and(|r| r != pattern.rhs)
        {
            return Err(CutError::InvalidPattern(format!(
                "{:?} scores penalty {} and rhs {}, stored {:?} and {:?}",
                pattern.coefs, pattern.penalty, pattern.rhs, stored.penalty, stored.rhs
            )));
        }
        Ok(pattern)
    }
}

fn check_day_length(periods_per_day: usize) -> CutResult<()> {
    if periods_per_day < MIN_DAY_LENGTH {
        return Err(CutError::DayTooShort { periods_per_day });
    }
    if periods_per_day > MAX_DAY_LENGTH {
        return Err(CutError::DayTooLong {
            periods_per_day,
            max: MAX_DAY_LENGTH,
        });
    }
    Ok(())
}

/// Structural isolated-lecture count. Needs at least three entries.
fn penalty_of(coefs: &[i8]) -> u32 {
    let last = coefs.len() - 1;
    let mut penalty = 0;
    if coefs[0] == 1 && coefs[1] == -1 {
        penalty += 1;
    }
    if coefs[last] == 1 && coefs[last - 1] == -1 {
        penalty += 1;
    }
    penalty += coefs.windows(3).filter(|w| *w == [-1, 1, -1]).count() as u32;
    penalty
}

fn rhs_of(coefs: &[i8]) -> i32 {
    coefs.iter().filter(|&&c| c > 0).count() as i32
}

/// Two-way branching over the remaining positions. `rhs` starts at -1 and
/// counts the +1 branches taken.
fn enumerate(to_add: usize, rhs: i32, prefix: &mut Vec<i8>, out: &mut Vec<Pattern>) {
    if to_add > 0 {
        prefix.push(-1);
        enumerate(to_add - 1, rhs, prefix, out);
        prefix.pop();
        prefix.push(1);
        enumerate(to_add - 1, rhs + 1, prefix, out);
        prefix.pop();
        return;
    }

    out.push(Pattern {
        coefs: prefix.clone(),
        penalty: penalty_of(prefix),
        rhs: rhs + 1,
    });
}

/// Every sign sequence of a day, zero-penalty ones included.
///
/// Sequences come in lexicographic order with -1 before +1.
pub fn generate_all(periods_per_day: usize) -> CutResult<Vec<Pattern>> {
    check_day_length(periods_per_day)?;
    let mut out = Vec::with_capacity(1 << periods_per_day);
    let mut prefix = Vec::with_capacity(periods_per_day);
    enumerate(periods_per_day, -1, &mut prefix, &mut out);
    Ok(out)
}

/// Sign sequences of a day that yield cuts (penalty > 0).
pub fn generate_cuts(periods_per_day: usize) -> CutResult<Vec<Pattern>> {
    let mut patterns = generate_all(periods_per_day)?;
    patterns.retain(Pattern::is_cut);
    Ok(patterns)
}

type PatternCache = Mutex<HashMap<usize, Arc<[Pattern]>>>;

fn cache() -> &'static PatternCache {
    static CACHE: OnceLock<PatternCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Cut patterns of a day length, enumerated once per process and shared.
pub fn cut_patterns(periods_per_day: usize) -> CutResult<Arc<[Pattern]>> {
    let mut cache = cache().lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(patterns) = cache.get(&periods_per_day) {
        return Ok(Arc::clone(patterns));
    }

    log::info!("Enumerating isolated-lecture patterns for {} periods per day", periods_per_day);
    let patterns: Arc<[Pattern]> = generate_cuts(periods_per_day)?.into();
    log::info!("Pattern database holds {} cut patterns", patterns.len());
    cache.insert(periods_per_day, Arc::clone(&patterns));
    Ok(patterns)
}
