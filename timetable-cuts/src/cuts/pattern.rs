//! Isolated-lecture pattern cuts.
//!
//! For a proper curriculum `u`, a day `d` and a cut pattern:
//!
//! ```text
//! penalty * (1 - rhs + sum_slot coef[slot] * sum_{c in u, r} x[p(d, slot)][r][c]) <= z[u][d]
//! ```
//!
//! submitted as
//!
//! ```text
//! sum penalty * coef[slot] * x[p][r][c] - z[u][d] <= penalty * (rhs - 1)
//! ```

use super::{push_room_terms, SeparationContext, Separator};
use crate::host::{CutFamily, CutSense, CutSource, LinearCut, RelaxationHost, Variable};
use crate::model::Instance;
use crate::patterns::Pattern;

pub(crate) fn pattern_cut(
    instance: &Instance,
    curriculum: usize,
    day: usize,
    index: usize,
    pattern: &Pattern,
) -> LinearCut {
    let members = &instance.curriculum(curriculum).courses;
    let penalty = pattern.penalty() as f64;
    let mut terms = Vec::with_capacity(
        members.len() * instance.periods_per_day() * instance.room_count() + 1,
    );
    for &course in members {
        for (period, &coef) in instance.day_periods(day).zip(pattern.coefs()) {
            push_room_terms(instance, period, course, penalty * coef as f64, &mut terms);
        }
    }
    terms.push((Variable::IsolatedLectures { curriculum, day }, -1.0));

    LinearCut::new(
        terms,
        CutSense::LessEqual,
        penalty * (pattern.rhs() as f64 - 1.0),
        CutSource::Pattern {
            curriculum,
            day,
            pattern: index,
        },
    )
}

/// Checks every cut pattern against every proper curriculum and day.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternSeparator;

impl Separator for PatternSeparator {
    fn family(&self) -> CutFamily {
        CutFamily::Pattern
    }

    fn separate(&self, ctx: &SeparationContext<'_>, host: &dyn RelaxationHost) -> Vec<LinearCut> {
        let tol = ctx.settings.violation_tol;
        let mut cuts = Vec::new();

        for (curriculum, u) in ctx.instance.proper_curricula().iter().enumerate() {
            for day in 0..ctx.instance.day_count() {
                let Some(isolated) = host.isolated_lectures_value(curriculum, day) else {
                    log::warn!(
                        "Isolated-lecture variable of curriculum {} on day {} presolved away, skipping",
                        u.name,
                        day
                    );
                    continue;
                };

                let y: Vec<f64> = ctx
                    .instance
                    .day_periods(day)
                    .map(|p| ctx.snapshot.group_sum(&u.courses, p))
                    .collect();

                for (index, pattern) in ctx.patterns.iter().enumerate() {
                    if pattern.lhs(y.iter().copied()) - isolated > tol {
                        cuts.push(pattern_cut(ctx.instance, curriculum, day, index, pattern));
                    }
                }
            }
        }
        cuts
    }
}
