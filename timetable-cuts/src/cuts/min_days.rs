//! Minimum working days cuts.
//!
//! A course held on at least `min_working_days - w` days cannot put more
//! than `1 + lectures - min_working_days + w` lectures on one day, `w` being
//! its missing-days variable:
//!
//! ```text
//! sum over day periods and rooms of x[p][r][c] - w[c] <= 1 + lectures - min_working_days
//! ```

use super::{push_room_terms, SeparationContext, Separator};
use crate::host::{CutFamily, CutSense, CutSource, LinearCut, RelaxationHost, Variable};
use crate::model::Instance;

/// Constant part of the per-day lecture bound.
fn day_limit(instance: &Instance, course: usize) -> f64 {
    let c = instance.course(course);
    1.0 + c.lectures as f64 - c.min_working_days as f64
}

pub(crate) fn min_days_cut(instance: &Instance, course: usize, day: usize) -> LinearCut {
    let mut terms = Vec::with_capacity(instance.periods_per_day() * instance.room_count() + 1);
    for period in instance.day_periods(day) {
        push_room_terms(instance, period, course, 1.0, &mut terms);
    }
    terms.push((Variable::MinDayViolations { course }, -1.0));
    LinearCut::new(
        terms,
        CutSense::LessEqual,
        day_limit(instance, course),
        CutSource::MinDays { course, day },
    )
}

/// Checks every course on every day.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinDaysSeparator;

impl Separator for MinDaysSeparator {
    fn family(&self) -> CutFamily {
        CutFamily::MinDays
    }

    fn separate(&self, ctx: &SeparationContext<'_>, host: &dyn RelaxationHost) -> Vec<LinearCut> {
        let tol = ctx.settings.violation_tol;
        let mut cuts = Vec::new();

        for course in 0..ctx.instance.course_count() {
            let Some(missing) = host.min_day_violations_value(course) else {
                log::debug!("Missing-days variable of course {} presolved away", course);
                continue;
            };
            let limit = day_limit(ctx.instance, course) + missing;

            for day in 0..ctx.instance.day_count() {
                if ctx.snapshot.day_sum(course, day) > limit + tol {
                    cuts.push(min_days_cut(ctx.instance, course, day));
                }
            }
        }
        cuts
    }
}
