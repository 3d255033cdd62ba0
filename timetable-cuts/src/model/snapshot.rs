//! Per-round aggregate of the host relaxation.

use crate::host::RelaxationHost;
use crate::model::Instance;

/// Assignment values summed over rooms, per course and period.
///
/// Rebuilt from the host at the start of every separation round and dropped
/// when the round ends.
#[derive(Debug, Clone)]
pub struct RelaxationSnapshot {
    periods: usize,
    periods_per_day: usize,

    /// Values indexed `course * periods + period`.
    values: Vec<f64>,
}

impl RelaxationSnapshot {
    /// Read the current relaxation, O(courses * periods * rooms).
    pub fn capture(instance: &Instance, host: &dyn RelaxationHost) -> Self {
        let periods = instance.period_count();
        let rooms = instance.room_count();
        let mut values = Vec::with_capacity(instance.course_count() * periods);
        for c in 0..instance.course_count() {
            for p in 0..periods {
                values.push((0..rooms).map(|r| host.assignment_value(p, r, c)).sum());
            }
        }
        Self {
            periods,
            periods_per_day: instance.periods_per_day(),
            values,
        }
    }

    /// Build from precomputed sums, one row of `periods` values per course.
    pub fn from_rows(rows: Vec<Vec<f64>>, periods_per_day: usize) -> Self {
        let periods = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == periods));
        Self {
            periods,
            periods_per_day,
            values: rows.into_iter().flatten().collect(),
        }
    }

    /// Sum over rooms for a course in a period.
    pub fn get(&self, course: usize, period: usize) -> f64 {
        self.values[course * self.periods + period]
    }

    /// Sum over a course's periods on one day.
    pub fn day_sum(&self, course: usize, day: usize) -> f64 {
        let start = course * self.periods + day * self.periods_per_day;
        self.values[start..start + self.periods_per_day].iter().sum()
    }

    /// Sum over all periods of a course.
    pub fn course_total(&self, course: usize) -> f64 {
        let start = course * self.periods;
        self.values[start..start + self.periods].iter().sum()
    }

    /// Sum over a set of courses in a period.
    pub fn group_sum(&self, courses: &[usize], period: usize) -> f64 {
        courses.iter().map(|&c| self.get(c, period)).sum()
    }
}
