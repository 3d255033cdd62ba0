//! Curriculum lecture-count cuts.

use super::{push_room_terms, SeparationContext, Separator};
use crate::host::{CutFamily, CutSense, CutSource, LinearCut, RelaxationHost};
use crate::model::Instance;

/// All lectures of a curriculum's courses are held:
/// `sum over members, periods and rooms of x[p][r][c] == required`.
pub(crate) fn curriculum_cut(instance: &Instance, curriculum: usize) -> LinearCut {
    let members = &instance.curriculum(curriculum).courses;
    let mut terms =
        Vec::with_capacity(members.len() * instance.period_count() * instance.room_count());
    for &course in members {
        for period in 0..instance.period_count() {
            push_room_terms(instance, period, course, 1.0, &mut terms);
        }
    }
    LinearCut::new(
        terms,
        CutSense::Equal,
        instance.curriculum_lectures(curriculum) as f64,
        CutSource::CurriculumSum { curriculum },
    )
}

/// Compares every curriculum's assigned lectures with its requirement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurriculumSeparator;

impl Separator for CurriculumSeparator {
    fn family(&self) -> CutFamily {
        CutFamily::Curriculum
    }

    fn separate(&self, ctx: &SeparationContext<'_>, _host: &dyn RelaxationHost) -> Vec<LinearCut> {
        let tol = ctx.settings.violation_tol;
        let mut cuts = Vec::new();

        for curriculum in 0..ctx.instance.curriculum_count() {
            let has: f64 = ctx
                .instance
                .curriculum(curriculum)
                .courses
                .iter()
                .map(|&c| ctx.snapshot.course_total(c))
                .sum();
            let should_have = ctx.instance.curriculum_lectures(curriculum) as f64;

            if (should_have - has).abs() > tol {
                cuts.push(curriculum_cut(ctx.instance, curriculum));
            }
        }
        cuts
    }
}
