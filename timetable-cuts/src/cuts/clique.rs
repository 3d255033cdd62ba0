//! Clique and triangle cuts.
//!
//! Pairwise conflicting courses share each period at most once:
//! `sum over rooms and members of x[p][r][c] <= 1`.

use super::pool::CliqueCutId;
use super::{push_room_terms, SeparationContext, Separator};
use crate::host::{CutFamily, CutSense, CutSource, LinearCut, RelaxationHost};
use crate::model::Instance;

fn group_cut(instance: &Instance, period: usize, courses: &[usize], source: CutSource) -> LinearCut {
    let mut terms = Vec::with_capacity(courses.len() * instance.room_count());
    for &c in courses {
        push_room_terms(instance, period, c, 1.0, &mut terms);
    }
    LinearCut::new(terms, CutSense::LessEqual, 1.0, source)
}

/// Checks every pooled clique in every period.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliqueSeparator;

impl Separator for CliqueSeparator {
    fn family(&self) -> CutFamily {
        CutFamily::Clique
    }

    fn separate(&self, ctx: &SeparationContext<'_>, _host: &dyn RelaxationHost) -> Vec<LinearCut> {
        let limit = 1.0 + ctx.settings.clique_violation_tol;
        let mut cuts = Vec::new();

        for period in 0..ctx.instance.period_count() {
            for (clique, members) in ctx.cliques.iter() {
                if ctx.snapshot.group_sum(members, period) <= limit {
                    continue;
                }
                if !ctx.clique_cuts.register(CliqueCutId { period, clique }) {
                    continue;
                }
                cuts.push(group_cut(
                    ctx.instance,
                    period,
                    members,
                    CutSource::Clique { period, clique },
                ));
            }
        }

        if !cuts.is_empty() {
            log::debug!(
                "{} clique cut(s) from {} pre-generated cliques",
                cuts.len(),
                ctx.cliques.len()
            );
        }
        cuts
    }
}

/// Checks every triangle of the conflict graph in every period.
#[derive(Debug, Clone, Default)]
pub struct TriangleSeparator {
    triangles: Vec<[usize; 3]>,
}

impl TriangleSeparator {
    pub fn new(triangles: Vec<[usize; 3]>) -> Self {
        Self { triangles }
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }
}

impl Separator for TriangleSeparator {
    fn family(&self) -> CutFamily {
        CutFamily::Triangle
    }

    fn separate(&self, ctx: &SeparationContext<'_>, _host: &dyn RelaxationHost) -> Vec<LinearCut> {
        let limit = 1.0 + ctx.settings.triangle_violation_tol;
        let mut cuts = Vec::new();

        for triangle in &self.triangles {
            for period in 0..ctx.instance.period_count() {
                if ctx.snapshot.group_sum(triangle, period) <= limit {
                    continue;
                }
                cuts.push(group_cut(
                    ctx.instance,
                    period,
                    triangle,
                    CutSource::Triangle {
                        period,
                        courses: *triangle,
                    },
                ));
            }
        }
        cuts
    }
}
