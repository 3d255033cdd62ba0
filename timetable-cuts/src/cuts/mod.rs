//! Cut separation for the timetabling formulation.
//!
//! This module provides one separator per cut family, all driven by a
//! per-round relaxation snapshot:
//! - objective integrality (rounded bounds)
//! - clique cuts from the pre-generated clique pool, deduplicated
//! - minimum working days per course and day
//! - curriculum lecture totals
//! - isolated-lecture patterns per curriculum and day
//! - triangles of the conflict graph

mod clique;
mod curriculum;
mod manager;
mod min_days;
mod objective;
mod pattern;
mod pool;
mod static_cuts;

pub use clique::{CliqueSeparator, TriangleSeparator};
pub use curriculum::CurriculumSeparator;
pub use manager::{CutManager, SeparationRound, SeparationStats};
pub use min_days::MinDaysSeparator;
pub use objective::ObjectiveSeparator;
pub use pattern::PatternSeparator;
pub use pool::{CliqueCutId, CliqueCutPool};
pub use static_cuts::static_cuts;

use crate::graph::CliquePool;
use crate::host::{CutFamily, LinearCut, RelaxationHost, Variable};
use crate::model::{Instance, RelaxationSnapshot};
use crate::patterns::Pattern;
use crate::settings::SeparationSettings;

/// Everything a separator may look at during one round.
pub struct SeparationContext<'a> {
    pub instance: &'a Instance,
    pub snapshot: &'a RelaxationSnapshot,
    pub settings: &'a SeparationSettings,
    pub cliques: &'a CliquePool,
    pub clique_cuts: &'a CliqueCutPool,
    pub patterns: &'a [Pattern],
}

/// One cut family's separation routine.
pub trait Separator: Send + Sync {
    fn family(&self) -> CutFamily;

    /// Cuts violated by the snapshot. Items whose violation cannot be
    /// determined this round are skipped.
    fn separate(&self, ctx: &SeparationContext<'_>, host: &dyn RelaxationHost) -> Vec<LinearCut>;
}

/// Append `coef * x[period][room][course]` for every room.
fn push_room_terms(
    instance: &Instance,
    period: usize,
    course: usize,
    coef: f64,
    terms: &mut Vec<(Variable, f64)>,
) {
    terms.extend((0..instance.room_count()).map(|room| {
        (
            Variable::Assignment {
                period,
                room,
                course,
            },
            coef,
        )
    }));
}
