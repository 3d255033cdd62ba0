//! Cut families stated up front, without a relaxation.

use super::curriculum::curriculum_cut;
use super::min_days::min_days_cut;
use super::pattern::pattern_cut;
use crate::error::CutResult;
use crate::host::LinearCut;
use crate::model::Instance;
use crate::patterns::cut_patterns;
use crate::settings::CutFamilies;

/// Every pattern, minimum-working-days and curriculum-sum cut of the
/// instance, for the families enabled in `families`. Relaxation-driven
/// families (objective, clique, triangle) are ignored.
///
/// Pattern cuts come first (curriculum, then day, then pattern), then
/// minimum-working-days cuts (course, then day), then curriculum sums.
pub fn static_cuts(instance: &Instance, families: CutFamilies) -> CutResult<Vec<LinearCut>> {
    let mut cuts = Vec::new();

    if families.patterns {
        let patterns = cut_patterns(instance.periods_per_day())?;
        for curriculum in 0..instance.proper_curriculum_count() {
            for day in 0..instance.day_count() {
                for (index, pattern) in patterns.iter().enumerate() {
                    cuts.push(pattern_cut(instance, curriculum, day, index, pattern));
                }
            }
        }
    }

    if families.min_days {
        for course in 0..instance.course_count() {
            for day in 0..instance.day_count() {
                cuts.push(min_days_cut(instance, course, day));
            }
        }
    }

    if families.curriculum {
        for curriculum in 0..instance.curriculum_count() {
            cuts.push(curriculum_cut(instance, curriculum));
        }
    }

    log::info!("{} static cuts for {}", cuts.len(), instance.name());
    Ok(cuts)
}
