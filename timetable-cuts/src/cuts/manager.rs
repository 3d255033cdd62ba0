//! Separation round controller.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{
    CliqueCutId, CliqueCutPool, CliqueSeparator, CurriculumSeparator, MinDaysSeparator, ObjectiveSeparator,
    PatternSeparator, SeparationContext, Separator, TriangleSeparator,
};
use crate::error::CutResult;
use crate::graph::{build_clique_pool, CliquePool, ConflictGraph};
use crate::host::{CutFamily, CutSource, LinearCut, RelaxationHost};
use crate::model::{Instance, RelaxationSnapshot};
use crate::patterns::{cut_patterns, Pattern};
use crate::settings::SeparationSettings;

/// Runs the enabled separators against a host, one round per call.
///
/// Holds the per-instance structures built once (conflict graph, clique
/// pool, pattern set) and the state shared by every round: the clique cut
/// identities already submitted and the counters. `separate` takes `&self`,
/// so one manager can serve several host workers through an `Arc`.
pub struct CutManager {
    instance: Arc<Instance>,

    /// Conflict graph over courses.
    graph: ConflictGraph,

    /// Pre-generated cliques (empty when clique cuts are disabled).
    cliques: CliquePool,

    /// Cut patterns for the instance's day length.
    patterns: Arc<[Pattern]>,

    /// Enabled separators, in run order.
    separators: Vec<Box<dyn Separator>>,

    /// Clique cut identities already submitted.
    clique_cuts: CliqueCutPool,

    settings: SeparationSettings,

    /// Completed rounds.
    rounds: AtomicU64,

    /// Cuts accepted by the host.
    total_cuts: AtomicU64,
}

impl CutManager {
    /// Build the per-instance structures for the enabled families.
    pub fn new(instance: impl Into<Arc<Instance>>, settings: SeparationSettings) -> CutResult<Self> {
        let instance = instance.into();
        let families = settings.families;

        let graph = ConflictGraph::build(&instance)?;

        let cliques = if families.clique {
            build_clique_pool(&graph, settings.clique_strategy)
        } else {
            CliquePool::new()
        };

        let patterns: Arc<[Pattern]> = if families.patterns {
            cut_patterns(instance.periods_per_day())?
        } else {
            Arc::from(Vec::new())
        };

        let mut separators: Vec<Box<dyn Separator>> = Vec::new();
        if families.objective {
            separators.push(Box::new(ObjectiveSeparator));
        }
        if families.clique {
            separators.push(Box::new(CliqueSeparator));
        }
        if families.min_days {
            separators.push(Box::new(MinDaysSeparator));
        }
        if families.curriculum {
            separators.push(Box::new(CurriculumSeparator));
        }
        if families.patterns {
            separators.push(Box::new(PatternSeparator));
        }
        if families.triangles {
            separators.push(Box::new(TriangleSeparator::new(graph.triangles())));
        }

        log::info!(
            "Cut manager for {}: {} separators, {} cliques, {} patterns",
            instance.name(),
            separators.len(),
            cliques.len(),
            patterns.len()
        );

        Ok(Self {
            instance,
            graph,
            cliques,
            patterns,
            separators,
            clique_cuts: CliqueCutPool::new(),
            settings,
            rounds: AtomicU64::new(0),
            total_cuts: AtomicU64::new(0),
        })
    }

    /// Run one separation round against the host's current relaxation.
    ///
    /// Every violated cut is submitted through `RelaxationHost::add_cut`.
    /// A rejected submission ends the round with the host's error; cuts
    /// submitted before it stay counted, and the clique cut identities of
    /// the rejected cut and of the rest of its batch are released so a later
    /// round can submit them.
    pub fn separate(&self, host: &mut dyn RelaxationHost) -> CutResult<SeparationRound> {
        let snapshot = RelaxationSnapshot::capture(&self.instance, &*host);
        let ctx = SeparationContext {
            instance: &self.instance,
            snapshot: &snapshot,
            settings: &self.settings,
            cliques: &self.cliques,
            clique_cuts: &self.clique_cuts,
            patterns: &self.patterns,
        };

        let mut cuts = Vec::new();
        let mut counts = BTreeMap::new();

        for separator in &self.separators {
            let found = separator.separate(&ctx, &*host);
            for (i, cut) in found.iter().enumerate() {
                if let Err(err) = host.add_cut(cut) {
                    self.release_unsubmitted(&found[i..]);
                    return Err(err);
                }
                self.total_cuts.fetch_add(1, Ordering::Relaxed);
            }
            counts.insert(separator.family(), found.len());
            cuts.extend(found);
        }

        let round = self.rounds.fetch_add(1, Ordering::Relaxed) + 1;
        let cutoff_reached = self.cutoff_reached(host.best_global_objective());

        if cutoff_reached {
            log::info!(
                "Round {}: rounded bound {} reaches cutoff",
                round,
                host.best_global_objective().ceil()
            );
        }
        self.log_progress(round, cuts.len(), &*host);

        Ok(SeparationRound {
            round,
            cuts,
            counts,
            cutoff_reached,
        })
    }

    fn release_unsubmitted(&self, cuts: &[LinearCut]) {
        for cut in cuts {
            if let CutSource::Clique { period, clique } = cut.source {
                self.clique_cuts.release(CliqueCutId { period, clique });
            }
        }
    }

    /// The bound's fractional part exceeds the tolerance and its ceiling
    /// reaches the cutoff.
    fn cutoff_reached(&self, global: f64) -> bool {
        match self.settings.cutoff {
            Some(cutoff) => {
                global - global.floor() > self.settings.integrality_tol && global.ceil() >= cutoff
            }
            None => false,
        }
    }

    fn log_progress(&self, round: u64, added: usize, host: &dyn RelaxationHost) {
        if !self.settings.verbose {
            return;
        }
        if round % self.settings.log_freq.max(1) != 0 {
            return;
        }

        let mut lb = host.best_global_objective();
        if lb < 1e-3 {
            lb = 0.0;
        }
        log::info!(
            "Round: {} | LB: {:.3} | Node: {:.3} | Added: {} | Cuts: {} | Clique ids: {}",
            round,
            lb,
            host.current_node_objective(),
            added,
            self.total_cuts.load(Ordering::Relaxed),
            self.clique_cuts.len(),
        );
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn graph(&self) -> &ConflictGraph {
        &self.graph
    }

    pub fn cliques(&self) -> &CliquePool {
        &self.cliques
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn settings(&self) -> &SeparationSettings {
        &self.settings
    }

    /// Clique cut identities registered so far.
    pub fn clique_cuts(&self) -> &CliqueCutPool {
        &self.clique_cuts
    }

    /// Families that run each round, in order.
    pub fn families(&self) -> Vec<CutFamily> {
        self.separators.iter().map(|s| s.family()).collect()
    }

    pub fn stats(&self) -> SeparationStats {
        SeparationStats {
            rounds: self.rounds.load(Ordering::Relaxed),
            total_cuts: self.total_cuts.load(Ordering::Relaxed),
            clique_cuts_registered: self.clique_cuts.len(),
        }
    }
}

/// Outcome of one separation round.
#[derive(Debug, Clone)]
pub struct SeparationRound {
    /// 1-based round number across the manager's lifetime.
    pub round: u64,

    /// Cuts submitted this round, in submission order.
    pub cuts: Vec<LinearCut>,

    /// Cuts per family, for every family that ran.
    pub counts: BTreeMap<CutFamily, usize>,

    /// The rounded global bound reached the configured cutoff.
    pub cutoff_reached: bool,
}

impl SeparationRound {
    pub fn added_any(&self) -> bool {
        !self.cuts.is_empty()
    }

    /// Cuts of one family (zero when the family did not run).
    pub fn count(&self, family: CutFamily) -> usize {
        self.counts.get(&family).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

/// Counters across all rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparationStats {
    pub rounds: u64,
    pub total_cuts: u64,
    pub clique_cuts_registered: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CutError;
    use crate::host::FixedRelaxation;
    use crate::model::{Course, InstanceBuilder, Room};
    use crate::settings::CutFamilies;

    fn two_day_instance(periods_per_day: usize) -> Instance {
        InstanceBuilder::new("small", 2, periods_per_day)
            .course(Course::new("a", "t1", 2, 2, 10))
            .course(Course::new("b", "t2", 2, 1, 10))
            .course(Course::new("c", "t3", 1, 1, 10))
            .room(Room::new("r0", 30))
            .curriculum("q", vec![0, 1, 2])
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_order_follows_families() {
        let manager = CutManager::new(two_day_instance(3), SeparationSettings::default()).unwrap();
        assert_eq!(manager.families(), CutFamily::ALL.to_vec());

        let settings = SeparationSettings::default().with_level(2);
        let manager = CutManager::new(two_day_instance(3), settings).unwrap();
        assert_eq!(manager.families(), vec![CutFamily::Objective, CutFamily::Clique]);
        assert!(manager.patterns().is_empty());
    }

    #[test]
    fn test_short_day_only_rejected_with_patterns() {
        let err = CutManager::new(two_day_instance(2), SeparationSettings::default());
        assert!(matches!(err, Err(CutError::DayTooShort { periods_per_day: 2 })));

        let settings = SeparationSettings::default().with_level(2);
        assert!(CutManager::new(two_day_instance(2), settings).is_ok());
    }

    #[test]
    fn test_integral_point_adds_nothing() {
        let instance = two_day_instance(3);
        let mut host = FixedRelaxation::new(&instance);
        // a: periods 0 and 3, b: periods 1 and 4, c: period 2
        host.set_assignment(0, 0, 0, 1.0);
        host.set_assignment(3, 0, 0, 1.0);
        host.set_assignment(1, 0, 1, 1.0);
        host.set_assignment(4, 0, 1, 1.0);
        host.set_assignment(2, 0, 2, 1.0);
        host.set_bounds(4.0, 4.0);

        let manager = CutManager::new(instance, SeparationSettings::default()).unwrap();
        let round = manager.separate(&mut host).unwrap();

        assert!(!round.added_any());
        assert_eq!(round.round, 1);
        assert_eq!(round.counts.len(), CutFamily::ALL.len());
        assert!(host.cuts().is_empty());
    }

    #[test]
    fn test_stats_accumulate() {
        let instance = two_day_instance(3);
        let mut host = FixedRelaxation::new(&instance);
        host.set_bounds(2.5, 2.5);

        let settings = SeparationSettings::default().with_families(CutFamilies {
            objective: true,
            ..CutFamilies::NONE
        });
        let manager = CutManager::new(instance, settings).unwrap();

        manager.separate(&mut host).unwrap();
        manager.separate(&mut host).unwrap();

        let stats = manager.stats();
        assert_eq!(stats.rounds, 2);
        assert_eq!(stats.total_cuts, 2);
        assert_eq!(stats.clique_cuts_registered, 0);
    }

    #[test]
    fn test_cutoff_flag() {
        let instance = two_day_instance(3);
        let mut host = FixedRelaxation::new(&instance);
        host.set_bounds(6.4, 6.4);

        let settings = SeparationSettings::default().with_level(1).with_cutoff(7.0);
        let manager = CutManager::new(instance, settings).unwrap();
        assert!(manager.separate(&mut host).unwrap().cutoff_reached);

        host.set_bounds(5.4, 5.4);
        assert!(!manager.separate(&mut host).unwrap().cutoff_reached);

        // no upper window: a bound just below the cutoff still rounds up to it
        host.set_bounds(6.995, 6.995);
        assert!(manager.separate(&mut host).unwrap().cutoff_reached);

        host.set_bounds(6.0, 6.0);
        assert!(!manager.separate(&mut host).unwrap().cutoff_reached);
    }
}
