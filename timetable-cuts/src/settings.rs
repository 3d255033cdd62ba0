//! Configuration settings for cut separation.

/// Which separation routines run in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutFamilies {
    /// Objective integrality (global and local bound rounding).
    pub objective: bool,

    /// Clique cuts from the pre-generated clique pool.
    pub clique: bool,

    /// Minimum working days checks per course and day.
    pub min_days: bool,

    /// Curriculum lecture-count checks.
    pub curriculum: bool,

    /// Isolated-lecture pattern cuts.
    pub patterns: bool,

    /// Triangles of the conflict graph.
    pub triangles: bool,
}

impl CutFamilies {
    /// No family enabled.
    pub const NONE: Self = Self {
        objective: false,
        clique: false,
        min_days: false,
        curriculum: false,
        patterns: false,
        triangles: false,
    };

    /// Every family enabled.
    pub const ALL: Self = Self {
        objective: true,
        clique: true,
        min_days: true,
        curriculum: true,
        patterns: true,
        triangles: true,
    };

    /// Families enabled at a given cut level.
    ///
    /// Levels grow from the cheapest, most targeted family to the broadest:
    /// 1 objective integrality, 2 cliques, 3 patterns, 4 minimum working
    /// days and curriculum sums, 5 triangles.
    pub fn from_level(level: u8) -> Self {
        Self {
            objective: level >= 1,
            clique: level >= 2,
            patterns: level >= 3,
            min_days: level >= 4,
            curriculum: level >= 4,
            triangles: level >= 5,
        }
    }

    /// True when no family is enabled.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl Default for CutFamilies {
    fn default() -> Self {
        Self::from_level(5)
    }
}

/// How the clique pool is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliqueStrategy {
    /// Enumerate every maximal clique.
    Exact,

    /// One greedy clique per well-connected vertex.
    Greedy,

    /// Exact up to a vertex count, greedy above it.
    Auto {
        /// Largest conflict graph handed to exact enumeration.
        max_exact_vertices: usize,
    },
}

impl Default for CliqueStrategy {
    fn default() -> Self {
        CliqueStrategy::Auto {
            max_exact_vertices: 200,
        }
    }
}

/// Cut separation settings.
#[derive(Debug, Clone)]
pub struct SeparationSettings {
    // === Families ===
    /// Separation routines to run each round.
    pub families: CutFamilies,

    /// Clique pool construction.
    pub clique_strategy: CliqueStrategy,

    // === Tolerances ===
    /// Minimum violation for min-days, curriculum and pattern cuts.
    pub violation_tol: f64,

    /// A clique sum must exceed `1 + clique_violation_tol`.
    pub clique_violation_tol: f64,

    /// A triangle sum must exceed `1 + triangle_violation_tol`.
    pub triangle_violation_tol: f64,

    /// Fractional-part window for objective integrality.
    /// Also the minimum gap between local and global bound for a local cut.
    pub integrality_tol: f64,

    // === Termination hint ===
    /// Value of a known solution. Rounds report when the rounded bound reaches it.
    pub cutoff: Option<f64>,

    // === Output ===
    /// Log progress information.
    pub verbose: bool,

    /// Log frequency (every N rounds).
    pub log_freq: u64,
}

impl Default for SeparationSettings {
    fn default() -> Self {
        Self {
            families: CutFamilies::default(),
            clique_strategy: CliqueStrategy::default(),

            violation_tol: 1e-3,
            clique_violation_tol: 0.0,
            triangle_violation_tol: 1e-2,
            integrality_tol: 1e-2,

            cutoff: None,

            verbose: false,
            log_freq: 1,
        }
    }
}

impl SeparationSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        let mut s = Self::default();
        s.verbose = true;
        s.log_freq = 1;
        s
    }

    /// Enable the families of a cut level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.families = CutFamilies::from_level(level);
        self
    }

    /// Enable an explicit set of families.
    pub fn with_families(mut self, families: CutFamilies) -> Self {
        self.families = families;
        self
    }

    /// Set the clique pool strategy.
    pub fn with_clique_strategy(mut self, strategy: CliqueStrategy) -> Self {
        self.clique_strategy = strategy;
        self
    }

    /// Set a known solution value.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_nested() {
        assert!(CutFamilies::from_level(0).is_empty());

        let one = CutFamilies::from_level(1);
        assert!(one.objective && !one.clique && !one.patterns);

        let three = CutFamilies::from_level(3);
        assert!(three.objective && three.clique && three.patterns);
        assert!(!three.min_days && !three.curriculum);

        let four = CutFamilies::from_level(4);
        assert!(four.min_days && four.curriculum && !four.triangles);

        assert_eq!(CutFamilies::from_level(5), CutFamilies::ALL);
        assert_eq!(CutFamilies::from_level(9), CutFamilies::ALL);
    }

    #[test]
    fn test_builder() {
        let s = SeparationSettings::default()
            .with_level(2)
            .with_clique_strategy(CliqueStrategy::Greedy)
            .with_cutoff(42.0);
        assert!(s.families.clique);
        assert!(!s.families.patterns);
        assert_eq!(s.clique_strategy, CliqueStrategy::Greedy);
        assert_eq!(s.cutoff, Some(42.0));
    }
}
