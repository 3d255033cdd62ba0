//! Clique pool construction.
//!
//! Two strategies fill the same pool: exact enumeration of maximal cliques
//! through a pluggable oracle, and a greedy heuristic that grows one large
//! clique around each well-connected vertex.

use std::collections::BTreeSet;

use super::conflict::ConflictGraph;
use crate::settings::CliqueStrategy;

/// Pre-generated cliques consumed by clique separation.
///
/// A clique's index in the pool is part of its cut identity, so cliques are
/// only ever appended.
#[derive(Debug, Clone, Default)]
pub struct CliquePool {
    cliques: Vec<Vec<usize>>,
}

impl CliquePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clique: Vec<usize>) {
        self.cliques.push(clique);
    }

    pub fn len(&self) -> usize {
        self.cliques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cliques.is_empty()
    }

    pub fn get(&self, index: usize) -> &[usize] {
        &self.cliques[index]
    }

    /// Cliques with their pool indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.cliques.iter().map(Vec::as_slice).enumerate()
    }
}

/// Something that produces a clique pool from a conflict graph.
pub trait CliqueGenerator {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    fn generate(&self, graph: &ConflictGraph) -> CliquePool;
}

/// Black-box maximal clique search.
///
/// Implementations call `visit` once per clique they report. Exact
/// algorithms report every maximal clique; approximate ones may report fewer.
pub trait MaximalCliqueOracle {
    fn for_each_maximal_clique(&self, graph: &ConflictGraph, visit: &mut dyn FnMut(&[usize]));
}

/// Bron-Kerbosch enumeration with Tomita pivoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct BronKerbosch;

impl BronKerbosch {
    fn expand(
        graph: &ConflictGraph,
        r: &mut Vec<usize>,
        mut p: BTreeSet<usize>,
        mut x: BTreeSet<usize>,
        visit: &mut dyn FnMut(&[usize]),
    ) {
        // Pivot on the vertex covering most of P
        let pivot = match p
            .iter()
            .chain(x.iter())
            .max_by_key(|&&u| graph.neighbors(u).intersection(&p).count())
        {
            Some(&u) => u,
            None => {
                visit(r);
                return;
            }
        };

        let candidates: Vec<usize> = p.difference(graph.neighbors(pivot)).copied().collect();
        for v in candidates {
            let nv = graph.neighbors(v);
            r.push(v);
            Self::expand(
                graph,
                r,
                p.intersection(nv).copied().collect(),
                x.intersection(nv).copied().collect(),
                visit,
            );
            r.pop();
            p.remove(&v);
            x.insert(v);
        }
    }
}

impl MaximalCliqueOracle for BronKerbosch {
    fn for_each_maximal_clique(&self, graph: &ConflictGraph, visit: &mut dyn FnMut(&[usize])) {
        let p: BTreeSet<usize> = (0..graph.n()).collect();
        let mut r = Vec::new();
        Self::expand(graph, &mut r, p, BTreeSet::new(), visit);
    }
}

/// Every maximal clique reported by an oracle.
#[derive(Debug, Clone)]
pub struct ExactCliques<O = BronKerbosch> {
    oracle: O,

    /// Smallest clique kept. Isolated vertices are maximal cliques of size 1
    /// and never give a violated cut.
    min_size: usize,
}

impl ExactCliques<BronKerbosch> {
    pub fn new() -> Self {
        Self::with_oracle(BronKerbosch)
    }
}

impl Default for ExactCliques<BronKerbosch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: MaximalCliqueOracle> ExactCliques<O> {
    pub fn with_oracle(oracle: O) -> Self {
        Self { oracle, min_size: 2 }
    }
}

impl<O: MaximalCliqueOracle> CliqueGenerator for ExactCliques<O> {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn generate(&self, graph: &ConflictGraph) -> CliquePool {
        let mut pool = CliquePool::new();
        self.oracle.for_each_maximal_clique(graph, &mut |clique| {
            if clique.len() >= self.min_size {
                let mut clique = clique.to_vec();
                clique.sort_unstable();
                pool.push(clique);
            }
        });
        pool
    }
}

/// One greedy clique per vertex of sufficient degree.
///
/// Cliques are internally consistent but neither maximum nor necessarily
/// maximal.
#[derive(Debug, Clone)]
pub struct GreedyCliques {
    /// Degree, candidate count and clique size threshold.
    min_limit: usize,
}

impl GreedyCliques {
    pub fn new() -> Self {
        Self { min_limit: 3 }
    }

    /// Grow a clique around `u`, or `None` when `u` is too weakly connected.
    fn clique_around(&self, graph: &ConflictGraph, u: usize) -> Option<Vec<usize>> {
        let nu = graph.neighbors(u);
        if nu.len() < self.min_limit {
            return None;
        }

        // Smaller neighbours with their common neighbourhood with u
        let mut candidates: Vec<(usize, Vec<usize>)> = nu
            .range(..u)
            .map(|&v| (v, nu.intersection(graph.neighbors(v)).copied().collect::<Vec<_>>()))
            .filter(|(_, common)| common.len() > self.min_limit)
            .collect();
        if candidates.len() < self.min_limit {
            return None;
        }
        candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let mut clique: Vec<usize> = Vec::new();
        for (v, common) in &candidates {
            if clique.iter().all(|c| common.binary_search(c).is_ok()) {
                clique.push(*v);
            }
        }
        if clique.len() < self.min_limit {
            return None;
        }

        clique.push(u);
        Some(clique)
    }
}

impl Default for GreedyCliques {
    fn default() -> Self {
        Self::new()
    }
}

impl CliqueGenerator for GreedyCliques {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn generate(&self, graph: &ConflictGraph) -> CliquePool {
        let mut pool = CliquePool::new();
        for u in 0..graph.n() {
            if let Some(clique) = self.clique_around(graph, u) {
                pool.push(clique);
            }
        }
        pool
    }
}

/// Build the clique pool with the configured strategy.
pub fn build_clique_pool(graph: &ConflictGraph, strategy: CliqueStrategy) -> CliquePool {
    let exact = match strategy {
        CliqueStrategy::Exact => true,
        CliqueStrategy::Greedy => false,
        CliqueStrategy::Auto { max_exact_vertices } => graph.n() <= max_exact_vertices,
    };
    let generator: Box<dyn CliqueGenerator> = if exact {
        Box::new(ExactCliques::new())
    } else {
        Box::new(GreedyCliques::new())
    };

    let pool = generator.generate(graph);
    log::info!(
        "Clique pool initialised with {} {} clique(s)",
        pool.len(),
        generator.name()
    );
    pool
}
