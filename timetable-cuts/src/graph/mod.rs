//! Conflict graph and clique pool.

mod cliques;
mod conflict;

pub use cliques::{
    build_clique_pool, BronKerbosch, CliqueGenerator, CliquePool, ExactCliques, GreedyCliques,
    MaximalCliqueOracle,
};
pub use conflict::ConflictGraph;
