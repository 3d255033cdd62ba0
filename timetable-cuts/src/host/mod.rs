//! Interface to the host MIP solver.

mod backend;
mod fixed;

pub use backend::{
    CutFamily, CutScope, CutSense, CutSource, LinearCut, RelaxationHost, Variable,
};
pub use fixed::FixedRelaxation;
