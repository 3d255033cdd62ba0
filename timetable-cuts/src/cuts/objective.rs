//! Objective integrality cuts.
//!
//! Every objective coefficient of the formulation is integral, so a
//! fractional bound can be rounded up.

use super::{SeparationContext, Separator};
use crate::host::{CutFamily, CutSense, CutSource, LinearCut, RelaxationHost, Variable};

/// Rounds up fractional global and node bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveSeparator;

impl ObjectiveSeparator {
    fn bound_cut(bound: f64) -> LinearCut {
        LinearCut::new(
            vec![(Variable::Objective, 1.0)],
            CutSense::GreaterEqual,
            bound.ceil(),
            CutSource::ObjectiveIntegrality,
        )
    }
}

/// True when the fractional part of `value` lies strictly inside `(tol, 1 - tol)`.
fn is_fractional(value: f64, tol: f64) -> bool {
    let frac = value - value.floor();
    frac > tol && frac < 1.0 - tol
}

impl Separator for ObjectiveSeparator {
    fn family(&self) -> CutFamily {
        CutFamily::Objective
    }

    fn separate(&self, ctx: &SeparationContext<'_>, host: &dyn RelaxationHost) -> Vec<LinearCut> {
        let tol = ctx.settings.integrality_tol;
        let global = host.best_global_objective();
        let local = host.current_node_objective();
        let mut cuts = Vec::new();

        if is_fractional(global, tol) {
            log::debug!(
                "Global bound {:.4} (node {:.4}): obj >= {}",
                global,
                local,
                global.ceil()
            );
            cuts.push(Self::bound_cut(global));
        }

        if is_fractional(local, tol) && (local - global).abs() > tol {
            log::debug!(
                "Node bound {:.4} (global {:.4}): local obj >= {}",
                local,
                global,
                local.ceil()
            );
            cuts.push(Self::bound_cut(local).local());
        }

        cuts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractional_window() {
        assert!(is_fractional(3.5, 0.01));
        assert!(is_fractional(-0.5, 0.01));
        assert!(!is_fractional(3.0, 0.01));
        assert!(!is_fractional(3.005, 0.01));
        assert!(!is_fractional(3.995, 0.01));
    }

    #[test]
    fn test_bound_cut() {
        let cut = ObjectiveSeparator::bound_cut(12.3);
        assert_eq!(cut.rhs, 13.0);
        assert_eq!(cut.sense, CutSense::GreaterEqual);
    }
}
