//! Deduplication pool for clique cuts.
//!
//! A clique cut is identified by the period and the pool index of its
//! clique. An identity is reserved when the cut is found and stays for the
//! whole solve once the host accepts the cut, so a cut the host already
//! holds is not submitted twice. A reservation whose cut never reached the
//! host is released.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Identity of a clique cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CliqueCutId {
    /// Period the cut applies to.
    pub period: usize,

    /// Index of the clique in the clique pool.
    pub clique: usize,
}

/// Grow-only set of clique cut identities.
///
/// Lookup and insertion happen under one lock, so concurrent separation
/// rounds never register the same identity twice.
#[derive(Debug, Default)]
pub struct CliqueCutPool {
    ids: Mutex<HashSet<CliqueCutId>>,
}

impl CliqueCutPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity.
    ///
    /// Returns true if it was not registered before.
    pub fn register(&self, id: CliqueCutId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id)
    }

    /// Drop a reservation whose cut the host did not accept.
    ///
    /// Returns true if the identity was registered.
    pub fn release(&self, id: CliqueCutId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    /// Check if an identity is registered.
    pub fn contains(&self, id: CliqueCutId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if pool is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered identities, sorted.
    pub fn ids(&self) -> Vec<CliqueCutId> {
        let mut ids: Vec<CliqueCutId> = self
            .ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }
}
