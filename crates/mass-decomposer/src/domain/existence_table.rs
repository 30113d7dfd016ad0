//! Growable existence table
//!
//! `exists[m]` is true iff `m` is a non-negative integer combination of the
//! weights. Cheaper than counting when only existence is asked for.

use crate::domain::count_table::growth_target;
use crate::error::DecompError;
use tracing::debug;

/// One-dimensional reachability table
#[derive(Clone, Debug)]
pub struct ExistenceTable {
    weights: Vec<u64>,
    exists: Vec<bool>,
    max_mass: u64,
}

impl ExistenceTable {
    /// Create an empty table for `weights`, never growing beyond `max_mass`
    pub fn new(weights: &[u64], max_mass: u64) -> Self {
        Self {
            weights: weights.to_vec(),
            exists: Vec::new(),
            max_mass,
        }
    }

    /// Number of filled entries
    pub fn len(&self) -> u64 {
        self.exists.len() as u64
    }

    /// True until the first growth
    pub fn is_empty(&self) -> bool {
        self.exists.is_empty()
    }

    /// Grow the table until `mass` is available
    pub fn ensure(&mut self, mass: u64) -> Result<(), DecompError> {
        if mass < self.len() {
            return Ok(());
        }
        if mass > self.max_mass {
            return Err(DecompError::OutOfRange {
                requested: mass,
                max: self.max_mass,
            });
        }

        let old = self.exists.len();
        let target = growth_target(old as u64, mass, self.max_mass)?;
        self.exists.reserve(target - old);
        for m in old..target {
            let reachable = m == 0
                || self
                    .weights
                    .iter()
                    .any(|&w| m as u64 >= w && self.exists[m - w as usize]);
            self.exists.push(reachable);
        }

        debug!(from = old, to = target, "existence table grown");
        Ok(())
    }

    /// Check whether `mass` is decomposable, growing the table if needed
    pub fn exists(&mut self, mass: u64) -> Result<bool, DecompError> {
        self.ensure(mass)?;
        Ok(self.exists[mass as usize])
    }
}
