//! Decomposer configuration

use crate::constants::DEFAULT_MAX_MASS;
use crate::error::DecompError;

/// Options shared by all decomposers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecomposerOptions {
    /// Largest integer mass a query may touch
    pub max_mass: u64,
    /// Divide the weights by their GCD before building tables
    pub reduce_by_gcd: bool,
}

impl Default for DecomposerOptions {
    fn default() -> Self {
        Self {
            max_mass: DEFAULT_MAX_MASS,
            reduce_by_gcd: false,
        }
    }
}

impl DecomposerOptions {
    /// Set the largest accepted integer mass
    pub fn with_max_mass(mut self, max_mass: u64) -> Self {
        self.max_mass = max_mass;
        self
    }

    /// Enable or disable GCD reduction of the weights
    pub fn with_gcd_reduction(mut self, reduce_by_gcd: bool) -> Self {
        self.reduce_by_gcd = reduce_by_gcd;
        self
    }

    /// Fail with `OutOfRange` if `mass` exceeds `max_mass`
    pub fn check_mass(&self, mass: u64) -> Result<(), DecompError> {
        if mass > self.max_mass {
            return Err(DecompError::OutOfRange {
                requested: mass,
                max: self.max_mass,
            });
        }
        Ok(())
    }
}
