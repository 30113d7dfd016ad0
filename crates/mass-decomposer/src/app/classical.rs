//! Classical dynamic-programming mass decomposer
//!
//! Reference implementation built on an explicit, incrementally filled
//! count table (`O(k * mass)`) instead of the residue table. It is simpler
//! to audit, adequate for small alphabets and masses, and serves as the
//! oracle for the residue-table engine in the test suite.

use crate::domain::count_table::CountTable;
use crate::domain::decomposition::{Decomposition, depth_first};
use crate::domain::existence_table::ExistenceTable;
use crate::domain::options::DecomposerOptions;
use crate::domain::weights::Weights;
use crate::error::DecompError;
use std::ops::ControlFlow;
use tracing::debug;

/// Decomposer for integer masses backed by a 2-D count table
#[derive(Clone, Debug)]
pub struct ClassicalDpMassDecomposer {
    weights: Vec<u64>,
    counts: CountTable,
    existence: ExistenceTable,
    options: DecomposerOptions,
}

impl ClassicalDpMassDecomposer {
    /// Build a decomposer with default options
    pub fn new(weights: &Weights) -> Result<Self, DecompError> {
        Self::with_options(weights, DecomposerOptions::default())
    }

    /// Build a decomposer for integer weights with default options
    pub fn from_weights(weights: &[u64]) -> Result<Self, DecompError> {
        Self::new(&Weights::from_integer_weights(weights.to_vec())?)
    }

    /// Build a decomposer
    ///
    /// No table is filled until the first query.
    pub fn with_options(weights: &Weights, options: DecomposerOptions) -> Result<Self, DecompError> {
        let weights = if options.reduce_by_gcd {
            weights.reduce_by_gcd()
        } else {
            weights.clone()
        };
        debug!(size = weights.size(), "classical DP decomposer ready");

        Ok(Self {
            counts: CountTable::new(weights.weights(), options.max_mass),
            existence: ExistenceTable::new(weights.weights(), options.max_mass),
            weights: weights.weights().to_vec(),
            options,
        })
    }

    /// Integer weights in alphabet order
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Check whether `mass` has at least one decomposition
    pub fn exist(&mut self, mass: u64) -> Result<bool, DecompError> {
        self.options.check_mass(mass)?;
        self.existence.exists(mass)
    }

    /// One decomposition of `mass`, empty if there is none
    ///
    /// Backtracks from the highest position down, taking as many copies of
    /// each weight as leave a decomposable remainder.
    pub fn get_decomposition(&mut self, mass: u64) -> Result<Decomposition, DecompError> {
        self.options.check_mass(mass)?;
        self.counts.ensure(mass)?;
        if self.counts.total(mass) == 0 {
            return Ok(Vec::new());
        }

        let mut decomposition = vec![0u64; self.weights.len()];
        let mut remaining = mass;
        for index in (1..self.weights.len()).rev() {
            let weight = self.weights[index];
            while remaining >= weight && self.counts.count(index, remaining - weight) > 0 {
                remaining -= weight;
                decomposition[index] += 1;
            }
        }
        debug_assert_eq!(remaining % self.weights[0], 0);
        decomposition[0] = remaining / self.weights[0];

        Ok(decomposition)
    }

    /// Number of decompositions of `mass`
    pub fn get_number_of_decompositions(&mut self, mass: u64) -> Result<u64, DecompError> {
        self.options.check_mass(mass)?;
        self.counts.ensure(mass)?;
        Ok(self.counts.total(mass))
    }

    /// Every decomposition of `mass`
    pub fn get_all_decompositions(&mut self, mass: u64) -> Result<Vec<Decomposition>, DecompError> {
        self.options.check_mass(mass)?;
        self.counts.ensure(mass)?;

        let mut decompositions = Vec::new();
        if self.counts.total(mass) == 0 {
            return Ok(decompositions);
        }

        let weights = &self.weights;
        let counts = &self.counts;
        let _ = depth_first(
            weights.len(),
            mass,
            |index, remaining, out| {
                let weight = weights[index];
                for count in 0..=remaining / weight {
                    let rest = remaining - count * weight;
                    if counts.count(index - 1, rest) > 0 {
                        out.push((count, rest));
                    }
                }
            },
            |remaining| (remaining % weights[0] == 0).then(|| remaining / weights[0]),
            |d| {
                decompositions.push(d.to_vec());
                ControlFlow::Continue(())
            },
        );

        Ok(decompositions)
    }
}
