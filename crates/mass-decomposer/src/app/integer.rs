//! Integer mass decomposition on top of the extended residue table
//!
//! Existence and single-decomposition queries are answered from the residue
//! table in constant time per mass (plus the witness walk). Enumeration only
//! visits multiplicities whose remainder is decomposable by the lower
//! positions, so its cost is proportional to the number of results.
//! Counting uses an on-demand count table owned by the decomposer.

use crate::domain::count_table::CountTable;
use crate::domain::decomposition::{Decomposition, depth_first};
use crate::domain::options::DecomposerOptions;
use crate::domain::residue_table::ResidueTable;
use crate::domain::weights::Weights;
use crate::error::DecompError;
use std::ops::ControlFlow;
use tracing::{debug, warn};

/// Decomposer for integer masses backed by an extended residue table
#[derive(Clone, Debug)]
pub struct IntegerMassDecomposer {
    table: ResidueTable,
    counts: CountTable,
    options: DecomposerOptions,
}

impl IntegerMassDecomposer {
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
    /// With `reduce_by_gcd`, the weights are divided by their GCD first and
    /// queried masses are expressed in the reduced units.
    pub fn with_options(weights: &Weights, options: DecomposerOptions) -> Result<Self, DecompError> {
        let weights = if options.reduce_by_gcd {
            weights.reduce_by_gcd()
        } else {
            weights.clone()
        };
        if !weights.is_ascending() {
            warn!(
                weights = ?weights.weights(),
                "alphabet is not ascending, residue table uses the first weight as modulus"
            );
        }

        let table = ResidueTable::new(weights.weights())?;
        let counts = CountTable::new(weights.weights(), options.max_mass);
        debug!(
            size = weights.size(),
            modulus = table.modulus(),
            "integer mass decomposer ready"
        );

        Ok(Self {
            table,
            counts,
            options,
        })
    }

    /// Integer weights in alphabet order
    pub fn weights(&self) -> &[u64] {
        self.table.weights()
    }

    /// Residue table the decomposer was built on
    pub fn residue_table(&self) -> &ResidueTable {
        &self.table
    }

    /// Options in effect
    pub fn options(&self) -> &DecomposerOptions {
        &self.options
    }

    /// Check whether `mass` has at least one decomposition
    pub fn exist(&self, mass: u64) -> Result<bool, DecompError> {
        self.options.check_mass(mass)?;
        Ok(self.table.is_decomposable(self.table.len() - 1, mass))
    }

    /// One decomposition of `mass`, empty if there is none
    pub fn get_decomposition(&self, mass: u64) -> Result<Decomposition, DecompError> {
        self.options.check_mass(mass)?;
        Ok(self.table.witness_decomposition(mass).unwrap_or_default())
    }

    /// Number of decompositions of `mass`
    ///
    /// Grows the count table as needed; already filled columns are reused.
    pub fn get_number_of_decompositions(&mut self, mass: u64) -> Result<u64, DecompError> {
        self.options.check_mass(mass)?;
        self.counts.ensure(mass)?;
        Ok(self.counts.total(mass))
    }

    /// Every decomposition of `mass`
    ///
    /// Ordered by the multiplicity of the highest position first, then the
    /// next lower one, ascending.
    pub fn get_all_decompositions(&self, mass: u64) -> Result<Vec<Decomposition>, DecompError> {
        let mut decompositions = Vec::new();
        self.for_each_decomposition(mass, |d| {
            decompositions.push(d.to_vec());
            ControlFlow::Continue(())
        })?;
        Ok(decompositions)
    }

    /// Visit every decomposition of `mass` without collecting them
    ///
    /// The visitor may return `Break` to stop the enumeration.
    pub fn for_each_decomposition<F>(&self, mass: u64, visit: F) -> Result<(), DecompError>
    where
        F: FnMut(&[u64]) -> ControlFlow<()>,
    {
        self.options.check_mass(mass)?;
        let last = self.table.len() - 1;
        if !self.table.is_decomposable(last, mass) {
            return Ok(());
        }

        let modulus = self.table.modulus();
        let _ = depth_first(
            self.table.len(),
            mass,
            |index, remaining, out| self.table.feasible_multiplicities(index, remaining, out),
            |remaining| (remaining % modulus == 0).then(|| remaining / modulus),
            visit,
        );
        Ok(())
    }

    /// Largest mass without a decomposition
    ///
    /// `None` if infinitely many masses have no decomposition (the weights
    /// share a common divisor) or if every mass has one.
    pub fn frobenius_number(&self) -> Option<u64> {
        let row = self.table.last_row();
        if row.contains(&self.table.infinity()) {
            return None;
        }
        row.iter()
            .max()
            .and_then(|&largest| largest.checked_sub(self.table.modulus()))
    }
}
