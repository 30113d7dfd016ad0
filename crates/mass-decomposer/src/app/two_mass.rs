//! Simultaneous decomposition over two weight sets
//!
//! A decomposition must reproduce `mass_a` with weight set A and `mass_b`
//! with weight set B (for example a monoisotopic and an average mass). Two
//! designs answer the same queries:
//!
//! - [`TwoListDecomposer`] keeps a residue table per weight set and prunes
//!   the joint traversal with both.
//! - [`CombinedWeightDecomposer`] derives a single combined weight set
//!   `c[i] = a[i] * b[j] - b[i] * a[j]` and decomposes in that set first.

use crate::app::integer::IntegerMassDecomposer;
use crate::domain::decomposition::{Decomposition, depth_first};
use crate::domain::options::DecomposerOptions;
use crate::domain::residue_table::ResidueTable;
use crate::domain::weights::Weights;
use crate::error::DecompError;
use std::ops::ControlFlow;
use tracing::debug;

/// Decomposition queries over two weight sets at once
pub trait SimultaneousDecomposer {
    /// Number of alphabet positions shared by both weight sets
    fn alphabet_size(&self) -> usize;

    /// Visit every decomposition of `(mass_a, mass_b)`
    ///
    /// The visitor may return `Break` to stop the enumeration.
    fn for_each_decomposition(
        &self,
        mass_a: u64,
        mass_b: u64,
        visit: &mut dyn FnMut(&[u64]) -> ControlFlow<()>,
    ) -> Result<(), DecompError>;

    /// Every decomposition of `(mass_a, mass_b)`
    fn get_all_decompositions(
        &self,
        mass_a: u64,
        mass_b: u64,
    ) -> Result<Vec<Decomposition>, DecompError> {
        let mut decompositions = Vec::new();
        self.for_each_decomposition(mass_a, mass_b, &mut |d| {
            decompositions.push(d.to_vec());
            ControlFlow::Continue(())
        })?;
        Ok(decompositions)
    }

    /// Number of decompositions of `(mass_a, mass_b)`
    fn get_number_of_decompositions(&self, mass_a: u64, mass_b: u64) -> Result<u64, DecompError> {
        let mut count = 0u64;
        self.for_each_decomposition(mass_a, mass_b, &mut |_| {
            count += 1;
            ControlFlow::Continue(())
        })?;
        Ok(count)
    }

    /// One decomposition of `(mass_a, mass_b)`, empty if there is none
    fn get_decomposition(&self, mass_a: u64, mass_b: u64) -> Result<Decomposition, DecompError> {
        let mut first = Vec::new();
        self.for_each_decomposition(mass_a, mass_b, &mut |d| {
            first = d.to_vec();
            ControlFlow::Break(())
        })?;
        Ok(first)
    }

    /// Check whether `(mass_a, mass_b)` has at least one decomposition
    fn exist(&self, mass_a: u64, mass_b: u64) -> Result<bool, DecompError> {
        Ok(!self.get_decomposition(mass_a, mass_b)?.is_empty())
    }
}

/// Fail unless both weight sets cover the same alphabet positions
fn check_sizes(weights_a: &Weights, weights_b: &Weights) -> Result<(), DecompError> {
    if weights_a.size() != weights_b.size() {
        return Err(DecompError::invalid_alphabet(format!(
            "weight sets differ in size: {} and {}",
            weights_a.size(),
            weights_b.size()
        )));
    }
    Ok(())
}

// =============================================================================
// Two residue tables
// =============================================================================

/// Joint traversal pruned by one residue table per weight set
#[derive(Clone, Debug)]
pub struct TwoListDecomposer {
    table_a: ResidueTable,
    table_b: ResidueTable,
    options: DecomposerOptions,
}

impl TwoListDecomposer {
    /// Build both residue tables with default options
    pub fn new(weights_a: &Weights, weights_b: &Weights) -> Result<Self, DecompError> {
        Self::with_options(weights_a, weights_b, DecomposerOptions::default())
    }

    /// Build both residue tables
    ///
    /// `reduce_by_gcd` is ignored: both weight sets share the mass units of
    /// their queries.
    pub fn with_options(
        weights_a: &Weights,
        weights_b: &Weights,
        options: DecomposerOptions,
    ) -> Result<Self, DecompError> {
        check_sizes(weights_a, weights_b)?;
        let table_a = ResidueTable::new(weights_a.weights())?;
        let table_b = ResidueTable::new(weights_b.weights())?;
        debug!(size = weights_a.size(), "two-list decomposer ready");

        Ok(Self {
            table_a,
            table_b,
            options,
        })
    }
}

impl SimultaneousDecomposer for TwoListDecomposer {
    fn alphabet_size(&self) -> usize {
        self.table_a.len()
    }

    fn for_each_decomposition(
        &self,
        mass_a: u64,
        mass_b: u64,
        visit: &mut dyn FnMut(&[u64]) -> ControlFlow<()>,
    ) -> Result<(), DecompError> {
        self.options.check_mass(mass_a)?;
        self.options.check_mass(mass_b)?;

        let last = self.table_a.len() - 1;
        if !self.table_a.is_decomposable(last, mass_a) || !self.table_b.is_decomposable(last, mass_b)
        {
            return Ok(());
        }

        let weights_b = self.table_b.weights();
        let modulus_a = self.table_a.modulus();
        let modulus_b = self.table_b.modulus();
        let mut from_a = Vec::new();

        let _ = depth_first(
            self.table_a.len(),
            (mass_a, mass_b),
            |index, (rest_a, rest_b), out| {
                from_a.clear();
                self.table_a.feasible_multiplicities(index, rest_a, &mut from_a);
                for &(count, next_a) in &from_a {
                    let Some(used_b) = count.checked_mul(weights_b[index]) else {
                        break;
                    };
                    if used_b > rest_b {
                        break;
                    }
                    let next_b = rest_b - used_b;
                    if self.table_b.is_decomposable(index - 1, next_b) {
                        out.push((count, (next_a, next_b)));
                    }
                }
            },
            |(rest_a, rest_b)| {
                let exact = rest_a % modulus_a == 0 && rest_b % modulus_b == 0;
                (exact && rest_a / modulus_a == rest_b / modulus_b).then(|| rest_a / modulus_a)
            },
            visit,
        );
        Ok(())
    }
}

// =============================================================================
// Combined weight set
// =============================================================================

/// Decomposition through a derived weight set
///
/// With pivot `j = argmin a[i] / b[i]`, every solution satisfies
/// `Σ d[i] * c[i] = b[j] * mass_a - a[j] * mass_b` with
/// `c[i] = a[i] * b[j] - b[i] * a[j] >= 0`. Positions with `c[i] > 0` are
/// decomposed in the combined set; positions with `c[i] = 0` (the pivot and
/// positions proportional to it) are resolved afterwards against A.
#[derive(Clone, Debug)]
pub struct CombinedWeightDecomposer {
    weights_a: Vec<u64>,
    weights_b: Vec<u64>,
    pivot: usize,
    /// Alphabet positions of the combined set, by ascending combined weight
    combined_positions: Vec<usize>,
    combined: Option<IntegerMassDecomposer>,
    /// Alphabet positions proportional to the pivot, by ascending A weight
    tail_positions: Vec<usize>,
    tail: IntegerMassDecomposer,
    options: DecomposerOptions,
}

impl CombinedWeightDecomposer {
    /// Build the combined and tail decomposers with default options
    pub fn new(weights_a: &Weights, weights_b: &Weights) -> Result<Self, DecompError> {
        Self::with_options(weights_a, weights_b, DecomposerOptions::default())
    }

    /// Build the combined and tail decomposers
    ///
    /// # Errors
    /// `InvalidAlphabet` for weight sets of different sizes, `Overflow` if a
    /// combined weight is not a valid weight.
    pub fn with_options(
        weights_a: &Weights,
        weights_b: &Weights,
        options: DecomposerOptions,
    ) -> Result<Self, DecompError> {
        check_sizes(weights_a, weights_b)?;
        let a = weights_a.weights();
        let b = weights_b.weights();

        // a[i] / b[i] < a[j] / b[j]  <=>  a[i] * b[j] < a[j] * b[i]
        let pivot = (1..a.len()).fold(0, |j, i| {
            if (a[i] as u128) * (b[j] as u128) < (a[j] as u128) * (b[i] as u128) {
                i
            } else {
                j
            }
        });

        let mut combined = Vec::new();
        let mut tail = Vec::new();
        for i in 0..a.len() {
            let c = (a[i] as u128) * (b[pivot] as u128) - (b[i] as u128) * (a[pivot] as u128);
            if c == 0 {
                tail.push((a[i], i));
            } else {
                let c = u64::try_from(c)
                    .map_err(|_| DecompError::overflow(format!("combined weight {}", i)))?;
                combined.push((c, i));
            }
        }
        combined.sort_unstable();
        tail.sort_unstable();

        let combined_decomposer = if combined.is_empty() {
            None
        } else {
            let weights = Weights::from_integer_weights(combined.iter().map(|&(c, _)| c).collect())
                .map_err(|e| DecompError::overflow(format!("combined weights: {}", e)))?;
            Some(IntegerMassDecomposer::with_options(
                &weights,
                DecomposerOptions::default().with_max_mass(u64::MAX),
            )?)
        };
        let tail_weights = Weights::from_integer_weights(tail.iter().map(|&(w, _)| w).collect())?;
        let tail_decomposer = IntegerMassDecomposer::with_options(
            &tail_weights,
            DecomposerOptions::default().with_max_mass(options.max_mass),
        )?;

        debug!(
            pivot,
            combined = combined.len(),
            tail = tail.len(),
            "combined weight decomposer ready"
        );

        Ok(Self {
            weights_a: a.to_vec(),
            weights_b: b.to_vec(),
            pivot,
            combined_positions: combined.iter().map(|&(_, i)| i).collect(),
            combined: combined_decomposer,
            tail_positions: tail.iter().map(|&(_, i)| i).collect(),
            tail: tail_decomposer,
            options,
        })
    }

    /// Alphabet position used as pivot
    pub fn pivot(&self) -> usize {
        self.pivot
    }

    /// Combined weights in alphabet order (0 for tail positions)
    pub fn combined_weights(&self) -> Vec<u64> {
        let mut weights = vec![0u64; self.weights_a.len()];
        if let Some(combined) = &self.combined {
            for (&position, &weight) in self.combined_positions.iter().zip(combined.weights()) {
                weights[position] = weight;
            }
        }
        weights
    }

    /// Combined mass `b[j] * mass_a - a[j] * mass_b`, `None` if negative
    fn combined_mass(&self, mass_a: u64, mass_b: u64) -> Result<Option<u64>, DecompError> {
        let mass = self.weights_b[self.pivot] as i128 * mass_a as i128
            - self.weights_a[self.pivot] as i128 * mass_b as i128;
        if mass < 0 {
            return Ok(None);
        }
        u64::try_from(mass)
            .map(Some)
            .map_err(|_| DecompError::overflow("combined mass"))
    }

    /// Remaining A and B masses after the combined positions of `full`
    fn remainders(&self, full: &[u64], mass_a: u64, mass_b: u64) -> Option<(u64, u64)> {
        let mut rest_a = mass_a;
        let mut rest_b = mass_b;
        for &position in &self.combined_positions {
            let count = full[position];
            rest_a = rest_a.checked_sub(count.checked_mul(self.weights_a[position])?)?;
            rest_b = rest_b.checked_sub(count.checked_mul(self.weights_b[position])?)?;
        }
        Some((rest_a, rest_b))
    }

    /// Complete `full` with every tail decomposition of `rest_a`
    fn emit_tail(
        &self,
        rest_a: u64,
        full: &mut [u64],
        visit: &mut dyn FnMut(&[u64]) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, DecompError> {
        let mut flow = ControlFlow::Continue(());
        self.tail.for_each_decomposition(rest_a, |tail| {
            for (&position, &count) in self.tail_positions.iter().zip(tail) {
                full[position] = count;
            }
            flow = visit(&*full);
            flow
        })?;
        Ok(flow)
    }
}

impl SimultaneousDecomposer for CombinedWeightDecomposer {
    fn alphabet_size(&self) -> usize {
        self.weights_a.len()
    }

    fn for_each_decomposition(
        &self,
        mass_a: u64,
        mass_b: u64,
        visit: &mut dyn FnMut(&[u64]) -> ControlFlow<()>,
    ) -> Result<(), DecompError> {
        self.options.check_mass(mass_a)?;
        self.options.check_mass(mass_b)?;
        let Some(mass_c) = self.combined_mass(mass_a, mass_b)? else {
            return Ok(());
        };

        let pivot_a = self.weights_a[self.pivot] as u128;
        let pivot_b = self.weights_b[self.pivot] as u128;
        let mut full = vec![0u64; self.weights_a.len()];

        let Some(combined) = &self.combined else {
            // Every position is proportional to the pivot
            if mass_c == 0 {
                let _flow = self.emit_tail(mass_a, &mut full, visit)?;
            }
            return Ok(());
        };

        let mut outcome = Ok(());
        combined.for_each_decomposition(mass_c, |decomposition| {
            for (&position, &count) in self.combined_positions.iter().zip(decomposition) {
                full[position] = count;
            }
            let Some((rest_a, rest_b)) = self.remainders(&full, mass_a, mass_b) else {
                return ControlFlow::Continue(());
            };
            if rest_a as u128 * pivot_b != rest_b as u128 * pivot_a {
                return ControlFlow::Continue(());
            }

            match self.emit_tail(rest_a, &mut full, &mut *visit) {
                Ok(flow) => flow,
                Err(e) => {
                    outcome = Err(e);
                    ControlFlow::Break(())
                }
            }
        })?;
        outcome
    }
}
