//! Extended residue table (ERT)
//!
//! For a weight set `w[0..k]`, row `i` of the table holds, for every residue
//! class `r` modulo `w[0]`, the smallest mass congruent to `r` that can be
//! decomposed using positions `0..=i`. A mass `m` is decomposable with
//! positions `0..=i` iff `m >= row[i][m mod w[0]]`.
//!
//! Rows are filled with the round-robin relaxation along the residue cycles
//! generated by each new weight, so construction costs `O(k * w[0])`.

use crate::domain::weights::gcd;
use crate::error::DecompError;
use tracing::{debug, trace};

/// Last improvement of a residue class
///
/// The smallest decomposable mass of the class was reached by adding
/// `multiplicity` copies of weight `index` to the smallest decomposable mass
/// of the class `multiplicity * w[index]` below it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Witness {
    /// Alphabet position (0 = never improved)
    pub index: usize,
    /// Number of copies of that position
    pub multiplicity: u64,
}

/// Extended residue table of one weight set
#[derive(Clone, Debug)]
pub struct ResidueTable {
    weights: Vec<u64>,
    rows: Vec<Vec<u64>>,
    witnesses: Vec<Witness>,
    infinity: u64,
}

impl ResidueTable {
    /// Build the residue table of `weights`
    ///
    /// `weights[0]` is the modulus; it should be the smallest weight to keep
    /// the rows short, but any order gives a correct table.
    pub fn new(weights: &[u64]) -> Result<Self, DecompError> {
        let (rows, witnesses) = build_residue_table(weights)?;
        let infinity = infinity_of(weights)?;

        Ok(Self {
            weights: weights.to_vec(),
            rows,
            witnesses,
            infinity,
        })
    }

    /// Marker for residue classes that cannot be reached
    pub fn infinity(&self) -> u64 {
        self.infinity
    }

    /// Modulus of the residue classes (`w[0]`)
    pub fn modulus(&self) -> u64 {
        self.weights[0]
    }

    /// Weights the table was built from
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Number of rows (alphabet positions)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false: a table has at least one row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for positions `0..=index`
    pub fn row(&self, index: usize) -> &[u64] {
        &self.rows[index]
    }

    /// Row for the full alphabet
    pub fn last_row(&self) -> &[u64] {
        &self.rows[self.rows.len() - 1]
    }

    /// Witness of residue class `residue` in the last row
    pub fn witness(&self, residue: usize) -> Witness {
        self.witnesses[residue]
    }

    /// Smallest mass in class `residue` decomposable with positions `0..=index`
    ///
    /// `None` if the class is unreachable.
    pub fn smallest_decomposable(&self, index: usize, residue: usize) -> Option<u64> {
        let value = self.rows[index][residue];
        (value != self.infinity).then_some(value)
    }

    /// Check whether `mass` is decomposable with positions `0..=index`
    #[inline]
    pub fn is_decomposable(&self, index: usize, mass: u64) -> bool {
        let value = self.rows[index][(mass % self.weights[0]) as usize];
        value != self.infinity && mass >= value
    }

    /// Multiplicities of position `index` that leave a remainder decomposable
    /// by positions `0..index`
    ///
    /// Appends `(multiplicity, remainder)` pairs to `out`, sorted by
    /// multiplicity. Multiplicities `t, t + period, t + 2 * period, ...` share
    /// one residue class of the remainder, where
    /// `period = lcm(w[0], w[index]) / w[index]`, so one lookup covers each run.
    ///
    /// # Panics
    /// If `index` is 0.
    pub fn feasible_multiplicities(&self, index: usize, mass: u64, out: &mut Vec<(u64, u64)>) {
        let modulus = self.weights[0];
        let weight = self.weights[index];
        let period = modulus / gcd(modulus, weight);
        let lcm = period.saturating_mul(weight);
        let lower = &self.rows[index - 1];
        let first = out.len();

        for start in 0..period.min(mass / weight + 1) {
            let mut remaining = mass - start * weight;
            let threshold = lower[(remaining % modulus) as usize];
            if threshold == self.infinity {
                continue;
            }

            let mut count = start;
            while remaining >= threshold {
                out.push((count, remaining));
                if remaining < lcm {
                    break;
                }
                remaining -= lcm;
                count += period;
            }
        }

        out[first..].sort_unstable_by_key(|&(count, _)| count);
    }

    /// Reconstruct one decomposition of `mass` from the witness vector
    ///
    /// Returns `None` if `mass` is not decomposable.
    pub fn witness_decomposition(&self, mass: u64) -> Option<Vec<u64>> {
        let modulus = self.weights[0];
        let mut residue = (mass % modulus) as usize;
        let mut remaining = self.last_row()[residue];
        if remaining == self.infinity || mass < remaining {
            return None;
        }

        let mut decomposition = vec![0u64; self.weights.len()];
        decomposition[0] = (mass - remaining) / modulus;

        while remaining != 0 {
            let Witness {
                index,
                multiplicity,
            } = self.witnesses[residue];
            debug_assert!(index != 0, "reachable class {} has no witness", residue);
            let step = multiplicity * self.weights[index];
            debug_assert!(step <= remaining);
            decomposition[index] += multiplicity;
            remaining -= step;
            residue = (remaining % modulus) as usize;
        }

        Some(decomposition)
    }
}

/// Unreachable marker: `w[0] * max(w)`
fn infinity_of(weights: &[u64]) -> Result<u64, DecompError> {
    let largest = weights.iter().copied().max().unwrap_or(0);
    weights
        .first()
        .and_then(|&w0| w0.checked_mul(largest))
        .ok_or_else(|| DecompError::overflow("residue table infinity"))
}

/// Build the rows and the witness vector of a residue table
///
/// Row `i` has `w[0]` entries; unreachable classes hold `w[0] * max(w)`.
/// The witness vector describes the last row.
///
/// # Errors
/// `InvalidAlphabet` for an empty or zero weight, `Overflow` if the
/// unreachable marker does not fit `u64`.
pub fn build_residue_table(weights: &[u64]) -> Result<(Vec<Vec<u64>>, Vec<Witness>), DecompError> {
    if weights.is_empty() {
        return Err(DecompError::invalid_alphabet("alphabet is empty"));
    }
    if weights.contains(&0) {
        return Err(DecompError::invalid_alphabet("weights must be positive"));
    }

    let infinity = infinity_of(weights)?;
    let modulus = weights[0];
    let width = usize::try_from(modulus)
        .map_err(|_| DecompError::invalid_alphabet("smallest weight exceeds the table size"))?;

    let mut rows = Vec::with_capacity(weights.len());
    let mut witnesses = vec![Witness::default(); width];

    let mut first = vec![infinity; width];
    first[0] = 0;
    rows.push(first);

    let mut shortcuts = 0usize;
    for (index, &weight) in weights.iter().enumerate().skip(1) {
        let previous = &rows[index - 1];
        let mut row = previous.clone();

        // Nijenhuis: a weight that is already decomposable adds nothing
        let residue = (weight % modulus) as usize;
        if previous[residue] != infinity && previous[residue] <= weight {
            trace!(index, weight, "residue row copied");
            shortcuts += 1;
            rows.push(row);
            continue;
        }

        let blocks = gcd(modulus, weight);
        if blocks == 1 {
            relax_cycle(&mut row, &mut witnesses, index, weight, 0, infinity);
        } else {
            for start in 0..blocks {
                relax_cycle(
                    &mut row,
                    &mut witnesses,
                    index,
                    weight,
                    start as usize,
                    infinity,
                );
            }
        }
        trace!(index, weight, blocks, "residue row filled");
        rows.push(row);
    }

    debug!(
        positions = weights.len(),
        modulus, shortcuts, "residue table built"
    );
    Ok((rows, witnesses))
}

/// Relax one residue cycle of `weight` in place
///
/// The cycle is `{start + t * weight mod w[0]}`. The walk starts at the cycle
/// minimum, so each value is final when it is propagated.
fn relax_cycle(
    row: &mut [u64],
    witnesses: &mut [Witness],
    index: usize,
    weight: u64,
    start: usize,
    infinity: u64,
) {
    let modulus = row.len();
    let step = (weight % modulus as u64) as usize;
    let cycle_len = modulus / gcd(modulus as u64, weight) as usize;

    let mut min_residue = start;
    let mut residue = start;
    for _ in 1..cycle_len {
        residue = (residue + step) % modulus;
        if row[residue] < row[min_residue] {
            min_residue = residue;
        }
    }
    if row[min_residue] == infinity {
        return;
    }

    let mut residue = min_residue;
    for _ in 1..cycle_len {
        let next = (residue + step) % modulus;
        let candidate = row[residue].saturating_add(weight);
        if candidate < row[next] {
            row[next] = candidate;
            let previous = witnesses[residue];
            witnesses[next] = Witness {
                index,
                multiplicity: if previous.index == index {
                    previous.multiplicity + 1
                } else {
                    1
                },
            };
        }
        residue = next;
    }
}
