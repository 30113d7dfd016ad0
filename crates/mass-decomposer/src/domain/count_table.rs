//! Growable decomposition-count table
//!
//! `table[i][m]` is the number of decompositions of `m` using alphabet
//! positions `0..=i`:
//!
//! ```text
//! table[i][m] = table[i-1][m] + table[i][m - w[i]]
//! ```
//!
//! Columns are filled on demand and never recomputed. Growth is owned by a
//! single decomposer and goes through `&mut self`.

use crate::constants::{INITIAL_TABLE_COLUMNS, TABLE_GROWTH_FACTOR};
use crate::error::DecompError;
use tracing::debug;

/// Number of columns a table should hold to answer `mass`
///
/// The larger of `mass + 1` and the current size, times the growth factor,
/// so that growth always leaves room past the requested mass. Never more
/// than `max_mass + 1`, never less than `mass + 1`.
pub(crate) fn growth_target(current: u64, mass: u64, max_mass: u64) -> Result<usize, DecompError> {
    let requested = mass.saturating_add(1);
    let target = requested
        .max(current)
        .saturating_mul(TABLE_GROWTH_FACTOR)
        .max(INITIAL_TABLE_COLUMNS)
        .min(max_mass.saturating_add(1))
        .max(requested);

    usize::try_from(target).map_err(|_| DecompError::OutOfRange {
        requested: mass,
        max: usize::MAX as u64 - 1,
    })
}

/// Decomposition counts per alphabet prefix and mass
#[derive(Clone, Debug)]
pub struct CountTable {
    weights: Vec<u64>,
    rows: Vec<Vec<u64>>,
    max_mass: u64,
}

impl CountTable {
    /// Create an empty table for `weights`, never growing beyond `max_mass`
    pub fn new(weights: &[u64], max_mass: u64) -> Self {
        Self {
            weights: weights.to_vec(),
            rows: vec![Vec::new(); weights.len()],
            max_mass,
        }
    }

    /// Number of filled columns (masses `0..columns` are available)
    pub fn columns(&self) -> u64 {
        self.rows[0].len() as u64
    }

    /// Grow the table until `mass` is available
    ///
    /// On overflow of a count at or below `mass`, the table is left exactly
    /// as it was and `Overflow` is returned. Overflow above `mass` only stops
    /// the growth early.
    pub fn ensure(&mut self, mass: u64) -> Result<(), DecompError> {
        if mass < self.columns() {
            return Ok(());
        }
        if mass > self.max_mass {
            return Err(DecompError::OutOfRange {
                requested: mass,
                max: self.max_mass,
            });
        }

        let old = self.rows[0].len();
        let target = growth_target(old as u64, mass, self.max_mass)?;
        for row in &mut self.rows {
            row.reserve(target - old);
        }

        for m in old..target {
            for i in 0..self.weights.len() {
                let above = if i == 0 {
                    u64::from(m == 0)
                } else {
                    self.rows[i - 1][m]
                };
                let weight = self.weights[i] as usize;
                let own = if m >= weight {
                    self.rows[i][m - weight]
                } else {
                    0
                };

                match above.checked_add(own) {
                    Some(count) => self.rows[i].push(count),
                    None => return self.stop_growth(old, m, mass),
                }
            }
        }

        debug!(from = old, to = target, "count table grown");
        Ok(())
    }

    /// Handle a count overflow found while filling column `column`
    fn stop_growth(&mut self, old: usize, column: usize, mass: u64) -> Result<(), DecompError> {
        if column as u64 <= mass {
            for row in &mut self.rows {
                row.truncate(old);
            }
            return Err(DecompError::overflow(format!(
                "number of decompositions of mass {}",
                column
            )));
        }

        for row in &mut self.rows {
            row.truncate(column);
        }
        debug!(from = old, to = column, "count table growth stopped at overflow");
        Ok(())
    }

    /// Count for positions `0..=index` at `mass`, if the column is filled
    pub fn get(&self, index: usize, mass: u64) -> Option<u64> {
        usize::try_from(mass)
            .ok()
            .and_then(|m| self.rows[index].get(m).copied())
    }

    /// Count for positions `0..=index` at a filled column
    ///
    /// # Panics
    /// If `mass` is not below [`columns`](Self::columns).
    #[inline]
    pub fn count(&self, index: usize, mass: u64) -> u64 {
        self.rows[index][mass as usize]
    }

    /// Count for the full alphabet at a filled column
    pub fn total(&self, mass: u64) -> u64 {
        self.count(self.rows.len() - 1, mass)
    }
}
