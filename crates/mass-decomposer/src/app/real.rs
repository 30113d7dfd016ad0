//! Real-valued mass decomposition
//!
//! A real mass with an absolute error is mapped to a range of integer masses
//! wide enough to contain every true match despite the rounding of the
//! alphabet masses. Every integer decomposition in that range is then checked
//! against the real alphabet masses.

use crate::app::integer::IntegerMassDecomposer;
use crate::domain::decomposition::{CompositionBounds, Decomposition};
use crate::domain::options::DecomposerOptions;
use crate::domain::weights::{RoundingErrorBounds, Weights};
use crate::error::DecompError;
use rayon::prelude::*;
use std::ops::{ControlFlow, RangeInclusive};
use tracing::debug;

/// Decomposer for real masses within an absolute error
#[derive(Clone, Debug)]
pub struct RealMassDecomposer {
    weights: Weights,
    bounds: RoundingErrorBounds,
    decomposer: IntegerMassDecomposer,
}

impl RealMassDecomposer {
    /// Build a decomposer with default options
    pub fn new(weights: &Weights) -> Result<Self, DecompError> {
        Self::with_options(weights, DecomposerOptions::default())
    }

    /// Build a decomposer
    ///
    /// With `reduce_by_gcd`, the integer weights are divided by their GCD and
    /// the precision is scaled accordingly; results are unaffected.
    pub fn with_options(weights: &Weights, options: DecomposerOptions) -> Result<Self, DecompError> {
        let weights = if options.reduce_by_gcd {
            weights.reduce_by_gcd()
        } else {
            weights.clone()
        };
        let bounds = weights.rounding_error_bounds();
        let decomposer =
            IntegerMassDecomposer::with_options(&weights, options.with_gcd_reduction(false))?;
        debug!(
            precision = weights.precision(),
            min_error = bounds.min,
            max_error = bounds.max,
            "real mass decomposer ready"
        );

        Ok(Self {
            weights,
            bounds,
            decomposer,
        })
    }

    /// Weight set used for the integer tables
    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Rounding error bounds of the weight set
    pub fn rounding_error_bounds(&self) -> RoundingErrorBounds {
        self.bounds
    }

    /// Wrapped integer decomposer
    pub fn integer_decomposer(&self) -> &IntegerMassDecomposer {
        &self.decomposer
    }

    /// Integer masses that may hold a decomposition of `mass ± error`
    ///
    /// `None` if the range is empty. The lower bound is clamped to 1 when
    /// `mass - error <= 0`.
    ///
    /// # Errors
    /// `InvalidQuery` for a non-finite mass or a negative or non-finite
    /// error, `OutOfRange` if the upper bound exceeds the maximum mass.
    pub fn integer_mass_range(
        &self,
        mass: f64,
        error: f64,
    ) -> Result<Option<RangeInclusive<u64>>, DecompError> {
        if !mass.is_finite() {
            return Err(DecompError::invalid_query(format!(
                "mass must be finite, got {}",
                mass
            )));
        }
        if !error.is_finite() || error < 0.0 {
            return Err(DecompError::invalid_query(format!(
                "error must be non-negative and finite, got {}",
                error
            )));
        }

        let precision = self.weights.precision();
        let lower = mass - error;
        let start = if lower <= 0.0 {
            1.0
        } else {
            ((1.0 + self.bounds.min) * lower / precision).ceil().max(1.0)
        };
        let end = ((1.0 + self.bounds.max) * (mass + error) / precision).floor();
        if end < start {
            return Ok(None);
        }

        let max_mass = self.decomposer.options().max_mass;
        if end > max_mass as f64 {
            return Err(DecompError::OutOfRange {
                requested: end as u64,
                max: max_mass,
            });
        }

        Ok(Some(start as u64..=end as u64))
    }

    /// Every decomposition whose real mass lies within `error` of `mass`
    pub fn get_decompositions(&self, mass: f64, error: f64) -> Result<Vec<Decomposition>, DecompError> {
        let mut results = Vec::new();
        self.scan(mass, error, |d| results.push(d.to_vec()))?;
        Ok(results)
    }

    /// Like [`get_decompositions`](Self::get_decompositions), keeping only
    /// decompositions inside `bounds`
    pub fn get_decompositions_with_bounds(
        &self,
        mass: f64,
        error: f64,
        bounds: &CompositionBounds,
    ) -> Result<Vec<Decomposition>, DecompError> {
        if bounds.size() != self.weights.size() {
            return Err(DecompError::invalid_query(format!(
                "bounds cover {} positions, alphabet has {}",
                bounds.size(),
                self.weights.size()
            )));
        }

        let mut results = Vec::new();
        self.scan(mass, error, |d| {
            if bounds.contains(d) {
                results.push(d.to_vec());
            }
        })?;
        Ok(results)
    }

    /// Number of decompositions whose real mass lies within `error` of `mass`
    ///
    /// Decompositions are visited, not collected.
    pub fn get_number_of_decompositions(&self, mass: f64, error: f64) -> Result<u64, DecompError> {
        let mut count = 0u64;
        self.scan(mass, error, |_| count += 1)?;
        Ok(count)
    }

    /// Parallel version of [`get_decompositions`](Self::get_decompositions)
    ///
    /// Integer masses of the scan range are processed with rayon; results are
    /// returned in the same order as the sequential call.
    pub fn get_decompositions_parallel(
        &self,
        mass: f64,
        error: f64,
    ) -> Result<Vec<Decomposition>, DecompError> {
        let Some(range) = self.integer_mass_range(mass, error)? else {
            return Ok(Vec::new());
        };
        let masses: Vec<u64> = range.collect();

        let chunks = masses
            .par_iter()
            .map(|&integer_mass| {
                let mut results = Vec::new();
                self.decomposer
                    .for_each_decomposition(integer_mass, |d| {
                        if self.accepts(d, mass, error) {
                            results.push(d.to_vec());
                        }
                        ControlFlow::Continue(())
                    })
                    .map(|_| results)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(chunks.into_iter().flatten().collect())
    }

    /// Visit accepted decompositions over the whole scan range
    fn scan<F>(&self, mass: f64, error: f64, mut accept: F) -> Result<(), DecompError>
    where
        F: FnMut(&[u64]),
    {
        let Some(range) = self.integer_mass_range(mass, error)? else {
            return Ok(());
        };
        debug!(start = range.start(), end = range.end(), "scanning integer masses");

        for integer_mass in range {
            self.decomposer.for_each_decomposition(integer_mass, |d| {
                if self.accepts(d, mass, error) {
                    accept(d);
                }
                ControlFlow::Continue(())
            })?;
        }
        Ok(())
    }

    /// Check the real mass of a candidate decomposition
    #[inline]
    fn accepts(&self, decomposition: &[u64], mass: f64, error: f64) -> bool {
        (self.weights.parent_mass(decomposition) - mass).abs() <= error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_error_matches_integer() {
        let weights = Weights::from_integer_weights(vec![1, 2, 3]).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();

        let real = decomposer.get_decompositions(6.0, 0.0).unwrap();
        let integer = decomposer.integer_decomposer().get_all_decompositions(6).unwrap();
        assert_eq!(real, integer);
        assert_eq!(real.len(), 7);
        assert_eq!(decomposer.get_number_of_decompositions(6.0, 0.0).unwrap(), 7);
    }

    #[test]
    fn test_integer_mass_range() {
        let weights = Weights::from_integer_weights(vec![2, 3]).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();
        assert_eq!(decomposer.integer_mass_range(10.0, 0.5).unwrap(), Some(10..=10));
        assert_eq!(decomposer.integer_mass_range(10.0, 1.0).unwrap(), Some(9..=11));
    }

    #[test]
    fn test_range_lower_bound_clamps_to_one() {
        let weights = Weights::from_integer_weights(vec![2, 3]).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();
        assert_eq!(decomposer.integer_mass_range(1.0, 2.0).unwrap(), Some(1..=3));
        assert_eq!(decomposer.integer_mass_range(0.0, 0.0).unwrap(), None);
        assert_eq!(decomposer.integer_mass_range(-5.0, 1.0).unwrap(), None);
    }

    #[test]
    fn test_invalid_query() {
        let weights = Weights::from_integer_weights(vec![2, 3]).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();
        assert!(matches!(
            decomposer.get_decompositions(f64::NAN, 0.1),
            Err(DecompError::InvalidQuery { .. })
        ));
        assert!(matches!(
            decomposer.get_decompositions(10.0, -0.1),
            Err(DecompError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let weights = Weights::from_integer_weights(vec![2, 3]).unwrap();
        let options = DecomposerOptions::default().with_max_mass(100);
        let decomposer = RealMassDecomposer::with_options(&weights, options).unwrap();
        assert!(matches!(
            decomposer.get_decompositions(150.0, 0.0),
            Err(DecompError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_error_filters_parent_mass() {
        let weights = Weights::new(&[0.6, 0.7, 1.1, 1.5], 0.1).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();
        let results = decomposer.get_decompositions(4.4, 0.01).unwrap();
        assert_eq!(results.len(), 6);
        for d in &results {
            assert!((weights.parent_mass(d) - 4.4).abs() <= 0.01);
        }
    }

    #[test]
    fn test_gcd_reduction_keeps_results() {
        let weights = Weights::new(&[2.0, 4.0, 6.0], 0.5).unwrap();
        let plain = RealMassDecomposer::new(&weights).unwrap();
        let reduced = RealMassDecomposer::with_options(
            &weights,
            DecomposerOptions::default().with_gcd_reduction(true),
        )
        .unwrap();

        assert_eq!(reduced.weights().weights(), &[1, 2, 3]);
        assert_eq!(reduced.weights().precision(), 2.0);

        let mut expected = plain.get_decompositions(12.0, 0.1).unwrap();
        let mut actual = reduced.get_decompositions(12.0, 0.1).unwrap();
        expected.sort();
        actual.sort();
        assert_eq!(actual, expected);
        assert_eq!(actual.len(), 7);
    }

    #[test]
    fn test_bounds_filter() {
        let weights = Weights::from_integer_weights(vec![1, 2, 3]).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();
        let bounds = CompositionBounds::unbounded(3).with_bound(2, 1, 1);
        let mut results = decomposer
            .get_decompositions_with_bounds(6.0, 0.0, &bounds)
            .unwrap();
        results.sort();
        assert_eq!(results, vec![vec![1, 1, 1], vec![3, 0, 1]]);

        let wrong_size = CompositionBounds::unbounded(2);
        assert!(matches!(
            decomposer.get_decompositions_with_bounds(6.0, 0.0, &wrong_size),
            Err(DecompError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let weights = Weights::new(&[1.007825, 12.0, 14.003074, 15.994915], 1e-2).unwrap();
        let decomposer = RealMassDecomposer::new(&weights).unwrap();
        let sequential = decomposer.get_decompositions(60.021, 0.01).unwrap();
        let parallel = decomposer.get_decompositions_parallel(60.021, 0.01).unwrap();
        assert_eq!(sequential, parallel);
        assert!(!sequential.is_empty());
    }
}
