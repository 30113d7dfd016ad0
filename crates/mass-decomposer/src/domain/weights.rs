//! Alphabet weight normalization
//!
//! Converts real alphabet masses into positive integer weights at a chosen
//! precision and keeps the original masses for re-scaling results.

use crate::constants::{DEFAULT_PRECISION, MAX_WEIGHT};
use crate::error::DecompError;

/// Proportional rounding error bounds of a weight set
///
/// For every position, `precision * weight[i] = mass[i] * (1 + e_i)` with
/// `min <= e_i <= max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundingErrorBounds {
    /// Smallest (most negative) proportional error
    pub min: f64,
    /// Largest proportional error
    pub max: f64,
}

/// Integer weights derived from an ordered alphabet of real masses
///
/// The order of the alphabet is preserved and defines the index of every
/// decomposition. Re-scaling produces a new value; a `Weights` never changes
/// after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Weights {
    alphabet_masses: Vec<f64>,
    weights: Vec<u64>,
    precision: f64,
}

impl Weights {
    /// Scale real alphabet masses to integer weights
    ///
    /// `weight[i] = round(mass[i] / precision)`.
    ///
    /// # Errors
    /// `InvalidAlphabet` if the alphabet is empty, the precision or a mass is
    /// not a positive finite number, or a derived weight is 0 or above
    /// [`MAX_WEIGHT`].
    pub fn new(masses: &[f64], precision: f64) -> Result<Self, DecompError> {
        if masses.is_empty() {
            return Err(DecompError::invalid_alphabet("alphabet is empty"));
        }
        if !precision.is_finite() || precision <= 0.0 {
            return Err(DecompError::invalid_alphabet(format!(
                "precision must be positive and finite, got {}",
                precision
            )));
        }

        let mut weights = Vec::with_capacity(masses.len());
        for (i, &mass) in masses.iter().enumerate() {
            if !mass.is_finite() || mass <= 0.0 {
                return Err(DecompError::invalid_alphabet(format!(
                    "mass at position {} must be positive and finite, got {}",
                    i, mass
                )));
            }
            let scaled = (mass / precision).round();
            if scaled < 1.0 {
                return Err(DecompError::invalid_alphabet(format!(
                    "mass {} at position {} rounds to a zero weight at precision {}",
                    mass, i, precision
                )));
            }
            if scaled > MAX_WEIGHT as f64 {
                return Err(DecompError::invalid_alphabet(format!(
                    "mass {} at position {} exceeds the maximum weight {} at precision {}",
                    mass, i, MAX_WEIGHT, precision
                )));
            }
            weights.push(scaled as u64);
        }

        Ok(Self {
            alphabet_masses: masses.to_vec(),
            weights,
            precision,
        })
    }

    /// Scale real alphabet masses using [`DEFAULT_PRECISION`]
    pub fn with_default_precision(masses: &[f64]) -> Result<Self, DecompError> {
        Self::new(masses, DEFAULT_PRECISION)
    }

    /// Build a weight set directly from integer weights
    ///
    /// The precision is 1 and every alphabet mass equals its weight.
    pub fn from_integer_weights(weights: Vec<u64>) -> Result<Self, DecompError> {
        if weights.is_empty() {
            return Err(DecompError::invalid_alphabet("alphabet is empty"));
        }
        if let Some(i) = weights.iter().position(|&w| w == 0) {
            return Err(DecompError::invalid_alphabet(format!(
                "weight at position {} is zero",
                i
            )));
        }
        if let Some(&w) = weights.iter().find(|&&w| w > MAX_WEIGHT) {
            return Err(DecompError::invalid_alphabet(format!(
                "weight {} exceeds the maximum weight {}",
                w, MAX_WEIGHT
            )));
        }

        Ok(Self {
            alphabet_masses: weights.iter().map(|&w| w as f64).collect(),
            weights,
            precision: 1.0,
        })
    }

    /// Number of alphabet positions
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    /// Integer weight at position `i`
    pub fn weight(&self, i: usize) -> u64 {
        self.weights[i]
    }

    /// All integer weights in alphabet order
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Original real mass at position `i`
    pub fn alphabet_mass(&self, i: usize) -> f64 {
        self.alphabet_masses[i]
    }

    /// All original real masses in alphabet order
    pub fn alphabet_masses(&self) -> &[f64] {
        &self.alphabet_masses
    }

    /// Real mass represented by one integer unit
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Greatest common divisor of all weights
    pub fn gcd(&self) -> u64 {
        self.weights.iter().copied().fold(0, gcd)
    }

    /// Divide every weight by the GCD of all weights
    ///
    /// The precision is multiplied by the same factor so that
    /// `precision * weight[i]` keeps approximating `mass[i]`.
    pub fn reduce_by_gcd(&self) -> Self {
        let divisor = self.gcd();
        if divisor <= 1 {
            return self.clone();
        }

        Self {
            alphabet_masses: self.alphabet_masses.clone(),
            weights: self.weights.iter().map(|w| w / divisor).collect(),
            precision: self.precision * divisor as f64,
        }
    }

    /// Check whether the weights are in non-decreasing order
    ///
    /// Residue tables use `weight[0]` as modulus, so an ascending alphabet
    /// gives the smallest tables.
    pub fn is_ascending(&self) -> bool {
        self.weights.windows(2).all(|w| w[0] <= w[1])
    }

    /// Proportional rounding error bounds introduced by the integer scaling
    pub fn rounding_error_bounds(&self) -> RoundingErrorBounds {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for (&weight, &mass) in self.weights.iter().zip(&self.alphabet_masses) {
            let error = (self.precision * weight as f64 - mass) / mass;
            min = min.min(error);
            max = max.max(error);
        }

        RoundingErrorBounds { min, max }
    }

    /// Real mass of a decomposition using the original alphabet masses
    pub fn parent_mass(&self, decomposition: &[u64]) -> f64 {
        decomposition
            .iter()
            .zip(&self.alphabet_masses)
            .map(|(&count, &mass)| count as f64 * mass)
            .sum()
    }

    /// Integer mass of a decomposition, `None` on overflow
    pub fn integer_mass(&self, decomposition: &[u64]) -> Option<u64> {
        integer_mass(&self.weights, decomposition)
    }
}

/// Integer mass of a decomposition over the given weights, `None` on overflow
pub fn integer_mass(weights: &[u64], decomposition: &[u64]) -> Option<u64> {
    decomposition
        .iter()
        .zip(weights)
        .try_fold(0u64, |acc, (&count, &weight)| {
            acc.checked_add(count.checked_mul(weight)?)
        })
}

/// Greatest common divisor (Euclid)
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
