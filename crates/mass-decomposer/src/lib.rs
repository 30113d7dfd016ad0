//! mass-decomposer - Decomposition of masses over a weighted alphabet
//!
//! This crate provides functionality to:
//! - Normalize real alphabet masses into integer weights at a chosen precision
//! - Build extended residue tables for fast existence and enumeration queries
//! - Decompose integer masses (residue-table engine and classical DP oracle)
//! - Decompose real masses within an absolute error tolerance
//! - Decompose two weight sets simultaneously

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use app::classical::ClassicalDpMassDecomposer;
pub use app::integer::IntegerMassDecomposer;
pub use app::real::RealMassDecomposer;
pub use app::two_mass::{CombinedWeightDecomposer, SimultaneousDecomposer, TwoListDecomposer};
pub use constants::*;
pub use domain::decomposition::{CompositionBounds, Decomposition};
pub use domain::options::DecomposerOptions;
pub use domain::residue_table::{ResidueTable, Witness, build_residue_table};
pub use domain::weights::{RoundingErrorBounds, Weights};
pub use error::DecompError;
