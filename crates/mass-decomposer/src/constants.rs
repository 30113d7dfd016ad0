//! Decomposition engine constants
//!
//! Limits for integer weights and masses, and the growth policy of the
//! on-demand DP tables.

// =============================================================================
// Weight and mass limits
// =============================================================================

/// Largest integer weight accepted after scaling by the precision
///
/// `weight[0]` is the row length of every residue table, so weights must fit a
/// table index on all supported targets.
pub const MAX_WEIGHT: u64 = u32::MAX as u64;

/// Default upper bound for integer masses accepted by queries
pub const DEFAULT_MAX_MASS: u64 = u32::MAX as u64;

// =============================================================================
// Table growth
// =============================================================================

/// Number of columns allocated on the first growth of a count/existence table
#[cfg(not(test))]
pub const INITIAL_TABLE_COLUMNS: u64 = 1 << 10; // 1,024

/// Number of columns allocated on first growth - reduced for unit tests
#[cfg(test)]
pub const INITIAL_TABLE_COLUMNS: u64 = 8;

/// Factor applied to the current column count when a table grows
pub const TABLE_GROWTH_FACTOR: u64 = 2;

// =============================================================================
// Real-valued decomposition
// =============================================================================

/// Default precision used to scale real alphabet masses to integer weights
pub const DEFAULT_PRECISION: f64 = 5.963_237_9e-4;
