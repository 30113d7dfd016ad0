//! Application layer - Decomposer implementations
//!
//! This module builds decomposers on top of the domain tables and answers
//! existence, single, count and enumeration queries.

pub mod classical;
pub mod integer;
pub mod real;
pub mod two_mass;
