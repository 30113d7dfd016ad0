//! Domain layer - Pure computational logic
//!
//! This module contains the weight normalization and the tables the
//! decomposers are built on. Nothing here performs I/O.

pub mod count_table;
pub mod decomposition;
pub mod existence_table;
pub mod options;
pub mod residue_table;
pub mod weights;
