//! Error types for the decomposition engine

use thiserror::Error;

/// Errors raised while building decomposers or answering queries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompError {
    /// Alphabet cannot be turned into a usable weight set
    #[error("Invalid alphabet: {reason}")]
    InvalidAlphabet {
        /// What is wrong with the alphabet
        reason: String,
    },

    /// Mass (or a table index derived from it) exceeds the configured limit
    #[error("Mass {requested} is out of range (maximum {max})")]
    OutOfRange {
        /// Requested integer mass
        requested: u64,
        /// Largest accepted integer mass
        max: u64,
    },

    /// Intermediate value does not fit the integer type
    #[error("Arithmetic overflow while computing {context}")]
    Overflow {
        /// Which quantity overflowed
        context: String,
    },

    /// Real-valued query parameters are not usable
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// What is wrong with the query
        reason: String,
    },
}

impl DecompError {
    /// Create an InvalidAlphabet error.
    pub fn invalid_alphabet(reason: impl Into<String>) -> Self {
        Self::InvalidAlphabet {
            reason: reason.into(),
        }
    }

    /// Create an Overflow error.
    pub fn overflow(context: impl Into<String>) -> Self {
        Self::Overflow {
            context: context.into(),
        }
    }

    /// Create an InvalidQuery error.
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }
}
