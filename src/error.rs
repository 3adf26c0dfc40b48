//! Error types for table operations.
//!
//! Every fallible table operation reports one of these variants instead of
//! aborting. Process-level handling (exit codes, diagnostics) lives in the
//! `spam-detector` binary only.

use thiserror::Error;

/// Result type alias for table operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by [`HashMap`](crate::HashMap) and
/// [`HashTable`](crate::HashTable).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// `insert` was called with a key that is already present.
    #[error("key already present in table")]
    DuplicateKey,

    /// A lookup that requires the key to be present did not find it.
    #[error("key not found in table")]
    KeyNotFound,

    /// Bulk construction was given key and value sequences of different
    /// lengths.
    #[error("got {keys} keys but {values} values")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// The requested load factor bounds cannot be maintained by doubling and
    /// halving a power-of-two capacity.
    #[error("invalid load factors: lower {lower}, upper {upper}")]
    InvalidLoadFactors {
        /// Requested lower bound.
        lower: f64,
        /// Requested upper bound.
        upper: f64,
    },
}

impl Error {
    /// Create a new LengthMismatch error
    pub fn length_mismatch(keys: usize, values: usize) -> Self {
        Error::LengthMismatch { keys, values }
    }
}
