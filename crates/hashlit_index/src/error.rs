//! Error types for hash index construction and verification.

use hashlit_common::InternalError;

/// Errors that can occur while building or verifying a [`HashIndex`](crate::HashIndex).
///
/// Apart from [`ShapeMismatch`](Self::ShapeMismatch), every variant means the
/// caller broke the hash function contract. None of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// A value list was supplied whose length differs from the key list.
    #[error("shape mismatch: {keys} keys but {values} values")]
    ShapeMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// The hash function returned different hashes for equal keys.
    #[error("hash function is not deterministic for key #{index}: {first} then {second}")]
    NondeterministicHash {
        /// Storage position of the key whose hash changed.
        index: usize,
        /// Hash observed when the key was first placed.
        first: i32,
        /// Hash observed on a later call.
        second: i32,
    },

    /// A key could not be re-placed after the probe table was doubled.
    #[error("rehash into {table_size} slots could not place key #{index}")]
    RehashFailed {
        /// Size of the table that was being filled.
        table_size: usize,
        /// Storage position of the key that did not fit.
        index: usize,
    },

    /// Growing the probe table would exceed the configured size limit.
    #[error("probe table of {requested} slots exceeds the limit of {limit}")]
    TableLimitExceeded {
        /// Table size that growth asked for.
        requested: usize,
        /// Configured maximum table size.
        limit: usize,
    },

    /// A finished index does not satisfy its layout invariants.
    #[error("invariant violated at key #{index}: {reason}")]
    InvariantViolation {
        /// Storage position of the offending key.
        index: usize,
        /// Description of the violated invariant.
        reason: String,
    },
}

impl IndexError {
    /// Returns `true` if the error signals a broken hash function contract
    /// rather than malformed caller input.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, IndexError::ShapeMismatch { .. })
    }
}

impl From<IndexError> for InternalError {
    fn from(err: IndexError) -> Self {
        InternalError::new(err.to_string())
    }
}
