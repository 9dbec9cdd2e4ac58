//! Error types for literal cache operations.

use hashlit_common::InternalError;
use hashlit_index::IndexError;

/// Errors that can occur while resolving a literal through the cache.
///
/// A failed request leaves the cache unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The literal could not be built.
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl CacheError {
    /// Returns `true` if the failure is a hash function contract violation,
    /// which must be reported as an internal compiler error.
    pub fn is_contract_violation(&self) -> bool {
        match self {
            CacheError::Index(err) => err.is_contract_violation(),
        }
    }
}

impl From<CacheError> for InternalError {
    fn from(err: CacheError) -> Self {
        InternalError::new(err.to_string())
    }
}
