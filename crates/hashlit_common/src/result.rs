//! The error a compilation pass reports when literal construction breaks.
//!
//! Index and cache errors that stem from the pass itself (a hash function
//! that answers differently for the same key, a table that cannot grow any
//! further) convert into [`InternalError`]. Nothing a user writes in a
//! literal can produce one, so it is reported as a compiler bug and never
//! as a diagnostic against the source program.

/// Result of a pass step that can only fail on a broken internal contract.
pub type HashlitResult<T> = Result<T, InternalError>;

/// A literal could not be built because the compiler broke the builder's
/// contract.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// What went wrong, usually the rendered index or cache error.
    pub message: String,
}

impl InternalError {
    /// Wraps a description of the broken contract.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
