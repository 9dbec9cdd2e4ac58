//! Content-addressed deduplication of compile-time hash literals.
//!
//! Many call sites in one compilation can ask for the same map or set literal.
//! [`LiteralCache`] keys every request by a canonical [`Signature`] of its
//! ordered content, builds the [`HashIndex`](hashlit_index::HashIndex) once,
//! lets the caller produce its downstream artifact once, and hands the same
//! artifact instance to every later request with equal content.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod signature;
pub mod symbol;

pub use cache::{CacheEntry, CacheStats, LiteralCache};
pub use error::CacheError;
pub use signature::{LiteralKind, Signature};
pub use symbol::{LiteralSymbol, SymbolPrefixes};
