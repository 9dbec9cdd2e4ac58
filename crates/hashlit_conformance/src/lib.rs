//! File formats and conformance helpers for hashlit.
//!
//! A [`Literal`] describes one map or set literal as JSON: its key type, the
//! ordered keys, optional values and the hash to place them with. A
//! [`TestVector`] pairs a literal with the layout the runtime hash table is
//! expected to produce for it. The vectors under `vectors/` are shared with
//! the runtime's own test suite.

#![warn(missing_docs)]

pub mod literal;
pub mod vector;

pub use literal::{BuiltLiteral, HashChoice, KeyType, Literal, LiteralError};
pub use vector::{ExpectedLayout, TestVector, VectorFile};

/// The shared runtime layout vectors.
pub const RUNTIME_LAYOUT_VECTORS: &str = include_str!("../vectors/runtime_layout.json");

/// Parses the shared runtime layout vectors.
pub fn runtime_layout_vectors() -> Result<VectorFile, serde_json::Error> {
    serde_json::from_str(RUNTIME_LAYOUT_VECTORS)
}
