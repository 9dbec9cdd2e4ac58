//! Shared foundational types used across the hashlit crates.
//!
//! This crate provides content hashing for literal signatures, the canonical
//! byte encoding of literal keys and values, the stable key hash functions
//! literals are placed with, and the internal error type.

#![warn(missing_docs)]

pub mod canonical;
pub mod hash;
pub mod key_hash;
pub mod result;

pub use canonical::Canonical;
pub use hash::ContentHash;
pub use key_hash::{int_hash, long_hash, string_hash, KeyHash};
pub use result::{HashlitResult, InternalError};
