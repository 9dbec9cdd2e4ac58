//! Digests of literal signatures.
//!
//! A literal is named after the digest of its canonical signature, so two
//! compilations that emit the same literal give it the same symbol. The
//! digest is never used to decide whether two requests are equal; the cache
//! compares whole signatures for that.

use std::fmt;

use xxhash_rust::xxh3::xxh3_128;

/// XXH3-128 digest of a canonical signature encoding.
///
/// Displays as 32 lowercase hex digits (the little-endian digest bytes in
/// order), which is the suffix of every literal symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Digests an encoded signature.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxh3_128(data).to_le_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
