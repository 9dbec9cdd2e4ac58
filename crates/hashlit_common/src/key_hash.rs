//! Stable 32-bit key hashes for build-time literals.
//!
//! A literal built at compile time is only usable if the runtime computes the
//! same hash for the same key. The integer hashes here are the conventional
//! identity and high/low fold. The string hash is this crate's own choice; a
//! runtime whose string hash differs must hand its own function to the
//! builder (see `LiteralCache::with_string_hash` in `hashlit_cache`).

use xxhash_rust::xxh3::xxh3_64;

/// Hashes a string over its little-endian UTF-16 encoding.
///
/// The hash covers UTF-16 code units, not UTF-8 bytes, and the 64-bit XXH3
/// result is truncated to its low 32 bits. A runtime reading the literal
/// must hash strings the same way; this is not CityHash64 or any other
/// runtime's built-in string hash.
pub fn string_hash(s: &str) -> i32 {
    let mut units = Vec::with_capacity(s.len() * 2);
    for unit in s.encode_utf16() {
        units.extend_from_slice(&unit.to_le_bytes());
    }
    xxh3_64(&units) as i32
}

/// Hashes a 32-bit integer key. Integers are their own hash.
pub fn int_hash(value: i32) -> i32 {
    value
}

/// Hashes a 64-bit integer key by folding the high half onto the low half.
pub fn long_hash(value: i64) -> i32 {
    let bits = value as u64;
    (bits ^ (bits >> 32)) as i32
}

/// Key types with a stable 32-bit hash.
pub trait KeyHash {
    /// Returns the 32-bit hash of this key.
    fn key_hash(&self) -> i32;
}

impl KeyHash for str {
    fn key_hash(&self) -> i32 {
        string_hash(self)
    }
}

impl KeyHash for String {
    fn key_hash(&self) -> i32 {
        string_hash(self)
    }
}

impl KeyHash for i32 {
    fn key_hash(&self) -> i32 {
        int_hash(*self)
    }
}

impl KeyHash for i64 {
    fn key_hash(&self) -> i32 {
        long_hash(*self)
    }
}

impl<T: KeyHash + ?Sized> KeyHash for &T {
    fn key_hash(&self) -> i32 {
        (**self).key_hash()
    }
}
