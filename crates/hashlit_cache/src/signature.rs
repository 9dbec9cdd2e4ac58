//! Canonical signatures of literal requests.
//!
//! A signature is the full canonical encoding of a request, not a digest of
//! it: two requests share a cache entry exactly when their ordered keys (and
//! values) encode to the same bytes.

use std::fmt;

use hashlit_common::{Canonical, ContentHash};
use hashlit_index::IndexError;

/// Whether a literal is a map (keys with values) or a set (keys only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// A key/value literal.
    Map,
    /// A keys-only literal.
    Set,
}

impl LiteralKind {
    fn tag(self) -> u8 {
        match self {
            LiteralKind::Map => b'M',
            LiteralKind::Set => b'S',
        }
    }
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Map => write!(f, "map"),
            LiteralKind::Set => write!(f, "set"),
        }
    }
}

/// Canonical encoding of an ordered literal request.
///
/// Layout: kind tag, little-endian `u64` entry count, then each key followed
/// by its value (maps only) in their self-delimiting [`Canonical`] encoding.
/// Order is significant: `[a, b]` and `[b, a]` have different signatures.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    kind: LiteralKind,
    len: usize,
    bytes: Box<[u8]>,
}

impl Signature {
    /// Computes the signature of a request. `values` of `None` makes a set.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ShapeMismatch`] if `values` has a different
    /// length than `keys`.
    pub fn new<K: Canonical, V: Canonical>(
        keys: &[K],
        values: Option<&[V]>,
    ) -> Result<Self, IndexError> {
        let kind = match values {
            Some(values) if values.len() != keys.len() => {
                return Err(IndexError::ShapeMismatch {
                    keys: keys.len(),
                    values: values.len(),
                });
            }
            Some(_) => LiteralKind::Map,
            None => LiteralKind::Set,
        };

        let mut bytes = Vec::with_capacity(9 + keys.len() * 16);
        bytes.push(kind.tag());
        bytes.extend_from_slice(&(keys.len() as u64).to_le_bytes());
        for (i, key) in keys.iter().enumerate() {
            key.write_canonical(&mut bytes);
            if let Some(values) = values {
                values[i].write_canonical(&mut bytes);
            }
        }

        Ok(Self {
            kind,
            len: keys.len(),
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// Returns whether the request was for a map or a set.
    pub fn kind(&self) -> LiteralKind {
        self.kind
    }

    /// Number of entries in the request, before duplicates collapse.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the request had no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The full canonical encoding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// XXH3-128 digest of the encoding, used for naming only.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::from_bytes(&self.bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]:{}", self.kind, self.len, self.content_hash())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("kind", &self.kind)
            .field("len", &self.len)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
