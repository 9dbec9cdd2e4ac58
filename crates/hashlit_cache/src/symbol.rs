//! Symbol names for emitted literal constants.

use std::fmt;

use crate::signature::{LiteralKind, Signature};

/// Prefixes placed in front of the content hash of emitted literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPrefixes {
    /// Prefix for map literals.
    pub map: String,
    /// Prefix for set literals.
    pub set: String,
}

impl Default for SymbolPrefixes {
    fn default() -> Self {
        Self {
            map: "khashmap".to_string(),
            set: "khashset".to_string(),
        }
    }
}

impl SymbolPrefixes {
    /// Returns the prefix for literals of the given kind.
    pub fn for_kind(&self, kind: LiteralKind) -> &str {
        match kind {
            LiteralKind::Map => &self.map,
            LiteralKind::Set => &self.set,
        }
    }
}

/// Linkage name of an emitted literal, `<prefix>:<content hash>`.
///
/// Derived from the signature bytes, so equal literals in different
/// compilation units get the same name and can be merged by the linker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralSymbol(String);

impl LiteralSymbol {
    /// Names the literal described by `signature`.
    pub fn new(prefixes: &SymbolPrefixes, signature: &Signature) -> Self {
        Self(format!(
            "{}:{}",
            prefixes.for_kind(signature.kind()),
            signature.content_hash()
        ))
    }

    /// The symbol name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LiteralSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
