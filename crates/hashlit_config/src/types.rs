//! Configuration types deserialized from `hashlit.toml`.

use hashlit_cache::SymbolPrefixes;
use hashlit_index::{IndexBuilder, MAX_TABLE_SIZE};
use serde::Deserialize;

/// The top-level configuration parsed from `hashlit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashlitConfig {
    /// Index construction settings.
    #[serde(default)]
    pub index: IndexSettings,
    /// Symbol naming settings.
    #[serde(default)]
    pub symbols: SymbolSettings,
}

/// The `[index]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexSettings {
    /// Largest probe table a build may grow to.
    pub max_table_size: usize,
    /// Check every built index against its invariants.
    pub verify: bool,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            max_table_size: MAX_TABLE_SIZE,
            verify: false,
        }
    }
}

impl IndexSettings {
    /// Returns an index builder configured from these settings.
    pub fn builder(&self) -> IndexBuilder {
        IndexBuilder::new()
            .with_max_table_size(self.max_table_size)
            .with_verify(self.verify)
    }
}

/// The `[symbols]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymbolSettings {
    /// Prefix for map literal symbols.
    pub map_prefix: String,
    /// Prefix for set literal symbols.
    pub set_prefix: String,
}

impl Default for SymbolSettings {
    fn default() -> Self {
        let prefixes = SymbolPrefixes::default();
        Self {
            map_prefix: prefixes.map,
            set_prefix: prefixes.set,
        }
    }
}

impl SymbolSettings {
    /// Returns the symbol prefixes for a literal cache.
    pub fn prefixes(&self) -> SymbolPrefixes {
        SymbolPrefixes {
            map: self.map_prefix.clone(),
            set: self.set_prefix.clone(),
        }
    }
}
