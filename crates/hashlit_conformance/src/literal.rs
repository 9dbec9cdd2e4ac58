//! JSON description of a single map or set literal.

use hashlit_cache::{LiteralSymbol, Signature, SymbolPrefixes};
use hashlit_common::KeyHash;
use hashlit_index::{HashIndex, IndexBuilder, IndexError, IndexLayout};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The runtime type of a literal's keys, which selects its hash function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// String keys hashed with [`string_hash`](hashlit_common::string_hash).
    #[default]
    String,
    /// 32-bit integer keys hashed with [`int_hash`](hashlit_common::int_hash).
    Int,
    /// 64-bit integer keys hashed with [`long_hash`](hashlit_common::long_hash).
    Long,
}

impl KeyType {
    fn describe(self) -> &'static str {
        match self {
            KeyType::String => "a string",
            KeyType::Int => "a 32-bit integer",
            KeyType::Long => "a 64-bit integer",
        }
    }
}

/// Hash function used to place the keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HashChoice {
    /// The runtime hash of the key type.
    #[default]
    Natural,
    /// Every key hashes to `value`.
    Constant {
        /// The shared hash.
        value: i32,
    },
}

impl HashChoice {
    /// Returns `true` for [`HashChoice::Natural`].
    pub fn is_natural(&self) -> bool {
        matches!(self, HashChoice::Natural)
    }
}

/// Errors from turning a [`Literal`] into an index.
#[derive(Debug, thiserror::Error)]
pub enum LiteralError {
    /// A key does not have the declared key type.
    #[error("key #{index} is not {expected}: {found}")]
    KeyType {
        /// Position of the key.
        index: usize,
        /// The declared type.
        expected: &'static str,
        /// The offending JSON value.
        found: String,
    },

    /// Index construction failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// A map or set literal in source order.
///
/// ```json
/// {"key_type": "string", "keys": ["a", "b"], "values": [1, 2]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    /// Type of every key.
    #[serde(default)]
    pub key_type: KeyType,
    /// Keys in source order, duplicates allowed.
    pub keys: Vec<Value>,
    /// Values parallel to `keys`; absent for a set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    /// Hash used to place the keys.
    #[serde(default, skip_serializing_if = "HashChoice::is_natural")]
    pub hash: HashChoice,
}

impl Literal {
    /// Builds the index for this literal.
    pub fn build(&self, builder: &IndexBuilder) -> Result<BuiltLiteral, LiteralError> {
        Ok(match self.key_type {
            KeyType::String => BuiltLiteral::String(self.place(builder, self.string_keys()?)?),
            KeyType::Int => BuiltLiteral::Int(self.place(builder, self.int_keys()?)?),
            KeyType::Long => BuiltLiteral::Long(self.place(builder, self.long_keys()?)?),
        })
    }

    /// Names this literal the way the literal cache would.
    ///
    /// Keys are encoded with their declared type and values as their JSON
    /// text, so `{"key_type": "int", "keys": [1]}` and the same literal with
    /// `"long"` keys get different symbols. The hash choice does not take
    /// part in the name.
    pub fn symbol(&self, prefixes: &SymbolPrefixes) -> Result<LiteralSymbol, LiteralError> {
        let values: Option<Vec<String>> = self
            .values
            .as_ref()
            .map(|values| values.iter().map(Value::to_string).collect());
        let signature = match self.key_type {
            KeyType::String => Signature::new(&self.string_keys()?, values.as_deref())?,
            KeyType::Int => Signature::new(&self.int_keys()?, values.as_deref())?,
            KeyType::Long => Signature::new(&self.long_keys()?, values.as_deref())?,
        };
        Ok(LiteralSymbol::new(prefixes, &signature))
    }

    fn place<K: KeyHash + Eq>(
        &self,
        builder: &IndexBuilder,
        keys: Vec<K>,
    ) -> Result<HashIndex<K, Value>, LiteralError> {
        let values = self.values.clone();
        let index = match self.hash {
            HashChoice::Natural => builder.build(keys, values, |key: &K| key.key_hash())?,
            HashChoice::Constant { value } => builder.build(keys, values, move |_: &K| value)?,
        };
        Ok(index)
    }

    fn string_keys(&self) -> Result<Vec<String>, LiteralError> {
        self.typed_keys(|key| key.as_str().map(str::to_string))
    }

    fn int_keys(&self) -> Result<Vec<i32>, LiteralError> {
        self.typed_keys(|key| key.as_i64().and_then(|n| i32::try_from(n).ok()))
    }

    fn long_keys(&self) -> Result<Vec<i64>, LiteralError> {
        self.typed_keys(Value::as_i64)
    }

    fn typed_keys<K>(&self, convert: impl Fn(&Value) -> Option<K>) -> Result<Vec<K>, LiteralError> {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| {
                convert(key).ok_or_else(|| LiteralError::KeyType {
                    index,
                    expected: self.key_type.describe(),
                    found: key.to_string(),
                })
            })
            .collect()
    }
}

/// A built literal, keyed by its key type.
#[derive(Debug, Clone)]
pub enum BuiltLiteral {
    /// String-keyed index.
    String(HashIndex<String, Value>),
    /// 32-bit integer-keyed index.
    Int(HashIndex<i32, Value>),
    /// 64-bit integer-keyed index.
    Long(HashIndex<i64, Value>),
}

impl BuiltLiteral {
    /// Number of distinct keys.
    pub fn entry_count(&self) -> usize {
        match self {
            BuiltLiteral::String(index) => index.entry_count(),
            BuiltLiteral::Int(index) => index.entry_count(),
            BuiltLiteral::Long(index) => index.entry_count(),
        }
    }

    /// Size of the probe table.
    pub fn table_size(&self) -> usize {
        match self {
            BuiltLiteral::String(index) => index.table_size(),
            BuiltLiteral::Int(index) => index.table_size(),
            BuiltLiteral::Long(index) => index.table_size(),
        }
    }

    /// Longest probe a lookup may need.
    pub fn max_probe_distance(&self) -> u32 {
        match self {
            BuiltLiteral::String(index) => index.max_probe_distance(),
            BuiltLiteral::Int(index) => index.max_probe_distance(),
            BuiltLiteral::Long(index) => index.max_probe_distance(),
        }
    }

    /// Converts the index into its constant image with JSON keys.
    pub fn into_layout(self) -> IndexLayout<Value, Value> {
        match self {
            BuiltLiteral::String(index) => json_keys(index.into()),
            BuiltLiteral::Int(index) => json_keys(index.into()),
            BuiltLiteral::Long(index) => json_keys(index.into()),
        }
    }
}

fn json_keys<K: Into<Value>>(layout: IndexLayout<K, Value>) -> IndexLayout<Value, Value> {
    IndexLayout {
        keys: layout.keys.into_iter().map(Into::into).collect(),
        values: layout.values,
        presence: layout.presence,
        probe_table: layout.probe_table,
        max_probe_distance: layout.max_probe_distance,
        entry_count: layout.entry_count,
        hash_shift: layout.hash_shift,
    }
}
