//! The constant image handed to code generation.

use serde::{Deserialize, Serialize};

use crate::index::HashIndex;

/// Everything the runtime hash table reads from a preloaded literal.
///
/// The code generator writes these fields into the binary's constant section
/// in whatever encoding the target runtime expects. Integer arrays use `i32`
/// because that is the element type of the runtime's arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexLayout<K, V = ()> {
    /// Keys in insertion order.
    pub keys: Vec<K>,
    /// Values parallel to `keys`, absent for sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<V>>,
    /// Probe table slot of every key.
    pub presence: Vec<i32>,
    /// Probe table (`0` empty, `i + 1` key `i`).
    pub probe_table: Vec<i32>,
    /// Longest probe a lookup may need.
    pub max_probe_distance: u32,
    /// Number of entries.
    pub entry_count: usize,
    /// Hash fold shift.
    pub hash_shift: u32,
}

impl<K, V> IndexLayout<K, V> {
    /// Names the fields that differ between `self` and `other`, in
    /// declaration order. An empty result means the layouts are identical.
    pub fn mismatches(&self, other: &Self) -> Vec<&'static str>
    where
        K: PartialEq,
        V: PartialEq,
    {
        let mut fields = Vec::new();
        if self.keys != other.keys {
            fields.push("keys");
        }
        if self.values != other.values {
            fields.push("values");
        }
        if self.presence != other.presence {
            fields.push("presence");
        }
        if self.probe_table != other.probe_table {
            fields.push("probe_table");
        }
        if self.max_probe_distance != other.max_probe_distance {
            fields.push("max_probe_distance");
        }
        if self.entry_count != other.entry_count {
            fields.push("entry_count");
        }
        if self.hash_shift != other.hash_shift {
            fields.push("hash_shift");
        }
        fields
    }
}

impl<K: Clone, V: Clone> HashIndex<K, V> {
    /// Copies the index into its constant image.
    pub fn layout(&self) -> IndexLayout<K, V> {
        IndexLayout {
            keys: self.keys.clone(),
            values: self.values.clone(),
            presence: self.presence.clone(),
            probe_table: self.probe_table.clone(),
            max_probe_distance: self.max_probe_distance,
            entry_count: self.keys.len(),
            hash_shift: self.hash_shift,
        }
    }
}

impl<K, V> From<HashIndex<K, V>> for IndexLayout<K, V> {
    fn from(index: HashIndex<K, V>) -> Self {
        let entry_count = index.keys.len();
        IndexLayout {
            keys: index.keys,
            values: index.values,
            presence: index.presence,
            probe_table: index.probe_table,
            max_probe_distance: index.max_probe_distance,
            entry_count,
            hash_shift: index.hash_shift,
        }
    }
}
