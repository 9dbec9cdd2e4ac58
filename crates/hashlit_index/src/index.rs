//! The finished, immutable hash index.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::builder::{previous_slot, shift_for, slot_for, IndexBuilder};
use crate::error::IndexError;

/// An open-addressing hash index laid out exactly as the runtime table would
/// be after inserting the same keys in the same order.
///
/// - `keys` and `values` hold entries in insertion order.
/// - `presence[i]` is the probe table slot of key `i`.
/// - `probe_table[slot]` is `0` for an empty slot, or `i + 1` for key `i`.
///
/// Equality and hashing compare content only: two indices holding the same
/// entries are equal regardless of insertion order or physical layout. A set
/// index (no values) is never equal to a map index.
#[derive(Debug, Clone, Serialize)]
pub struct HashIndex<K, V = ()> {
    pub(crate) keys: Vec<K>,
    pub(crate) values: Option<Vec<V>>,
    pub(crate) presence: Vec<i32>,
    pub(crate) probe_table: Vec<i32>,
    pub(crate) max_probe_distance: u32,
    pub(crate) hash_shift: u32,
}

impl<K: Eq, V> HashIndex<K, V> {
    /// Builds a map index with default builder options.
    ///
    /// See [`IndexBuilder::build`].
    pub fn build<H>(keys: Vec<K>, values: Option<Vec<V>>, hash_fn: H) -> Result<Self, IndexError>
    where
        H: Fn(&K) -> i32,
    {
        IndexBuilder::default().build(keys, values, hash_fn)
    }
}

impl<K: Eq> HashIndex<K> {
    /// Builds a set index with default builder options.
    pub fn build_set<H>(keys: Vec<K>, hash_fn: H) -> Result<Self, IndexError>
    where
        H: Fn(&K) -> i32,
    {
        IndexBuilder::default().build_set(keys, hash_fn)
    }
}

impl<K, V> HashIndex<K, V> {
    /// Keys in insertion order, duplicates collapsed to their first position.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Values parallel to [`keys`](Self::keys), or `None` for a set index.
    pub fn values(&self) -> Option<&[V]> {
        self.values.as_deref()
    }

    /// Probe table slot of every key, in insertion order.
    pub fn presence(&self) -> &[i32] {
        &self.presence
    }

    /// The probe table: `0` marks an empty slot, `i + 1` marks key `i`.
    pub fn probe_table(&self) -> &[i32] {
        &self.probe_table
    }

    /// Longest probe a lookup may need.
    pub fn max_probe_distance(&self) -> u32 {
        self.max_probe_distance
    }

    /// Right-shift that folds a scattered hash into a table slot.
    pub fn hash_shift(&self) -> u32 {
        self.hash_shift
    }

    /// Number of distinct keys.
    pub fn entry_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of slots in the probe table.
    pub fn table_size(&self) -> usize {
        self.probe_table.len()
    }

    /// Returns `true` if the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if this is a set index (no value storage).
    pub fn is_set(&self) -> bool {
        self.values.is_none()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    ///
    /// Values are `None` for a set index.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Option<&V>)> {
        self.keys
            .iter()
            .enumerate()
            .map(move |(i, key)| (key, self.values.as_ref().map(|values| &values[i])))
    }
}

impl<K: Eq, V> HashIndex<K, V> {
    /// Returns the storage position of `key`, scanning the probe table the
    /// way the runtime reader does.
    ///
    /// `hash_fn` must be the function the index was built with.
    pub fn find(&self, key: &K, hash_fn: impl Fn(&K) -> i32) -> Option<usize> {
        let table_size = self.probe_table.len();
        let mut slot = slot_for(hash_fn(key), self.hash_shift);
        for _ in 0..=self.max_probe_distance {
            let occupant = *self.probe_table.get(slot)?;
            if occupant <= 0 {
                return None;
            }
            let index = (occupant - 1) as usize;
            if self.keys.get(index) == Some(key) {
                return Some(index);
            }
            slot = previous_slot(slot, table_size);
        }
        None
    }

    /// Returns the value stored for `key`, if this is a map index containing it.
    pub fn get(&self, key: &K, hash_fn: impl Fn(&K) -> i32) -> Option<&V> {
        let index = self.find(key, hash_fn)?;
        self.values.as_ref().map(|values| &values[index])
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &K, hash_fn: impl Fn(&K) -> i32) -> bool {
        self.find(key, hash_fn).is_some()
    }

    /// Checks every layout invariant the runtime relies on.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvariantViolation`] naming the first key found
    /// to break an invariant.
    pub fn verify(&self, hash_fn: impl Fn(&K) -> i32) -> Result<(), IndexError> {
        let violation = |index: usize, reason: String| IndexError::InvariantViolation { index, reason };
        let table_size = self.probe_table.len();

        if !table_size.is_power_of_two() {
            return Err(violation(0, format!("table size {table_size} is not a power of two")));
        }
        if self.hash_shift != shift_for(table_size) {
            return Err(violation(
                0,
                format!("hash shift {} does not match table size {table_size}", self.hash_shift),
            ));
        }
        if let Some(values) = &self.values {
            if values.len() != self.keys.len() {
                return Err(violation(
                    0,
                    format!("{} values for {} keys", values.len(), self.keys.len()),
                ));
            }
        }
        if self.presence.len() != self.keys.len() {
            return Err(violation(
                0,
                format!("{} presence slots for {} keys", self.presence.len(), self.keys.len()),
            ));
        }

        for (index, &slot) in self.presence.iter().enumerate() {
            let occupant = usize::try_from(slot)
                .ok()
                .and_then(|slot| self.probe_table.get(slot));
            if occupant != Some(&(index as i32 + 1)) {
                return Err(violation(
                    index,
                    format!("slot {slot} does not point back at the key"),
                ));
            }
        }

        let occupied = self.probe_table.iter().filter(|&&occupant| occupant != 0).count();
        if occupied != self.keys.len() {
            return Err(violation(
                0,
                format!("{occupied} occupied slots for {} keys", self.keys.len()),
            ));
        }

        for (index, key) in self.keys.iter().enumerate() {
            if self.find(key, &hash_fn) != Some(index) {
                return Err(violation(
                    index,
                    format!(
                        "key not reachable within {} probes",
                        self.max_probe_distance
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for HashIndex<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.keys.len() != other.keys.len() || self.is_set() != other.is_set() {
            return false;
        }
        let positions: HashMap<&K, usize> = other
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key, i))
            .collect();
        self.keys.iter().enumerate().all(|(i, key)| {
            let Some(&j) = positions.get(key) else {
                return false;
            };
            match (&self.values, &other.values) {
                (Some(ours), Some(theirs)) => ours[i] == theirs[j],
                _ => true,
            }
        })
    }
}

impl<K: Eq + Hash, V: Eq> Eq for HashIndex<K, V> {}

impl<K: Hash, V: Hash> Hash for HashIndex<K, V> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        // Order-independent: a wrapping sum of per-entry hashes.
        let mut sum: u64 = 0;
        for (key, value) in self.iter() {
            let mut entry = entry_hash(key);
            if let Some(value) = value {
                entry ^= entry_hash(value);
            }
            sum = sum.wrapping_add(entry);
        }
        state.write_usize(self.keys.len());
        state.write_u8(u8::from(self.is_set()));
        state.write_u64(sum);
    }
}

fn entry_hash<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
