//! Construction of [`HashIndex`] values.
//!
//! The placement rules here mirror the runtime hash table: Fibonacci hashing
//! folds the caller's 32-bit hash into a slot using the high bits, collisions
//! probe towards lower indices (wrapping at zero), and an insert whose probe
//! exceeds the tentative bound doubles the table and re-places every key.
//! Any change to these rules breaks compatibility with already emitted
//! literals.

use crate::error::IndexError;
use crate::index::HashIndex;

/// The 32-bit golden-ratio multiplier used to scatter hashes (`2^32 / φ`).
pub const GOLDEN_RATIO: u32 = 0x9E37_79B9;

/// Probe distance every table starts with before collisions raise it.
pub const INITIAL_MAX_PROBE_DISTANCE: usize = 2;

/// Largest probe table the builder will grow to by default.
///
/// Keeps every slot index and every 1-based key index representable as an
/// `i32`, which is what the runtime arrays hold.
pub const MAX_TABLE_SIZE: usize = 1 << 30;

/// Smallest table size ever produced.
const MIN_TABLE_SIZE: usize = 4;

/// Returns the initial probe table size for `count` keys: the next power of
/// two that is at least three times the key count.
///
/// Returns `None` if that size does not fit in `usize`.
pub fn table_size_for(count: usize) -> Option<usize> {
    count
        .max(1)
        .checked_mul(3)
        .and_then(usize::checked_next_power_of_two)
        .map(|size| size.max(MIN_TABLE_SIZE))
}

/// Returns the right-shift that folds a 32-bit product into `[0, table_size)`.
pub fn shift_for(table_size: usize) -> u32 {
    (table_size as u32).leading_zeros() + 1
}

/// Folds a key hash into its home slot for a table with the given shift.
pub fn slot_for(hash: i32, hash_shift: u32) -> usize {
    ((hash as u32).wrapping_mul(GOLDEN_RATIO) >> hash_shift) as usize
}

/// Returns the slot probed after `slot`, moving down and wrapping at zero.
pub(crate) fn previous_slot(slot: usize, table_size: usize) -> usize {
    if slot == 0 {
        table_size - 1
    } else {
        slot - 1
    }
}

/// Builder for [`HashIndex`] values.
///
/// The builder only holds options; the placement algorithm itself is fixed.
/// A single builder can be reused for any number of builds.
///
/// # Examples
///
/// ```
/// use hashlit_index::IndexBuilder;
///
/// let keys = vec!["a", "b", "c"];
/// let values = vec![1, 2, 3];
/// let index = IndexBuilder::default()
///     .with_verify(true)
///     .build(keys, Some(values), |k: &&str| k.len() as i32 * 31 + k.as_bytes()[0] as i32)
///     .unwrap();
/// assert_eq!(index.entry_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBuilder {
    max_table_size: usize,
    verify: bool,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self {
            max_table_size: MAX_TABLE_SIZE,
            verify: false,
        }
    }
}

impl IndexBuilder {
    /// Creates a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the probe table size growth may reach.
    ///
    /// Exceeding the cap fails the build with
    /// [`IndexError::TableLimitExceeded`] instead of doubling forever. Caps
    /// above [`MAX_TABLE_SIZE`] are lowered to it, since larger tables cannot
    /// be addressed by the runtime's `i32` slot arrays.
    pub fn with_max_table_size(mut self, size: usize) -> Self {
        self.max_table_size = size.min(MAX_TABLE_SIZE);
        self
    }

    /// Runs [`HashIndex::verify`] on every finished index before returning it.
    pub fn with_verify(mut self, value: bool) -> Self {
        self.verify = value;
        self
    }

    /// Returns the configured maximum table size.
    pub fn max_table_size(&self) -> usize {
        self.max_table_size
    }

    /// Returns whether finished indices are verified.
    pub fn verifies(&self) -> bool {
        self.verify
    }

    /// Builds an index over `keys`, with `values` stored in parallel when given.
    ///
    /// Keys keep their input order. A repeated key keeps the position of its
    /// first occurrence and takes the value of its last occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ShapeMismatch`] before hashing anything if the
    /// value list has a different length than the key list, and a contract
    /// violation if `hash_fn` is not deterministic or growth hits the table
    /// size limit.
    pub fn build<K, V, H>(
        &self,
        keys: Vec<K>,
        values: Option<Vec<V>>,
        hash_fn: H,
    ) -> Result<HashIndex<K, V>, IndexError>
    where
        K: Eq,
        H: Fn(&K) -> i32,
    {
        if let Some(values) = &values {
            if values.len() != keys.len() {
                return Err(IndexError::ShapeMismatch {
                    keys: keys.len(),
                    values: values.len(),
                });
            }
        }

        let table_size = table_size_for(keys.len()).ok_or(IndexError::TableLimitExceeded {
            requested: usize::MAX,
            limit: self.max_table_size,
        })?;
        if table_size > self.max_table_size {
            return Err(IndexError::TableLimitExceeded {
                requested: table_size,
                limit: self.max_table_size,
            });
        }

        let mut construction = Construction::new(
            &hash_fn,
            keys.len(),
            values.is_some(),
            table_size,
            self.max_table_size,
        );
        match values {
            Some(values) => {
                for (key, value) in keys.into_iter().zip(values) {
                    construction.insert(key, Some(value))?;
                }
            }
            None => {
                for key in keys {
                    construction.insert(key, None)?;
                }
            }
        }

        let index = construction.finish();
        if self.verify {
            index.verify(&hash_fn)?;
        }
        Ok(index)
    }

    /// Builds a set index over `keys`. The result has no value storage.
    pub fn build_set<K, H>(&self, keys: Vec<K>, hash_fn: H) -> Result<HashIndex<K>, IndexError>
    where
        K: Eq,
        H: Fn(&K) -> i32,
    {
        self.build(keys, None::<Vec<()>>, hash_fn)
    }
}

/// Mutable state of one build. Dropped once the index is finished.
struct Construction<'h, K, V, H> {
    hash_fn: &'h H,
    keys: Vec<K>,
    values: Option<Vec<V>>,
    /// Raw hash of every stored key, used to detect non-deterministic hashing.
    hashes: Vec<i32>,
    presence: Vec<i32>,
    probe_table: Vec<i32>,
    max_probe_distance: usize,
    hash_shift: u32,
    max_table_size: usize,
}

impl<'h, K, V, H> Construction<'h, K, V, H>
where
    K: Eq,
    H: Fn(&K) -> i32,
{
    fn new(
        hash_fn: &'h H,
        capacity: usize,
        with_values: bool,
        table_size: usize,
        max_table_size: usize,
    ) -> Self {
        Self {
            hash_fn,
            keys: Vec::with_capacity(capacity),
            values: with_values.then(|| Vec::with_capacity(capacity)),
            hashes: Vec::with_capacity(capacity),
            presence: Vec::with_capacity(capacity),
            probe_table: vec![0; table_size],
            max_probe_distance: INITIAL_MAX_PROBE_DISTANCE,
            hash_shift: shift_for(table_size),
            max_table_size,
        }
    }

    fn insert(&mut self, key: K, value: Option<V>) -> Result<(), IndexError> {
        let hash = (self.hash_fn)(&key);
        'retry: loop {
            let table_size = self.probe_table.len();
            let tentative_max = (self.max_probe_distance * 2).min(table_size / 2);
            let mut slot = slot_for(hash, self.hash_shift);
            let mut probe_distance = 0;
            loop {
                let occupant = self.probe_table[slot];
                if occupant <= 0 {
                    self.append(key, value, hash, slot, probe_distance);
                    return Ok(());
                }
                let existing = (occupant - 1) as usize;
                if self.keys[existing] == key {
                    if self.hashes[existing] != hash {
                        return Err(IndexError::NondeterministicHash {
                            index: existing,
                            first: self.hashes[existing],
                            second: hash,
                        });
                    }
                    if let (Some(values), Some(value)) = (self.values.as_mut(), value) {
                        values[existing] = value;
                    }
                    return Ok(());
                }
                probe_distance += 1;
                if probe_distance > tentative_max {
                    self.grow()?;
                    continue 'retry;
                }
                slot = previous_slot(slot, table_size);
            }
        }
    }

    fn append(&mut self, key: K, value: Option<V>, hash: i32, slot: usize, probe_distance: usize) {
        let index = self.keys.len();
        self.keys.push(key);
        if let (Some(values), Some(value)) = (self.values.as_mut(), value) {
            values.push(value);
        }
        self.hashes.push(hash);
        self.presence.push(slot as i32);
        self.probe_table[slot] = index as i32 + 1;
        if probe_distance > self.max_probe_distance {
            self.max_probe_distance = probe_distance;
        }
    }

    /// Doubles the probe table and re-places every stored key in order.
    fn grow(&mut self) -> Result<(), IndexError> {
        let old_size = self.probe_table.len();
        let new_size = old_size * 2;
        if new_size > self.max_table_size {
            return Err(IndexError::TableLimitExceeded {
                requested: new_size,
                limit: self.max_table_size,
            });
        }
        tracing::debug!(
            old_size,
            new_size,
            placed = self.keys.len(),
            max_probe_distance = self.max_probe_distance,
            "growing probe table"
        );

        self.probe_table = vec![0; new_size];
        self.hash_shift = shift_for(new_size);
        let bound = (self.max_probe_distance * 2).min(new_size / 2);
        for index in 0..self.keys.len() {
            let hash = (self.hash_fn)(&self.keys[index]);
            if hash != self.hashes[index] {
                return Err(IndexError::NondeterministicHash {
                    index,
                    first: self.hashes[index],
                    second: hash,
                });
            }
            self.replace(index, hash, bound)?;
        }
        Ok(())
    }

    fn replace(&mut self, index: usize, hash: i32, bound: usize) -> Result<(), IndexError> {
        let table_size = self.probe_table.len();
        let mut slot = slot_for(hash, self.hash_shift);
        let mut probe_distance = 0;
        loop {
            if self.probe_table[slot] == 0 {
                self.probe_table[slot] = index as i32 + 1;
                self.presence[index] = slot as i32;
                if probe_distance > self.max_probe_distance {
                    self.max_probe_distance = probe_distance;
                }
                return Ok(());
            }
            probe_distance += 1;
            if probe_distance > bound {
                return Err(IndexError::RehashFailed { table_size, index });
            }
            slot = previous_slot(slot, table_size);
        }
    }

    fn finish(self) -> HashIndex<K, V> {
        tracing::trace!(
            entries = self.keys.len(),
            table_size = self.probe_table.len(),
            max_probe_distance = self.max_probe_distance,
            "built hash index"
        );
        HashIndex {
            keys: self.keys,
            values: self.values,
            presence: self.presence,
            probe_table: self.probe_table,
            max_probe_distance: self.max_probe_distance as u32,
            hash_shift: self.hash_shift,
        }
    }
}
