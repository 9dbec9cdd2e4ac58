//! The per-compilation literal cache.
//!
//! `LiteralCache` ties together signature computation, index construction,
//! and the caller's artifact production. Entries are only ever added: content
//! is immutable, so nothing needs invalidating until the compilation ends and
//! the cache is dropped.

use std::collections::HashMap;
use std::rc::Rc;

use hashlit_common::{string_hash, Canonical};
use hashlit_index::{HashIndex, IndexBuilder};

use crate::error::CacheError;
use crate::signature::Signature;
use crate::symbol::{LiteralSymbol, SymbolPrefixes};

/// A literal built once and shared by every request with the same content.
#[derive(Debug)]
pub struct CacheEntry<K, V, T> {
    index: HashIndex<K, V>,
    symbol: LiteralSymbol,
    artifact: Rc<T>,
}

impl<K, V, T> CacheEntry<K, V, T> {
    /// The built hash index.
    pub fn index(&self) -> &HashIndex<K, V> {
        &self.index
    }

    /// The linkage name of the literal.
    pub fn symbol(&self) -> &LiteralSymbol {
        &self.symbol
    }

    /// The artifact produced for this literal.
    pub fn artifact(&self) -> &Rc<T> {
        &self.artifact
    }
}

/// Hit/miss counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from an existing entry.
    pub hits: u64,
    /// Requests that built a new entry.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// Content-addressed cache of built literals for one compilation.
///
/// Pass the cache explicitly through the compilation pass that emits
/// literals; create a fresh one (or [`clear`](Self::clear) it) for every
/// compilation. Artifacts are handed out as `Rc<T>`, so the cache cannot be
/// shared between threads; a compiler that compiles units in parallel gives
/// each unit its own cache.
pub struct LiteralCache<K, V, T> {
    entries: HashMap<Signature, CacheEntry<K, V, T>>,
    builder: IndexBuilder,
    prefixes: SymbolPrefixes,
    string_hash: fn(&str) -> i32,
    hits: u64,
    misses: u64,
}

impl<K, V, T> Default for LiteralCache<K, V, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, T> LiteralCache<K, V, T> {
    /// Creates an empty cache with default builder options and symbol prefixes.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            builder: IndexBuilder::default(),
            prefixes: SymbolPrefixes::default(),
            string_hash,
            hits: 0,
            misses: 0,
        }
    }

    /// Replaces the builder used for cache misses.
    pub fn with_builder(mut self, builder: IndexBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Replaces the symbol prefixes used to name new entries.
    pub fn with_symbols(mut self, prefixes: SymbolPrefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Replaces the hash used by [`map_literal`](LiteralCache::map_literal)
    /// and [`set_literal`](LiteralCache::set_literal).
    ///
    /// Set this to the target runtime's string hash when it is not
    /// [`string_hash`]; otherwise runtime lookups start from the wrong slots.
    pub fn with_string_hash(mut self, hash: fn(&str) -> i32) -> Self {
        self.string_hash = hash;
        self
    }

    /// Returns the entry stored under `signature`, if any.
    pub fn lookup(&self, signature: &Signature) -> Option<&CacheEntry<K, V, T>> {
        self.entries.get(signature)
    }

    /// Iterates over all stored entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (&Signature, &CacheEntry<K, V, T>)> {
        self.entries.iter()
    }

    /// Number of distinct literals stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    /// Drops every entry and resets the counters, readying the cache for a
    /// new compilation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl<K, V, T> LiteralCache<K, V, T>
where
    K: Canonical + Eq,
    V: Canonical,
{
    /// Returns the artifact for the literal with the given ordered content,
    /// building it on first request.
    ///
    /// On a miss the index is built with `hash_fn`, `produce` is called
    /// exactly once with the index and its symbol, and the result is stored.
    /// On a hit neither `hash_fn` nor `produce` is called and the stored
    /// artifact instance is returned. `values` of `None` requests a set.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not match `keys` in length or the
    /// index cannot be built. Nothing is stored on failure.
    pub fn get_or_build<H, F>(
        &mut self,
        keys: Vec<K>,
        values: Option<Vec<V>>,
        hash_fn: H,
        produce: F,
    ) -> Result<Rc<T>, CacheError>
    where
        H: Fn(&K) -> i32,
        F: FnOnce(&HashIndex<K, V>, &LiteralSymbol) -> T,
    {
        let signature = Signature::new(&keys, values.as_deref())?;
        if let Some(entry) = self.entries.get(&signature) {
            self.hits += 1;
            tracing::trace!(symbol = %entry.symbol, "literal cache hit");
            return Ok(Rc::clone(&entry.artifact));
        }

        let index = self.builder.build(keys, values, hash_fn)?;
        let symbol = LiteralSymbol::new(&self.prefixes, &signature);
        let artifact = Rc::new(produce(&index, &symbol));
        self.misses += 1;
        tracing::debug!(
            %symbol,
            kind = %signature.kind(),
            entries = index.entry_count(),
            table_size = index.table_size(),
            "literal cache miss"
        );

        self.entries.insert(
            signature,
            CacheEntry {
                index,
                symbol,
                artifact: Rc::clone(&artifact),
            },
        );
        Ok(artifact)
    }
}

impl<T> LiteralCache<String, String, T> {
    /// Resolves a string-to-string map literal, hashing keys with the
    /// configured string hash ([`string_hash`] unless replaced through
    /// [`with_string_hash`](Self::with_string_hash)).
    pub fn map_literal<F>(
        &mut self,
        keys: Vec<String>,
        values: Vec<String>,
        produce: F,
    ) -> Result<Rc<T>, CacheError>
    where
        F: FnOnce(&HashIndex<String, String>, &LiteralSymbol) -> T,
    {
        let hash = self.string_hash;
        self.get_or_build(keys, Some(values), move |key: &String| hash(key), produce)
    }

    /// Resolves a string set literal, hashing keys with the configured
    /// string hash.
    pub fn set_literal<F>(&mut self, keys: Vec<String>, produce: F) -> Result<Rc<T>, CacheError>
    where
        F: FnOnce(&HashIndex<String, String>, &LiteralSymbol) -> T,
    {
        let hash = self.string_hash;
        self.get_or_build(keys, None, move |key: &String| hash(key), produce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlit_index::IndexError;
    use std::cell::Cell;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Stand-in for an emitted constant: the symbol plus the key order.
    #[derive(Debug, PartialEq)]
    struct Emitted {
        symbol: String,
        keys: Vec<String>,
    }

    fn emit(index: &HashIndex<String, String>, symbol: &LiteralSymbol) -> Emitted {
        Emitted {
            symbol: symbol.to_string(),
            keys: index.keys().to_vec(),
        }
    }

    #[test]
    fn equal_requests_share_one_instance() {
        let mut cache = LiteralCache::new();
        let a = cache
            .map_literal(strings(&["a", "b", "c"]), strings(&["x", "y", "z"]), emit)
            .unwrap();
        let b = cache
            .map_literal(strings(&["a", "b", "c"]), strings(&["x", "y", "z"]), emit)
            .unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.keys, strings(&["a", "b", "c"]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reordered_request_is_a_different_literal() {
        let mut cache = LiteralCache::new();
        let a = cache.set_literal(strings(&["a", "b", "c"]), emit).unwrap();
        let b = cache.set_literal(strings(&["a", "c", "b"]), emit).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn hit_skips_builder_and_producer() {
        let mut cache: LiteralCache<i32, i32, usize> = LiteralCache::new();
        let hash_calls = Cell::new(0);
        let produced = Cell::new(0);
        let hash = |k: &i32| {
            hash_calls.set(hash_calls.get() + 1);
            *k
        };

        for _ in 0..3 {
            cache
                .get_or_build(vec![1, 2, 3], Some(vec![10, 20, 30]), hash, |index, _| {
                    produced.set(produced.get() + 1);
                    index.entry_count()
                })
                .unwrap();
        }

        assert_eq!(produced.get(), 1);
        assert_eq!(hash_calls.get(), 3);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn set_and_map_over_same_keys_are_distinct() {
        let mut cache = LiteralCache::new();
        let set = cache.set_literal(strings(&["a"]), emit).unwrap();
        let map = cache
            .map_literal(strings(&["a"]), strings(&["a"]), emit)
            .unwrap();
        assert!(!Rc::ptr_eq(&set, &map));
        assert!(set.symbol.starts_with("khashset:"));
        assert!(map.symbol.starts_with("khashmap:"));
    }

    #[test]
    fn set_literal_has_no_values() {
        let mut cache = LiteralCache::new();
        let set = cache.set_literal(strings(&["a", "b"]), emit).unwrap();
        let signature = Signature::new(&strings(&["a", "b"]), None::<&[String]>).unwrap();
        let entry = cache.lookup(&signature).unwrap();
        assert!(entry.index().values().is_none());
        assert!(Rc::ptr_eq(entry.artifact(), &set));
        assert_eq!(entry.symbol().as_str(), set.symbol);
    }

    #[test]
    fn concatenation_lookalikes_do_not_share() {
        let mut cache = LiteralCache::new();
        let a = cache.set_literal(strings(&["ab", "c"]), emit).unwrap();
        let b = cache.set_literal(strings(&["a", "bc"]), emit).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn duplicate_keys_collapse_in_the_artifact() {
        let mut cache = LiteralCache::new();
        let emitted = cache
            .map_literal(strings(&["a", "b", "a"]), strings(&["1", "2", "3"]), |index, _| {
                index.values().map(|values| values.to_vec())
            })
            .unwrap();
        assert_eq!(emitted.as_deref(), Some(&strings(&["3", "2"])[..]));
    }

    #[test]
    fn shape_mismatch_stores_nothing() {
        let mut cache = LiteralCache::new();
        let produced = Cell::new(false);
        let err = cache
            .map_literal(strings(&["a", "b"]), strings(&["x"]), |index, symbol| {
                produced.set(true);
                emit(index, symbol)
            })
            .unwrap_err();
        assert_eq!(
            err,
            CacheError::Index(IndexError::ShapeMismatch { keys: 2, values: 1 })
        );
        assert!(!produced.get());
        assert!(cache.is_empty());
    }

    #[test]
    fn build_failure_stores_nothing() {
        let mut cache: LiteralCache<i32, (), ()> =
            LiteralCache::new().with_builder(IndexBuilder::new().with_max_table_size(8));
        let err = cache
            .get_or_build((0..10).collect(), None, |k: &i32| *k, |_, _| ())
            .unwrap_err();
        assert!(err.is_contract_violation());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn custom_symbol_prefixes() {
        let mut cache = LiteralCache::new().with_symbols(SymbolPrefixes {
            map: "m".to_string(),
            set: "s".to_string(),
        });
        let set = cache.set_literal(strings(&["a"]), emit).unwrap();
        assert!(set.symbol.starts_with("s:"));
    }

    #[test]
    fn string_helpers_default_to_string_hash() {
        let mut cache = LiteralCache::new();
        let layout = cache
            .set_literal(strings(&["a", "b", "c"]), |index, _| index.layout())
            .unwrap();
        let expected =
            HashIndex::build_set(strings(&["a", "b", "c"]), |k: &String| string_hash(k)).unwrap();
        assert_eq!(layout.presence, expected.presence());
        assert_eq!(layout.probe_table, expected.probe_table());
    }

    #[test]
    fn string_helpers_use_replaced_hash() {
        fn runtime_hash(_: &str) -> i32 {
            0
        }
        let mut cache = LiteralCache::new().with_string_hash(runtime_hash);
        let layout = cache
            .map_literal(strings(&["a", "b", "c"]), strings(&["x", "y", "z"]), |index, _| {
                index.layout()
            })
            .unwrap();
        assert_eq!(layout.presence, vec![0, 15, 14]);
        assert_eq!(layout.probe_table[15], 2);
    }

    #[test]
    fn caches_are_independent() {
        let mut first = LiteralCache::new();
        let mut second = LiteralCache::new();
        let a = first.set_literal(strings(&["a"]), emit).unwrap();
        let b = second.set_literal(strings(&["a"]), emit).unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn clear_starts_a_new_compilation() {
        let mut cache = LiteralCache::new();
        let before = cache.set_literal(strings(&["a"]), emit).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
        let after = cache.set_literal(strings(&["a"]), emit).unwrap();
        assert!(!Rc::ptr_eq(&before, &after));
    }

    #[test]
    fn entries_expose_built_indices() {
        let mut cache = LiteralCache::new();
        cache.set_literal(strings(&["a", "b"]), emit).unwrap();
        cache.set_literal(strings(&["c"]), emit).unwrap();
        let mut counts: Vec<usize> = cache
            .entries()
            .map(|(signature, entry)| {
                assert_eq!(signature.len(), entry.index().entry_count());
                entry.index().entry_count()
            })
            .collect();
        counts.sort();
        assert_eq!(counts, vec![1, 2]);
    }
}
