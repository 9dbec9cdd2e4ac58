//! End-to-end use of the literal cache the way a code generator drives it.

use std::rc::Rc;

use hashlit_cache::{CacheError, LiteralCache};
use hashlit_common::{string_hash, HashlitResult, KeyHash};
use hashlit_config::load_config_from_str;
use hashlit_index::{HashIndex, IndexError, IndexLayout};
use proptest::prelude::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// What the emitter writes for one literal.
#[derive(Debug)]
struct EmittedConstant {
    symbol: String,
    layout: IndexLayout<String, String>,
}

fn emit(index: &HashIndex<String, String>, symbol: &hashlit_cache::LiteralSymbol) -> EmittedConstant {
    EmittedConstant {
        symbol: symbol.to_string(),
        layout: index.layout(),
    }
}

#[test]
fn one_compilation_shares_equal_literals() {
    let mut cache = LiteralCache::new();
    let sites: Vec<(Vec<&str>, Option<Vec<&str>>)> = vec![
        (vec!["GET", "PUT", "POST"], None),
        (vec!["a", "b"], Some(vec!["1", "2"])),
        (vec!["GET", "PUT", "POST"], None),
        (vec!["PUT", "GET", "POST"], None),
        (vec!["a", "b"], Some(vec!["1", "2"])),
    ];

    let emitted: Vec<Rc<EmittedConstant>> = sites
        .iter()
        .map(|(keys, values)| match values {
            Some(values) => cache.map_literal(strings(keys), strings(values), emit),
            None => cache.set_literal(strings(keys), emit),
        })
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(Rc::ptr_eq(&emitted[0], &emitted[2]));
    assert!(Rc::ptr_eq(&emitted[1], &emitted[4]));
    assert!(!Rc::ptr_eq(&emitted[0], &emitted[3]));
    assert_eq!(cache.len(), 3);
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (2, 3));
}

#[test]
fn emitted_layout_is_readable_by_runtime_lookup() {
    let mut cache = LiteralCache::new();
    let constant = cache
        .map_literal(
            strings(&["one", "two", "three", "two"]),
            strings(&["1", "2", "3", "22"]),
            emit,
        )
        .unwrap();
    let layout = &constant.layout;
    assert_eq!(layout.keys, strings(&["one", "two", "three"]));
    assert_eq!(layout.values.as_deref(), Some(&strings(&["1", "22", "3"])[..]));

    let index = HashIndex::build(layout.keys.clone(), layout.values.clone(), |k: &String| string_hash(k))
        .unwrap();
    assert_eq!(index.layout(), *layout);
    assert_eq!(index.get(&"two".to_string(), |k| k.key_hash()), Some(&"22".to_string()));
    assert!(!index.contains(&"four".to_string(), |k| k.key_hash()));
}

#[test]
fn configuration_drives_cache() {
    let config = load_config_from_str(
        r#"
[index]
max_table_size = 16
verify = true

[symbols]
map_prefix = "maplit"
set_prefix = "setlit"
"#,
    )
    .unwrap();
    let mut cache = LiteralCache::new()
        .with_builder(config.index.builder())
        .with_symbols(config.symbols.prefixes());

    let small = cache.set_literal(strings(&["x", "y"]), emit).unwrap();
    assert!(small.symbol.starts_with("setlit:"));

    let too_large: Vec<String> = (0..10).map(|i| format!("k{i}")).collect();
    let err = cache.set_literal(too_large, emit).unwrap_err();
    assert!(matches!(
        err,
        CacheError::Index(IndexError::TableLimitExceeded { .. })
    ));
    assert!(err.is_contract_violation());
    assert_eq!(cache.len(), 1);
}

/// A lowering step: contract violations surface as internal compiler errors.
fn lower_int_set(
    cache: &mut LiteralCache<i32, (), usize>,
    keys: Vec<i32>,
    hash_fn: impl Fn(&i32) -> i32,
) -> HashlitResult<Rc<usize>> {
    Ok(cache.get_or_build(keys, None, hash_fn, |index, _| index.table_size())?)
}

#[test]
fn contract_violation_surfaces_as_internal_error() {
    let mut cache = LiteralCache::new();
    assert_eq!(*lower_int_set(&mut cache, vec![1, 2, 3], |k| *k).unwrap(), 16);

    // 0 and 0x144C_BC89 scatter into the same home slot, so the repeated key
    // is found and its changed hash is noticed.
    let calls = std::cell::Cell::new(0);
    let unstable = |_: &i32| {
        calls.set(calls.get() + 1);
        if calls.get() == 1 {
            0
        } else {
            0x144C_BC89
        }
    };
    let err = lower_int_set(&mut cache, vec![9, 9], unstable).unwrap_err();
    assert!(err.to_string().starts_with("internal compiler error: hash function is not deterministic"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn symbols_are_stable_across_compilations() {
    let mut first = LiteralCache::new();
    let mut second = LiteralCache::new();
    let a = first.set_literal(strings(&["k1", "k2"]), emit).unwrap();
    let b = second.set_literal(strings(&["k1", "k2"]), emit).unwrap();
    assert_eq!(a.symbol, b.symbol);
    assert_eq!(a.layout, b.layout);
}

proptest! {
    #[test]
    fn prop_instances_shared_iff_sequences_equal(
        a in proptest::collection::vec("[a-c]{0,2}", 0..5),
        b in proptest::collection::vec("[a-c]{0,2}", 0..5),
    ) {
        let mut cache = LiteralCache::new();
        let first = cache.set_literal(a.clone(), emit).unwrap();
        let second = cache.set_literal(b.clone(), emit).unwrap();
        prop_assert_eq!(Rc::ptr_eq(&first, &second), a == b);
    }
}
