#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// bucket placement through the test-only invariant walker.

use crate::table::{HashTable, INITIAL_BUCKETS, MAX_LOAD_FACTOR};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Get(usize),
    GetOr(usize, i32),
    Delete(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            1 => idx.clone().prop_map(Op::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::GetOr(i, d)),
            2 => idx.clone().prop_map(Op::Delete),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,4}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Smallest `16 * 2^k` bucket count whose load factor stays within bounds
/// for the largest size ever reached.
fn expected_buckets(peak: usize) -> usize {
    let mut n = INITIAL_BUCKETS;
    while peak as f64 / n as f64 > MAX_LOAD_FACTOR {
        n *= 2;
    }
    n
}

fn run_scenario<S: BuildHasher>(
    mut sut: HashTable<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut peak = 0usize;

    for op in ops {
        match op {
            Op::Set(i, v) => {
                let k = key_from(&pool, i);
                let prev = sut.set(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::GetOr(i, d) => {
                let k = key_from(&pool, i);
                let expected = *model.get(&k).unwrap_or(&d);
                prop_assert_eq!(*sut.get_or(&k, &d), expected);
            }
            Op::Delete(i) => {
                let k = key_from(&pool, i);
                let before = sut.bucket_count();
                prop_assert_eq!(sut.delete(&k), model.remove(&k));
                prop_assert!(!sut.contains(&k));
                prop_assert_eq!(sut.bucket_count(), before, "delete must not shrink");
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(s.as_str()), has_model);
            }
            Op::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m),
                }
            }
            Op::Iterate => {
                let mut seen: BTreeMap<Key, i32> = BTreeMap::new();
                let mut dup = false;
                sut.for_each(|k, v| dup |= seen.insert(k.clone(), *v).is_some());
                prop_assert!(!dup, "for_each visited a key twice");
                let expected: BTreeMap<Key, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
                let keys: BTreeSet<Key> = sut.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(keys.len(), sut.size());
            }
        }

        // Post-conditions after each op.
        peak = peak.max(model.len());
        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.bucket_count(), expected_buckets(peak));
        sut.assert_invariants();
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `set` overwrites in place and reports the previous value.
// - `get`/`get_or`/`contains` agree with the model, including borrowed `&str` lookups.
// - `delete` returns the removed value and never shrinks the bucket array.
// - `for_each` visits each live entry exactly once.
// - Bucket count is always the smallest doubling of 16 that held the peak size.
// - Every entry sits in `hash % bucket_count` and `size` matches the buckets.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(HashTable::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same invariants as above when every key shares one bucket, so
// all lookups and deletes go through chain scans and mid-chain unlinks.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(HashTable::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: inserting N distinct keys yields exactly N entries and the
// minimal doubled bucket count, regardless of how many resizes ran.
proptest! {
    #[test]
    fn prop_distinct_inserts_grow_minimally(n in 0usize..600) {
        let mut m: HashTable<usize, usize> = HashTable::new();
        for i in 0..n {
            prop_assert_eq!(m.set(i, i * 3), None);
        }
        prop_assert_eq!(m.size(), n);
        prop_assert_eq!(m.bucket_count(), expected_buckets(n));
        let mut visited = 0usize;
        m.for_each(|k, v| {
            visited += 1;
            assert_eq!(*v, *k * 3);
        });
        prop_assert_eq!(visited, n);
    }
}
