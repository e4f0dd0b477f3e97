#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so they can check
// internal invariants (capacity floor, load ceiling) alongside the model.

use crate::chain_hash_map::{ChainHashMap, MIN_CAPACITY};
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Get(usize),
    GetMut(usize, i32),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Get),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetMut(i, d)),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_scenario<S>(
    mut sut: ChainHashMap<String, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut last_capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let prev = sut.insert(k.clone(), v).expect("bucket allocation");
                let model_prev = model.insert(k, v);
                prop_assert_eq!(prev, model_prev, "insert must report the replaced value");
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()), model.get(k));
            }
            OpI::GetMut(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k.as_str()), model.get_mut(k)) {
                    (Some(sv), Some(mv)) => {
                        *sv = sv.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "presence mismatch: sut={s:?} model={m:?}"),
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
            }
            OpI::Iterate => {
                let seen: BTreeMap<String, i32> =
                    sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let expected: BTreeMap<String, i32> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(seen, expected);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.capacity() >= MIN_CAPACITY);
        prop_assert!(
            sut.capacity() >= last_capacity,
            "capacity must never shrink"
        );
        prop_assert!(
            sut.len() * 100 <= sut.capacity() * 65,
            "load factor above ceiling: {}/{}",
            sut.len(),
            sut.capacity()
        );
        last_capacity = sut.capacity();
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap
// under the default strategy. Invariants exercised across random op
// sequences:
// - `insert` reports the replaced value exactly when the model does.
// - `get`/`get_mut`/`contains_key` parity with the model after each op.
// - `iter` yields each live entry exactly once.
// - `len`/`is_empty` parity; capacity floor, monotonic growth, and the
//   0.65 load ceiling hold after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainHashMap::new(), &pool, ops)?;
    }
}

// Collision variant using a constant hasher so every key lands in one
// bucket and every operation degenerates to a chain walk.
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

// Property: Same state-machine invariants as above under worst-case
// collision behavior. This stresses equality probing, tail appends, and
// chain re-linking during growth.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ChainHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Property: Capacity follows the doubling schedule exactly — starting
// from the requested (clamped) capacity, the map doubles precisely when
// one more distinct key would exceed the 0.65 ceiling, and every key
// stays retrievable across all doublings.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_schedule(requested in 0usize..40, n in 0usize..300) {
        let mut sut: ChainHashMap<u64, u64> =
            ChainHashMap::try_with_capacity(requested).expect("bucket allocation");
        let mut expected = requested.max(MIN_CAPACITY);
        prop_assert_eq!(sut.capacity(), expected);

        for i in 0..n as u64 {
            let len_after = sut.len() + 1;
            if len_after * 100 > expected * 65 {
                expected *= 2;
            }
            sut.insert(i, i ^ 0xff).expect("bucket allocation");
            prop_assert_eq!(sut.capacity(), expected);
        }
        for i in 0..n as u64 {
            prop_assert_eq!(sut.get(&i), Some(&(i ^ 0xff)));
        }
    }
}
