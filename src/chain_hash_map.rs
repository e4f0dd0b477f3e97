//! ChainHashMap: separate-chaining engine over a slot arena.

use crate::hashers::Djb2;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use slotmap::{DefaultKey, SlotMap};
use std::collections::TryReserveError;

/// Smallest bucket array the map will operate with. Capacity requests
/// below this are clamped up.
pub const MIN_CAPACITY: usize = 7;

// Load-factor ceiling: size never exceeds 65% of capacity after an insert.
const LOAD_FACTOR_PERCENT: usize = 65;

/// Bucket-array allocation failure, the only error this map reports.
/// A missing key on lookup is a normal `None`, not an error.
#[derive(Debug)]
pub struct AllocError(TryReserveError);

impl From<TryReserveError> for AllocError {
    fn from(e: TryReserveError) -> Self {
        AllocError(e)
    }
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "bucket storage allocation failed: {}", self.0)
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    // Digest computed once at insert; growth re-buckets with this stored
    // value and never re-invokes `K: Hash`.
    hash: u64,
    next: Option<DefaultKey>,
}

/// A separate-chaining hash map.
///
/// Buckets are chain heads into a slot arena; collisions append at the
/// chain tail. The hashing strategy `S` is injected at construction
/// (default [`Djb2`]) and may only be swapped while the map is empty.
/// Capacity doubles whenever one more entry would push the load factor
/// above 0.65, before the entry is placed.
///
/// There is no removal operation; entries live until the map is dropped.
pub struct ChainHashMap<K, V, S = Djb2> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    reentrancy: DebugReentrancy,
}

impl<K, V> ChainHashMap<K, V>
where
    K: Eq + Hash,
{
    /// An empty map with the minimum capacity and the default strategy.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Fallible construction with an explicit starting capacity, clamped
    /// up to [`MIN_CAPACITY`].
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for ChainHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> core::fmt::Debug for ChainHashMap<K, V, S>
where
    K: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(_, e)| (&e.key, &e.value)))
            .finish()
    }
}

/// Iterator over entries in arbitrary order.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over entries with mutable access to values.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

fn exceeds_load(len: usize, capacity: usize) -> bool {
    len * 100 > capacity * LOAD_FACTOR_PERCENT
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; MIN_CAPACITY],
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, AllocError> {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(capacity)?;
        buckets.resize(capacity, None);
        Ok(Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            reentrancy: DebugReentrancy::new(),
        })
    }

    /// Replace the hashing strategy. Only legal while the map is empty:
    /// existing entries were bucketed under the old strategy and would
    /// become unreachable under the new one.
    ///
    /// # Panics
    ///
    /// Panics if the map contains any entries.
    pub fn set_hasher(&mut self, hasher: S) {
        assert!(
            self.slots.is_empty(),
            "hashing strategy can only be swapped on an empty map"
        );
        self.hasher = hasher;
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current bucket count. Always at least [`MIN_CAPACITY`]; never
    /// shrinks.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn bucket_index(hash: u64, capacity: usize) -> usize {
        (hash % capacity as u64) as usize
    }

    /// Insert `value` under `key`. If the key is already present its value
    /// is replaced in place and the previous value returned; `len` is
    /// unchanged. Otherwise the entry is appended at its chain tail.
    ///
    /// Growth runs first when one more entry would exceed the load
    /// ceiling, even if the insert turns out to be an overwrite. Growth is
    /// the only fallible step; on error the map is untouched and remains
    /// fully usable.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, AllocError> {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);

        if exceeds_load(self.slots.len() + 1, self.buckets.len()) {
            Self::grow(&mut self.buckets, &mut self.slots)?;
        }

        let index = Self::bucket_index(hash, self.buckets.len());
        let mut cursor = self.buckets[index];
        let mut tail = None;
        while let Some(slot) = cursor {
            // Chain links always name live slots.
            if self.slots[slot].hash == hash && self.slots[slot].key == key {
                return Ok(Some(mem::replace(&mut self.slots[slot].value, value)));
            }
            tail = Some(slot);
            cursor = self.slots[slot].next;
        }

        let slot = self.slots.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match tail {
            Some(prev) => self.slots[prev].next = Some(slot),
            None => self.buckets[index] = Some(slot),
        }
        Ok(None)
    }

    /// Double the bucket array and re-link every entry under the new
    /// capacity using its stored hash. The new array is allocated before
    /// anything is mutated, so a failed grow leaves the map exactly as it
    /// was. Borrows the fields directly: `insert` holds the reentrancy
    /// guard (a borrow of its own field) across this call.
    fn grow(
        buckets: &mut Vec<Option<DefaultKey>>,
        slots: &mut SlotMap<DefaultKey, Entry<K, V>>,
    ) -> Result<(), AllocError> {
        let new_capacity = buckets.len() * 2;
        let mut fresh: Vec<Option<DefaultKey>> = Vec::new();
        fresh.try_reserve_exact(new_capacity)?;
        fresh.resize(new_capacity, None);

        let old = mem::replace(buckets, fresh);
        for head in old {
            let mut cursor = head;
            while let Some(slot) = cursor {
                cursor = slots[slot].next.take();
                let index = Self::bucket_index(slots[slot].hash, new_capacity);
                Self::link_at_tail(buckets, slots, index, slot);
            }
        }
        Ok(())
    }

    // Append-at-chain-end placement, the same policy a fresh insert uses.
    fn link_at_tail(
        buckets: &mut [Option<DefaultKey>],
        slots: &mut SlotMap<DefaultKey, Entry<K, V>>,
        index: usize,
        slot: DefaultKey,
    ) {
        match buckets[index] {
            None => buckets[index] = Some(slot),
            Some(head) => {
                let mut tail = head;
                while let Some(next) = slots[tail].next {
                    tail = next;
                }
                slots[tail].next = Some(slot);
            }
        }
    }

    fn find_slot<Q>(&self, key: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(key);
        let mut cursor = self.buckets[Self::bucket_index(hash, self.buckets.len())];
        while let Some(slot) = cursor {
            let entry = &self.slots[slot];
            if entry.hash == hash && entry.key.borrow() == key {
                return Some(slot);
            }
            cursor = entry.next;
        }
        None
    }

    /// Shared reference to the value stored under `key`, or `None`. The
    /// reference borrows the map, so it cannot outlive the next mutation.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_slot(key).map(|slot| &self.slots[slot].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.find_slot(key)?;
        Some(&mut self.slots[slot].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_slot(key).is_some()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }
}
