//! chain-hashmap: A single-threaded separate-chaining hash map with
//! pluggable hashing strategies and automatic load-factor growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, safe chaining map where the hashing strategy is a
//!   per-instance capability, not a process-wide default, and where each
//!   layer can be reasoned about independently.
//! - Layers:
//!   - hashers: built-in strategies packaged as `BuildHasher`s — `Djb2`
//!     (rolling byte hash, the default) and `IntMix` (xorshift/multiply
//!     finalizer for clustered integer keys).
//!   - ChainHashMap<K, V, S>: the engine. A bucket array of chain heads
//!     indexes into a slot arena of entries; collisions chain, appended
//!     at the tail. Capacity doubles before an insert would push the
//!     load factor above 0.65.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no atomics).
//! - No removal: entries live until the map is dropped. No shrinking.
//! - Strategy is fixed once the first entry lands; `set_hasher` panics
//!   on a non-empty map rather than leaving entries unreachable.
//! - Growth has strong failure semantics: the doubled bucket array is
//!   allocated (fallibly) before any state changes, so a failed grow
//!   leaves the map untouched and usable.
//!
//! Reentrancy policy
//! - The engine runs user code (`K: Hash`/`K: Eq`) while probing chains.
//!   A debug-only guard panics on reentry into the same map during such
//!   a probe; release builds carry no check.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` digest at insert time and all later
//!   bucketing (including growth) uses the stored digest; `K: Hash` is
//!   never invoked again after insertion.
//!
//! Notes and non-goals
//! - Iteration carries no order guarantee.
//! - The built-in strategies are unkeyed and not DoS-resistant; inject a
//!   keyed `BuildHasher` for untrusted input.
//! - Public API surface is `ChainHashMap`, its iterators and errors, and
//!   the built-in strategies; the reentrancy guard is an implementation
//!   detail.

pub mod chain_hash_map;
mod chain_hash_map_proptest;
pub mod hashers;
mod reentrancy;

// Public surface
pub use chain_hash_map::{AllocError, ChainHashMap, Iter, IterMut, MIN_CAPACITY};
pub use hashers::{Djb2, Djb2Hasher, IntMix, IntMixHasher};
