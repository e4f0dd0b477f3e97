//! Built-in hashing strategies.
//!
//! Two deterministic, unkeyed [`BuildHasher`]s cover the common key
//! shapes: [`Djb2`] for byte/string keys (and the map's default), and
//! [`IntMix`] for fixed-width integer keys whose raw values cluster.
//! Both distribute well enough under the map's modulo bucket reduction.
//!
//! Neither strategy is DoS-resistant; supply a keyed `BuildHasher` via
//! `with_hasher` when hashing untrusted input.

use core::hash::{BuildHasher, Hasher};

const DJB2_SEED: u64 = 5381;

/// DJB2 rolling hash: `h = h * 33 + byte`, seed 5381.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Djb2;

impl BuildHasher for Djb2 {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Djb2Hasher {
        Djb2Hasher { state: DJB2_SEED }
    }
}

#[derive(Clone, Debug)]
pub struct Djb2Hasher {
    state: u64,
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state = self.state.wrapping_mul(33).wrapping_add(u64::from(b));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Bit-mixing strategy for fixed-width integer keys.
///
/// Low-entropy inputs (small counters, aligned addresses) land in a
/// handful of buckets under plain modulo reduction; the finalizer runs
/// three xorshift/multiply rounds (constant `0x45d9f3b`) to spread them.
/// The finalizer is a bijection on `u64`, so distinct folded states keep
/// distinct digests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntMix;

impl BuildHasher for IntMix {
    type Hasher = IntMixHasher;

    fn build_hasher(&self) -> IntMixHasher {
        IntMixHasher { state: 0 }
    }
}

#[derive(Clone, Debug)]
pub struct IntMixHasher {
    state: u64,
}

impl Hasher for IntMixHasher {
    fn write(&mut self, bytes: &[u8]) {
        // Fold arbitrary-width input into the 64-bit state; integer keys
        // arrive as a single word.
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.state = self.state.rotate_left(29) ^ u64::from_le_bytes(word);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.state = self.state.rotate_left(29) ^ i;
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        let mut k = self.state;
        k = (k ^ (k >> 16)).wrapping_mul(0x45d9f3b);
        k = (k ^ (k >> 16)).wrapping_mul(0x45d9f3b);
        k ^ (k >> 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn djb2_reference(bytes: &[u8]) -> u64 {
        bytes.iter().fold(DJB2_SEED, |h, &b| {
            h.wrapping_mul(33).wrapping_add(u64::from(b))
        })
    }

    fn int_mix_reference(mut k: u64) -> u64 {
        k = (k ^ (k >> 16)).wrapping_mul(0x45d9f3b);
        k = (k ^ (k >> 16)).wrapping_mul(0x45d9f3b);
        k ^ (k >> 16)
    }

    #[test]
    fn djb2_empty_input_is_seed() {
        let h = Djb2.build_hasher();
        assert_eq!(h.finish(), DJB2_SEED);
    }

    #[test]
    fn djb2_matches_recurrence() {
        for input in [&b"a"[..], b"key", b"hello world", b"\x00\xff\x10"] {
            let mut h = Djb2.build_hasher();
            h.write(input);
            assert_eq!(h.finish(), djb2_reference(input));
        }
    }

    #[test]
    fn djb2_split_writes_equal_one_write() {
        let mut a = Djb2.build_hasher();
        a.write(b"hello world");
        let mut b = Djb2.build_hasher();
        b.write(b"hello ");
        b.write(b"world");
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn djb2_deterministic_across_instances() {
        assert_eq!(Djb2.hash_one("some key"), Djb2.hash_one("some key"));
        assert_ne!(Djb2.hash_one("some key"), Djb2.hash_one("other key"));
    }

    #[test]
    fn int_mix_single_word_matches_finalizer() {
        // One write_u64 folds into a zero state unchanged, so the digest
        // is exactly the three-round finalizer.
        for x in [1u64, 2, 7, 0xdead_beef, u64::MAX] {
            let mut h = IntMix.build_hasher();
            h.write_u64(x);
            assert_eq!(h.finish(), int_mix_reference(x));
        }
    }

    #[test]
    fn int_mix_spreads_sequential_keys() {
        // The finalizer is bijective, so sequential inputs must produce
        // pairwise-distinct digests.
        let digests: Vec<u64> = (0u64..64).map(|i| IntMix.hash_one(i)).collect();
        for (i, a) in digests.iter().enumerate() {
            for b in &digests[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn int_mix_deterministic_across_instances() {
        assert_eq!(IntMix.hash_one(42u64), IntMix.hash_one(42u64));
    }
}
