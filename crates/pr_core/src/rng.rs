// crates/pr_core/src/rng.rs
//
// ChaCha20 stream used only by the `random` tie-break rule.
// Integer-only: unbiased ranges via rejection sampling, Fisher–Yates shuffle.
// A fixed seed reproduces every draw; without one the stream is seeded from OS entropy.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// RNG for ties.
///
/// Seed mapping is explicit: `seed.to_le_bytes()` fills the first 8 bytes of the
/// 32-byte ChaCha20 seed, the remaining 24 bytes are zero.
#[derive(Debug, Clone)]
pub struct TieRng {
    rng: ChaCha20Rng,
    words_consumed: u128,
}

impl TieRng {
    #[inline]
    pub fn from_seed_u64(seed: u64) -> Self {
        let mut seed32 = [0u8; 32];
        seed32[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            rng: ChaCha20Rng::from_seed(seed32),
            words_consumed: 0,
        }
    }

    /// Non-reproducible stream for callers that supplied no seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
            words_consumed: 0,
        }
    }

    /// Seeded when `seed` is present, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::from_seed_u64(s),
            None => Self::from_entropy(),
        }
    }

    /// Number of 64-bit words drawn so far (accepted and rejected).
    #[inline]
    pub fn words_consumed(&self) -> u128 {
        self.words_consumed
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.words_consumed = self.words_consumed.saturating_add(1);
        self.rng.next_u64()
    }

    /// Unbiased integer in `[0, n)`; `None` if `n == 0`.
    ///
    /// `threshold = 2^64 mod n`; draws below it are rejected so `x % n` is uniform.
    pub fn gen_range(&mut self, n: u64) -> Option<u64> {
        if n == 0 {
            return None;
        }
        let threshold = n.wrapping_neg() % n;
        loop {
            let x = self.next_u64();
            if x >= threshold {
                return Some(x % n);
            }
        }
    }

    /// In-place Fisher–Yates: for i in (1..len).rev() { j ~ U{0..=i}; swap(i, j) }.
    pub fn shuffle_in_place<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            // i + 1 > 0, so a draw always exists.
            if let Some(j) = self.gen_range(i as u64 + 1) {
                slice.swap(i, j as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen_range_zero_draws_nothing() {
        let mut rng = TieRng::from_seed_u64(0xDEAD_BEEF_CAFE_BABE);
        assert_eq!(rng.gen_range(0), None);
        assert_eq!(rng.words_consumed(), 0);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = TieRng::from_seed_u64(123_456_789);
        let mut b = TieRng::from_seed_u64(123_456_789);
        let xs: Vec<u64> = (0..32).map(|_| a.gen_range(7).unwrap()).collect();
        let ys: Vec<u64> = (0..32).map(|_| b.gen_range(7).unwrap()).collect();
        assert_eq!(xs, ys);
        assert!(xs.iter().all(|&x| x < 7));
        assert!(a.words_consumed() >= 32);
    }

    #[test]
    fn shuffle_is_a_permutation_and_reproducible() {
        let mut a = TieRng::from_seed_u64(42);
        let mut b = TieRng::from_seed_u64(42);
        let mut xs: Vec<u32> = (0..16).collect();
        let mut ys: Vec<u32> = (0..16).collect();
        a.shuffle_in_place(&mut xs);
        b.shuffle_in_place(&mut ys);
        assert_eq!(xs, ys);

        let mut sorted = xs.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_of_one_draws_nothing() {
        let mut rng = TieRng::from_seed_u64(1);
        let mut one = [9u8];
        rng.shuffle_in_place(&mut one);
        assert_eq!(rng.words_consumed(), 0);
    }

    #[test]
    fn entropy_stream_stays_in_range() {
        let mut rng = TieRng::from_optional_seed(None);
        for _ in 0..8 {
            assert!(rng.gen_range(3).unwrap() < 3);
        }
    }
}
