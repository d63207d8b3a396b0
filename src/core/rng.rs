//! Deterministic Random Number Generation
//!
//! Spawn draws (which empty cell, which value) are the only source of
//! randomness in a game. They go through the [`SpawnRng`] trait so the
//! engine can run on a seeded Xorshift128+ generator in production and on a
//! scripted sequence in tests.

/// Source of randomness for tile spawns.
///
/// Implementors only need to provide bounded integers; probability rolls
/// are derived from them.
pub trait SpawnRng {
    /// Return an integer in `[0, max)`. Must return 0 when `max` is 0.
    fn next_int(&mut self, max: u32) -> u32;

    /// Return `true` with probability `numerator / denominator`.
    #[inline]
    fn chance(&mut self, numerator: u32, denominator: u32) -> bool {
        if denominator == 0 {
            return false;
        }
        self.next_int(denominator) < numerator
    }
}

impl<R: SpawnRng + ?Sized> SpawnRng for &mut R {
    fn next_int(&mut self, max: u32) -> u32 {
        (**self).next_int(max)
    }
}

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform.
///
/// # Example
///
/// ```
/// use tile2048::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Xorshift never leaves the all-zero state
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }
}

impl SpawnRng for DeterministicRng {
    /// Modulo reduction; the bias is negligible for board-sized bounds.
    #[inline]
    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as u32
    }
}

/// Fixed-sequence RNG for tests and scripted demos.
///
/// Each draw takes the next scripted value modulo the requested bound.
/// The script repeats once exhausted; an empty script always yields 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    /// Create from a script of raw draws.
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl SpawnRng for ScriptedRng {
    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 || self.values.is_empty() {
            self.cursor += 1;
            return 0;
        }
        let raw = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        raw % max
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_int() {
        let mut rng = DeterministicRng::new(1234);

        for _ in 0..1000 {
            let val = rng.next_int(16);
            assert!(val < 16);
        }

        // Edge case: max = 0
        assert_eq!(rng.next_int(0), 0);

        // Edge case: max = 1
        assert_eq!(rng.next_int(1), 0);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = DeterministicRng::new(99);

        for _ in 0..200 {
            assert!(!rng.chance(0, 1000));
            assert!(rng.chance(1000, 1000));
        }
        assert!(!rng.chance(1, 0));
    }

    #[test]
    fn test_chance_rate() {
        let mut rng = DeterministicRng::new(2048);
        let hits = (0..10_000).filter(|_| rng.chance(100, 1000)).count();

        // 10% with generous slack
        assert!((800..1200).contains(&hits), "hits = {}", hits);
    }

    #[test]
    fn test_scripted_rng_sequence() {
        let mut rng = ScriptedRng::new(vec![3, 17, 5]);

        assert_eq!(rng.next_int(10), 3);
        assert_eq!(rng.next_int(10), 7);
        assert_eq!(rng.next_int(4), 1);
        // Wraps around
        assert_eq!(rng.next_int(10), 3);
    }

    #[test]
    fn test_scripted_rng_empty() {
        let mut rng = ScriptedRng::default();
        assert_eq!(rng.next_int(16), 0);
        assert_eq!(rng.next_int(0), 0);
    }
}
