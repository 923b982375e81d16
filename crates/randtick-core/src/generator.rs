//! Raw 64-bit stream generators: PCG64 insecure and xorshift64.
//!
//! Both are pure deterministic recurrences with no terminal state. The
//! public object is a closed tagged variant with a single dispatch point,
//! [`Generator::next_word`]; every sampling operation in this crate is built
//! on that one contract.
//!
//! The PCG output function here is Melissa O'Neill's `rxs-m-xs-64` permuted
//! congruential design; the xorshift recurrence is George Marsaglia's
//! 13/7/17 triple. Neither is cryptographically secure.

use crate::error::Error;
use crate::seed;

/// PCG 64-bit LCG multiplier.
const PCG_LCG_MULTIPLIER: u64 = 0x5851F42D4C957F2D;

/// PCG `rxs-m-xs` output permutation multiplier.
const PCG_OUTPUT_MULTIPLIER: u64 = 0xAEF17502108EF2D9;

/// Identifier for each supported generator algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Permuted congruential generator, 64-bit insecure variant.
    Pcg64Insecure,
    /// Marsaglia xorshift, 64-bit state.
    Xorshift64,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pcg64Insecure => write!(f, "pcg64_insecure"),
            Self::Xorshift64 => write!(f, "xorshift64"),
        }
    }
}

/// Variant payloads. Kept private so state words can only be produced by
/// the seeding policy, which maintains the per-variant invariants.
#[derive(Debug, Clone)]
enum Core {
    /// Invariant: `increment` is odd.
    Pcg64Insecure { state: u64, increment: u64 },
    /// Invariant: `state` is nonzero (zero is a fixed point of the
    /// recurrence).
    Xorshift64 { state: u64 },
}

/// A pseudo-random stream of raw 64-bit words.
///
/// Exclusively owned by its caller and internally unsynchronized; sharing
/// one instance across threads requires external locking. Cloning forks the
/// stream: the clone replays the identical future sequence, and mutation of
/// either instance never affects the other.
///
/// ```
/// use randtick_core::{Algorithm, Generator};
///
/// let mut a = Generator::new(Algorithm::Xorshift64, 7).unwrap();
/// let mut b = a.clone();
/// assert_eq!(a.next_word(), b.next_word());
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    core: Core,
}

impl Generator {
    /// Construct a generator for `algorithm`.
    ///
    /// A nonzero `seed` is expanded deterministically: each internal state
    /// word is drawn from a chained splitmix64 walk over the caller's seed,
    /// so one 64-bit seed populates larger state with low correlation
    /// between words. `seed == 0` requests non-deterministic seeding, one
    /// independently retried hardware draw per state word.
    ///
    /// # Errors
    ///
    /// [`Error::HardwareRandomUnavailable`] when `seed == 0` and the
    /// hardware instruction is missing or persistently underflows. No
    /// partially seeded generator is ever returned.
    pub fn new(algorithm: Algorithm, seed: u64) -> Result<Self, Error> {
        let mut seed = seed;

        let core = match algorithm {
            Algorithm::Pcg64Insecure => {
                let (state, increment) = if seed != 0 {
                    (seed::splitmix(&mut seed), seed::splitmix(&mut seed))
                } else {
                    (seed::hardware_seed()?, seed::hardware_seed()?)
                };

                // PCG requires an odd increment.
                Core::Pcg64Insecure {
                    state,
                    increment: increment | 1,
                }
            }
            Algorithm::Xorshift64 => {
                let state = if seed != 0 {
                    seed::splitmix_nonzero(&mut seed)
                } else {
                    seed::hardware_seed_nonzero()?
                };

                Core::Xorshift64 { state }
            }
        };

        Ok(Self { core })
    }

    /// Which algorithm this generator runs.
    pub fn algorithm(&self) -> Algorithm {
        match self.core {
            Core::Pcg64Insecure { .. } => Algorithm::Pcg64Insecure,
            Core::Xorshift64 { .. } => Algorithm::Xorshift64,
        }
    }

    /// Advance the state exactly once and emit the next raw word.
    ///
    /// This is the single dispatch point for both variants; every sampling
    /// operation reduces to calls of this method, so a buffer fill of `n`
    /// words is exactly `n` sequential single-word steps.
    #[inline]
    pub fn next_word(&mut self) -> u64 {
        match &mut self.core {
            Core::Pcg64Insecure { state, increment } => {
                // Output permutation is applied to the pre-advance state;
                // the raw LCG word is never emitted directly.
                let x = *state;

                *state = state.wrapping_mul(PCG_LCG_MULTIPLIER).wrapping_add(*increment);

                let fx = ((x >> ((x >> 59) + 5)) ^ x).wrapping_mul(PCG_OUTPUT_MULTIPLIER);

                (fx >> 43) ^ fx
            }
            Core::Xorshift64 { state } => {
                *state ^= *state << 13;
                *state ^= *state >> 7;
                *state ^= *state << 17;

                *state
            }
        }
    }

    /// Fill `dest` with raw 64-bit words, advancing the state once per word.
    pub fn fill(&mut self, dest: &mut [u64]) {
        for slot in dest.iter_mut() {
            *slot = self.next_word();
        }
    }

    /// Allocate and fill a buffer of `n` raw words.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationFailed`] if the buffer cannot be reserved; the
    /// generator state is untouched in that case.
    pub fn collect(&mut self, n: usize) -> Result<Vec<u64>, Error> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(n)
            .map_err(|_| Error::AllocationFailed)?;
        buffer.resize(n, 0);

        self.fill(&mut buffer);

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_identical_seeds_replay_identical_streams() {
        let mut a = Generator::new(Algorithm::Pcg64Insecure, 1).unwrap();
        let mut b = Generator::new(Algorithm::Pcg64Insecure, 1).unwrap();

        let mut out_a = [0u64; 100];
        let mut out_b = [1u64; 100];
        a.fill(&mut out_a);
        b.fill(&mut out_b);

        assert_eq!(out_a, out_b);
    }

    #[test]
    fn xorshift_identical_seeds_replay_identical_streams() {
        let mut a = Generator::new(Algorithm::Xorshift64, 1).unwrap();
        let mut b = Generator::new(Algorithm::Xorshift64, 1).unwrap();

        let mut out_a = [0u64; 100];
        let mut out_b = [1u64; 100];
        a.fill(&mut out_a);
        b.fill(&mut out_b);

        assert_eq!(out_a, out_b);
    }

    #[test]
    fn distinct_seeds_diverge() {
        let mut a = Generator::new(Algorithm::Pcg64Insecure, 1).unwrap();
        let mut b = Generator::new(Algorithm::Pcg64Insecure, 2).unwrap();

        let mut out_a = [0u64; 16];
        let mut out_b = [0u64; 16];
        a.fill(&mut out_a);
        b.fill(&mut out_b);

        assert_ne!(out_a, out_b);
    }

    #[test]
    fn batched_fill_equals_single_word_calls() {
        let mut batched = Generator::new(Algorithm::Pcg64Insecure, 99).unwrap();
        let mut stepped = batched.clone();

        let mut out = [0u64; 64];
        batched.fill(&mut out);

        for &word in &out {
            assert_eq!(word, stepped.next_word());
        }
    }

    #[test]
    fn clone_forks_an_independent_stream() {
        let mut original = Generator::new(Algorithm::Xorshift64, 5).unwrap();
        let mut fork = original.clone();

        // Advancing the fork never perturbs the original.
        let first_forked = fork.next_word();
        assert_eq!(original.next_word(), first_forked);
        assert_eq!(original.next_word(), fork.next_word());
    }

    #[test]
    fn collect_matches_fill() {
        let mut a = Generator::new(Algorithm::Xorshift64, 11).unwrap();
        let mut b = a.clone();

        let collected = a.collect(32).unwrap();
        let mut filled = [0u64; 32];
        b.fill(&mut filled);

        assert_eq!(collected, filled);
    }

    #[test]
    fn algorithm_roundtrips() {
        let rng = Generator::new(Algorithm::Pcg64Insecure, 3).unwrap();
        assert_eq!(rng.algorithm(), Algorithm::Pcg64Insecure);
        assert_eq!(rng.algorithm().to_string(), "pcg64_insecure");
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn hardware_seeding_yields_a_working_generator_or_a_clean_error() {
        match Generator::new(Algorithm::Pcg64Insecure, 0) {
            Ok(mut rng) => {
                // Smoke: the stream advances.
                assert_ne!(rng.next_word(), rng.next_word());
            }
            Err(err) => assert_eq!(err, crate::Error::HardwareRandomUnavailable),
        }
    }
}
