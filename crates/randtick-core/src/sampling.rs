//! Sampling algorithms built on the raw stream: bounded integers, biased
//! bit lanes, and uniform reals.
//!
//! Every operation here consumes [`Generator::next_word`] and nothing else;
//! none allocates beyond the caller's destination buffer. Arguments are
//! validated before any generator state is mutated, so a rejected call has
//! no side effects.

use crate::error::Error;
use crate::generator::Generator;

/// 2^-53, the exponent-only scale for uniform reals.
const UNIT_SCALE: f64 = 1.0 / 9007199254740992.0;

/// Validated probability for [`Generator::fill_bias`]: an integer numerator
/// over a power-of-two denominator, `p = numerator / 2^exponent`.
///
/// Representing the probability this way keeps the biased-bit path free of
/// per-trial floating-point arithmetic; the numerator's binary expansion
/// *is* the traversal path through the probability bisection tree.
/// Construct one with [`Bitcode::new`] (exact) or [`Bitcode::from_probability`]
/// (nearest representable value at the requested resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitcode {
    numerator: u64,
    exponent: u32,
}

impl Bitcode {
    /// Exact probability `numerator / 2^exponent`.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentOutOfRange`] unless `exponent` is in `1..=64` and
    /// `numerator` is nonzero and below `2^exponent` (the probability must
    /// lie strictly between 0 and 1).
    pub fn new(numerator: u64, exponent: u32) -> Result<Self, Error> {
        if exponent == 0 || exponent > 64 {
            return Err(Error::ArgumentOutOfRange);
        }

        let ceiling = match exponent {
            64 => u64::MAX,
            m => (1u64 << m) - 1,
        };

        if numerator == 0 || numerator > ceiling {
            return Err(Error::ArgumentOutOfRange);
        }

        Ok(Self { numerator, exponent })
    }

    /// Nearest representable probability at `exponent` bits of resolution:
    /// `floor(probability * 2^exponent)`, clamped to at least one so the
    /// outcome is never degenerate.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentOutOfRange`] unless `probability` lies strictly
    /// between 0 and 1 and `exponent` is in `1..=64`.
    pub fn from_probability(probability: f64, exponent: u32) -> Result<Self, Error> {
        if !(probability > 0.0 && probability < 1.0) {
            return Err(Error::ArgumentOutOfRange);
        }
        if exponent == 0 || exponent > 64 {
            return Err(Error::ArgumentOutOfRange);
        }

        let ceiling = match exponent {
            64 => u64::MAX,
            m => (1u64 << m) - 1,
        };

        // The float-to-int cast saturates, which handles the rounding edge
        // where probability * 2^64 lands on 2^64 itself.
        let scaled = (probability * (exponent as f64).exp2()) as u64;

        Ok(Self {
            numerator: scaled.clamp(1, ceiling),
            exponent,
        })
    }

    /// The integer numerator of `p = numerator / 2^exponent`.
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    /// The power-of-two resolution of the probability.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// The probability this bitcode encodes, as a float.
    pub fn probability(&self) -> f64 {
        self.numerator as f64 * (-(self.exponent as f64)).exp2()
    }
}

impl Generator {
    /// Fill `dest` with integers drawn uniformly from `[min, max]`, both
    /// bounds inclusive, via bitmask rejection sampling.
    ///
    /// The mask covers exactly the bits needed to represent `max - min`, so
    /// fewer than two raw draws are consumed per emitted value in
    /// expectation, for any bounds. A full-range request (`0..=u64::MAX`)
    /// reduces to the raw stream word for word.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentOutOfRange`] if `min > max`.
    pub fn fill_range(&mut self, dest: &mut [u64], min: u64, max: u64) -> Result<(), Error> {
        if min > max {
            return Err(Error::ArgumentOutOfRange);
        }

        // Zero-width range: a zero ceiling has no mask, so short-circuit.
        if min == max {
            dest.fill(min);
            return Ok(());
        }

        let ceiling = max - min;
        let mask = u64::MAX >> ceiling.leading_zeros();

        for slot in dest.iter_mut() {
            // Reject the whole word on failure rather than salvaging upper
            // bits; the tight mask keeps the acceptance rate above one half.
            let accepted = loop {
                let drawn = self.next_word() & mask;
                if drawn <= ceiling {
                    break drawn;
                }
            };

            *slot = accepted + min;
        }

        Ok(())
    }

    /// Fill `dest` with words of 64 independent Bernoulli trials each, one
    /// lane per bit position, at probability `bitcode.probability()`.
    ///
    /// Each output word is produced by a root-to-leaf walk of the
    /// probability bisection tree (root 0.5, left child half the parent,
    /// right child `p + (1-p)/2`): reading the numerator from its lowest
    /// set bit upward, a 0 bit ANDs a fresh raw word into the accumulator
    /// and a 1 bit ORs one. Fair coin draws combined this way reconstruct a
    /// biased coin exactly, with no floating-point work per trial, and the
    /// full 64-bit word runs all 64 lanes in parallel.
    pub fn fill_bias(&mut self, dest: &mut [u64], bitcode: Bitcode) {
        let numerator = bitcode.numerator();
        let offset = numerator.trailing_zeros();

        for slot in dest.iter_mut() {
            let mut accumulator = 0u64;

            for position in offset..bitcode.exponent() {
                let drawn = self.next_word();

                if (numerator >> position) & 1 == 1 {
                    accumulator |= drawn;
                } else {
                    accumulator &= drawn;
                }
            }

            *slot = accumulator;
        }
    }

    /// Fill `dest` with doubles drawn uniformly from `[0, 1)`.
    ///
    /// One raw word per slot; the top 53 bits are scaled by 2^-53, an
    /// exponent-only operation with no rounding-sensitive division, so the
    /// result can never round up to 1.0.
    pub fn fill_unit(&mut self, dest: &mut [f64]) {
        for slot in dest.iter_mut() {
            *slot = (self.next_word() >> 11) as f64 * UNIT_SCALE;
        }
    }
}
