//! # randtick-core
//!
//! **Fast, insecure, reproducible randomness — and the stopwatch to prove it.**
//!
//! `randtick-core` pairs two raw-output pseudo-random generators (PCG64
//! insecure and xorshift64) with a fenced cycle-counter timer so the
//! generators can be benchmarked at sub-nanosecond resolution. Neither
//! generator is cryptographically secure; they trade attack resistance for
//! raw speed and bit-exact reproducibility.
//!
//! ## Quick Start
//!
//! ```
//! use randtick_core::{Algorithm, Generator};
//!
//! // Deterministic stream: any nonzero seed is avalanche-mixed first.
//! let mut rng = Generator::new(Algorithm::Pcg64Insecure, 42).unwrap();
//!
//! let mut words = [0u64; 8];
//! rng.fill(&mut words);
//!
//! // Bounded integers via bitmask rejection sampling, bounds inclusive.
//! let mut dice = [0u64; 100];
//! rng.fill_range(&mut dice, 1, 6).unwrap();
//! assert!(dice.iter().all(|&d| (1..=6).contains(&d)));
//! ```
//!
//! Timing a region and reporting it in a human scale:
//!
//! ```no_run
//! use randtick_core::timing::{self, Stopwatch};
//!
//! // First call calibrates the counter frequency (takes >10 seconds).
//! timing::counter_hz();
//!
//! let mut watch = Stopwatch::start();
//! // ... region under measurement ...
//! watch.stop();
//! let elapsed = timing::elapsed_time(watch.elapsed_cycles());
//! println!("{:.2} {}", elapsed.value, elapsed.resolution.symbol());
//! ```
//!
//! ## Architecture
//!
//! Seed (splitmix64 / rdrand) → [`Generator`] raw 64-bit stream → sampling
//! layer (bounded integers, biased bit lanes, uniform reals).
//!
//! Independently: [`timing::Stopwatch`] cycle delta → calibrated frequency →
//! [`timing::Elapsed`] wall-time report, with [`timing::summarize`] for
//! robust aggregation of many trials.

pub mod error;
pub mod generator;
pub mod sampling;
mod seed;
pub mod timing;

pub use error::Error;
pub use generator::{Algorithm, Generator};
pub use sampling::Bitcode;
pub use timing::{Elapsed, Resolution, SampleSummary, Stopwatch};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
