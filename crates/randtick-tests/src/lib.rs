//! Statistical acceptance battery for the randtick generators.
//!
//! Each check returns a [`TestResult`] with a pass/fail determination, the
//! test statistic, and a human-readable detail line. The battery exists to
//! catch algorithmic regressions in the sampling layer (a wrong rejection
//! mask, a stale bias accumulator), not to certify cryptographic quality,
//! which the generators explicitly do not claim.
//!
//! The default profiles run in seconds; the full-scale convergence runs
//! (millions of words per probability) sit behind `#[ignore]` wrappers in
//! the test module.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use randtick_core::sampling::Bitcode;
use randtick_core::{Algorithm, Generator};

/// Result of a single battery check.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    /// Test statistic; meaning varies per check (max deviation, chi-squared
    /// value, absolute error).
    pub statistic: f64,
    pub p_value: Option<f64>,
    pub details: String,
}

impl TestResult {
    fn new(name: &str, passed: bool, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed,
            statistic,
            p_value: None,
            details,
        }
    }
}

fn generator(algorithm: Algorithm, seed: u64) -> Generator {
    Generator::new(algorithm, seed).expect("deterministic seeding cannot fail")
}

// ---------------------------------------------------------------------------
// Raw stream and bounded integers
// ---------------------------------------------------------------------------

/// A full-range bounded request must reduce to the raw stream word for word
/// (the mask covers all 64 bits, so no draw can be rejected).
pub fn full_range_equivalence(algorithm: Algorithm, seed: u64, n: usize) -> TestResult {
    let name = "Full-Range Equivalence";
    let mut raw = generator(algorithm, seed);
    let mut bounded = raw.clone();

    let raw_out = raw.collect(n).expect("battery buffer allocation");
    let mut bounded_out = vec![0u64; n];
    bounded
        .fill_range(&mut bounded_out, 0, u64::MAX)
        .expect("full range is a valid bound");

    let mismatches = raw_out
        .iter()
        .zip(&bounded_out)
        .filter(|(a, b)| a != b)
        .count();

    TestResult::new(
        name,
        mismatches == 0,
        mismatches as f64,
        format!("{mismatches}/{n} words diverged from the raw stream"),
    )
}

/// Every bounded draw must land inside `[min, max]`, and over enough draws
/// of a two-value range both endpoints must occur.
pub fn bound_inclusivity(algorithm: Algorithm, seed: u64, n: usize) -> TestResult {
    let name = "Bound Inclusivity";
    let mut rng = generator(algorithm, seed);

    let mut out = vec![0u64; n];
    rng.fill_range(&mut out, 0, 1).expect("valid bounds");

    let ones = out.iter().filter(|&&x| x == 1).count();
    let in_range = out.iter().all(|&x| x <= 1);
    let both_occur = ones > 0 && ones < n;

    TestResult::new(
        name,
        in_range && both_occur,
        ones as f64 / n as f64,
        format!("{ones}/{n} ones, all draws in bounds: {in_range}"),
    )
}

/// Chi-squared uniformity of `fill_range` over a ten-bucket range.
///
/// Rejection sampling that mishandled the mask or the ceiling comparison
/// would pile probability onto a subset of buckets.
pub fn range_uniformity(algorithm: Algorithm, seed: u64, draws: usize) -> TestResult {
    let name = "Range Uniformity";
    const BUCKETS: usize = 10;

    let mut rng = generator(algorithm, seed);
    let mut out = vec![0u64; draws];
    rng.fill_range(&mut out, 0, (BUCKETS - 1) as u64)
        .expect("valid bounds");

    let mut counts = [0u64; BUCKETS];
    for &x in &out {
        counts[x as usize] += 1;
    }

    let expected = draws as f64 / BUCKETS as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let diff = c as f64 - expected;
            diff * diff / expected
        })
        .sum();

    let dist = ChiSquared::new((BUCKETS - 1) as f64).expect("valid degrees of freedom");
    let p = 1.0 - dist.cdf(chi2);
    let passed = p >= 0.001;

    let mut result = TestResult::new(
        name,
        passed,
        chi2,
        format!("chi2 {chi2:.2} over {BUCKETS} buckets, {draws} draws"),
    );
    result.p_value = Some(p);
    result
}

// ---------------------------------------------------------------------------
// Biased bits
// ---------------------------------------------------------------------------

/// Empirical convergence of the biased-bit generator across every valid
/// 8-bit numerator.
///
/// For each `numerator / 256`, generate `words` output words and compare
/// the set-bit frequency against the target probability. With `per_lane`
/// set, each of the 64 bit lanes is checked independently (the full-scale
/// run); otherwise lanes are pooled, which reaches the same tolerance with
/// far fewer words.
pub fn bias_convergence(
    algorithm: Algorithm,
    seed: u64,
    words: usize,
    tolerance: f64,
    per_lane: bool,
) -> TestResult {
    let name = "Bias Convergence";
    let mut rng = generator(algorithm, seed);
    let mut buffer = vec![0u64; words];

    let mut worst: f64 = 0.0;
    let mut worst_detail = String::new();

    for numerator in 1..=255u64 {
        let target = numerator as f64 / 256.0;
        let bitcode = Bitcode::new(numerator, 8).expect("valid 8-bit numerator");
        rng.fill_bias(&mut buffer, bitcode);

        if per_lane {
            let mut lane_counts = [0u64; 64];
            for &word in &buffer {
                for (lane, count) in lane_counts.iter_mut().enumerate() {
                    *count += (word >> lane) & 1;
                }
            }

            for (lane, &count) in lane_counts.iter().enumerate() {
                let deviation = (count as f64 / words as f64 - target).abs();
                if deviation > worst {
                    worst = deviation;
                    worst_detail = format!("p={target:.6} lane {lane}");
                }
            }
        } else {
            let set: u64 = buffer.iter().map(|w| u64::from(w.count_ones())).sum();
            let deviation = (set as f64 / (words as f64 * 64.0) - target).abs();
            if deviation > worst {
                worst = deviation;
                worst_detail = format!("p={target:.6} pooled");
            }
        }
    }

    TestResult::new(
        name,
        worst <= tolerance,
        worst,
        format!("worst deviation {worst:.6} at {worst_detail} (tolerance {tolerance})"),
    )
}

// ---------------------------------------------------------------------------
// Uniform reals
// ---------------------------------------------------------------------------

/// Monte Carlo recovery of pi from paired uniform draws.
///
/// The fraction of `(x, y)` pairs inside the unit quarter-circle estimates
/// pi/4; a scaling or interval slip in `fill_unit` shows up as a biased
/// estimate long before tolerance-scale sample noise does. Also verifies
/// the half-open interval contract on every draw.
pub fn monte_carlo_pi(algorithm: Algorithm, seed: u64, trials: usize, tolerance: f64) -> TestResult {
    let name = "Monte Carlo Pi";
    const CHUNK: usize = 65_536;

    let mut rng = generator(algorithm, seed);
    let mut x = vec![0.0f64; CHUNK];
    let mut y = vec![0.0f64; CHUNK];

    let mut inside = 0u64;
    let mut out_of_interval = 0u64;
    let mut remaining = trials;

    while remaining > 0 {
        let take = remaining.min(CHUNK);
        rng.fill_unit(&mut x[..take]);
        rng.fill_unit(&mut y[..take]);

        for i in 0..take {
            if !(0.0..1.0).contains(&x[i]) || !(0.0..1.0).contains(&y[i]) {
                out_of_interval += 1;
            }
            if x[i] * x[i] + y[i] * y[i] <= 1.0 {
                inside += 1;
            }
        }

        remaining -= take;
    }

    let estimate = 4.0 * inside as f64 / trials as f64;
    let error = (estimate - std::f64::consts::PI).abs();
    let passed = error <= tolerance && out_of_interval == 0;

    TestResult::new(
        name,
        passed,
        error,
        format!(
            "pi estimate {estimate:.5} over {trials} trials (tolerance {tolerance}), \
             {out_of_interval} draws outside [0,1)"
        ),
    )
}

// ---------------------------------------------------------------------------
// Battery runner
// ---------------------------------------------------------------------------

/// Run the fast battery profile against one algorithm.
pub fn run_battery(algorithm: Algorithm, seed: u64) -> Vec<TestResult> {
    vec![
        full_range_equivalence(algorithm, seed, 10_000),
        bound_inclusivity(algorithm, seed, 1_000),
        range_uniformity(algorithm, seed, 100_000),
        bias_convergence(algorithm, seed, 20_000, 0.005, false),
        monte_carlo_pi(algorithm, seed, 1_000_000, 0.02),
    ]
}
