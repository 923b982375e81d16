//! End-to-end flow: bracket generator work with the stopwatch and
//! aggregate repeated trials with the sample statistics.
//!
//! Calibration is deliberately not triggered here (it sleeps for over ten
//! seconds); tick deltas are validated directly and scaled only through
//! the pure conversion function.

use randtick_core::timing::{Resolution, scale_cycles, summarize};
use randtick_core::{Algorithm, Generator, Stopwatch};

#[test]
fn timed_generator_trials_aggregate_cleanly() {
    let mut rng = Generator::new(Algorithm::Pcg64Insecure, 2024).unwrap();
    let mut buffer = vec![0u64; 100_000];

    let mut trials = [0u64; 10];
    for trial in trials.iter_mut() {
        let mut watch = Stopwatch::start();
        rng.fill(&mut buffer);
        watch.stop();
        *trial = watch.elapsed_cycles();
    }

    let summary = summarize(&trials).unwrap();
    assert!(summary.median > 0);
    assert!(summary.min <= summary.median && summary.median <= summary.max);
    // MAD can never exceed the full spread of the sample.
    assert!(summary.mad <= summary.max - summary.min);
}

#[test]
fn each_sampling_surface_is_reachable_from_one_generator() {
    let mut rng = Generator::new(Algorithm::Xorshift64, 7).unwrap();

    let mut raw = [0u64; 16];
    rng.fill(&mut raw);

    let mut bounded = [0u64; 16];
    rng.fill_range(&mut bounded, 10, 20).unwrap();
    assert!(bounded.iter().all(|&x| (10..=20).contains(&x)));

    let bitcode = randtick_core::Bitcode::from_probability(0.25, 8).unwrap();
    let mut biased = [0u64; 16];
    rng.fill_bias(&mut biased, bitcode);

    let mut reals = [0.0f64; 16];
    rng.fill_unit(&mut reals);
    assert!(reals.iter().all(|&x| (0.0..1.0).contains(&x)));
}

#[test]
fn synthetic_deltas_scale_through_every_resolution() {
    let hz = 3_000_000_000u64;

    let cases = [
        (4_500_000_000u64, Resolution::Seconds, 1.5),
        (1_500_000_000, Resolution::Milliseconds, 500.0),
        (300_000, Resolution::Microseconds, 100.0),
        (2_700, Resolution::Nanoseconds, 900.0),
    ];

    for (cycles, resolution, expected) in cases {
        let elapsed = scale_cycles(cycles, hz);
        assert_eq!(elapsed.resolution, resolution);
        assert!(
            (elapsed.value - expected).abs() <= 0.05 * expected,
            "{cycles} cycles at {hz} Hz reported {}",
            elapsed
        );
    }
}
