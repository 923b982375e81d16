//! One-time estimation of the cycle counter frequency.
//!
//! Modern hardware drives the counter at a stable constant rate locked to
//! an unadvertised reference frequency, so the estimate is computed once
//! and cached for the process lifetime. The first demand is slow (ten
//! one-second sleeps plus overhead trials, >10 s total); latency-sensitive
//! callers should invoke [`counter_hz`] eagerly before their hot path.

use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

use log::{debug, info};

use super::stats;
use super::stopwatch::Stopwatch;
use super::{Elapsed, scale_cycles};

/// Trials for the nanosleep overhead median.
const OVERHEAD_TRIALS: usize = 100;

/// Trials for the one-second tick median.
const SECOND_TRIALS: usize = 10;

static COUNTER_HZ: OnceLock<u64> = OnceLock::new();

/// Measure the tick cost of one sleep request of `duration`.
fn timed_sleep(duration: Duration) -> u64 {
    let mut watch = Stopwatch::start();
    thread::sleep(duration);
    watch.stop();
    watch.elapsed_cycles()
}

/// Estimate counter ticks per second.
///
/// A 1 ns sleep request measures pure scheduler/syscall overhead; its
/// median over [`OVERHEAD_TRIALS`] runs is subtracted from each of
/// [`SECOND_TRIALS`] one-second sleeps, and the median of those is the
/// frequency. Medians rather than means: OS preemption occasionally stalls
/// a single trial by milliseconds, and one such outlier would corrupt an
/// averaged estimate.
fn estimate_hz() -> u64 {
    info!("calibrating cycle counter frequency, this takes over ten seconds");

    let mut overhead_trials = [0u64; OVERHEAD_TRIALS];
    for trial in overhead_trials.iter_mut() {
        *trial = timed_sleep(Duration::from_nanos(1));
    }

    let overhead = stats::summarize(&overhead_trials)
        .expect("overhead trial buffer is nonempty")
        .median;
    debug!("median sleep overhead: {overhead} ticks");

    let mut second_trials = [0u64; SECOND_TRIALS];
    for trial in second_trials.iter_mut() {
        *trial = timed_sleep(Duration::from_secs(1)).saturating_sub(overhead);
    }

    let summary = stats::summarize(&second_trials).expect("tick trial buffer is nonempty");
    debug!(
        "one-second tick trials: median {} mad {} min {} max {}",
        summary.median, summary.mad, summary.min, summary.max
    );

    // A zero estimate means the counter is broken or stood still across a
    // one-second sleep; nothing downstream can be trusted.
    assert!(summary.median > 0, "estimated counter frequency is zero");

    info!("counter frequency estimate: {} Hz", summary.median);
    summary.median
}

/// The calibrated counter frequency in Hz.
///
/// Computed exactly once per process on first demand and memoized behind a
/// one-time-initialization primitive, so concurrent first calls race only
/// to wait, never to write.
pub fn counter_hz() -> u64 {
    *COUNTER_HZ.get_or_init(estimate_hz)
}

/// Convert a [`Stopwatch`] tick delta to wall time at the calibrated
/// frequency.
///
/// Triggers calibration on the first call process-wide.
pub fn elapsed_time(cycles: u64) -> Elapsed {
    scale_cycles(cycles, counter_hz())
}
