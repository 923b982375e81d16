//! Cycle-counter timing: fenced stopwatch, one-time frequency calibration,
//! and robust sample statistics.
//!
//! The measurement path is deliberately minimal: bracket a region with a
//! [`Stopwatch`], convert the tick delta to wall time through the calibrated
//! counter frequency, and aggregate repeated trials with [`summarize`]. The
//! counter is assumed monotonic and constant-rate for the process lifetime
//! (invariant-TSC class hardware); virtualized or non-monotonic clocks are
//! out of scope.

mod calibration;
mod stats;
mod stopwatch;

pub use calibration::{counter_hz, elapsed_time};
pub use stats::{SampleSummary, summarize};
pub use stopwatch::Stopwatch;

use serde::Serialize;

/// Wall-time resolution of a reported measurement, coarsest to finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Resolution {
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl Resolution {
    /// Unit label for display, e.g. `"ms"`.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Seconds => "sec",
            Self::Milliseconds => "ms",
            Self::Microseconds => "us",
            Self::Nanoseconds => "ns",
        }
    }

    /// The next finer resolution, or `None` at the nanosecond floor.
    fn finer(&self) -> Option<Self> {
        match self {
            Self::Seconds => Some(Self::Milliseconds),
            Self::Milliseconds => Some(Self::Microseconds),
            Self::Microseconds => Some(Self::Nanoseconds),
            Self::Nanoseconds => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An elapsed wall-time measurement scaled to a human resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Elapsed {
    /// Scaled magnitude, at least 1.0 unless at the nanosecond floor.
    pub value: f64,
    /// Unit of `value`.
    pub resolution: Resolution,
}

impl Elapsed {
    /// Unit label of this measurement.
    pub fn symbol(&self) -> &'static str {
        self.resolution.symbol()
    }
}

impl std::fmt::Display for Elapsed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} {}", self.value, self.symbol())
    }
}

/// Convert a raw tick delta to wall time at a given counter frequency.
///
/// Starts in seconds and steps 1000x finer while the magnitude is below
/// one, stopping at nanoseconds regardless of further smallness. Pure in
/// both arguments so tests can drive it with synthetic frequencies;
/// [`elapsed_time`] binds it to the calibrated process-wide frequency.
pub fn scale_cycles(cycles: u64, hz: u64) -> Elapsed {
    let mut value = cycles as f64 / hz as f64;
    let mut resolution = Resolution::Seconds;

    while value < 1.0 {
        match resolution.finer() {
            Some(next) => {
                value *= 1000.0;
                resolution = next;
            }
            None => break,
        }
    }

    Elapsed { value, resolution }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A synthetic 2 GHz counter keeps the arithmetic exact.
    const HZ: u64 = 2_000_000_000;

    #[test]
    fn seconds_scale_task() {
        let elapsed = scale_cycles(3_000_000_000, HZ);
        assert_eq!(elapsed.resolution, Resolution::Seconds);
        assert!((elapsed.value - 1.5).abs() < 0.05 * 1.5);
        assert_eq!(elapsed.symbol(), "sec");
    }

    #[test]
    fn milliseconds_scale_task() {
        let elapsed = scale_cycles(1_000_000_000, HZ);
        assert_eq!(elapsed.resolution, Resolution::Milliseconds);
        assert!((elapsed.value - 500.0).abs() < 0.05 * 500.0);
        assert_eq!(elapsed.symbol(), "ms");
    }

    #[test]
    fn microseconds_scale_task() {
        let elapsed = scale_cycles(200_000, HZ);
        assert_eq!(elapsed.resolution, Resolution::Microseconds);
        assert!((elapsed.value - 100.0).abs() < 0.05 * 100.0);
        assert_eq!(elapsed.symbol(), "us");
    }

    #[test]
    fn nanoseconds_scale_task() {
        let elapsed = scale_cycles(1_800, HZ);
        assert_eq!(elapsed.resolution, Resolution::Nanoseconds);
        assert!((elapsed.value - 900.0).abs() < 0.05 * 900.0);
        assert_eq!(elapsed.symbol(), "ns");
    }

    #[test]
    fn nanoseconds_is_the_scaling_floor() {
        // A sub-nanosecond delta must not scale past ns.
        let elapsed = scale_cycles(1, HZ);
        assert_eq!(elapsed.resolution, Resolution::Nanoseconds);
        assert!(elapsed.value < 1.0);

        let zero = scale_cycles(0, HZ);
        assert_eq!(zero.resolution, Resolution::Nanoseconds);
        assert_eq!(zero.value, 0.0);
    }

    #[test]
    fn exactly_one_unit_does_not_scale_further() {
        let elapsed = scale_cycles(HZ, HZ);
        assert_eq!(elapsed.resolution, Resolution::Seconds);
        assert_eq!(elapsed.value, 1.0);
    }

    #[test]
    fn elapsed_serializes_for_external_reports() {
        let elapsed = scale_cycles(3_000_000_000, HZ);
        let json = serde_json::to_string(&elapsed).unwrap();
        assert!(json.contains("\"resolution\":\"Seconds\""));
    }
}
