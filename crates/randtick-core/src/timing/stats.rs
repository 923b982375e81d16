//! Robust order statistics over tick samples.
//!
//! Calibration and external benchmark harnesses both aggregate repeated
//! trials with the median and the median absolute deviation. OS preemption
//! occasionally stalls one trial by milliseconds, which would corrupt a
//! mean and a standard deviation; order statistics shrug it off.

use serde::Serialize;

/// Median / min / max / MAD summary of a tick sample set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleSummary {
    /// Lower median: element `n/2` of the sorted sample.
    pub median: u64,
    /// Smallest sample.
    pub min: u64,
    /// Largest sample.
    pub max: u64,
    /// Median absolute deviation from the median.
    pub mad: u64,
}

/// Summarize a sample set; `None` when it is empty.
///
/// Operates on internal sorted copies; the caller's ordering is never
/// mutated. Even-length samples use the lower-median convention (element
/// `n/2`), not an average of the middle pair, so every reported statistic
/// is a value that actually occurred.
pub fn summarize(samples: &[u64]) -> Option<SampleSummary> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let median = sorted[sorted.len() / 2];
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    let mut deviations: Vec<u64> = sorted.iter().map(|&x| x.abs_diff(median)).collect();
    deviations.sort_unstable();
    let mad = deviations[deviations.len() / 2];

    Some(SampleSummary { median, min, max, mad })
}
