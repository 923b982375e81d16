//! Fenced cycle-counter reads and the scoped [`Stopwatch`] measurement.
//!
//! On x86-64 the start read is `mfence; lfence; rdtsc` (drain the store
//! buffer, then stop earlier loads crossing the read) and the stop read is
//! `rdtscp; lfence` (the serializing variant, with a fence so no later
//! instruction is hoisted before it). On aarch64 both reads are an
//! `isb`-fenced `cntvct_el0`. Other targets fall back to a monotonic
//! `Instant` nanosecond count relative to a process-local epoch, which
//! calibrates to roughly 1 GHz.

use super::Elapsed;

#[cfg(target_arch = "x86_64")]
fn read_counter_start() -> u64 {
    use std::arch::x86_64::{_mm_lfence, _mm_mfence, _rdtsc};

    // SAFETY: fence intrinsics and rdtsc have no preconditions on x86-64.
    unsafe {
        _mm_mfence();
        _mm_lfence();
        _rdtsc()
    }
}

#[cfg(target_arch = "x86_64")]
fn read_counter_stop() -> u64 {
    use std::arch::x86_64::{__rdtscp, _mm_lfence};

    let mut aux = 0u32;
    // SAFETY: rdtscp waits for prior instructions to retire before reading;
    // the trailing fence keeps later instructions behind the read.
    unsafe {
        let ticks = __rdtscp(&mut aux);
        _mm_lfence();
        ticks
    }
}

#[cfg(target_arch = "aarch64")]
fn read_counter_start() -> u64 {
    let ticks: u64;
    // SAFETY: CNTVCT_EL0 is a read-only system register readable from EL0;
    // the isb serializes the pipeline around the read.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) ticks,
            options(nostack, nomem),
        );
    }
    ticks
}

#[cfg(target_arch = "aarch64")]
fn read_counter_stop() -> u64 {
    read_counter_start()
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn read_counter_start() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn read_counter_stop() -> u64 {
    read_counter_start()
}

/// A scoped cycle-counter measurement.
///
/// Construction records the start tick behind full fencing; [`stop`] records
/// the end tick with a serializing read. The delta is an unsigned tick
/// count; a backwards counter is a hardware-contract defect, not a user
/// error, and fails loudly in debug builds.
///
/// ```no_run
/// use randtick_core::timing::Stopwatch;
///
/// let mut watch = Stopwatch::start();
/// // ... region under measurement ...
/// watch.stop();
/// let ticks = watch.elapsed_cycles();
/// ```
///
/// [`stop`]: Stopwatch::stop
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: u64,
    end: u64,
}

impl Stopwatch {
    /// Fence and record the starting tick.
    #[must_use]
    pub fn start() -> Self {
        let start = read_counter_start();
        Self { start, end: start }
    }

    /// Record the terminating tick with a serializing read.
    ///
    /// May be called more than once; each call moves the end mark.
    pub fn stop(&mut self) {
        self.end = read_counter_stop();

        debug_assert!(
            self.end >= self.start,
            "cycle counter went backwards: start {} end {}",
            self.start,
            self.end
        );
    }

    /// Elapsed ticks between [`start`](Stopwatch::start) and the last
    /// [`stop`](Stopwatch::stop).
    pub fn elapsed_cycles(&self) -> u64 {
        self.end.wrapping_sub(self.start)
    }

    /// Elapsed wall time via the calibrated counter frequency.
    ///
    /// Triggers one-time calibration on the first call process-wide; see
    /// [`counter_hz`](super::counter_hz).
    pub fn elapsed(&self) -> Elapsed {
        super::elapsed_time(self.elapsed_cycles())
    }
}
