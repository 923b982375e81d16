//! Error taxonomy shared by the generator and timing engines.
//!
//! Every fallible operation returns a synchronous `Result`; nothing in this
//! crate panics on caller error. Argument validation happens before any
//! generator state is mutated, so a failed call has no partial side effects.

use thiserror::Error;

/// Failure modes surfaced across the crate boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A buffer-allocating convenience could not reserve memory.
    #[error("memory allocation failed")]
    AllocationFailed,

    /// The hardware random instruction underflowed past its retry limit, or
    /// the target has no such instruction. Recoverable only by retrying or
    /// by switching to explicit deterministic seeding; there is no silent
    /// fallback to a weaker source.
    #[error("hardware random instruction unavailable")]
    HardwareRandomUnavailable,

    /// A caller contract violation: invalid probability, exponent, or bound
    /// ordering.
    #[error("argument out of range")]
    ArgumentOutOfRange,

    /// Reserved. Never constructed by this crate.
    #[error("undefined error")]
    Undefined,
}
