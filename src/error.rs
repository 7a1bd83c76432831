//! Unified error type for kbd2pad.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use core::fmt;

/// Top-level error type used across the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Host side
    /// A keyboard report had a length other than 8 or 18 bytes.
    ReportLength(usize),

    /// The host stack refused to queue the next report request.
    RearmFailed,

    // Device side
    /// The device endpoint stayed busy for the whole spin budget; the
    /// report is held and retried.
    TransportBusy,

    /// The device endpoint rejected the report.
    TransportWrite,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReportLength(len) => write!(f, "unsupported keyboard report length {len}"),
            Error::RearmFailed => f.write_str("failed to request next keyboard report"),
            Error::TransportBusy => f.write_str("gamepad endpoint not ready"),
            Error::TransportWrite => f.write_str("gamepad endpoint write failed"),
        }
    }
}
