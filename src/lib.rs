//! Keyboard-to-gamepad translation logic for kbd2pad.
//!
//! Everything that can run without hardware lives here: keyboard report
//! decoding, the fixed key → gamepad mapping, the status state machine and
//! the [`bridge::Bridge`] that ties them to the USB stacks through traits.
//!
//! Usage: `cargo test --lib` (host), `cargo test --features axes` for the
//! 48-button encoding.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and links against this library.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bridge;
pub mod config;
pub mod error;
pub mod hid;
pub mod status;

pub use bridge::{
    Bridge, BridgeState, BridgeStats, GamepadPort, HostEvent, HostPort, Indicator, KeyboardHandle,
    QueueFull,
};
pub use error::Error;
pub use hid::{ActiveReport, KeyboardReport, OutputReport};
pub use status::{ActivityState, Rgb, Status};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "axes")]
    use crate::hid::gamepad::AXIS_CENTER;
    use crate::hid::gamepad::HAT_NEUTRAL;

    #[test]
    fn active_report_matches_feature_selection() {
        #[cfg(not(feature = "axes"))]
        assert_eq!(ActiveReport::SIZE, 8);
        #[cfg(feature = "axes")]
        assert_eq!(ActiveReport::SIZE, 10);
    }

    #[test]
    fn active_report_neutral_serializes_to_rest_state() {
        let mut buf = [0xFFu8; 16];
        let n = ActiveReport::neutral().serialize(&mut buf);
        assert_eq!(n, ActiveReport::SIZE);

        #[cfg(not(feature = "axes"))]
        assert_eq!(&buf[..n], &[0, 0, 0, 0, HAT_NEUTRAL, 0, 0, 0]);
        #[cfg(feature = "axes")]
        assert_eq!(
            &buf[..n],
            &[AXIS_CENTER, AXIS_CENTER, AXIS_CENTER, HAT_NEUTRAL, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn error_display_names_the_length() {
        assert_eq!(
            Error::ReportLength(5).to_string(),
            "unsupported keyboard report length 5"
        );
    }
}
