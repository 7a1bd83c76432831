//! USB subsystem - keyboard in on the host port, gamepad out on the
//! device port.
//!
//! The RP2040 has one native USB controller, driven by `embassy-usb` as a
//! **device** presenting a single HID gamepad interface. The keyboard side
//! is a PIO-emulated USB host run by TinyUSB (C, linked via FFI) on core 1.
//!
//! - `host`   - TinyUSB callbacks, host event queue, the [`Bridge`] loop
//! - `device` - gamepad HID interface and its writer task (core 0)
//!
//! Translated reports cross from core 1 to core 0 through
//! [`GAMEPAD_REPORTS`].
//!
//! [`Bridge`]: kbd2pad::Bridge

pub mod device;
pub mod host;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use kbd2pad::config::REPORT_QUEUE_DEPTH;
use kbd2pad::ActiveReport;

/// Gamepad reports waiting for the device endpoint.
pub static GAMEPAD_REPORTS: Channel<CriticalSectionRawMutex, ActiveReport, REPORT_QUEUE_DEPTH> =
    Channel::new();
