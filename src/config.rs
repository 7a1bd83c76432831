//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, USB identity strings, indicator colors and pin
//! assignments live here so they can be tuned in one place.

use crate::status::Rgb;

// Status indicator

/// Grace period after the last key release during which the indicator
/// stays in the "key active" color (ms).
pub const ACTIVITY_TIMEOUT_MS: u64 = 100;

/// Period of the status tick that re-renders the indicator (ms).
pub const STATUS_TICK_MS: u64 = 10;

/// Keyboard unplugged.
pub const COLOR_NO_DEVICE: Rgb = Rgb::new(255, 0, 0);

/// Keyboard mounted, nothing pressed recently.
pub const COLOR_IDLE: Rgb = Rgb::new(255, 96, 0);

/// Key held, or released less than `ACTIVITY_TIMEOUT_MS` ago.
pub const COLOR_KEY_ACTIVE: Rgb = Rgb::new(0, 255, 0);

// Report transport

/// Readiness polls per report before it is held for the next tick.
pub const SUBMIT_SPIN_LIMIT: u32 = 1_000;

/// CPU cycles burnt between readiness polls (~8 µs at 120 MHz).
pub const SUBMIT_SPIN_CYCLES: u32 = 1_000;

/// Largest raw keyboard report copied out of the host stack (bytes).
pub const MAX_RAW_REPORT_LEN: usize = 64;

/// Depth of the core 1 -> core 0 output report channel.
pub const REPORT_QUEUE_DEPTH: usize = 4;

/// Depth of the host callback -> host task event channel.
pub const HOST_EVENT_QUEUE_DEPTH: usize = 8;

/// Interval between statistics log lines (seconds).
pub const STATS_LOG_INTERVAL_SECS: u64 = 30;

// USB device side

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "kbd2pad";
pub const USB_PRODUCT: &str = "Keyboard-to-Gamepad Translator";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;

// USB host side

/// TinyUSB root-hub port driven by the PIO-USB host controller.
pub const HOST_RHPORT: u8 = 1;

// GPIO pin assignments (Raspberry Pi Pico defaults)
//
// These are logical names; the actual `embassy_rp::peripherals::*` are
// picked in `main.rs`.  Adjust for your custom PCB.
//
//   PIO-USB D+     → GPIO0  (D- is GPIO1, fixed by PIO-USB)
//   Indicator R    → GPIO18
//   Indicator G    → GPIO19
//   Indicator B    → GPIO20

/// Per-channel level at or above which an indicator LED is switched on.
pub const INDICATOR_ON_LEVEL: u8 = 64;
