//! HID report types and keyboard→gamepad translation layer.

pub mod descriptor;
pub mod gamepad;
pub mod keyboard;
pub mod mapping;

#[cfg(test)]
mod tests;

pub use gamepad::{AxisGamepadReport, HatGamepadReport, OutputReport};
pub use keyboard::KeyboardReport;
pub use mapping::map;

/// Gamepad encoding emitted by this build.
#[cfg(not(feature = "axes"))]
pub type ActiveReport = HatGamepadReport;

/// Gamepad encoding emitted by this build.
#[cfg(feature = "axes")]
pub type ActiveReport = AxisGamepadReport;
