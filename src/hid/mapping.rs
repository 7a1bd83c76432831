//! Fixed keyboard → gamepad mapping policy.
//!
//! Every supported key gets a dense key index:
//! ```text
//! A-Z     (0x04-0x1D) → 0-25
//! F1-F12  (0x3A-0x45) → 26-37
//! ```
//! The active [`OutputReport`] encoding decides what an index turns into.

use super::gamepad::OutputReport;
use super::keyboard::KeyboardReport;

/// Usage code of the `A` key.
pub const KEY_A: u8 = 0x04;
/// Usage code of the `Z` key.
pub const KEY_Z: u8 = 0x1D;
/// Usage code of `F1`.
pub const KEY_F1: u8 = 0x3A;
/// Usage code of `F12`.
pub const KEY_F12: u8 = 0x45;

/// Number of letter keys, also the key index of `F1`.
pub const LETTER_COUNT: u8 = KEY_Z - KEY_A + 1;

/// Total number of mapped keys.
pub const MAPPED_KEY_COUNT: u8 = LETTER_COUNT + (KEY_F12 - KEY_F1 + 1);

/// Dense key index of a usage code, or `None` for unmapped keys.
pub fn key_index(usage: u8) -> Option<u8> {
    match usage {
        KEY_A..=KEY_Z => Some(usage - KEY_A),
        KEY_F1..=KEY_F12 => Some(LETTER_COUNT + (usage - KEY_F1)),
        _ => None,
    }
}

/// Translate a keyboard report into a fresh gamepad report.
///
/// Slots are visited 0 → 5 so that collisions resolve the same way every
/// time. Nothing is carried over from earlier reports.
pub fn map<R: OutputReport>(keyboard: &KeyboardReport) -> R {
    let mut report = R::neutral();
    for usage in keyboard.held_keys() {
        if let Some(index) = key_index(usage) {
            debug!("key {=u8:#x} -> index {=u8}", usage, index);
            report.press(index);
        }
    }
    report
}
