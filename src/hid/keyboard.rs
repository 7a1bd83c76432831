//! USB HID keyboard report (boot protocol compatible).
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```
//!
//! Some vendor keyboards deliver an 18-byte report whose first 8 bytes
//! follow the layout above. The trailing 10 bytes are ignored.

use crate::error::Error;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Length of the extended vendor report.
pub const VENDOR_REPORT_SIZE: usize = 18;

/// Number of keycode slots in a boot report.
pub const KEYCODE_SLOTS: usize = 6;

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield. Not used by the mapping.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes, 0 = empty slot.
    pub keycodes: [u8; KEYCODE_SLOTS],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; KEYCODE_SLOTS],
        }
    }

    /// Build a report holding `keys` in slot order (test helper).
    #[cfg(test)]
    pub fn with_keys(keys: &[u8]) -> Self {
        let mut report = Self::empty();
        for (slot, &key) in report.keycodes.iter_mut().zip(keys) {
            *slot = key;
        }
        report
    }

    /// Parse a raw report delivered by the USB host stack.
    ///
    /// Only the 8-byte boot layout and the 18-byte vendor layout are
    /// accepted; anything else is rejected without further inspection.
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        match data.len() {
            KEYBOARD_REPORT_SIZE | VENDOR_REPORT_SIZE => Ok(Self {
                modifier: data[0],
                reserved: data[1],
                keycodes: [data[2], data[3], data[4], data[5], data[6], data[7]],
            }),
            other => Err(Error::ReportLength(other)),
        }
    }

    /// Non-empty keycode slots, slot 0 first.
    pub fn held_keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.keycodes.iter().copied().filter(|&k| k != 0)
    }

    /// Returns `true` if at least one keycode slot is occupied.
    ///
    /// Modifiers alone do not count as a held key.
    pub fn any_key_held(&self) -> bool {
        self.keycodes.iter().any(|&k| k != 0)
    }
}
