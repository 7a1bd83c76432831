//! USB HID gamepad reports emitted on the device side.
//!
//! Two encodings exist; a build picks one of them (see [`ActiveReport`]).
//!
//! Hat + buttons (8 bytes):
//! ```text
//! Byte 0-3: Buttons 1-32 (little-endian bitfield)
//! Byte 4:   Bits 0-3 = hat switch (0 = centered, 1-8 = direction)
//!           Bits 4-7 = padding
//! Byte 5-7: Padding
//! ```
//!
//! Centered axes + buttons (10 bytes):
//! ```text
//! Byte 0-2: X, Y, Z axes (always 128)
//! Byte 3:   Bits 0-3 = hat switch (always 0), bits 4-7 = padding
//! Byte 4-9: Buttons 17-64 (48 bits, byte-wise little-endian)
//! ```
//!
//! [`ActiveReport`]: crate::hid::ActiveReport

/// Hat switch value for "no direction".
pub const HAT_NEUTRAL: u8 = 0;

/// Value of an axis at rest.
pub const AXIS_CENTER: u8 = 128;

/// First key index routed to the hat switch instead of a button.
pub const HAT_KEY_BASE: u8 = 32;

/// Capability shared by every gamepad report encoding.
///
/// A report starts from [`neutral`](OutputReport::neutral) and is filled
/// key by key through [`press`](OutputReport::press), which is where an
/// encoding decides whether a key becomes a button or a hat direction.
pub trait OutputReport: Copy {
    /// Serialized size in bytes.
    const SIZE: usize;
    /// HID report descriptor matching [`serialize`](OutputReport::serialize).
    const DESCRIPTOR: &'static [u8];
    /// Number of addressable button bits.
    const BUTTON_COUNT: u8;

    /// All buttons released, hat centered, axes at rest.
    fn neutral() -> Self;

    /// Set button bit `index` (0-based). Out-of-range indices are ignored.
    fn set_button(&mut self, index: u8);

    /// Set the hat direction. Encodings without a live hat ignore this.
    fn set_hat(&mut self, _direction: u8) {}

    /// Apply a mapped key index.
    fn press(&mut self, key_index: u8) {
        self.set_button(key_index);
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written, 0 if `buf` is too small.
    fn serialize(&self, buf: &mut [u8]) -> usize;
}

// ═══════════════════════════════════════════════════════════════════════════
// 32 buttons + hat
// ═══════════════════════════════════════════════════════════════════════════

/// Gamepad report with 32 buttons and a hat switch.
///
/// Letters and F1-F6 land on buttons 1-32; F7-F12 drive the hat.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HatGamepadReport {
    /// Button bitfield, bit n = button n+1.
    pub buttons: u32,
    /// Hat direction in the low nibble.
    pub hat: u8,
}

impl OutputReport for HatGamepadReport {
    const SIZE: usize = 8;
    const DESCRIPTOR: &'static [u8] = HAT_GAMEPAD_REPORT_DESCRIPTOR;
    const BUTTON_COUNT: u8 = 32;

    fn neutral() -> Self {
        Self {
            buttons: 0,
            hat: HAT_NEUTRAL,
        }
    }

    fn set_button(&mut self, index: u8) {
        if index < Self::BUTTON_COUNT {
            self.buttons |= 1 << index;
        }
    }

    fn set_hat(&mut self, direction: u8) {
        self.hat = direction & 0x0F;
    }

    fn press(&mut self, key_index: u8) {
        if key_index < HAT_KEY_BASE {
            self.set_button(key_index);
        } else {
            // F7 → 1 ... F12 → 6; a later key overwrites an earlier one.
            self.set_hat(key_index - HAT_KEY_BASE + 1);
        }
    }

    fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        buf[0..4].copy_from_slice(&self.buttons.to_le_bytes());
        buf[4] = self.hat & 0x0F;
        buf[5..8].fill(0);
        Self::SIZE
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 48 buttons + centered axes
// ═══════════════════════════════════════════════════════════════════════════

/// Gamepad report with three fixed axes, a fixed hat and 48 buttons.
///
/// The axes and hat only exist so hosts that expect them accept the
/// device; every mapped key is a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisGamepadReport {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    /// Always [`HAT_NEUTRAL`].
    pub hat: u8,
    /// Buttons 0-47, byte 0 bit 0 first.
    pub buttons: [u8; 6],
}

impl Default for AxisGamepadReport {
    fn default() -> Self {
        Self::neutral()
    }
}

impl OutputReport for AxisGamepadReport {
    const SIZE: usize = 10;
    const DESCRIPTOR: &'static [u8] = AXIS_GAMEPAD_REPORT_DESCRIPTOR;
    const BUTTON_COUNT: u8 = 48;

    fn neutral() -> Self {
        Self {
            x: AXIS_CENTER,
            y: AXIS_CENTER,
            z: AXIS_CENTER,
            hat: HAT_NEUTRAL,
            buttons: [0; 6],
        }
    }

    fn set_button(&mut self, index: u8) {
        if index < Self::BUTTON_COUNT {
            self.buttons[usize::from(index / 8)] |= 1 << (index % 8);
        }
    }

    fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < Self::SIZE {
            return 0;
        }
        buf[0] = self.x;
        buf[1] = self.y;
        buf[2] = self.z;
        buf[3] = self.hat & 0x0F;
        buf[4..10].copy_from_slice(&self.buttons);
        Self::SIZE
    }
}

// USB HID report descriptors

/// USB HID Report Descriptor for the 32-button + hat gamepad.
///
/// Same shape as the stock "generic gamepad" templates: one button page
/// block, one hat nibble, then padding out to 8 bytes.
pub const HAT_GAMEPAD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Game Pad)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Buttons 1-32 (32 bits) -
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x20, //   Usage Maximum (Button 32)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x20, //   Report Count (32)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Hat switch (4 bits) -
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x39, //   Usage (Hat switch)
    0x15, 0x01, //   Logical Minimum (1)
    0x25, 0x08, //   Logical Maximum (8)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, // Physical Maximum (315)
    0x65, 0x14, //   Unit (Eng Rot: Degrees)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    //
    //   - Padding (4 bits + 3 bytes) -
    0x65, 0x00, //   Unit (None)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    0x75, 0x08, //   Report Size (8)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x01, //   Input (Constant) - padding
    //
    0xC0, // End Collection
];

/// USB HID Report Descriptor for the centered-axes + 48-button gamepad.
///
/// Hosts match this byte-for-byte; do not reorder items.
pub const AXIS_GAMEPAD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Game Pad)
    0xA1, 0x01, // Collection (Application)
    //
    //   - X, Y, Z axes (3 bytes) -
    0x09, 0x30, //   Usage (X)
    0x09, 0x31, //   Usage (Y)
    0x09, 0x32, //   Usage (Z)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x03, //   Report Count (3)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Hat switch (4 bits) -
    0x09, 0x39, //   Usage (Hat switch)
    0x15, 0x01, //   Logical Minimum (1)
    0x25, 0x08, //   Logical Maximum (8)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, // Physical Maximum (315)
    0x65, 0x14, //   Unit (Eng Rot: Degrees)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    //
    //   - Padding (4 bits) -
    0x65, 0x00, //   Unit (None)
    0x75, 0x04, //   Report Size (4)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - Buttons 17-64 (48 bits) -
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x11, //   Usage Minimum (Button 17)
    0x29, 0x40, //   Usage Maximum (Button 64)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x30, //   Report Count (48)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];
