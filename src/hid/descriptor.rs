//! HID Report Descriptor walker.
//!
//! Walks a report descriptor and summarises the single input report it
//! describes. Used to cross-check the gamepad descriptors against their
//! serialisers and to log the active layout at start-up.
//!
//! ## HID Report Descriptor Structure
//!
//! A Report Descriptor is a sequence of items. Each item starts with a
//! prefix byte:
//! ```text
//! Bits 7-4: tag
//! Bits 3-2: type (0 = Main, 1 = Global, 2 = Local)
//! Bits 1-0: data size (0, 1, 2 or 4 bytes)
//! ```
//!
//! ## Limitations
//!
//! Only what a single-report gamepad needs is tracked:
//! - Report IDs, Push/Pop and long items are not supported
//! - Usage Minimum/Maximum ranges are not expanded
//! - Output and Feature items are skipped

/// Usage page codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsagePage {
    /// Generic Desktop (joystick, gamepad, axes, hat).
    GenericDesktop,
    /// Keyboard/Keypad.
    Keyboard,
    /// Button.
    Button,
    /// Unknown/unsupported.
    Unknown(u16),
}

impl From<u16> for UsagePage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => UsagePage::GenericDesktop,
            0x07 => UsagePage::Keyboard,
            0x09 => UsagePage::Button,
            other => UsagePage::Unknown(other),
        }
    }
}

/// Generic Desktop usage codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesktopUsage {
    Joystick,
    GamePad,
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
    HatSwitch,
    Unknown(u16),
}

impl From<u16> for DesktopUsage {
    fn from(code: u16) -> Self {
        match code {
            0x04 => DesktopUsage::Joystick,
            0x05 => DesktopUsage::GamePad,
            0x30 => DesktopUsage::X,
            0x31 => DesktopUsage::Y,
            0x32 => DesktopUsage::Z,
            0x33 => DesktopUsage::Rx,
            0x34 => DesktopUsage::Ry,
            0x35 => DesktopUsage::Rz,
            0x39 => DesktopUsage::HatSwitch,
            other => DesktopUsage::Unknown(other),
        }
    }
}

impl DesktopUsage {
    fn is_axis(self) -> bool {
        matches!(
            self,
            DesktopUsage::X
                | DesktopUsage::Y
                | DesktopUsage::Z
                | DesktopUsage::Rx
                | DesktopUsage::Ry
                | DesktopUsage::Rz
        )
    }
}

/// Maximum number of local usages remembered before a main item.
const MAX_PENDING_USAGES: usize = 8;

/// Summary of the input report a descriptor describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportLayout {
    /// Total input bits, padding included.
    pub input_bits: u16,
    /// Number of 1-bit data fields on the Button page.
    pub buttons: u16,
    /// Number of Generic Desktop axis fields.
    pub axes: u8,
    /// Whether a hat switch field is present.
    pub has_hat: bool,
    /// Whether the application collection is a Game Pad.
    pub is_gamepad: bool,
}

impl ReportLayout {
    /// Input report length in whole bytes.
    pub fn input_bytes(&self) -> usize {
        usize::from(self.input_bits).div_ceil(8)
    }

    /// Walk a HID Report Descriptor.
    ///
    /// Returns `None` for truncated descriptors, unbalanced collections or
    /// descriptors without any input item.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut layout = ReportLayout::default();

        // Parser state.
        let mut usage_page = UsagePage::Unknown(0);
        let mut usages = [0u16; MAX_PENDING_USAGES];
        let mut usage_count = 0usize;
        let mut report_size: u16 = 0;
        let mut report_count: u16 = 0;
        let mut depth: u8 = 0;
        let mut saw_input = false;

        let mut i = 0;
        while i < data.len() {
            let prefix = data[i];
            let tag = (prefix >> 4) & 0x0F;
            let item_type = (prefix >> 2) & 0x03;
            let size = match prefix & 0x03 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 4,
            };

            if i + 1 + size > data.len() {
                return None;
            }

            let value: u32 = match size {
                0 => 0,
                1 => u32::from(data[i + 1]),
                2 => u32::from(u16::from_le_bytes([data[i + 1], data[i + 2]])),
                _ => u32::from_le_bytes([data[i + 1], data[i + 2], data[i + 3], data[i + 4]]),
            };

            match item_type {
                // Main items
                0 => {
                    match tag {
                        // Input
                        0x08 => {
                            saw_input = true;
                            let total_bits = report_size.saturating_mul(report_count);
                            layout.input_bits = layout.input_bits.saturating_add(total_bits);

                            let is_constant = (value & 0x01) != 0;
                            if !is_constant {
                                match usage_page {
                                    UsagePage::Button => {
                                        layout.buttons = layout.buttons.saturating_add(total_bits);
                                    }
                                    UsagePage::GenericDesktop => {
                                        for &usage in &usages[..usage_count] {
                                            let usage = DesktopUsage::from(usage);
                                            if usage == DesktopUsage::HatSwitch {
                                                layout.has_hat = true;
                                            } else if usage.is_axis() {
                                                layout.axes = layout.axes.saturating_add(1);
                                            }
                                        }
                                    }
                                    _ => {}
                                }
                            }
                        }
                        // Collection
                        0x0A => {
                            if depth == 0
                                && usage_page == UsagePage::GenericDesktop
                                && usage_count > 0
                                && DesktopUsage::from(usages[0]) == DesktopUsage::GamePad
                            {
                                layout.is_gamepad = true;
                            }
                            depth = depth.saturating_add(1);
                        }
                        // End Collection
                        0x0C => {
                            depth = depth.checked_sub(1)?;
                        }
                        _ => {}
                    }
                    // Local items only live until the next main item.
                    usage_count = 0;
                }
                // Global items
                1 => match tag {
                    // Usage Page
                    0x00 => usage_page = UsagePage::from(value as u16),
                    // Report Size
                    0x07 => report_size = value as u16,
                    // Report Count
                    0x09 => report_count = value as u16,
                    _ => {}
                },
                // Local items
                2 => {
                    if tag == 0x00 && usage_count < MAX_PENDING_USAGES {
                        usages[usage_count] = value as u16;
                        usage_count += 1;
                    }
                }
                _ => {}
            }

            i += 1 + size;
        }

        if depth != 0 || !saw_input {
            debug!("HID descriptor: unbalanced or without input items");
            return None;
        }
        Some(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::gamepad::{AxisGamepadReport, HatGamepadReport, OutputReport};

    #[test]
    fn hat_gamepad_descriptor_layout() {
        let layout = ReportLayout::parse(HatGamepadReport::DESCRIPTOR).unwrap();
        assert!(layout.is_gamepad);
        assert_eq!(layout.buttons, 32);
        assert_eq!(layout.axes, 0);
        assert!(layout.has_hat);
        assert_eq!(layout.input_bits, 64);
        assert_eq!(layout.input_bytes(), HatGamepadReport::SIZE);
    }

    #[test]
    fn axis_gamepad_descriptor_layout() {
        let layout = ReportLayout::parse(AxisGamepadReport::DESCRIPTOR).unwrap();
        assert!(layout.is_gamepad);
        assert_eq!(layout.buttons, 48);
        assert_eq!(layout.axes, 3);
        assert!(layout.has_hat);
        assert_eq!(layout.input_bits, 80);
        assert_eq!(layout.input_bytes(), AxisGamepadReport::SIZE);
    }

    #[test]
    fn axis_gamepad_descriptor_button_range_is_17_to_64() {
        let desc = AxisGamepadReport::DESCRIPTOR;
        let pos = desc
            .windows(4)
            .position(|w| w == [0x05, 0x09, 0x19, 0x11])
            .expect("button block");
        assert_eq!(&desc[pos + 4..pos + 6], &[0x29, 0x40]);
        assert_eq!(desc.last(), Some(&0xC0));
    }

    #[test]
    fn truncated_descriptor_is_rejected() {
        // Physical Maximum announces two data bytes but only one follows.
        assert!(ReportLayout::parse(&[0x05, 0x01, 0x46, 0x3B]).is_none());
    }

    #[test]
    fn unbalanced_collection_is_rejected() {
        let desc = [0x05, 0x01, 0x09, 0x05, 0xA1, 0x01, 0x75, 0x08, 0x95, 0x01, 0x81, 0x02];
        assert!(ReportLayout::parse(&desc).is_none());
    }

    #[test]
    fn descriptor_without_input_is_rejected() {
        assert!(ReportLayout::parse(&[0x05, 0x01, 0x09, 0x05, 0xA1, 0x01, 0xC0]).is_none());
        assert!(ReportLayout::parse(&[]).is_none());
    }

    #[test]
    fn keyboard_descriptor_is_not_a_gamepad() {
        let desc = [
            0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, // Keyboard application
            0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x08,
            0x81, 0x02, // modifiers
            0xC0,
        ];
        let layout = ReportLayout::parse(&desc).unwrap();
        assert!(!layout.is_gamepad);
        assert_eq!(layout.buttons, 0);
        assert_eq!(layout.input_bits, 8);
    }
}
