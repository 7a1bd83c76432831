//! Unit tests for keyboard decoding and gamepad translation.
//!
//! These tests run on the host (not embedded) and verify the pure
//! logic of report decoding, key mapping, and serialization.

use super::gamepad::{AxisGamepadReport, HatGamepadReport, OutputReport, AXIS_CENTER};
use super::keyboard::KeyboardReport;
use super::mapping::{key_index, map, MAPPED_KEY_COUNT};
use crate::error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Keyboard Report Decoding
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyboard_report_empty() {
    let report = KeyboardReport::empty();
    assert!(!report.any_key_held());
    assert_eq!(report.modifier, 0);
    assert_eq!(report.keycodes, [0; 6]);
}

#[test]
fn keyboard_report_decode_boot_layout() {
    // Modifier: Left Shift (0x02), Reserved: 0, Keys: 'A' (0x04)
    let data = [0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00];
    let report = KeyboardReport::decode(&data).unwrap();

    assert_eq!(report.modifier, 0x02);
    assert_eq!(report.reserved, 0x00);
    assert_eq!(report.keycodes[0], 0x04);
    assert!(report.any_key_held());
}

#[test]
fn keyboard_report_decode_vendor_layout_ignores_tail() {
    let mut data = [0xAAu8; 18];
    data[..8].copy_from_slice(&[0x00, 0x00, 0x3A, 0x05, 0x00, 0x00, 0x00, 0x00]);
    let report = KeyboardReport::decode(&data).unwrap();

    assert_eq!(report.modifier, 0x00);
    assert_eq!(report.keycodes, [0x3A, 0x05, 0, 0, 0, 0]);
}

#[test]
fn keyboard_report_decode_rejects_other_lengths() {
    for len in (0..=64).filter(|&l| l != 8 && l != 18) {
        let data = [0x04u8; 64];
        assert_eq!(
            KeyboardReport::decode(&data[..len]),
            Err(Error::ReportLength(len)),
            "length {len}"
        );
    }
}

#[test]
fn keyboard_report_modifier_only_is_not_a_key() {
    let data = [0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    let report = KeyboardReport::decode(&data).unwrap();
    assert!(!report.any_key_held());
    assert_eq!(report.held_keys().count(), 0);
}

#[test]
fn keyboard_report_held_keys_in_slot_order() {
    let report = KeyboardReport::with_keys(&[0x00, 0x07, 0x00, 0x04]);
    let mut held = [0u8; 6];
    let mut n = 0;
    for key in report.held_keys() {
        held[n] = key;
        n += 1;
    }
    assert_eq!(&held[..n], &[0x07, 0x04]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Key Index Table
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn key_index_letters_and_function_keys() {
    assert_eq!(key_index(0x04), Some(0)); // A
    assert_eq!(key_index(0x1D), Some(25)); // Z
    assert_eq!(key_index(0x3A), Some(26)); // F1
    assert_eq!(key_index(0x45), Some(37)); // F12
    assert_eq!(MAPPED_KEY_COUNT, 38);
}

#[test]
fn key_index_ignores_everything_else() {
    for usage in 0..=u8::MAX {
        let mapped = (0x04..=0x1D).contains(&usage) || (0x3A..=0x45).contains(&usage);
        assert_eq!(key_index(usage).is_some(), mapped, "usage {usage:#04x}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Hat + Buttons Encoding
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn hat_report_all_slots_empty_is_neutral() {
    let out: HatGamepadReport = map(&KeyboardReport::empty());
    assert_eq!(out.buttons, 0);
    assert_eq!(out.hat, 0);
}

#[test]
fn hat_report_letters_set_single_button() {
    for code in 0x04..=0x1Du8 {
        let out: HatGamepadReport = map(&KeyboardReport::with_keys(&[code]));
        assert_eq!(out.buttons, 1 << (code - 0x04), "usage {code:#04x}");
        assert_eq!(out.hat, 0);
    }
}

#[test]
fn hat_report_f1_to_f6_set_buttons_27_to_32() {
    for code in 0x3A..=0x3Fu8 {
        let out: HatGamepadReport = map(&KeyboardReport::with_keys(&[code]));
        assert_eq!(out.buttons, 1 << (26 + (code - 0x3A)), "usage {code:#04x}");
        assert_eq!(out.hat, 0);
    }
}

#[test]
fn hat_report_f7_to_f12_drive_hat_only() {
    for code in 0x40..=0x45u8 {
        let out: HatGamepadReport = map(&KeyboardReport::with_keys(&[code]));
        assert_eq!(out.buttons, 0, "usage {code:#04x}");
        assert_eq!(out.hat, 1 + (code - 0x40));
    }
}

#[test]
fn hat_report_last_slot_wins() {
    // F8 in slot 1, F11 in slot 4: hat follows F11.
    let out: HatGamepadReport = map(&KeyboardReport::with_keys(&[0x00, 0x41, 0x04, 0x00, 0x44]));
    assert_eq!(out.hat, 5);
    assert_eq!(out.buttons, 1);

    // Same keys, swapped slots.
    let out: HatGamepadReport = map(&KeyboardReport::with_keys(&[0x00, 0x44, 0x04, 0x00, 0x41]));
    assert_eq!(out.hat, 2);
}

#[test]
fn hat_report_combines_all_held_buttons() {
    // A, Z, F1, F6, digit 1 (ignored), Left Ctrl usage (ignored).
    let out: HatGamepadReport =
        map(&KeyboardReport::with_keys(&[0x04, 0x1D, 0x3A, 0x3F, 0x1E, 0xE0]));
    assert_eq!(out.buttons, (1 << 0) | (1 << 25) | (1 << 26) | (1 << 31));
    assert_eq!(out.hat, 0);
}

#[test]
fn hat_report_set_button_out_of_range_is_ignored() {
    let mut out = HatGamepadReport::neutral();
    out.set_button(32);
    out.set_button(200);
    assert_eq!(out.buttons, 0);
}

#[test]
fn hat_report_serialize() {
    let out = HatGamepadReport {
        buttons: 0x8000_0001,
        hat: 3,
    };
    let mut buf = [0xFFu8; 8];
    assert_eq!(out.serialize(&mut buf), 8);
    assert_eq!(buf, [0x01, 0x00, 0x00, 0x80, 0x03, 0x00, 0x00, 0x00]);
}

#[test]
fn hat_report_serialize_buffer_too_small() {
    let mut buf = [0u8; 7];
    assert_eq!(HatGamepadReport::neutral().serialize(&mut buf), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Centered Axes + 48 Buttons Encoding
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn axis_report_all_slots_empty_is_neutral() {
    let out: AxisGamepadReport = map(&KeyboardReport::empty());
    assert_eq!(out.buttons, [0; 6]);
    assert_eq!((out.x, out.y, out.z), (AXIS_CENTER, AXIS_CENTER, AXIS_CENTER));
    assert_eq!(out.hat, 0);
}

#[test]
fn axis_report_letters_set_single_button() {
    for code in 0x04..=0x1Du8 {
        let out: AxisGamepadReport = map(&KeyboardReport::with_keys(&[code]));
        let bit = code - 0x04;
        let mut expected = [0u8; 6];
        expected[usize::from(bit / 8)] = 1 << (bit % 8);
        assert_eq!(out.buttons, expected, "usage {code:#04x}");
    }
}

#[test]
fn axis_report_function_keys_are_buttons_26_to_37() {
    for code in 0x3A..=0x45u8 {
        let out: AxisGamepadReport = map(&KeyboardReport::with_keys(&[code]));
        let bit = 26 + (code - 0x3A);
        let mut expected = [0u8; 6];
        expected[usize::from(bit / 8)] = 1 << (bit % 8);
        assert_eq!(out.buttons, expected, "usage {code:#04x}");
        assert_eq!(out.hat, 0);
    }
}

#[test]
fn axis_report_upper_bits_stay_clear() {
    let out: AxisGamepadReport =
        map(&KeyboardReport::with_keys(&[0x40, 0x41, 0x42, 0x43, 0x44, 0x45]));
    // Bits 32..=37 set, 38..=47 clear.
    assert_eq!(out.buttons, [0, 0, 0, 0, 0b0011_1111, 0]);
}

#[test]
fn axis_report_serialize() {
    let mut out = AxisGamepadReport::neutral();
    out.set_button(0);
    out.set_button(37);
    out.set_hat(4); // no live hat in this encoding
    let mut buf = [0u8; 10];
    assert_eq!(out.serialize(&mut buf), 10);
    assert_eq!(buf, [128, 128, 128, 0x00, 0x01, 0, 0, 0, 0x20, 0]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Mapper Purity
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn map_is_idempotent() {
    let input = KeyboardReport::with_keys(&[0x04, 0x42, 0x3B, 0x45, 0x1D, 0x09]);
    let before = input;

    let a: HatGamepadReport = map(&input);
    let b: HatGamepadReport = map(&input);
    assert_eq!(a, b);

    let c: AxisGamepadReport = map(&input);
    let d: AxisGamepadReport = map(&input);
    assert_eq!(c, d);

    assert_eq!(input, before);
}

#[test]
fn map_does_not_carry_state_between_reports() {
    let _: HatGamepadReport = map(&KeyboardReport::with_keys(&[0x04, 0x45]));
    let out: HatGamepadReport = map(&KeyboardReport::with_keys(&[0x05]));
    assert_eq!(out.buttons, 1 << 1);
    assert_eq!(out.hat, 0);
}
