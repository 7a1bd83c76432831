//! Connection / key-activity status and its indicator color.
//!
//! The indicator shows one of three states:
//! - `NoDevice`  - no keyboard mounted (red)
//! - `KeyActive` - key held, or released less than
//!   [`ACTIVITY_TIMEOUT_MS`](crate::config::ACTIVITY_TIMEOUT_MS) ago (green)
//! - `Idle`      - keyboard mounted, no recent key (orange)
//!
//! The grace period keeps the color from flickering between fast
//! key-up/key-down sequences.

use crate::config;
use crate::hid::KeyboardReport;

/// A color as rendered by the status indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Indicator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// No keyboard mounted.
    NoDevice,
    /// Keyboard mounted, no recent key activity.
    Idle,
    /// Key held or recently released.
    KeyActive,
}

impl Status {
    /// Indicator color for this state.
    pub fn color(self) -> Rgb {
        match self {
            Status::NoDevice => config::COLOR_NO_DEVICE,
            Status::Idle => config::COLOR_IDLE,
            Status::KeyActive => config::COLOR_KEY_ACTIVE,
        }
    }
}

/// Key activity derived from the stream of keyboard reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityState {
    /// At least one keycode slot was occupied in the latest report.
    pub key_down: bool,
    /// Time of the latest report with a held key (ms).
    ///
    /// Kept after release so the grace period can run out.
    pub last_key_ms: Option<u64>,
}

impl ActivityState {
    pub const fn new() -> Self {
        Self {
            key_down: false,
            last_key_ms: None,
        }
    }

    /// Record a decoded keyboard report received at `now_ms`.
    pub fn observe(&mut self, report: &KeyboardReport, now_ms: u64) {
        self.key_down = report.any_key_held();
        if self.key_down {
            self.last_key_ms = Some(now_ms);
        }
    }

    /// Forget held keys, e.g. when the keyboard goes away.
    pub fn release(&mut self) {
        self.key_down = false;
    }
}

/// Decide the indicator state.
///
/// A missing timestamp means no key was ever pressed. A timestamp ahead
/// of `now_ms` counts as zero elapsed time.
pub fn resolve(connected: bool, key_down: bool, last_key_ms: Option<u64>, now_ms: u64) -> Status {
    resolve_with_timeout(
        connected,
        key_down,
        last_key_ms,
        now_ms,
        config::ACTIVITY_TIMEOUT_MS,
    )
}

/// [`resolve`] with an explicit grace period.
pub fn resolve_with_timeout(
    connected: bool,
    key_down: bool,
    last_key_ms: Option<u64>,
    now_ms: u64,
    timeout_ms: u64,
) -> Status {
    if !connected {
        return Status::NoDevice;
    }

    let recent = last_key_ms.is_some_and(|last| now_ms.saturating_sub(last) < timeout_ms);
    if key_down || recent {
        Status::KeyActive
    } else {
        Status::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_overrides_activity() {
        assert_eq!(resolve(false, false, None, 0), Status::NoDevice);
        assert_eq!(resolve(false, true, Some(10), 10), Status::NoDevice);
        assert_eq!(resolve(false, false, Some(10), 20), Status::NoDevice);
    }

    #[test]
    fn key_down_is_always_active() {
        assert_eq!(resolve(true, true, None, 0), Status::KeyActive);
        assert_eq!(resolve(true, true, Some(0), 1_000_000), Status::KeyActive);
    }

    #[test]
    fn grace_period_boundaries() {
        assert_eq!(resolve(true, false, Some(1_000), 1_099), Status::KeyActive);
        assert_eq!(resolve(true, false, Some(1_000), 1_100), Status::Idle);
        assert_eq!(resolve(true, false, Some(1_000), 1_101), Status::Idle);
    }

    #[test]
    fn never_pressed_is_idle() {
        assert_eq!(resolve(true, false, None, 0), Status::Idle);
        assert_eq!(resolve(true, false, None, 50), Status::Idle);
    }

    #[test]
    fn timestamp_ahead_of_clock_counts_as_recent() {
        assert_eq!(resolve(true, false, Some(500), 400), Status::KeyActive);
    }

    #[test]
    fn explicit_timeout_is_honoured() {
        assert_eq!(
            resolve_with_timeout(true, false, Some(0), 250, 300),
            Status::KeyActive
        );
        assert_eq!(resolve_with_timeout(true, false, Some(0), 300, 300), Status::Idle);
    }

    #[test]
    fn status_colors_are_distinct() {
        let colors = [
            Status::NoDevice.color(),
            Status::Idle.color(),
            Status::KeyActive.color(),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
        assert_eq!(Status::NoDevice.color(), config::COLOR_NO_DEVICE);
    }

    #[test]
    fn observe_tracks_latest_press() {
        let mut activity = ActivityState::new();
        activity.observe(&KeyboardReport::with_keys(&[0x04]), 10);
        assert!(activity.key_down);
        assert_eq!(activity.last_key_ms, Some(10));

        activity.observe(&KeyboardReport::with_keys(&[0x04, 0x05]), 20);
        assert_eq!(activity.last_key_ms, Some(20));
    }

    #[test]
    fn observe_release_keeps_stale_timestamp() {
        let mut activity = ActivityState::new();
        activity.observe(&KeyboardReport::with_keys(&[0x3A]), 10);
        activity.observe(&KeyboardReport::empty(), 40);
        assert!(!activity.key_down);
        assert_eq!(activity.last_key_ms, Some(10));
    }

    #[test]
    fn observe_counts_unmapped_keys_as_activity() {
        let mut activity = ActivityState::new();
        // Digit 1 does not map to a button but is still a held key.
        activity.observe(&KeyboardReport::with_keys(&[0x1E]), 5);
        assert!(activity.key_down);
    }

    #[test]
    fn release_clears_key_down_only() {
        let mut activity = ActivityState::new();
        activity.observe(&KeyboardReport::with_keys(&[0x04]), 7);
        activity.release();
        assert!(!activity.key_down);
        assert_eq!(activity.last_key_ms, Some(7));
    }
}
