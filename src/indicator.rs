//! Tri-color status LED.
//!
//! Each channel is a plain GPIO, so a color is shown by switching every
//! channel at or above `INDICATOR_ON_LEVEL` on (orange shows as red+green).

use embassy_rp::gpio::Output;
use embedded_hal::digital::{OutputPin, PinState};
use kbd2pad::config::INDICATOR_ON_LEVEL;
use kbd2pad::{Indicator, Rgb};

/// RGB LED on three push-pull pins, active high.
pub struct RgbIndicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbIndicator<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self { red, green, blue }
    }
}

fn level(value: u8) -> PinState {
    PinState::from(value >= INDICATOR_ON_LEVEL)
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Indicator for RgbIndicator<R, G, B> {
    fn render(&mut self, color: Rgb) {
        // GPIO writes on the RP2040 are infallible.
        let _ = self.red.set_state(level(color.r));
        let _ = self.green.set_state(level(color.g));
        let _ = self.blue.set_state(level(color.b));
    }
}

/// The indicator wired on the board (see `config` for pins).
pub type BoardIndicator = RgbIndicator<Output<'static>, Output<'static>, Output<'static>>;
