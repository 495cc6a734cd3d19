//! Watchface configuration

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Override for the host's 12/24-hour setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockStyle {
    /// Follow `Host::clock_is_24h_style`
    Host,
    H12,
    H24,
}

impl ClockStyle {
    /// Resolve against the host setting.
    pub fn is_24h(self, host_24h: bool) -> bool {
        match self {
            Self::Host => host_24h,
            Self::H12 => false,
            Self::H24 => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub clock_style: ClockStyle,
    /// Window background
    pub background: Rgb565,
    /// Time and date text
    pub text_color: Rgb565,
    /// Empty part of the battery gauge
    pub battery_background: Rgb565,
    /// Filled part of the battery gauge
    pub battery_fill: Rgb565,
    /// Pixels set in the Bluetooth glyph
    pub icon_color: Rgb565,
    /// Double pulse when the phone connection drops
    pub vibrate_on_disconnect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clock_style: ClockStyle::Host,
            background: Rgb565::BLACK,
            text_color: Rgb565::WHITE,
            battery_background: Rgb565::BLACK,
            battery_fill: Rgb565::WHITE,
            icon_color: Rgb565::WHITE,
            vibrate_on_disconnect: true,
        }
    }
}
