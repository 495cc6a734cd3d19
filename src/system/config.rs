//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::Priority,
};
use watchface::config::ClockStyle;

/// Offset of local time from UTC in seconds
pub const UTC_OFFSET: i32 = 1 * 3_600;

/// Backlight level on boot, 0 (off) to 7
pub const BACKLIGHT_LEVEL: u8 = 2;

/// Show the time as 24 hour clock
pub const CLOCK_24H: bool = true;

pub struct SystemConfig {}

impl SystemConfig {
    /// Create new system configuration
    pub fn new() -> Config {
        // Generate default config, required because Config is set as
        // `non_exhaustive`
        let mut config = Config::default();

        // Set high-frequency and low-frequency clock sources to external
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Configure interrupt priorities to exclude 0 (default), 1, and 4,
        // which are reserved for the nrf SoftDevice
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }

    /// Watchface settings for the PineTime panel
    pub fn watchface() -> watchface::Config {
        watchface::Config {
            clock_style: ClockStyle::Host,
            ..Default::default()
        }
    }
}
