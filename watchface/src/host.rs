//! The boundary to the device running the watchface

use chrono::NaiveDateTime;

use crate::resources::Resources;

/// Battery state reported by the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryChargeState {
    /// Charge level, 0 to 100
    pub charge_percent: u8,
    pub is_charging: bool,
    pub is_plugged: bool,
}

/// Events delivered to the watchface, one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The wall clock minute changed
    Tick(NaiveDateTime),
    Battery(BatteryChargeState),
    /// Phone connection changed
    Connection(bool),
}

/// Services the device provides to the watchface
pub trait Host: Resources {
    /// Current local time.
    fn local_time(&self) -> NaiveDateTime;

    /// User preference for 24 hour clocks.
    fn clock_is_24h_style(&self) -> bool;

    /// Current battery state, without waiting for a change.
    fn battery_state(&self) -> BatteryChargeState;

    /// Current phone connection, without waiting for a change.
    fn is_connected(&self) -> bool;

    /// Two short vibration pulses.
    fn vibes_double_pulse(&mut self);
}
