//! Device services for the watchface
//!
//! Tasks publish what they observe here: events go through [`EVENTS`] to the
//! app task, and the latest battery, connection and clock readings are kept
//! for the watchface to peek at during `init` and `load`.

use core::{
    cell::{Cell, RefCell},
    sync::atomic::{AtomicBool, Ordering},
};

use chrono::NaiveDateTime;
use embassy_sync::{
    blocking_mutex::{raw::ThreadModeRawMutex, Mutex},
    channel::Channel,
    signal::Signal,
};
use watchface::{
    resources::{Bitmap, Font},
    BatteryChargeState, BuiltinResources, Error, Host, ResourceId, Resources, WatchEvent,
};

use crate::system::{config::CLOCK_24H, time::TimeManager};

/// Events waiting for the app task
pub const EVENT_QUEUE_LEN: usize = 8;

pub static EVENTS: Channel<ThreadModeRawMutex, WatchEvent, EVENT_QUEUE_LEN> = Channel::new();

/// Wall clock
pub static TIME: Mutex<ThreadModeRawMutex, RefCell<TimeManager>> =
    Mutex::new(RefCell::new(TimeManager::new()));

/// Last sampled battery state
pub static BATTERY: Mutex<ThreadModeRawMutex, Cell<BatteryChargeState>> =
    Mutex::new(Cell::new(BatteryChargeState {
        charge_percent: 0,
        is_charging: false,
        is_plugged: false,
    }));

/// Whether a phone is connected
pub static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Raised when the wall clock is set, so the minute ticker re-aligns
pub static TIME_SET: Signal<ThreadModeRawMutex, ()> = Signal::new();

/// Requests for the vibration motor
pub static VIBRATE: Signal<ThreadModeRawMutex, ()> = Signal::new();

/// The PineTime as seen from the watchface
pub struct PineTimeHost {
    resources: BuiltinResources,
}

impl PineTimeHost {
    pub fn new() -> Self {
        Self {
            resources: BuiltinResources::new(),
        }
    }
}

impl Resources for PineTimeHost {
    fn load_bitmap(&mut self, id: ResourceId) -> Result<Bitmap, Error> {
        self.resources.load_bitmap(id)
    }

    fn load_font(&mut self, id: ResourceId) -> Result<Font, Error> {
        self.resources.load_font(id)
    }

    fn destroy_bitmap(&mut self, bitmap: Bitmap) {
        self.resources.destroy_bitmap(bitmap)
    }

    fn unload_font(&mut self, font: Font) {
        self.resources.unload_font(font)
    }
}

impl Host for PineTimeHost {
    fn local_time(&self) -> NaiveDateTime {
        TIME.lock(|time| time.borrow().get_time())
    }

    fn clock_is_24h_style(&self) -> bool {
        CLOCK_24H
    }

    fn battery_state(&self) -> BatteryChargeState {
        BATTERY.lock(|battery| battery.get())
    }

    fn is_connected(&self) -> bool {
        CONNECTED.load(Ordering::Relaxed)
    }

    fn vibes_double_pulse(&mut self) {
        VIBRATE.signal(());
    }
}
