#![no_std]
#![no_main]

mod host;
mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pin, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_time::Timer;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use host::{PineTimeHost, BATTERY, EVENTS, TIME, TIME_SET, VIBRATE};
use peripherals::{backlight::Backlight, battery::Battery, display::Display, vibrator::Vibrator};
use system::{
    bluetooth::{self, Server},
    config::{SystemConfig, BACKLIGHT_LEVEL, UTC_OFFSET},
    time::TimeReference,
};

// Others
use watchface::{DisplayProfile, WatchEvent, Watchface};

// Include UTC time at build time as initial clock reference
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

static SERVER: StaticCell<Server> = StaticCell::new();

/// Send a tick whenever the wall clock minute changes.
#[embassy_executor::task(pool_size = 1)]
async fn minute_ticker() {
    loop {
        let wait = TIME.lock(|time| time.borrow().until_next_minute());

        // A new clock reference invalidates the wait
        if let Either::Second(()) = select(Timer::after(wait), TIME_SET.wait()).await {
            continue;
        }

        let now = TIME.lock(|time| time.borrow().get_time());
        EVENTS.send(WatchEvent::Tick(now)).await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery, server: &'static Server) {
    loop {
        let state = battery.state().await;
        let changed = BATTERY.lock(|last| last.replace(state) != state);

        if changed {
            defmt::info!("Battery status updated: {}", state);
            if let Err(e) = server.bas.battery_level_set(&state.charge_percent) {
                defmt::warn!("Battery level not published: {}", e);
            }
            EVENTS.send(WatchEvent::Battery(state)).await;
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after_secs(1).await;
    }
}

/// Vibrate whenever the watchface asks for it
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut vibrator: Vibrator) {
    loop {
        VIBRATE.wait().await;
        vibrator.double_pulse().await;
    }
}

/// Own the watchface and the display, and feed events to the watchface one
/// at a time.
#[embassy_executor::task(pool_size = 1)]
async fn update_lcd(mut display: Display<SPI2>, backlight: Backlight) {
    let mut host = PineTimeHost::new();
    let mut face = Watchface::new(SystemConfig::watchface(), DisplayProfile::PINETIME);

    if let Err(e) = face.init(&mut host) {
        defmt::error!("Watchface init failed: {}", e);
    }
    defmt::info!("Watchface running, backlight at {}", backlight.brightness());

    loop {
        if let Err(e) = face.render(&mut display) {
            defmt::warn!("Display error: {}", defmt::Debug2Format(&e));
        }

        let event = EVENTS.receive().await;
        if let Err(e) = face.dispatch(&mut host, event) {
            defmt::warn!("Event not handled: {}", e);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Keep peripheral interrupts off the priorities reserved for the SoftDevice
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Start the clock at build time until a phone sets it
    match TimeReference::from_timestamp(UTC_TIME, UTC_OFFSET) {
        Some(reference) => TIME.lock(|time| time.borrow_mut().set_time(reference)),
        None => defmt::warn!("Invalid build time {}", UTC_TIME),
    }

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Backlight
    let backlight = Backlight::init(
        Output::new(p.P0_14.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_22.degrade(), Level::High, OutputDrive::Standard),
        Output::new(p.P0_23.degrade(), Level::High, OutputDrive::Standard),
        BACKLIGHT_LEVEL,
    );

    // Initialize Battery
    let mut battery = Battery::init(
        saadc,
        Input::new(p.P0_12, Pull::None),
        Input::new(p.P0_19, Pull::None),
    );
    let battery_state = battery.state().await;
    BATTERY.lock(|last| last.set(battery_state));

    // Initialize vibration motor, off while high
    let vibrator = Vibrator::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = SERVER.init(unwrap!(Server::new(sd)));
    unwrap!(server.bas.battery_level_set(&battery_state.charge_percent));

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth::softdevice_task(sd)));
    unwrap!(spawner.spawn(bluetooth::connection_task(sd, server)));
    unwrap!(spawner.spawn(update_battery_status(battery, server)));
    unwrap!(spawner.spawn(notify(vibrator)));
    unwrap!(spawner.spawn(minute_ticker()));
    unwrap!(spawner.spawn(update_lcd(display, backlight)));
}
