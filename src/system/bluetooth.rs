//! Bluetooth module
//!
//! The watch advertises as a connectable peripheral offering the Battery
//! Service and a writable Current Time Service, so a phone can read the
//! charge level and set the clock.

// Core
use core::{mem, sync::atomic::Ordering};

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    raw, Config, Softdevice,
};

use embassy_time::Timer;
use watchface::WatchEvent;

use crate::{
    host::{CONNECTED, EVENTS, TIME, TIME_SET},
    system::time::TimeReference,
};

/// Size of the Current Time characteristic
pub const CTS_LEN: usize = 10;

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(
        ServiceList::Complete,
        &[ServiceUuid16::BATTERY, ServiceUuid16::CURRENT_TIME],
    )
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(
        ServiceList::Complete,
        &[ServiceUuid16::BATTERY, ServiceUuid16::CURRENT_TIME],
    )
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub cts: CurrentTimeService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; CTS_LEN],
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: b"PineTime" as *const u8 as _,
            current_len: 8,
            max_len: 8,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Run the SoftDevice event loop
#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise, serve one phone at a time and report connection changes
#[embassy_executor::task]
pub async fn connection_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    let config = peripheral::Config::default();

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {}", e);
                // Let the other tasks run before trying again
                Timer::after_secs(1).await;
                continue;
            }
        };

        defmt::info!("Phone connected");
        CONNECTED.store(true, Ordering::Relaxed);
        EVENTS.send(WatchEvent::Connection(true)).await;

        let reason = gatt_server::run(&conn, server, |e| on_server_event(&conn, server, e)).await;
        defmt::info!("Phone disconnected: {:?}", reason);

        CONNECTED.store(false, Ordering::Relaxed);
        EVENTS.send(WatchEvent::Connection(false)).await;
    }
}

fn on_server_event(conn: &Connection, server: &Server, event: ServerEvent) {
    match event {
        ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
            defmt::info!("Battery notifications: {}", notifications);
            if notifications {
                if let Ok(level) = server.bas.battery_level_get() {
                    if let Err(e) = server.bas.battery_level_notify(conn, &level) {
                        defmt::warn!("Battery level not notified: {}", e);
                    }
                }
            }
        }
        ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
            let Some(reference) = TimeReference::from_cts_bytes(&bytes) else {
                defmt::warn!("Ignoring invalid current time {:?}", bytes);
                return;
            };

            let now = TIME.lock(|time| {
                let mut time = time.borrow_mut();
                time.set_time(reference);
                time.get_time()
            });
            defmt::info!("Time set from phone");
            TIME_SET.signal(());

            // Show the new time right away
            if EVENTS.try_send(WatchEvent::Tick(now)).is_err() {
                defmt::warn!("Event queue full, time shown on next tick");
            }
        }
    }
}
