//! Clock, date, battery and Bluetooth watchface
//!
//! Everything here is hardware independent: the watchface draws onto any
//! [`embedded_graphics`] target with [`Rgb565`](embedded_graphics::pixelcolor::Rgb565)
//! pixels and talks to the device through the [`Host`] trait. The firmware
//! feeds it [`WatchEvent`]s one at a time:
//!
//! ```ignore
//! let mut face = Watchface::new(Config::default(), DisplayProfile::PINETIME);
//! face.init(&mut host)?;
//! loop {
//!     let event = events.receive().await;
//!     face.dispatch(&mut host, event)?;
//!     face.render(&mut display)?;
//! }
//! ```
#![cfg_attr(not(test), no_std)]

pub mod battery;
pub mod clock;
pub mod config;
pub mod connection;
pub mod error;
pub mod format;
pub mod host;
pub mod layer;
pub mod layout;
pub mod resources;
pub mod watchface;
pub mod window;

pub use config::Config;
pub use error::Error;
pub use host::{BatteryChargeState, Host, WatchEvent};
pub use layout::{DisplayProfile, Layout};
pub use resources::{BuiltinResources, ResourceId, Resources};
pub use watchface::Watchface;
