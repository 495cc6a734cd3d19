//! Watchface context, lifecycle and event handlers

use chrono::NaiveDateTime;
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565, text::Alignment};

use crate::{
    battery::{BatteryGauge, BatteryLayer},
    config::Config,
    connection::ConnectionIndicator,
    error::Error,
    format::{
        format_clock, format_date, CLOCK_BUF_LEN, CLOCK_PLACEHOLDER, DATE_BUF_LEN,
        DATE_PLACEHOLDER,
    },
    host::{BatteryChargeState, Host, WatchEvent},
    layer::{BitmapLayer, TextLayer},
    layout::{DisplayProfile, Layout},
    resources::{Bitmap, Font, ResourceId, Resources},
    window::{LayerId, Window},
};

/// Fonts and bitmaps owned by the loaded window
struct Assets {
    background: Bitmap,
    bluetooth_icon: Bitmap,
    small_font: Font,
    large_font: Font,
}

impl Assets {
    /// Load everything or nothing.
    fn load<R: Resources>(resources: &mut R) -> Result<Self, Error> {
        let background = resources.load_bitmap(ResourceId::Background)?;

        let bluetooth_icon = match resources.load_bitmap(ResourceId::BluetoothIcon) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                resources.destroy_bitmap(background);
                return Err(e);
            }
        };

        let small_font = match resources.load_font(ResourceId::SmallFont) {
            Ok(font) => font,
            Err(e) => {
                resources.destroy_bitmap(background);
                resources.destroy_bitmap(bluetooth_icon);
                return Err(e);
            }
        };

        let large_font = match resources.load_font(ResourceId::LargeFont) {
            Ok(font) => font,
            Err(e) => {
                resources.unload_font(small_font);
                resources.destroy_bitmap(background);
                resources.destroy_bitmap(bluetooth_icon);
                return Err(e);
            }
        };

        Ok(Self {
            background,
            bluetooth_icon,
            small_font,
            large_font,
        })
    }

    fn release<R: Resources>(self, resources: &mut R) {
        let Self {
            background,
            bluetooth_icon,
            small_font,
            large_font,
        } = self;

        resources.unload_font(small_font);
        resources.unload_font(large_font);
        resources.destroy_bitmap(background);
        resources.destroy_bitmap(bluetooth_icon);
    }
}

/// Layers of the main window, alive between load and unload
struct MainLayers {
    background: BitmapLayer,
    bluetooth_icon: BitmapLayer,
    battery: BatteryLayer,
    time: TextLayer,
    date: TextLayer,
    assets: Assets,
}

/// The watchface and everything it owns
pub struct Watchface {
    config: Config,
    layout: Layout,
    window: Window,
    layers: Option<MainLayers>,
    battery: BatteryGauge,
    connection: ConnectionIndicator,
    dirty: bool,
}

impl Watchface {
    pub fn new(config: Config, profile: DisplayProfile) -> Self {
        let layout = Layout::for_profile(&profile);
        let mut window = Window::new(layout.bounds);
        window.set_background_color(config.background);

        Self {
            config,
            layout,
            window,
            layers: None,
            battery: BatteryGauge::default(),
            connection: ConnectionIndicator::default(),
            dirty: false,
        }
    }

    /// Load the main window and show the current time and battery level.
    pub fn init<H: Host>(&mut self, host: &mut H) -> Result<(), Error> {
        self.load(host)?;

        let is_24h = self.config.clock_style.is_24h(host.clock_is_24h_style());
        self.update_time(&host.local_time(), is_24h)?;

        self.battery_callback(host.battery_state());
        Ok(())
    }

    /// Tear down the main window if it is still loaded.
    pub fn deinit<H: Host>(&mut self, host: &mut H) {
        if self.is_loaded() {
            let _ = self.unload(host);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.layers.is_some()
    }

    /// Create every layer, load fonts and bitmaps and show the current
    /// connection state.
    pub fn load<H: Host>(&mut self, host: &mut H) -> Result<(), Error> {
        if self.is_loaded() {
            return Err(Error::AlreadyLoaded);
        }

        let config = &self.config;
        let layout = &self.layout;

        // Text layers first, nothing is held yet if they fail
        let mut time = TextLayer::new(layout.time);
        time.set_background_color(layout.text_background);
        time.set_text_color(config.text_color);
        time.set_text(CLOCK_PLACEHOLDER)?;
        time.set_alignment(Alignment::Center);

        let mut date = TextLayer::new(layout.date);
        date.set_background_color(layout.text_background);
        date.set_text_color(config.text_color);
        date.set_text(DATE_PLACEHOLDER)?;
        date.set_alignment(Alignment::Center);

        let assets = Assets::load(host)?;
        time.set_font(&assets.large_font);
        date.set_font(&assets.small_font);

        let mut background = BitmapLayer::new(layout.bounds);
        background.set_bitmap(&assets.background);
        background.set_colors(config.text_color, config.background);

        let mut bluetooth_icon = BitmapLayer::new(layout.bluetooth_icon);
        bluetooth_icon.set_bitmap(&assets.bluetooth_icon);
        bluetooth_icon.set_compositing(layout.icon_compositing);
        bluetooth_icon.set_colors(config.icon_color, config.background);

        let battery = BatteryLayer::new(
            layout.battery,
            layout.battery_bar_width,
            config.battery_background,
            config.battery_fill,
        );

        for id in [
            LayerId::Background,
            LayerId::BluetoothIcon,
            LayerId::Battery,
            LayerId::Time,
            LayerId::Date,
        ] {
            self.window.add_child(id);
        }

        self.layers = Some(MainLayers {
            background,
            bluetooth_icon,
            battery,
            time,
            date,
            assets,
        });

        #[cfg(feature = "defmt")]
        defmt::info!("Main window loaded");

        // Show the connection state from the start
        let connected = host.is_connected();
        self.connection.reconcile(connected);
        self.set_icon_hidden(connected)?;

        self.dirty = true;
        Ok(())
    }

    /// Drop every layer and release every font and bitmap.
    pub fn unload<H: Host>(&mut self, host: &mut H) -> Result<(), Error> {
        let layers = self.layers.take().ok_or(Error::NotLoaded)?;
        self.window.remove_all_children();

        let MainLayers { assets, .. } = layers;
        assets.release(host);

        #[cfg(feature = "defmt")]
        defmt::info!("Main window unloaded");

        Ok(())
    }

    /// Handle one event from the device.
    pub fn dispatch<H: Host>(&mut self, host: &mut H, event: WatchEvent) -> Result<(), Error> {
        match event {
            WatchEvent::Tick(time) => self.tick_handler(host, &time),
            WatchEvent::Battery(state) => {
                self.battery_callback(state);
                Ok(())
            }
            WatchEvent::Connection(connected) => self.bluetooth_callback(host, connected),
        }
    }

    pub fn tick_handler<H: Host>(&mut self, host: &mut H, time: &NaiveDateTime) -> Result<(), Error> {
        let is_24h = self.config.clock_style.is_24h(host.clock_is_24h_style());
        self.update_time(time, is_24h)
    }

    /// Show `time` in the time and date layers.
    pub fn update_time(&mut self, time: &NaiveDateTime, is_24h: bool) -> Result<(), Error> {
        let layers = self.layers.as_mut().ok_or(Error::NotLoaded)?;

        let mut clock_buf = [0; CLOCK_BUF_LEN];
        layers.time.set_text(format_clock(&mut clock_buf, time, is_24h)?)?;

        let mut date_buf = [0; DATE_BUF_LEN];
        layers.date.set_text(format_date(&mut date_buf, time)?)?;

        self.dirty = true;
        Ok(())
    }

    /// Record a new battery level. The gauge is redrawn only if the level
    /// changed.
    pub fn battery_callback(&mut self, state: BatteryChargeState) {
        if self.battery.set_percent(state.charge_percent) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Battery level {}%", self.battery.percent());

            if self.is_loaded() {
                self.dirty = true;
            }
        }
    }

    /// Show the icon while disconnected and vibrate when the connection is
    /// lost.
    pub fn bluetooth_callback<H: Host>(&mut self, host: &mut H, connected: bool) -> Result<(), Error> {
        self.set_icon_hidden(connected)?;
        let lost = self.connection.update(connected);

        #[cfg(feature = "defmt")]
        defmt::info!("Phone {}", if connected { "connected" } else { "disconnected" });

        if lost && self.config.vibrate_on_disconnect {
            host.vibes_double_pulse();
        }
        Ok(())
    }

    fn set_icon_hidden(&mut self, hidden: bool) -> Result<(), Error> {
        let layers = self.layers.as_mut().ok_or(Error::NotLoaded)?;
        if layers.bluetooth_icon.layer().is_hidden() != hidden {
            layers.bluetooth_icon.layer_mut().set_hidden(hidden);
            self.dirty = true;
        }
        Ok(())
    }

    /// Redraw the window if anything changed since the last render. Returns
    /// whether anything was drawn.
    pub fn render<D>(&mut self, target: &mut D) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Self {
            window,
            layers,
            battery,
            dirty,
            ..
        } = self;

        let Some(layers) = layers else {
            return Ok(false);
        };
        if !*dirty {
            return Ok(false);
        }

        window.render(target, |id, target| match id {
            LayerId::Background => layers.background.draw(target),
            LayerId::BluetoothIcon => layers.bluetooth_icon.draw(target),
            LayerId::Battery => layers.battery.draw(battery, target),
            LayerId::Time => layers.time.draw(target),
            LayerId::Date => layers.date.draw(target),
        })?;

        *dirty = false;
        Ok(true)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn battery_percent(&self) -> u8 {
        self.battery.percent()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Text of the time layer, `None` while unloaded.
    pub fn time_text(&self) -> Option<&str> {
        self.layers.as_ref().map(|layers| layers.time.text())
    }

    /// Text of the date layer, `None` while unloaded.
    pub fn date_text(&self) -> Option<&str> {
        self.layers.as_ref().map(|layers| layers.date.text())
    }

    /// Visibility of the Bluetooth icon, `None` while unloaded.
    pub fn bluetooth_icon_hidden(&self) -> Option<bool> {
        self.layers
            .as_ref()
            .map(|layers| layers.bluetooth_icon.layer().is_hidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::BuiltinResources;
    use chrono::NaiveDate;

    struct TestHost {
        resources: BuiltinResources,
        now: NaiveDateTime,
        is_24h: bool,
        battery: BatteryChargeState,
        connected: bool,
        pulses: usize,
    }

    impl TestHost {
        fn new() -> Self {
            Self {
                resources: BuiltinResources::new(),
                now: NaiveDate::from_ymd_opt(2026, 10, 19)
                    .unwrap()
                    .and_hms_opt(14, 7, 0)
                    .unwrap(),
                is_24h: true,
                battery: BatteryChargeState {
                    charge_percent: 70,
                    ..Default::default()
                },
                connected: true,
                pulses: 0,
            }
        }
    }

    impl Resources for TestHost {
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

    impl Host for TestHost {
        fn local_time(&self) -> NaiveDateTime {
            self.now
        }
        fn clock_is_24h_style(&self) -> bool {
            self.is_24h
        }
        fn battery_state(&self) -> BatteryChargeState {
            self.battery
        }
        fn is_connected(&self) -> bool {
            self.connected
        }
        fn vibes_double_pulse(&mut self) {
            self.pulses += 1;
        }
    }

    fn face() -> Watchface {
        Watchface::new(Config::default(), DisplayProfile::PINETIME)
    }

    #[test]
    fn placeholders_before_first_update() {
        let mut host = TestHost::new();
        let mut face = face();
        face.load(&mut host).unwrap();
        assert_eq!(face.time_text(), Some(CLOCK_PLACEHOLDER));
        assert_eq!(face.date_text(), Some(DATE_PLACEHOLDER));
    }

    #[test]
    fn init_shows_time_battery_and_connection() {
        let mut host = TestHost::new();
        let mut face = face();
        face.init(&mut host).unwrap();
        assert_eq!(face.time_text(), Some("14:07"));
        assert_eq!(face.date_text(), Some("Mon, Oct 19, 2026"));
        assert_eq!(face.battery_percent(), 70);
        assert_eq!(face.bluetooth_icon_hidden(), Some(true));
        assert!(face.is_dirty());
    }

    #[test]
    fn clock_style_override_beats_host() {
        let mut host = TestHost::new();
        let config = Config {
            clock_style: crate::config::ClockStyle::H12,
            ..Config::default()
        };
        let mut face = Watchface::new(config, DisplayProfile::PINETIME);
        face.init(&mut host).unwrap();
        assert_eq!(face.time_text(), Some("02:07"));
    }

    #[test]
    fn handlers_need_a_loaded_window() {
        let mut host = TestHost::new();
        let mut face = face();
        let now = host.now;
        assert_eq!(face.tick_handler(&mut host, &now), Err(Error::NotLoaded));
        assert_eq!(face.bluetooth_callback(&mut host, false), Err(Error::NotLoaded));
        assert_eq!(face.unload(&mut host), Err(Error::NotLoaded));
        assert_eq!(host.pulses, 0);
    }

    #[test]
    fn double_load_is_rejected() {
        let mut host = TestHost::new();
        let mut face = face();
        face.load(&mut host).unwrap();
        assert_eq!(face.load(&mut host), Err(Error::AlreadyLoaded));
        assert_eq!(host.resources.live(), 4);
    }

    #[test]
    fn battery_level_is_cached_while_unloaded() {
        let mut face = face();
        face.battery_callback(BatteryChargeState {
            charge_percent: 120,
            ..Default::default()
        });
        assert_eq!(face.battery_percent(), 100);
        assert!(!face.is_dirty());
    }

    #[test]
    fn disconnect_vibrates_once() {
        let mut host = TestHost::new();
        let mut face = face();
        face.init(&mut host).unwrap();

        face.dispatch(&mut host, WatchEvent::Connection(false)).unwrap();
        face.dispatch(&mut host, WatchEvent::Connection(false)).unwrap();
        assert_eq!(host.pulses, 1);
        assert_eq!(face.bluetooth_icon_hidden(), Some(false));
    }

    #[test]
    fn disconnect_vibration_can_be_disabled() {
        let mut host = TestHost::new();
        let config = Config {
            vibrate_on_disconnect: false,
            ..Config::default()
        };
        let mut face = Watchface::new(config, DisplayProfile::PINETIME);
        face.init(&mut host).unwrap();
        face.dispatch(&mut host, WatchEvent::Connection(false)).unwrap();
        assert_eq!(host.pulses, 0);
        assert_eq!(face.bluetooth_icon_hidden(), Some(false));
    }

    #[test]
    fn deinit_releases_everything() {
        let mut host = TestHost::new();
        let mut face = face();
        face.init(&mut host).unwrap();
        assert_eq!(host.resources.live(), 4);
        face.deinit(&mut host);
        assert_eq!(host.resources.live(), 0);
        assert!(!face.is_loaded());
        face.deinit(&mut host);
        assert_eq!(host.resources.live(), 0);
    }
}
