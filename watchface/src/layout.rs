//! Layer geometry for the supported displays
//!
//! The 144x168, 180x180 and 200x228 profiles keep the proportions the
//! watchface was originally drawn for; PineTime gets its own arrangement on
//! the 240x240 panel.

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::{Rgb565, RgbColor},
    primitives::Rectangle,
};

use crate::layer::Compositing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    Rect,
    Round,
}

/// Physical properties of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayProfile {
    pub size: Size,
    pub shape: Shape,
    /// `false` for black & white panels
    pub color: bool,
    /// Tall panel with its own fixed offsets
    pub large: bool,
}

impl DisplayProfile {
    pub const RECT_BW: Self = Self::new(144, 168, Shape::Rect, false, false);
    pub const RECT_COLOR: Self = Self::new(144, 168, Shape::Rect, true, false);
    pub const ROUND_COLOR: Self = Self::new(180, 180, Shape::Round, true, false);
    pub const LARGE_COLOR: Self = Self::new(200, 228, Shape::Rect, true, true);
    pub const PINETIME: Self = Self::new(240, 240, Shape::Rect, true, true);

    const fn new(width: u32, height: u32, shape: Shape, color: bool, large: bool) -> Self {
        Self {
            size: Size::new(width, height),
            shape,
            color,
            large,
        }
    }

    pub fn is_round(&self) -> bool {
        self.shape == Shape::Round
    }

    /// Bounds of the whole window.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.size)
    }
}

/// Frames of every layer on the main window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub bounds: Rectangle,
    pub time: Rectangle,
    pub date: Rectangle,
    pub bluetooth_icon: Rectangle,
    pub battery: Rectangle,
    /// Width of a completely filled battery bar
    pub battery_bar_width: u32,
    /// Fill behind the text layers, `None` is transparent
    pub text_background: Option<Rgb565>,
    pub icon_compositing: Compositing,
}

/// Bar width used on the 144 pixel wide profiles and the large profile.
const BAR_WIDTH: u32 = 114;

impl Layout {
    pub fn for_profile(profile: &DisplayProfile) -> Self {
        let w = profile.size.width as i32;
        let round = profile.is_round();

        let (text_background, icon_compositing) = if profile.color {
            (None, Compositing::Set)
        } else {
            (Some(Rgb565::BLACK), Compositing::Assign)
        };

        if profile == &DisplayProfile::PINETIME {
            return Self {
                bounds: profile.bounds(),
                time: rect(w / 2 - 80, 72, 160, 35),
                date: rect(0, 118, profile.size.width, 20),
                bluetooth_icon: rect(w / 2 - 8, 150, 15, 30),
                battery: rect(w / 2 - 60, 196, 120, 4),
                battery_bar_width: 120,
                text_background,
                icon_compositing,
            };
        }

        let time = rect(w / 2 - 50, if round { 15 } else { 0 }, 100, 35);

        if profile.large {
            return Self {
                bounds: profile.bounds(),
                time,
                date: rect(0, 200, profile.size.width, 50),
                bluetooth_icon: rect(w / 2 - 10, 175, 15, 30),
                battery: rect(w / 2 - 60, 215, 120, 2),
                battery_bar_width: BAR_WIDTH,
                text_background,
                icon_compositing,
            };
        }

        let battery = if profile.color {
            rect(w / 2 - 60, if round { 145 } else { 160 }, 120, 2)
        } else {
            rect(0, if round { 145 } else { 160 }, profile.size.width, 10)
        };

        Self {
            bounds: profile.bounds(),
            time,
            date: rect(0, if round { 130 } else { 145 }, profile.size.width, 15),
            bluetooth_icon: rect(w / 2 - 10, if round { 150 } else { 120 }, 15, 30),
            battery,
            battery_bar_width: BAR_WIDTH,
            text_background,
            icon_compositing,
        }
    }
}

fn rect(x: i32, y: i32, width: u32, height: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width, height))
}
