//! Battery gauge
//!
//! A bar whose filled width scales linearly with the charge percentage.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    Drawable,
};

use crate::layer::Layer;

/// Width of the filled part of a bar that is `total` pixels wide when full.
///
/// Percentages above 100 count as 100.
pub fn bar_width(percent: u8, total: u32) -> u32 {
    u32::from(percent.min(100)) * total / 100
}

/// Last reported charge level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryGauge {
    percent: u8,
}

impl BatteryGauge {
    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Store a new level, clamped to `0..=100`. Returns `true` if the stored
    /// level changed.
    pub fn set_percent(&mut self, percent: u8) -> bool {
        let percent = percent.min(100);
        let changed = percent != self.percent;
        self.percent = percent;
        changed
    }
}

/// Custom layer drawing the gauge
pub struct BatteryLayer {
    layer: Layer,
    bar_width: u32,
    background: Rgb565,
    fill: Rgb565,
}

impl BatteryLayer {
    pub fn new(frame: Rectangle, bar_width: u32, background: Rgb565, fill: Rgb565) -> Self {
        Self {
            layer: Layer::new(frame),
            bar_width,
            background,
            fill,
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Update procedure: clear the bounds, then fill the charged part from
    /// the left edge.
    pub fn draw<D>(&self, gauge: &BatteryGauge, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let width = bar_width(gauge.percent(), self.bar_width);

        self.layer.draw_with(target, |canvas, bounds| {
            bounds
                .into_styled(PrimitiveStyle::with_fill(self.background))
                .draw(canvas)?;

            Rectangle::new(Point::zero(), Size::new(width, bounds.size.height))
                .into_styled(PrimitiveStyle::with_fill(self.fill))
                .draw(canvas)
        })
    }
}
