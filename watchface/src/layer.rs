//! Drawable layers
//!
//! Every layer draws in its own coordinate system: `(0, 0)` is the top left
//! corner of its frame and nothing is drawn outside the frame.

use embedded_graphics::{
    draw_target::{Clipped, DrawTarget, DrawTargetExt, Translated},
    geometry::{Dimensions, Point, Size},
    image::{Image, ImageRaw},
    mono_font::{ascii::FONT_6X10, MonoFont, MonoTextStyle},
    pixelcolor::{BinaryColor, Rgb565, RgbColor},
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable, Pixel,
};

use crate::{
    error::Error,
    resources::{Bitmap, Font},
};

/// Longest text a text layer holds
pub const TEXT_CAPACITY: usize = 32;

/// How a 1 bit bitmap is put onto the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Compositing {
    /// Set and unset pixels are both painted
    Assign,
    /// Only set pixels are painted
    Set,
}

/// Canvas handed to layer draw procedures
pub type LayerCanvas<'a, 'b, D> = Clipped<'a, Translated<'b, D>>;

/// A rectangular region of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layer {
    frame: Rectangle,
    hidden: bool,
}

impl Layer {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            frame,
            hidden: false,
        }
    }

    /// Position and size in window coordinates.
    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    /// Size in layer coordinates.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.frame.size)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Run `draw` on a canvas translated to the frame origin and clipped to
    /// the frame. Hidden layers are skipped.
    pub fn draw_with<D, F>(&self, target: &mut D, draw: F) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        F: FnOnce(&mut LayerCanvas<'_, '_, D>, Rectangle) -> Result<(), D::Error>,
    {
        if self.hidden {
            return Ok(());
        }
        let bounds = self.bounds();
        let mut translated = target.translated(self.frame.top_left);
        let mut canvas = translated.clipped(&bounds);
        draw(&mut canvas, bounds)
    }
}

/// A single line of text
pub struct TextLayer {
    layer: Layer,
    text: heapless::String<TEXT_CAPACITY>,
    font: Option<&'static MonoFont<'static>>,
    text_color: Rgb565,
    background: Option<Rgb565>,
    alignment: Alignment,
}

impl TextLayer {
    /// Black text on a white background, left aligned, default font.
    pub fn new(frame: Rectangle) -> Self {
        Self {
            layer: Layer::new(frame),
            text: heapless::String::new(),
            font: None,
            text_color: Rgb565::BLACK,
            background: Some(Rgb565::WHITE),
            alignment: Alignment::Left,
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Text longer than [`TEXT_CAPACITY`] is rejected and
    /// the previous text stays.
    pub fn set_text(&mut self, text: &str) -> Result<(), Error> {
        let mut new = heapless::String::new();
        new.push_str(text).map_err(|_| Error::Format)?;
        self.text = new;
        Ok(())
    }

    pub fn set_font(&mut self, font: &Font) {
        self.font = Some(font.mono());
    }

    pub fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
    }

    /// `None` leaves whatever is below the layer visible.
    pub fn set_background_color(&mut self, color: Option<Rgb565>) {
        self.background = color;
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.layer.draw_with(target, |canvas, bounds| {
            if let Some(background) = self.background {
                bounds
                    .into_styled(PrimitiveStyle::with_fill(background))
                    .draw(canvas)?;
            }

            let character_style =
                MonoTextStyle::new(self.font.unwrap_or(&FONT_6X10), self.text_color);
            let text_style = TextStyleBuilder::new()
                .alignment(self.alignment)
                .baseline(Baseline::Top)
                .build();
            let width = bounds.size.width as i32;
            let x = match self.alignment {
                Alignment::Left => 0,
                Alignment::Center => width / 2,
                Alignment::Right => width - 1,
            };

            Text::with_text_style(&self.text, Point::new(x, 0), character_style, text_style)
                .draw(canvas)?;
            Ok(())
        })
    }
}

/// A static image centered in its frame
pub struct BitmapLayer {
    layer: Layer,
    bitmap: Option<ImageRaw<'static, BinaryColor>>,
    bitmap_size: Size,
    compositing: Compositing,
    foreground: Rgb565,
    background: Rgb565,
}

impl BitmapLayer {
    pub fn new(frame: Rectangle) -> Self {
        Self {
            layer: Layer::new(frame),
            bitmap: None,
            bitmap_size: Size::zero(),
            compositing: Compositing::Assign,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    pub fn set_bitmap(&mut self, bitmap: &Bitmap) {
        self.bitmap = Some(bitmap.raw());
        self.bitmap_size = bitmap.size();
    }

    pub fn set_compositing(&mut self, compositing: Compositing) {
        self.compositing = compositing;
    }

    /// Colors for set and unset bitmap pixels.
    pub fn set_colors(&mut self, foreground: Rgb565, background: Rgb565) {
        self.foreground = foreground;
        self.background = background;
    }

    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(raw) = &self.bitmap else {
            return Ok(());
        };

        self.layer.draw_with(target, |canvas, bounds| {
            let image_bounds = Rectangle::new(Point::zero(), self.bitmap_size);
            let origin = bounds.center() - image_bounds.center();
            let unset = match self.compositing {
                Compositing::Assign => Some(self.background),
                Compositing::Set => None,
            };
            let mut composite = Composite {
                target: canvas,
                set: self.foreground,
                unset,
            };
            Image::new(raw, origin).draw(&mut composite)
        })
    }
}

/// Maps 1 bit pixels to display colors, dropping unset pixels when `unset`
/// is `None`
struct Composite<'a, D> {
    target: &'a mut D,
    set: Rgb565,
    unset: Option<Rgb565>,
}

impl<D> Dimensions for Composite<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D> DrawTarget for Composite<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (set, unset) = (self.set, self.unset);
        self.target
            .draw_iter(pixels.into_iter().filter_map(move |Pixel(point, color)| {
                match color {
                    BinaryColor::On => Some(Pixel(point, set)),
                    BinaryColor::Off => unset.map(|c| Pixel(point, c)),
                }
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{BuiltinResources, ResourceId, Resources};
    use embedded_graphics::geometry::OriginDimensions;
    use std::vec::Vec;

    /// Rgb565 framebuffer recording every pixel write
    struct Frame {
        size: Size,
        pixels: Vec<Rgb565>,
        writes: usize,
    }

    impl Frame {
        fn new(width: u32, height: u32, fill: Rgb565) -> Self {
            Self {
                size: Size::new(width, height),
                pixels: vec![fill; (width * height) as usize],
                writes: 0,
            }
        }

        fn at(&self, x: i32, y: i32) -> Rgb565 {
            self.pixels[(y as u32 * self.size.width + x as u32) as usize]
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            self.size
        }
    }

    impl DrawTarget for Frame {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, c) in pixels {
                assert!(
                    p.x >= 0 && p.y >= 0 && (p.x as u32) < self.size.width && (p.y as u32) < self.size.height,
                    "pixel {:?} outside of the frame",
                    p
                );
                self.pixels[(p.y as u32 * self.size.width + p.x as u32) as usize] = c;
                self.writes += 1;
            }
            Ok(())
        }
    }

    fn frame(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn hidden_layer_draws_nothing() {
        let mut text = TextLayer::new(frame(0, 0, 20, 10));
        text.set_text("12").unwrap();
        text.layer_mut().set_hidden(true);

        let mut display = Frame::new(20, 10, Rgb565::RED);
        text.draw(&mut display).unwrap();
        assert_eq!(display.writes, 0);
    }

    #[test]
    fn text_background_fills_only_the_frame() {
        let mut text = TextLayer::new(frame(5, 5, 10, 4));
        text.set_background_color(Some(Rgb565::BLUE));

        let mut display = Frame::new(20, 20, Rgb565::BLACK);
        text.draw(&mut display).unwrap();
        assert_eq!(display.at(5, 5), Rgb565::BLUE);
        assert_eq!(display.at(14, 8), Rgb565::BLUE);
        assert_eq!(display.at(4, 5), Rgb565::BLACK);
        assert_eq!(display.at(15, 5), Rgb565::BLACK);
        assert_eq!(display.at(5, 9), Rgb565::BLACK);
    }

    #[test]
    fn transparent_text_keeps_what_is_below() {
        let mut text = TextLayer::new(frame(0, 0, 40, 12));
        text.set_background_color(None);
        text.set_text_color(Rgb565::WHITE);
        text.set_alignment(Alignment::Center);
        text.set_text("88").unwrap();

        let mut display = Frame::new(40, 12, Rgb565::GREEN);
        text.draw(&mut display).unwrap();
        let white = display.pixels.iter().filter(|c| **c == Rgb565::WHITE).count();
        let green = display.pixels.iter().filter(|c| **c == Rgb565::GREEN).count();
        assert!(white > 0);
        assert_eq!(white + green, display.pixels.len());
        // Centered: nothing in the outer columns
        for y in 0..12 {
            assert_eq!(display.at(0, y), Rgb565::GREEN);
            assert_eq!(display.at(39, y), Rgb565::GREEN);
        }
    }

    #[test]
    fn overlong_text_is_rejected() {
        let mut text = TextLayer::new(frame(0, 0, 10, 10));
        text.set_text("ok").unwrap();
        let long = "x".repeat(TEXT_CAPACITY + 1);
        assert_eq!(text.set_text(&long), Err(Error::Format));
        assert_eq!(text.text(), "ok");
    }

    #[test]
    fn set_compositing_is_transparent() {
        let mut resources = BuiltinResources::new();
        let icon = resources.load_bitmap(ResourceId::BluetoothIcon).unwrap();

        let mut assign = BitmapLayer::new(frame(0, 0, 15, 30));
        assign.set_bitmap(&icon);
        assign.set_colors(Rgb565::WHITE, Rgb565::BLACK);
        let mut display = Frame::new(15, 30, Rgb565::RED);
        assign.draw(&mut display).unwrap();
        assert!(display.pixels.iter().all(|c| *c != Rgb565::RED));

        let mut set = BitmapLayer::new(frame(0, 0, 15, 30));
        set.set_bitmap(&icon);
        set.set_compositing(Compositing::Set);
        let mut display = Frame::new(15, 30, Rgb565::RED);
        set.draw(&mut display).unwrap();
        assert!(display.pixels.iter().any(|c| *c == Rgb565::RED));
        assert!(display.pixels.iter().any(|c| *c == Rgb565::WHITE));
        assert!(display.pixels.iter().all(|c| *c != Rgb565::BLACK));

        resources.destroy_bitmap(icon);
    }

    #[test]
    fn bitmap_is_centered_and_clipped() {
        let mut resources = BuiltinResources::new();
        let background = resources.load_bitmap(ResourceId::Background).unwrap();

        // Frame smaller than the 144x168 image
        let mut layer = BitmapLayer::new(frame(10, 10, 50, 50));
        layer.set_bitmap(&background);
        let mut display = Frame::new(80, 80, Rgb565::RED);
        layer.draw(&mut display).unwrap();
        assert_eq!(display.writes, 50 * 50);
        assert_eq!(display.at(9, 9), Rgb565::RED);
        assert_eq!(display.at(60, 60), Rgb565::RED);

        resources.destroy_bitmap(background);
    }
}
