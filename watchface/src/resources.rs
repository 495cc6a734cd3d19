//! Fonts and bitmaps loaded by identifier
//!
//! Handles are move-only. Releasing one gives it back to the [`Resources`]
//! implementation, so every handle is released at most once.

use embedded_graphics::{
    geometry::Size,
    image::ImageRaw,
    mono_font::MonoFont,
    pixelcolor::BinaryColor,
};
use profont::{PROFONT_12_POINT, PROFONT_24_POINT};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceId {
    Background,
    BluetoothIcon,
    SmallFont,
    LargeFont,
}

impl ResourceId {
    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::BluetoothIcon => "bluetooth-icon",
            Self::SmallFont => "small-font",
            Self::LargeFont => "large-font",
        }
    }
}

/// A 1 bit per pixel image
#[derive(Debug)]
pub struct Bitmap {
    id: ResourceId,
    data: &'static [u8],
    size: Size,
}

impl Bitmap {
    /// `data` is packed MSB first, each row padded to a whole byte.
    pub const fn new(id: ResourceId, data: &'static [u8], size: Size) -> Self {
        Self { id, data, size }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn raw(&self) -> ImageRaw<'static, BinaryColor> {
        ImageRaw::new(self.data, self.size.width)
    }
}

pub struct Font {
    id: ResourceId,
    font: &'static MonoFont<'static>,
}

impl Font {
    pub const fn new(id: ResourceId, font: &'static MonoFont<'static>) -> Self {
        Self { id, font }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub(crate) fn mono(&self) -> &'static MonoFont<'static> {
        self.font
    }
}

impl core::fmt::Debug for Font {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Font").field("id", &self.id).finish()
    }
}

/// Resource store of the host
pub trait Resources {
    fn load_bitmap(&mut self, id: ResourceId) -> Result<Bitmap, Error>;

    fn load_font(&mut self, id: ResourceId) -> Result<Font, Error>;

    fn destroy_bitmap(&mut self, bitmap: Bitmap);

    fn unload_font(&mut self, font: Font);
}

static BACKGROUND: &[u8] = include_bytes!("../assets/background.raw");
const BACKGROUND_SIZE: Size = Size::new(144, 168);

/// Crossed out Bluetooth rune, 15x30
#[rustfmt::skip]
static BLUETOOTH_ICON: [u8; 60] = [
    0b00000000, 0b00000000,
    0b00000010, 0b00000000,
    0b00000011, 0b00000000,
    0b00000011, 0b10000000,
    0b00000010, 0b11000000,
    0b00100010, 0b01100000,
    0b00110010, 0b00110000,
    0b00011010, 0b01100000,
    0b00001110, 0b11000000,
    0b00000111, 0b10000000,
    0b00000011, 0b00000000,
    0b00000111, 0b10000000,
    0b00001110, 0b11000000,
    0b00011010, 0b01100000,
    0b00110010, 0b00110000,
    0b00100010, 0b01100000,
    0b00000010, 0b11000000,
    0b00000011, 0b10000000,
    0b00000011, 0b00000000,
    0b00000010, 0b00000000,
    0b00000000, 0b00000000,
    0b00000000, 0b00000000,
    0b00100000, 0b00001000,
    0b00010000, 0b00010000,
    0b00001000, 0b00100000,
    0b00000100, 0b01000000,
    0b00000010, 0b10000000,
    0b00000001, 0b00000000,
    0b00000010, 0b10000000,
    0b00000100, 0b01000000,
];
const BLUETOOTH_ICON_SIZE: Size = Size::new(15, 30);

/// Resources compiled into flash
#[derive(Debug, Default)]
pub struct BuiltinResources {
    live_bitmaps: usize,
    live_fonts: usize,
}

impl BuiltinResources {
    pub const fn new() -> Self {
        Self {
            live_bitmaps: 0,
            live_fonts: 0,
        }
    }

    /// Number of handles handed out and not yet released.
    pub fn live(&self) -> usize {
        self.live_bitmaps + self.live_fonts
    }
}

impl Resources for BuiltinResources {
    fn load_bitmap(&mut self, id: ResourceId) -> Result<Bitmap, Error> {
        let bitmap = match id {
            ResourceId::Background => Bitmap::new(id, BACKGROUND, BACKGROUND_SIZE),
            ResourceId::BluetoothIcon => Bitmap::new(id, &BLUETOOTH_ICON, BLUETOOTH_ICON_SIZE),
            _ => return Err(Error::UnknownResource(id)),
        };
        self.live_bitmaps += 1;
        Ok(bitmap)
    }

    fn load_font(&mut self, id: ResourceId) -> Result<Font, Error> {
        let font = match id {
            ResourceId::SmallFont => Font::new(id, &PROFONT_12_POINT),
            ResourceId::LargeFont => Font::new(id, &PROFONT_24_POINT),
            _ => return Err(Error::UnknownResource(id)),
        };
        self.live_fonts += 1;
        Ok(font)
    }

    fn destroy_bitmap(&mut self, _bitmap: Bitmap) {
        self.live_bitmaps = self.live_bitmaps.saturating_sub(1);
    }

    fn unload_font(&mut self, _font: Font) {
        self.live_fonts = self.live_fonts.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_data_matches_size() {
        let mut resources = BuiltinResources::new();
        for id in [ResourceId::Background, ResourceId::BluetoothIcon] {
            let bitmap = resources.load_bitmap(id).unwrap();
            let stride = (bitmap.size().width as usize + 7) / 8;
            assert_eq!(bitmap.data.len(), stride * bitmap.size().height as usize);
            resources.destroy_bitmap(bitmap);
        }
        assert_eq!(resources.live(), 0);
    }

    #[test]
    fn fonts_are_not_bitmaps() {
        let mut resources = BuiltinResources::new();
        assert_eq!(
            resources.load_bitmap(ResourceId::SmallFont).unwrap_err(),
            Error::UnknownResource(ResourceId::SmallFont)
        );
        assert_eq!(
            resources.load_font(ResourceId::Background).unwrap_err(),
            Error::UnknownResource(ResourceId::Background)
        );
        assert_eq!(resources.live(), 0);
    }

    #[test]
    fn large_font_is_taller() {
        let mut resources = BuiltinResources::new();
        let small = resources.load_font(ResourceId::SmallFont).unwrap();
        let large = resources.load_font(ResourceId::LargeFont).unwrap();
        assert!(large.mono().character_size.height > small.mono().character_size.height);
        assert_eq!(resources.live(), 2);
        resources.unload_font(small);
        resources.unload_font(large);
        assert_eq!(resources.live(), 0);
    }
}
