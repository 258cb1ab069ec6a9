// NES Color Palette - Converts emulator index frames into RGBA rasters
//
// The emulator hands over one byte per pixel (256×240), each byte indexing the
// 64-entry NES master palette. Indices $0E-$0F, $1E-$1F, $2E-$2F, $3E-$3F are
// unused and render as black.

use super::{Color, ImageError, Raster};
use crate::frames::{FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH};
use crate::util::RingBuffer;
use std::sync::Arc;

/// NES master palette in RGB format (64 colors)
///
/// Each color is represented as a 32-bit value: 0xRRGGBB
pub const NES_PALETTE: [u32; 64] = [
    // $00-$0F
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00,
    0x333500, 0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000,
    // $10-$1F
    0xADADAD, 0x155FD9, 0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00,
    0x6B6D00, 0x388700, 0x0C9300, 0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000,
    // $20-$2F
    0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF, 0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22,
    0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE, 0x4F4F4F, 0x000000, 0x000000,
    // $30-$3F
    0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA, 0xFECCC5, 0xF7D8A5,
    0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000, 0x000000,
];

/// Number of output rasters the converter cycles through
const CONVERTER_SLOTS: usize = 3;

/// Convert a NES palette index to RGB color (0xRRGGBB)
#[inline]
pub fn palette_to_rgb(index: u8) -> u32 {
    NES_PALETTE[(index & 0x3F) as usize]
}

/// Convert a NES palette index to an opaque RGBA color
#[inline]
pub fn palette_to_color(index: u8) -> Color {
    let rgb = palette_to_rgb(index);
    Color::rgba(
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
        0xFF,
    )
}

/// Converts emulator index frames into 256×240 RGBA rasters
///
/// Output rasters are recycled through a small ring. A slot that is still
/// referenced elsewhere (for example as a compositor's current base image) is
/// cloned on write instead of being overwritten in place.
pub struct FrameConverter {
    palette: [Color; 64],
    slots: RingBuffer<Arc<Raster>>,
}

impl FrameConverter {
    /// Create a converter using the standard NES palette
    pub fn new() -> Self {
        let mut palette = [Color::BLACK; 64];
        for (index, color) in palette.iter_mut().enumerate() {
            *color = palette_to_color(index as u8);
        }
        Self::with_palette(palette)
    }

    /// Create a converter with a custom 64-entry palette
    pub fn with_palette(palette: [Color; 64]) -> Self {
        let blank = Raster::filled(FRAME_WIDTH as u32, FRAME_HEIGHT as u32, Color::BLACK);
        let slots = (0..CONVERTER_SLOTS)
            .map(|_| Arc::new(blank.clone()))
            .collect();

        FrameConverter {
            palette,
            slots: RingBuffer::from_slots(slots),
        }
    }

    /// Convert one index frame
    ///
    /// # Arguments
    /// * `frame` - Exactly `FRAME_SIZE` palette indices, row-major
    ///
    /// # Returns
    /// A shared 256×240 raster, or `ImageError::BufferSize` for a wrong-sized frame
    pub fn convert(&mut self, frame: &[u8]) -> Result<Arc<Raster>, ImageError> {
        if frame.len() != FRAME_SIZE {
            return Err(ImageError::BufferSize {
                expected: FRAME_SIZE,
                actual: frame.len(),
            });
        }

        let slot = self.slots.next_mut();
        let raster = Arc::make_mut(slot);
        for (pixel, &index) in raster.as_image_mut().pixels_mut().zip(frame) {
            *pixel = self.palette[(index & 0x3F) as usize].into();
        }

        Ok(Arc::clone(slot))
    }
}

impl Default for FrameConverter {
    fn default() -> Self {
        Self::new()
    }
}
