// Raster module - In-memory RGBA images and the helpers that produce them
//
// This module provides:
// - RGBA color and raster buffer with source-over blitting
// - NES palette conversion of emulator index frames (256×240)
// - PNG decoding/encoding and timestamped snapshots
//
// Pixel storage is `image::RgbaImage`; snapshots are written with `png`.
// - Simple overlay image builders (solid fills, highlights, area debug views)

pub mod buffer;
pub mod codec;
pub mod palette;
pub mod render;

pub use codec::{decode_png, encode_png, load_png, save_png, save_snapshot};
pub use buffer::{Color, Raster};
pub use palette::{palette_to_color, palette_to_rgb, FrameConverter, NES_PALETTE};

use std::fmt;
use std::io;

/// Errors that can occur while building, loading or saving images
#[derive(Debug)]
pub enum ImageError {
    /// I/O error
    Io(io::Error),

    /// Image decoding error
    Decode(image::ImageError),

    /// PNG encoding error
    Encode(png::EncodingError),

    /// A raw pixel buffer does not match the declared dimensions
    BufferSize { expected: usize, actual: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Io(e) => write!(f, "I/O error: {}", e),
            ImageError::Decode(e) => write!(f, "Image decoding error: {}", e),
            ImageError::Encode(e) => write!(f, "PNG encoding error: {}", e),
            ImageError::BufferSize { expected, actual } => write!(
                f,
                "Pixel buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Io(e) => Some(e),
            ImageError::Decode(e) => Some(e),
            ImageError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ImageError {
    fn from(e: io::Error) -> Self {
        ImageError::Io(e)
    }
}

impl From<image::ImageError> for ImageError {
    fn from(e: image::ImageError) -> Self {
        ImageError::Decode(e)
    }
}

impl From<png::EncodingError> for ImageError {
    fn from(e: png::EncodingError) -> Self {
        ImageError::Encode(e)
    }
}
