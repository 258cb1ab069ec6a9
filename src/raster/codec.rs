// PNG codec - Loading skin images and saving composite snapshots
//
// Decoding goes through the `image` crate and normalizes every PNG layout
// (indexed, grayscale, 16-bit) to 8-bit RGBA so callers always get a `Raster`.

use super::{ImageError, Raster};
use image::ImageFormat;
use std::fs;
use std::io::{self, BufRead, BufReader, Seek, Write};
use std::path::{Path, PathBuf};

/// Decode a PNG stream into a raster
///
/// # Arguments
/// * `reader` - Buffered, seekable PNG byte stream
///
/// # Returns
/// The decoded raster or an error
pub fn decode_png<R: BufRead + Seek>(reader: R) -> Result<Raster, ImageError> {
    let decoded = image::io::Reader::with_format(reader, ImageFormat::Png).decode()?;
    Ok(Raster::from(decoded.into_rgba8()))
}

/// Load a PNG file from disk
pub fn load_png<P: AsRef<Path>>(path: P) -> Result<Raster, ImageError> {
    let file = fs::File::open(path.as_ref())?;
    let raster = decode_png(BufReader::new(file))?;
    log::debug!(
        "Loaded {}x{} image from {}",
        raster.width(),
        raster.height(),
        path.as_ref().display()
    );
    Ok(raster)
}

/// Encode a raster as an 8-bit RGBA PNG
pub fn encode_png<W: Write>(raster: &Raster, writer: W) -> Result<(), ImageError> {
    let mut encoder = png::Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(raster.as_rgba_bytes())?;
    writer.finish()?;

    Ok(())
}

/// Save a raster as a PNG file
pub fn save_png<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<(), ImageError> {
    let file = fs::File::create(path)?;
    encode_png(raster, io::BufWriter::new(file))
}

/// Save a snapshot into `directory`, creating it if needed
///
/// # Arguments
/// * `raster` - Image to save
/// * `directory` - Target directory
/// * `prefix` - File name prefix, e.g. `"emulator"`
/// * `include_timestamp` - Append a local `%Y%m%d_%H%M%S` timestamp to the name
///
/// # Returns
/// Path of the written file
pub fn save_snapshot(
    raster: &Raster,
    directory: &Path,
    prefix: &str,
    include_timestamp: bool,
) -> Result<PathBuf, ImageError> {
    fs::create_dir_all(directory)?;

    let filename = if include_timestamp {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}.png", prefix, timestamp)
    } else {
        format!("{}.png", prefix)
    };
    let path = directory.join(filename);

    save_png(raster, &path)?;
    log::debug!("Saved snapshot to {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Color;
    use std::io::Cursor;

    #[test]
    fn test_png_preserves_pixels() {
        let mut raster = Raster::filled(3, 2, Color::rgba(10, 20, 30, 255));
        raster.set_pixel(2, 1, Color::rgba(200, 100, 50, 128));

        let mut bytes = Vec::new();
        encode_png(&raster, &mut bytes).unwrap();
        let decoded = decode_png(Cursor::new(bytes)).unwrap();

        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_decode_rgb_is_opaque() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        }

        let decoded = decode_png(Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.get_pixel(0, 0), Some(Color::rgba(1, 2, 3, 255)));
        assert_eq!(decoded.get_pixel(1, 0), Some(Color::rgba(4, 5, 6, 255)));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_png(Cursor::new(vec![0u8; 16]));
        assert!(matches!(result, Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_png("definitely/not/here.png");
        assert!(matches!(result, Err(ImageError::Io(_))));
    }

    #[test]
    fn test_save_snapshot_without_timestamp() {
        let dir = std::env::temp_dir().join(format!("nes_shell_snapshot_{}", std::process::id()));
        let raster = Raster::filled(2, 2, Color::WHITE);

        let path = save_snapshot(&raster, &dir, "emulator", false).unwrap();
        assert!(path.ends_with("emulator.png"));
        assert_eq!(load_png(&path).unwrap(), raster);

        let _ = fs::remove_dir_all(&dir);
    }
}
