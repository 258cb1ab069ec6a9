// Raster - RGBA pixel buffer used for base images, overlays and composites
//
// A thin wrapper over `image::RgbaImage` holding straight (non-premultiplied)
// RGBA. Drawing operations clip to the raster bounds and blend source-over.

use super::ImageError;
use crate::geometry::{Point, Rect, Size};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 0xFF);
    pub const WHITE: Color = Color::rgba(0xFF, 0xFF, 0xFF, 0xFF);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub const fn from_array(rgba: [u8; 4]) -> Self {
        Color::rgba(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Blend this color over `dst` using the source-over operator
    ///
    /// # Arguments
    /// * `dst` - The color already present underneath
    ///
    /// # Returns
    /// The resulting straight-alpha color
    #[inline]
    pub fn over(self, dst: Color) -> Color {
        let sa = self.a as u32;
        if sa == 0xFF {
            return self;
        }
        if sa == 0 {
            return dst;
        }

        let da = dst.a as u32;
        let inv = 0xFF - sa;
        // Output alpha scaled by 255 to keep precision in the channel math
        let out_a = sa * 0xFF + da * inv;
        if out_a == 0 {
            return Color::TRANSPARENT;
        }

        let channel = |s: u8, d: u8| -> u8 {
            ((s as u32 * sa * 0xFF + d as u32 * da * inv + out_a / 2) / out_a) as u8
        };

        Color {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: ((out_a + 0x7F) / 0xFF) as u8,
        }
    }
}

impl From<Rgba<u8>> for Color {
    #[inline]
    fn from(pixel: Rgba<u8>) -> Self {
        Color::from_array(pixel.0)
    }
}

impl From<Color> for Rgba<u8> {
    #[inline]
    fn from(color: Color) -> Self {
        Rgba(color.to_array())
    }
}

/// RGBA raster image with fixed dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

impl Raster {
    /// Create a fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Create a raster filled with a single color
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Raster {
            image: RgbaImage::from_pixel(width, height, color.into()),
        }
    }

    /// Build a raster from tightly packed RGBA bytes
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `bytes` - `width * height * 4` bytes of RGBA data
    ///
    /// # Returns
    /// The raster, or `ImageError::BufferSize` if the byte count is wrong
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * 4;
        let mismatch = ImageError::BufferSize {
            expected,
            actual: bytes.len(),
        };
        if bytes.len() != expected {
            return Err(mismatch);
        }

        RgbaImage::from_raw(width, height, bytes.to_vec())
            .map(Raster::from)
            .ok_or(mismatch)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn size(&self) -> Size {
        Size::from_pixels(self.width(), self.height())
    }

    /// Pixels in row-major order
    pub fn pixels(&self) -> impl ExactSizeIterator<Item = Color> + '_ {
        self.image.pixels().map(|&p| Color::from(p))
    }

    /// Underlying image buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    /// Get a pixel, or `None` outside the raster
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x < self.width() && y < self.height() {
            Some(Color::from(*self.image.get_pixel(x, y)))
        } else {
            None
        }
    }

    /// Overwrite a pixel without blending
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        assert!(x < self.width(), "X coordinate {} out of bounds", x);
        assert!(y < self.height(), "Y coordinate {} out of bounds", y);

        self.image.put_pixel(x, y, color.into());
    }

    /// Blend `color` over every pixel whose origin lies inside `rect`
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };

        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Draw `src` with its top-left corner at `location`, blending source-over
    ///
    /// The location is rounded to the nearest pixel; parts of `src` that fall
    /// outside this raster are clipped.
    pub fn draw(&mut self, src: &Raster, location: Point) {
        let dx = location.x.round() as i64;
        let dy = location.y.round() as i64;

        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (dx + src.width() as i64).min(self.width() as i64);
        let y_end = (dy + src.height() as i64).min(self.height() as i64);
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                let s = src.image.get_pixel((x - dx) as u32, (y - dy) as u32);
                self.blend_pixel(x as u32, y as u32, Color::from(*s));
            }
        }
    }

    /// Packed RGBA bytes, row-major
    pub fn as_rgba_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        let pixel = self.image.get_pixel_mut(x, y);
        *pixel = color.over(Color::from(*pixel)).into();
    }

    /// Pixel bounds covered by `rect`, clamped to the raster
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        if !rect.is_valid() {
            return None;
        }

        let (width, height) = self.dimensions();
        let clamp_x = |v: f32| v.round().clamp(0.0, width as f32) as u32;
        let clamp_y = |v: f32| v.round().clamp(0.0, height as f32) as u32;

        let (x0, x1) = (clamp_x(rect.left), clamp_x(rect.right));
        let (y0, y1) = (clamp_y(rect.top), clamp_y(rect.bottom));
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }
}

impl From<RgbaImage> for Raster {
    fn from(image: RgbaImage) -> Self {
        Raster { image }
    }
}

impl From<Raster> for RgbaImage {
    fn from(raster: Raster) -> Self {
        raster.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgba(0xFF, 0, 0, 0xFF);
    const BLUE: Color = Color::rgba(0, 0, 0xFF, 0xFF);

    #[test]
    fn test_over_opaque_replaces() {
        assert_eq!(RED.over(BLUE), RED);
        assert_eq!(Color::TRANSPARENT.over(BLUE), BLUE);
    }

    #[test]
    fn test_over_half_alpha_on_opaque() {
        let half_red = Color::rgba(0xFF, 0, 0, 0x80);
        let out = half_red.over(Color::BLACK);
        assert_eq!(out.a, 0xFF);
        assert_eq!(out.r, 0x80);
        assert_eq!(out.g, 0);
        assert_eq!(out.b, 0);
    }

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(Raster::from_rgba(2, 2, &[0; 16]).is_ok());
        match Raster::from_rgba(2, 2, &[0; 15]) {
            Err(ImageError::BufferSize { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_draw_clips_negative_offset() {
        let mut dst = Raster::filled(4, 4, BLUE);
        let src = Raster::filled(2, 2, RED);
        dst.draw(&src, Point::new(-1.0, -1.0));

        assert_eq!(dst.get_pixel(0, 0), Some(RED));
        assert_eq!(dst.get_pixel(1, 0), Some(BLUE));
        assert_eq!(dst.get_pixel(0, 1), Some(BLUE));
    }

    #[test]
    fn test_draw_outside_is_noop() {
        let mut dst = Raster::filled(4, 4, BLUE);
        let before = dst.clone();
        dst.draw(&Raster::filled(2, 2, RED), Point::new(10.0, 0.0));
        assert_eq!(dst, before);
    }

    #[test]
    fn test_fill_rect_clamps() {
        let mut dst = Raster::filled(4, 4, BLUE);
        dst.fill_rect(Rect::new(2.0, 2.0, 100.0, 100.0), RED);
        assert_eq!(dst.get_pixel(1, 1), Some(BLUE));
        assert_eq!(dst.get_pixel(2, 2), Some(RED));
        assert_eq!(dst.get_pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_rgba_bytes_roundtrip_layout() {
        let mut raster = Raster::new(2, 1);
        raster.set_pixel(1, 0, Color::rgba(1, 2, 3, 4));
        assert_eq!(raster.as_rgba_bytes(), &[0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_wraps_rgba_image() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(2, 1, Rgba([9, 8, 7, 6]));

        let raster = Raster::from(image.clone());
        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.get_pixel(2, 1), Some(Color::rgba(9, 8, 7, 6)));
        assert_eq!(raster.pixels().len(), 6);
        assert_eq!(RgbaImage::from(raster), image);
    }

    #[test]
    #[should_panic]
    fn test_set_pixel_out_of_bounds() {
        let mut raster = Raster::new(2, 2);
        raster.set_pixel(2, 0, Color::WHITE);
    }
}
