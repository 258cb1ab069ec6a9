// Geometry - Points, sizes and rectangles shared by the compositor and hit tester
//
// All coordinates are f32 so that scaled area tables and device-density
// normalized touch points keep their fractional part.

use serde::{Deserialize, Serialize};

/// A point in image or surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Divide both coordinates by a device pixel density
    ///
    /// Densities that are zero, negative or not finite leave the point unchanged.
    pub fn normalized(self, pixel_density: f32) -> Self {
        if pixel_density.is_finite() && pixel_density > 0.0 {
            Point::new(self.x / pixel_density, self.y / pixel_density)
        } else {
            self
        }
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }

    /// Size of a raster with integer dimensions
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Size::new(width as f32, height as f32)
    }

    /// True when either dimension is zero, negative or not finite
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Axis-aligned rectangle stored as its four edges
///
/// `contains` is half-open: the left and top edges are inside, the right and
/// bottom edges are outside. Two rectangles sharing an edge therefore never
/// both contain a point on that edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle at `origin` with the given size
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Rect::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// True if the edges are ordered and finite
    pub fn is_valid(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite())
            && self.left <= self.right
            && self.top <= self.bottom
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Scale each edge independently along X and Y
    pub fn scaled(&self, x_ratio: f32, y_ratio: f32) -> Self {
        Rect::new(
            self.left * x_ratio,
            self.top * y_ratio,
            self.right * x_ratio,
            self.bottom * y_ratio,
        )
    }
}

/// Compute the destination rectangle that draws an image of `image` size
/// into a surface of `surface` size, preserving aspect ratio and centering it
///
/// # Arguments
/// * `image` - Native size of the composited image
/// * `surface` - Size of the presenting surface
///
/// # Returns
/// The centered destination rectangle, or an empty rectangle at the origin if
/// either size is empty
pub fn fit_rect(image: Size, surface: Size) -> Rect {
    if image.is_empty() || surface.is_empty() {
        return Rect::default();
    }

    let scale = (surface.width / image.width).min(surface.height / image.height);
    let width = image.width * scale;
    let height = image.height * scale;
    let left = (surface.width - width) / 2.0;
    let top = (surface.height - height) / 2.0;

    Rect::new(left, top, left + width, top + height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(19.9, 19.9)));
        assert!(!rect.contains(Point::new(20.0, 15.0)));
        assert!(!rect.contains(Point::new(15.0, 20.0)));
        assert!(!rect.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn test_rect_scaled() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0).scaled(2.0, 0.5);
        assert_eq!(rect, Rect::new(20.0, 10.0, 60.0, 20.0));
    }

    #[test]
    fn test_rect_validity() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(2.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, f32::NAN, 1.0, 1.0).is_valid());
    }

    #[test]
    fn test_point_normalized() {
        assert_eq!(Point::new(200.0, 100.0).normalized(2.0), Point::new(100.0, 50.0));
        assert_eq!(Point::new(200.0, 100.0).normalized(0.0), Point::new(200.0, 100.0));
        assert_eq!(
            Point::new(200.0, 100.0).normalized(f32::INFINITY),
            Point::new(200.0, 100.0)
        );
    }

    #[test]
    fn test_fit_rect_letterbox() {
        // 256x240 into a wide surface: height-bound, centered horizontally
        let rect = fit_rect(Size::new(256.0, 240.0), Size::new(1024.0, 480.0));
        assert_eq!(rect.height(), 480.0);
        assert_eq!(rect.width(), 512.0);
        assert_eq!(rect.left, 256.0);
        assert_eq!(rect.top, 0.0);
    }

    #[test]
    fn test_fit_rect_empty() {
        assert_eq!(fit_rect(Size::new(0.0, 10.0), Size::new(10.0, 10.0)), Rect::default());
    }
}
