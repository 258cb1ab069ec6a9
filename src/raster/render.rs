// Overlay image builders
//
// Overlays are pre-rendered at the destination (native) resolution of the
// image they are composited onto; these helpers produce the common ones.

use super::{Color, Raster};
use crate::geometry::{Point, Rect};

/// Raster of the given size filled with one color
pub fn solid(width: u32, height: u32, color: Color) -> Raster {
    Raster::filled(width, height, color)
}

/// Build a highlight covering `rect`
///
/// # Returns
/// The highlight image and the location it must be drawn at
pub fn highlight(rect: Rect, color: Color) -> (Raster, Point) {
    let width = rect.width().max(0.0).round() as u32;
    let height = rect.height().max(0.0).round() as u32;
    (Raster::filled(width, height, color), rect.origin())
}

/// Copy of `base` with translucent `color` blended over each rectangle
///
/// This is the area debug view: the result is meant to be added as a full-size
/// overlay at the origin.
pub fn area_debug<I>(base: &Raster, rects: I, color: Color) -> Raster
where
    I: IntoIterator<Item = Rect>,
{
    let mut image = base.clone();
    for rect in rects {
        image.fill_rect(rect, color);
    }
    image
}
