// Layered Surface - One displayable image with its areas and hit testing
//
// Bundles what the presentation layer needs for one on-screen surface:
// - the compositor producing the image
// - the area table, rescaled whenever the surface is resized
// - the hit tester with the device pixel density
//
// Geometry sits behind a RwLock so that hit tests from the input path can run
// concurrently with each other, while resizes take the write side. The
// compositor has its own lock; the two are never held at the same time.

use crate::areas::{AreaTable, HitTester, Region};
use crate::compositor::{Compositor, CompositorError};
use crate::geometry::{fit_rect, Point, Rect, Size};
use crate::overlay::{Clock, OverlayId, SystemClock};
use crate::raster::{self, Color, ImageError, Raster};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct Layout {
    areas: AreaTable,
    hit_tester: HitTester,
}

/// A compositor plus the area geometry laid over it
#[derive(Debug)]
pub struct LayeredSurface {
    compositor: Compositor,
    layout: RwLock<Layout>,
}

impl LayeredSurface {
    /// Create a surface using the system clock
    ///
    /// # Arguments
    /// * `base` - Base image
    /// * `areas` - Areas defined in the base image's pixel space
    /// * `pixel_density` - Device pixels per logical pixel for hit tests
    pub fn new(base: Raster, areas: AreaTable, pixel_density: f32) -> Self {
        Self::with_clock(base, areas, pixel_density, Arc::new(SystemClock))
    }

    pub fn with_clock(
        base: Raster,
        areas: AreaTable,
        pixel_density: f32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        LayeredSurface {
            compositor: Compositor::with_clock(base, clock),
            layout: RwLock::new(Layout {
                areas,
                hit_tester: HitTester::new(pixel_density),
            }),
        }
    }

    /// Create a surface whose base image is a PNG file
    ///
    /// When `areas` is `None`, the areas of region type `R` are used, sized to
    /// the loaded image.
    pub fn from_png<R: Region, P: AsRef<Path>>(
        path: P,
        areas: Option<AreaTable>,
        pixel_density: f32,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ImageError> {
        let base = raster::load_png(path)?;
        let areas = areas.unwrap_or_else(|| AreaTable::from_regions::<R>(base.size()));
        Ok(Self::with_clock(base, areas, pixel_density, clock))
    }

    fn layout(&self) -> RwLockReadGuard<'_, Layout> {
        self.layout.read().unwrap_or_else(|poisoned| {
            log::warn!("Surface layout lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    fn layout_mut(&self) -> RwLockWriteGuard<'_, Layout> {
        self.layout.write().unwrap_or_else(|poisoned| {
            log::warn!("Surface layout lock poisoned; recovering");
            poisoned.into_inner()
        })
    }

    /// The compositor, for overlay management
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Current composite
    pub fn get_image(&self) -> Arc<Raster> {
        self.compositor.get_image()
    }

    /// Replace the base image, e.g. with a new emulator frame
    pub fn set_base_image(&self, image: impl Into<Arc<Raster>>) -> Result<(), CompositorError> {
        self.compositor.set_base_image(image)
    }

    /// Rescale the areas for a presenting surface of `new_size`
    ///
    /// Must be called on every resize before the next hit test.
    pub fn resize(&self, new_size: Size) {
        let mut layout = self.layout_mut();
        let Layout { areas, hit_tester } = &mut *layout;
        hit_tester.rescale(areas, new_size);
    }

    /// Region id under a device point, or `None`
    pub fn hit_test(&self, point: Point) -> Option<u32> {
        let layout = self.layout();
        layout.hit_tester.locate(point, &layout.areas)
    }

    /// `hit_test`, resolved to a typed region
    pub fn hit_region<R: Region>(&self, point: Point) -> Option<R> {
        let layout = self.layout();
        layout.hit_tester.locate_region(point, &layout.areas)
    }

    pub fn pixel_density(&self) -> f32 {
        self.layout().hit_tester.pixel_density()
    }

    pub fn set_pixel_density(&self, pixel_density: f32) {
        self.layout_mut().hit_tester.set_pixel_density(pixel_density);
    }

    /// Rectangle of an area in base image pixels, for placing overlays
    pub fn area_rect(&self, id: u32) -> Option<Rect> {
        self.layout().areas.base_rect(id)
    }

    /// Copy of the area table
    pub fn areas(&self) -> AreaTable {
        self.layout().areas.clone()
    }

    /// Add an overlay covering one area, tinted with `color`
    ///
    /// # Returns
    /// The overlay id, or `None` if the area is unknown
    pub fn highlight_area(&self, id: u32, color: Color, duration_ms: u32) -> Option<OverlayId> {
        let rect = self.area_rect(id)?;
        let (image, location) = raster::render::highlight(rect, color);
        Some(self.compositor.add_overlay(image, location, duration_ms, 0))
    }

    /// Add the area debug overlay for one area or all of them
    pub fn show_areas(&self, which: Option<u32>, color: Color) -> OverlayId {
        let areas = self.areas();
        self.compositor.show_areas(&areas, which, color)
    }

    /// Destination rectangle for drawing the composite centered on a surface
    /// of `surface` size without distorting it
    pub fn fit(&self, surface: Size) -> Rect {
        fit_rect(self.compositor.size(), surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::ControllerArea;
    use crate::overlay::ManualClock;

    fn surface() -> LayeredSurface {
        let base = Raster::filled(700, 300, Color::BLACK);
        let areas = AreaTable::from_regions::<ControllerArea>(base.size());
        LayeredSurface::with_clock(base, areas, 1.0, Arc::new(ManualClock::new()))
    }

    #[test]
    fn test_resize_then_hit() {
        let s = surface();
        assert_eq!(
            s.hit_region::<ControllerArea>(Point::new(500.0, 200.0)),
            Some(ControllerArea::AButton)
        );

        s.resize(Size::new(350.0, 150.0));
        assert_eq!(
            s.hit_region::<ControllerArea>(Point::new(250.0, 100.0)),
            Some(ControllerArea::AButton)
        );
        assert_eq!(s.hit_region::<ControllerArea>(Point::new(500.0, 200.0)), None);
    }

    #[test]
    fn test_density_change() {
        let s = surface();
        s.set_pixel_density(2.0);
        assert_eq!(s.pixel_density(), 2.0);
        assert_eq!(
            s.hit_region::<ControllerArea>(Point::new(1000.0, 400.0)),
            Some(ControllerArea::AButton)
        );
    }

    #[test]
    fn test_highlight_area_draws_in_base_space() {
        let s = surface();
        s.resize(Size::new(70.0, 30.0));

        let id = s
            .highlight_area(ControllerArea::StartButton.id(), Color::WHITE, 0)
            .unwrap();
        let image = s.get_image();
        assert_eq!(image.get_pixel(350, 180), Some(Color::WHITE));
        assert!(s.compositor().remove_overlay(id));
        assert!(s.highlight_area(99, Color::WHITE, 0).is_none());
    }
}
