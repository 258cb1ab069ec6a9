// Compositor - Base image plus timed overlays, composited on demand
//
// All state of one compositor sits behind a single mutex: overlay mutation,
// base-image replacement and the composite pass never interleave, and a
// reader never sees a half-updated overlay list.
//
// Rendering is pull-based. get_image() refreshes the overlay classification,
// and re-composites only when the scheduler generation or the base image
// version differs from the ones the cached composite was produced for.

use crate::areas::AreaTable;
use crate::geometry::{Point, Size};
use crate::overlay::{Clock, OverlayId, OverlayInfo, OverlayScheduler, OverlayStatus, SystemClock};
use crate::raster::{self, render, Color, ImageError, Raster};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Errors returned by compositor operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositorError {
    /// A replacement base image does not match the current base size
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl fmt::Display for CompositorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositorError::DimensionMismatch { expected, actual } => write!(
                f,
                "Base image must be {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
        }
    }
}

impl std::error::Error for CompositorError {}

/// (scheduler generation, base image version)
type RenderKey = (u64, u64);

struct CompositorState {
    base: Arc<Raster>,
    base_version: u64,
    scheduler: OverlayScheduler,
    rendered: Arc<Raster>,
    rendered_key: RenderKey,
}

impl CompositorState {
    fn key(&self) -> RenderKey {
        (self.scheduler.generation(), self.base_version)
    }

    fn composite(&mut self) -> Arc<Raster> {
        self.scheduler.refresh();
        let key = self.key();
        if key == self.rendered_key {
            return Arc::clone(&self.rendered);
        }

        let mut drawn = 0usize;
        let mut visible = self.scheduler.visible().peekable();
        let image = if visible.peek().is_none() {
            Arc::clone(&self.base)
        } else {
            let mut canvas = Raster::clone(&self.base);
            for overlay in visible {
                canvas.draw(overlay.image(), overlay.location());
                drawn += 1;
            }
            Arc::new(canvas)
        };

        log::trace!(
            "Composited {} overlay(s) at generation {} base version {}",
            drawn,
            key.0,
            key.1
        );

        self.rendered = Arc::clone(&image);
        self.rendered_key = key;
        image
    }
}

/// Thread-safe layered image
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Compositor {
    state: Mutex<CompositorState>,
}

impl Compositor {
    /// Create a compositor over `base` using the system clock
    pub fn new(base: Raster) -> Self {
        Self::with_clock(base, Arc::new(SystemClock))
    }

    /// Create a compositor over `base` reading overlay time from `clock`
    pub fn with_clock(base: Raster, clock: Arc<dyn Clock>) -> Self {
        let base = Arc::new(base);
        let scheduler = OverlayScheduler::new(clock);
        let rendered_key = (scheduler.generation(), 0);

        Compositor {
            state: Mutex::new(CompositorState {
                rendered: Arc::clone(&base),
                base,
                base_version: 0,
                scheduler,
                rendered_key,
            }),
        }
    }

    /// Create a compositor whose base image is loaded from a PNG file
    ///
    /// # Returns
    /// The compositor, or the load error; there is no compositor without a base image
    pub fn from_png<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        Self::from_png_with_clock(path, Arc::new(SystemClock))
    }

    pub fn from_png_with_clock<P: AsRef<Path>>(
        path: P,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ImageError> {
        let base = raster::load_png(path)?;
        Ok(Self::with_clock(base, clock))
    }

    fn lock(&self) -> MutexGuard<'_, CompositorState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            log::warn!("Compositor lock poisoned; recovering state");
            poisoned.into_inner()
        })
    }

    /// Current composite: the base image with every live overlay drawn on top
    ///
    /// Returns the cached composite when neither the visible overlay set nor
    /// the base image changed since it was produced. Expired overlays are
    /// swept as part of the call.
    pub fn get_image(&self) -> Arc<Raster> {
        self.lock().composite()
    }

    /// Replace the base image
    ///
    /// # Arguments
    /// * `image` - New base image; must have the current base dimensions
    ///
    /// # Returns
    /// `DimensionMismatch` without touching any state if the sizes differ
    pub fn set_base_image(&self, image: impl Into<Arc<Raster>>) -> Result<(), CompositorError> {
        let image = image.into();
        let mut state = self.lock();

        let expected = state.base.dimensions();
        let actual = image.dimensions();
        if expected != actual {
            return Err(CompositorError::DimensionMismatch { expected, actual });
        }

        state.base = image;
        state.base_version += 1;
        Ok(())
    }

    /// Add an overlay
    ///
    /// # Arguments
    /// * `image` - Overlay image at the base image's resolution
    /// * `location` - Top-left corner on the base image
    /// * `duration_ms` - Display time after the delay; 0 displays indefinitely
    /// * `delay_ms` - Time before the overlay shows; 0 is immediate
    pub fn add_overlay(
        &self,
        image: impl Into<Arc<Raster>>,
        location: Point,
        duration_ms: u32,
        delay_ms: u32,
    ) -> OverlayId {
        self.lock()
            .scheduler
            .add(image.into(), location, duration_ms, delay_ms)
    }

    /// Add one overlay per image at the same location, under one lock
    ///
    /// # Returns
    /// Ids in input order
    pub fn add_overlays<I>(
        &self,
        images: I,
        location: Point,
        duration_ms: u32,
        delay_ms: u32,
    ) -> Vec<OverlayId>
    where
        I: IntoIterator<Item = Arc<Raster>>,
    {
        self.lock()
            .scheduler
            .add_many(images, location, duration_ms, delay_ms)
    }

    /// Remove an overlay; absent ids are ignored
    pub fn remove_overlay(&self, id: OverlayId) -> bool {
        self.lock().scheduler.remove(id)
    }

    /// Remove every listed overlay still present
    ///
    /// # Returns
    /// Number of overlays actually removed
    pub fn remove_overlays<I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = OverlayId>,
    {
        self.lock().scheduler.remove_many(ids)
    }

    pub fn clear_overlays(&self) {
        self.lock().scheduler.clear();
    }

    /// Status of an overlay, or `None` once it was removed or swept
    pub fn overlay_status(&self, id: OverlayId) -> Option<OverlayStatus> {
        self.lock().scheduler.status(id)
    }

    /// Overlays held, including pending ones and expired ones not yet swept
    pub fn overlay_count(&self) -> usize {
        self.lock().scheduler.len()
    }

    /// Summaries of the live overlays in draw order
    pub fn live_overlays(&self) -> Vec<OverlayInfo> {
        let mut state = self.lock();
        let now = state.scheduler.clock().now();
        state
            .scheduler
            .live_overlays_at(now)
            .map(|overlay| overlay.info_at(now))
            .collect()
    }

    /// Add a debug overlay marking the areas of `table`
    ///
    /// The overlay is a copy of the base image with `color` blended over the
    /// base geometry of one area (`which`) or of all of them, shown
    /// indefinitely at the origin.
    pub fn show_areas(&self, table: &AreaTable, which: Option<u32>, color: Color) -> OverlayId {
        let mut state = self.lock();
        let rects = table
            .base_areas()
            .filter(|(id, _)| which.map_or(true, |wanted| wanted == *id))
            .map(|(_, rect)| rect);
        let image = render::area_debug(&state.base, rects, color);

        log::debug!("Showing areas (which={:?})", which);
        state
            .scheduler
            .add(Arc::new(image), Point::ORIGIN, 0, 0)
    }

    /// Current base image, without overlays
    pub fn base_image(&self) -> Arc<Raster> {
        Arc::clone(&self.lock().base)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.lock().base.dimensions()
    }

    pub fn size(&self) -> Size {
        self.lock().base.size()
    }
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Compositor")
            .field("dimensions", &state.base.dimensions())
            .field("overlays", &state.scheduler.len())
            .field("generation", &state.scheduler.generation())
            .field("base_version", &state.base_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::overlay::ManualClock;

    const RED: Color = Color::rgba(255, 0, 0, 255);

    /// Clock that moves forward 1 ms on every read
    struct TickingClock(Mutex<std::time::Instant>);

    impl Clock for TickingClock {
        fn now(&self) -> std::time::Instant {
            let mut now = self.0.lock().unwrap();
            *now += std::time::Duration::from_millis(1);
            *now
        }
    }

    fn compositor() -> (Compositor, ManualClock) {
        let clock = ManualClock::new();
        let c = Compositor::with_clock(
            Raster::filled(8, 8, Color::BLACK),
            Arc::new(clock.clone()),
        );
        (c, clock)
    }

    #[test]
    fn test_live_overlays_report_live_status_on_ticking_clock() {
        let clock = TickingClock(Mutex::new(std::time::Instant::now()));
        let c = Compositor::with_clock(Raster::filled(8, 8, Color::BLACK), Arc::new(clock));
        let id = c.add_overlay(Raster::filled(2, 2, RED), Point::ORIGIN, 0, 2);

        let mut seen = false;
        for _ in 0..4 {
            for info in c.live_overlays() {
                assert_eq!(info.id, id);
                assert_eq!(info.status, OverlayStatus::Live);
                seen = true;
            }
        }
        assert!(seen);
    }

    #[test]
    fn test_no_overlays_returns_base() {
        let (c, _) = compositor();
        assert!(Arc::ptr_eq(&c.get_image(), &c.base_image()));
    }

    #[test]
    fn test_cached_until_mutation() {
        let (c, _) = compositor();
        c.add_overlay(Raster::filled(2, 2, RED), Point::ORIGIN, 0, 0);

        let first = c.get_image();
        let second = c.get_image();
        assert!(Arc::ptr_eq(&first, &second));

        c.add_overlay(Raster::filled(2, 2, Color::WHITE), Point::new(4.0, 4.0), 0, 0);
        let third = c.get_image();
        assert!(!Arc::ptr_eq(&second, &third));
        assert_eq!(third.get_pixel(4, 4), Some(Color::WHITE));
    }

    #[test]
    fn test_base_replacement_forces_render() {
        let (c, _) = compositor();
        let before = c.get_image();

        c.set_base_image(Raster::filled(8, 8, Color::WHITE)).unwrap();
        let after = c.get_image();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.get_pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn test_dimension_mismatch() {
        let (c, _) = compositor();
        let err = c.set_base_image(Raster::new(4, 8)).unwrap_err();
        assert_eq!(
            err,
            CompositorError::DimensionMismatch {
                expected: (8, 8),
                actual: (4, 8),
            }
        );
        assert_eq!(c.dimensions(), (8, 8));
    }

    #[test]
    fn test_swap_at_same_instant_rerenders() {
        // One overlay expires exactly as another becomes live; the live count
        // stays at one but the composite must change.
        let (c, clock) = compositor();
        c.add_overlay(Raster::filled(1, 1, RED), Point::ORIGIN, 100, 0);
        c.add_overlay(Raster::filled(1, 1, Color::WHITE), Point::ORIGIN, 0, 101);

        assert_eq!(c.get_image().get_pixel(0, 0), Some(RED));

        clock.advance_ms(101);
        assert_eq!(c.get_image().get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(c.overlay_count(), 1);
    }

    #[test]
    fn test_show_areas_marks_only_selected() {
        let (c, _) = compositor();
        let mut table = AreaTable::new(Size::new(8.0, 8.0));
        table.insert(1, Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
        table.insert(2, Rect::new(6.0, 6.0, 8.0, 8.0)).unwrap();

        c.show_areas(&table, Some(2), RED);
        let image = c.get_image();
        assert_eq!(image.get_pixel(0, 0), Some(Color::BLACK));
        assert_eq!(image.get_pixel(7, 7), Some(RED));
    }

    #[test]
    fn test_live_overlays_in_draw_order() {
        let (c, _) = compositor();
        let ids = c.add_overlays(
            (0..3).map(|_| Arc::new(Raster::new(1, 1))),
            Point::ORIGIN,
            0,
            0,
        );
        let listed: Vec<OverlayId> = c.live_overlays().iter().map(|i| i.id).collect();
        assert_eq!(listed, ids);
    }
}
