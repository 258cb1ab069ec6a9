// Overlay Scheduler - Owns the overlays attached to one base image
//
// The scheduler classifies overlays against its clock and sweeps expired ones
// lazily, whenever live overlays are requested. It also keeps a generation
// counter that changes whenever the set of visible overlays may have changed:
// on add, on an effective remove, on any observed status transition
// (Pending -> Live, Live -> Expired) and on sweep. Compositors compare
// generations instead of overlay counts to decide if a cached image is stale.
//
// The scheduler itself is not synchronized; the compositor keeps it behind
// its lock.

use super::clock::Clock;
use super::timed::{OverlayId, OverlayInfo, OverlayStatus, TimedOverlay};
use crate::geometry::Point;
use crate::raster::Raster;
use std::sync::Arc;
use std::time::Instant;

struct Entry {
    overlay: TimedOverlay,
    /// Status as of the last refresh
    observed: OverlayStatus,
}

/// Ordered set of timed overlays for one image
pub struct OverlayScheduler {
    clock: Arc<dyn Clock>,
    entries: Vec<Entry>,
    generation: u64,
}

impl OverlayScheduler {
    /// Create an empty scheduler reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        OverlayScheduler {
            clock,
            entries: Vec::new(),
            generation: 0,
        }
    }

    /// Add an overlay stamped with the current time
    ///
    /// # Arguments
    /// * `image` - Overlay image, pre-rendered at the base image's resolution
    /// * `location` - Top-left corner on the base image
    /// * `duration_ms` - Display time after the delay; 0 displays indefinitely
    /// * `delay_ms` - Time before the overlay becomes visible; 0 is immediate
    ///
    /// # Returns
    /// The new overlay's id
    pub fn add(
        &mut self,
        image: Arc<Raster>,
        location: Point,
        duration_ms: u32,
        delay_ms: u32,
    ) -> OverlayId {
        let now = self.clock.now();
        let overlay = TimedOverlay::new(image, location, now, duration_ms, delay_ms);
        let id = overlay.id();
        let observed = overlay.status_at(now);

        log::debug!(
            "Adding {} at ({}, {}) delay={}ms duration={}ms",
            id,
            location.x,
            location.y,
            delay_ms,
            duration_ms
        );

        self.entries.push(Entry { overlay, observed });
        self.generation += 1;
        id
    }

    /// Add one overlay per image, all at the same location
    ///
    /// # Returns
    /// Ids in input order
    pub fn add_many<I>(
        &mut self,
        images: I,
        location: Point,
        duration_ms: u32,
        delay_ms: u32,
    ) -> Vec<OverlayId>
    where
        I: IntoIterator<Item = Arc<Raster>>,
    {
        images
            .into_iter()
            .map(|image| self.add(image, location, duration_ms, delay_ms))
            .collect()
    }

    /// Remove an overlay; unknown ids are ignored
    ///
    /// # Returns
    /// true if an overlay was removed
    pub fn remove(&mut self, id: OverlayId) -> bool {
        match self.entries.iter().position(|e| e.overlay.id() == id) {
            Some(index) => {
                self.entries.remove(index);
                self.generation += 1;
                log::debug!("Removed {}", id);
                true
            }
            None => false,
        }
    }

    /// Remove every listed overlay that is still present
    ///
    /// # Returns
    /// Number of overlays removed
    pub fn remove_many<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = OverlayId>,
    {
        ids.into_iter().filter(|&id| self.remove(id)).count()
    }

    /// Remove every overlay
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.generation += 1;
        }
    }

    /// Re-classify every overlay and sweep the expired ones
    ///
    /// # Returns
    /// true if any overlay changed status since the previous refresh
    pub fn refresh(&mut self) -> bool {
        let now = self.clock.now();
        self.refresh_at(now)
    }

    /// Re-classify every overlay against `now` and sweep the expired ones
    ///
    /// Callers that also report statuses pass the same instant so the
    /// classification and the report agree.
    pub fn refresh_at(&mut self, now: Instant) -> bool {
        let mut changed = false;

        for entry in &mut self.entries {
            let status = entry.overlay.status_at(now);
            if status != entry.observed {
                entry.observed = status;
                changed = true;
            }
        }

        if changed {
            let before = self.entries.len();
            self.entries.retain(|e| e.observed != OverlayStatus::Expired);
            let swept = before - self.entries.len();
            if swept > 0 {
                log::trace!("Swept {} expired overlay(s)", swept);
            }
            self.generation += 1;
        }

        changed
    }

    /// Live overlays in insertion order (later entries draw on top)
    ///
    /// Refreshes first, so expired overlays are swept and newly live ones
    /// included.
    pub fn live_overlays(&mut self) -> impl Iterator<Item = &TimedOverlay> + '_ {
        self.refresh();
        self.visible()
    }

    /// Live overlays as classified at `now`
    pub fn live_overlays_at(&mut self, now: Instant) -> impl Iterator<Item = &TimedOverlay> + '_ {
        self.refresh_at(now);
        self.visible()
    }

    /// Overlays classified Live as of the last refresh, in insertion order
    ///
    /// Does not consult the clock; pair with `refresh` to get a consistent
    /// view for one composite pass.
    pub fn visible(&self) -> impl Iterator<Item = &TimedOverlay> + '_ {
        self.entries
            .iter()
            .filter(|e| e.observed == OverlayStatus::Live)
            .map(|e| &e.overlay)
    }

    /// Current status of an overlay, or `None` if it is not in the set
    ///
    /// An overlay that has expired but not yet been swept reports `Expired`.
    pub fn status(&self, id: OverlayId) -> Option<OverlayStatus> {
        let now = self.clock.now();
        self.entries
            .iter()
            .find(|e| e.overlay.id() == id)
            .map(|e| e.overlay.status_at(now))
    }

    /// Summaries of every overlay still held, in insertion order
    pub fn infos(&self) -> Vec<OverlayInfo> {
        let now = self.clock.now();
        self.entries.iter().map(|e| e.overlay.info_at(now)).collect()
    }

    /// Number of overlays held, including pending and unswept expired ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counter that changes whenever the visible set may have changed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
