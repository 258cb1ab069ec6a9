// Timed Overlay - A positioned image with an optional display delay and duration
//
// Status is derived from the creation instant and the current time:
//   Pending  now < created + delay
//   Expired  duration > 0 and now > created + delay + duration
//   Live     otherwise

use crate::geometry::Point;
use crate::raster::Raster;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

static NEXT_OVERLAY_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque unique overlay handle
///
/// Ids are unique across every scheduler in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    pub(crate) fn next() -> Self {
        OverlayId(NEXT_OVERLAY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for logging
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// Time-derived state of an overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayStatus {
    /// Waiting for its display delay to elapse
    Pending,
    /// Drawn on the composite
    Live,
    /// Display duration elapsed; eligible for removal
    Expired,
}

/// An image drawn over a base image for a window of time
#[derive(Debug, Clone)]
pub struct TimedOverlay {
    id: OverlayId,
    image: Arc<Raster>,
    location: Point,
    created_at: Instant,
    delay_ms: u32,
    duration_ms: u32,
}

impl TimedOverlay {
    /// Create an overlay stamped with `created_at`
    ///
    /// # Arguments
    /// * `image` - Pre-rendered overlay image at the base image's resolution
    /// * `location` - Top-left corner on the base image
    /// * `created_at` - Creation instant taken from the owning scheduler's clock
    /// * `duration_ms` - Display time after the delay; 0 displays indefinitely
    /// * `delay_ms` - Time before the overlay becomes visible; 0 is immediate
    pub fn new(
        image: Arc<Raster>,
        location: Point,
        created_at: Instant,
        duration_ms: u32,
        delay_ms: u32,
    ) -> Self {
        TimedOverlay {
            id: OverlayId::next(),
            image,
            location,
            created_at,
            delay_ms,
            duration_ms,
        }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn image(&self) -> &Arc<Raster> {
        &self.image
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Instant the overlay becomes visible
    pub fn visible_from(&self) -> Instant {
        self.created_at + Duration::from_millis(self.delay_ms as u64)
    }

    /// Last instant the overlay is visible, or `None` if it never expires
    pub fn visible_until(&self) -> Option<Instant> {
        if self.duration_ms == 0 {
            None
        } else {
            Some(self.visible_from() + Duration::from_millis(self.duration_ms as u64))
        }
    }

    /// Classify the overlay at `now`
    pub fn status_at(&self, now: Instant) -> OverlayStatus {
        if now < self.visible_from() {
            return OverlayStatus::Pending;
        }

        match self.visible_until() {
            Some(until) if now > until => OverlayStatus::Expired,
            _ => OverlayStatus::Live,
        }
    }

    /// Read-only summary of this overlay at `now`
    pub fn info_at(&self, now: Instant) -> OverlayInfo {
        OverlayInfo {
            id: self.id,
            location: self.location,
            width: self.image.width(),
            height: self.image.height(),
            status: self.status_at(now),
        }
    }
}

/// Snapshot of an overlay handed out by the compositor
///
/// Carries no image reference so callers cannot reach into compositor state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayInfo {
    pub id: OverlayId,
    pub location: Point,
    pub width: u32,
    pub height: u32,
    pub status: OverlayStatus,
}
