// Overlay module - Timed overlays and their scheduling
//
// This module provides:
// - Clock abstraction (system time or manually advanced)
// - TimedOverlay with Pending / Live / Expired classification
// - OverlayScheduler owning the ordered overlay set of one image

pub mod clock;
pub mod scheduler;
pub mod timed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::OverlayScheduler;
pub use timed::{OverlayId, OverlayInfo, OverlayStatus, TimedOverlay};
