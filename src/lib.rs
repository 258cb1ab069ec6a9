// NES Shell Library
// Display surfaces, overlay compositing and input bindings for an NES emulator front end

// Public modules
pub mod areas;
pub mod compositor;
pub mod config;
pub mod emulator;
pub mod frames;
pub mod geometry;
pub mod input;
pub mod notify;
pub mod overlay;
pub mod raster;
pub mod shell;
pub mod surface;
pub mod util;

// Re-export main types for convenience
pub use areas::{AreaError, AreaTable, ControllerArea, EmulatorArea, HitTester, Region};
pub use compositor::{Compositor, CompositorError};
pub use config::ConfigError;
pub use emulator::{ControllerPort, ControllerState, EmulatorCore, EmulatorState, RomError};
pub use frames::{frame_channel, FrameError, FrameReceiver, FrameSender, StaticNoise};
pub use geometry::{fit_rect, Point, Rect, Size};
pub use input::{Button, InputConfig, KeyboardHandler, Player, TouchPhase, TouchTracker};
pub use notify::{RedrawEvent, RedrawHub, SubscriptionId};
pub use overlay::{
    Clock, ManualClock, OverlayId, OverlayInfo, OverlayScheduler, OverlayStatus, SystemClock,
    TimedOverlay,
};
pub use raster::{Color, FrameConverter, ImageError, Raster};
pub use shell::{EmulatorShell, ShellConfig, ShellError, ShellSkins};
pub use surface::LayeredSurface;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Shared state types must be usable across threads
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Compositor>();
        assert_send_sync::<LayeredSurface>();
        assert_send_sync::<RedrawHub>();
        assert_send_sync::<FrameSender>();
    }
}
