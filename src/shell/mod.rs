// Emulator Shell - Glue between an emulator core and the three display surfaces
//
// The shell owns:
// - the emulator core and the receiving end of its frame queue
// - console, emulator and controller surfaces (compositor + areas each)
// - keyboard and touch bindings feeding the core's controllers
// - the redraw hub telling the presentation layer what to repaint
//
// Frames are pulled, not pushed: the presentation layer's refresh tick calls
// pump_frames(), which converts the newest queued frame and makes it the
// emulator surface's base image. While the core is stopped each tick draws a
// new frame of television static instead.

mod config;

pub use config::{
    AssetConfig, DisplayConfig, OverlayConfig, ShellConfig, SnapshotConfig, CONFIG_FILE,
};

use crate::areas::{AreaError, AreaTable, ControllerArea, EmulatorArea, Region};
use crate::compositor::CompositorError;
use crate::emulator::{EmulatorCore, EmulatorState, RomError};
use crate::frames::{FrameError, FrameReceiver, StaticNoise, FRAME_HEIGHT, FRAME_WIDTH};
use crate::geometry::{Point, Size};
use crate::input::{ButtonEdge, InputConfig, KeyboardHandler, Player, TouchOutcome, TouchPhase, TouchTracker};
use crate::notify::{RedrawEvent, RedrawHub, SubscriptionId};
use crate::overlay::{Clock, OverlayId, SystemClock};
use crate::raster::{self, Color, FrameConverter, ImageError, Raster};
use crate::surface::LayeredSurface;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use winit::keyboard::PhysicalKey;

/// Errors surfaced by shell operations
#[derive(Debug)]
pub enum ShellError {
    /// Skin image load or snapshot write failed
    Image(ImageError),

    /// Area table load failed
    Area(AreaError),

    /// Keyboard configuration was invalid
    Config(crate::config::ConfigError),

    /// The core rejected a ROM
    Rom(RomError),

    /// The frame queue failed
    Frame(FrameError),

    /// A converted frame did not fit the emulator surface
    Compositor(CompositorError),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::Image(e) => write!(f, "Image error: {}", e),
            ShellError::Area(e) => write!(f, "Area table error: {}", e),
            ShellError::Config(e) => write!(f, "Configuration error: {}", e),
            ShellError::Rom(e) => write!(f, "ROM rejected: {}", e),
            ShellError::Frame(e) => write!(f, "Frame error: {}", e),
            ShellError::Compositor(e) => write!(f, "Compositor error: {}", e),
        }
    }
}

impl std::error::Error for ShellError {}

impl From<ImageError> for ShellError {
    fn from(e: ImageError) -> Self {
        ShellError::Image(e)
    }
}

impl From<AreaError> for ShellError {
    fn from(e: AreaError) -> Self {
        ShellError::Area(e)
    }
}

impl From<crate::config::ConfigError> for ShellError {
    fn from(e: crate::config::ConfigError) -> Self {
        ShellError::Config(e)
    }
}

impl From<FrameError> for ShellError {
    fn from(e: FrameError) -> Self {
        ShellError::Frame(e)
    }
}

impl From<CompositorError> for ShellError {
    fn from(e: CompositorError) -> Self {
        ShellError::Compositor(e)
    }
}

/// Base images and area tables for the console and controller surfaces
#[derive(Debug, Clone)]
pub struct ShellSkins {
    pub console: Raster,
    pub controller: Raster,
    pub controller_areas: AreaTable,
}

impl ShellSkins {
    /// Plain placeholder skins
    ///
    /// The controller placeholder is just large enough to hold the built-in
    /// controller areas with equal margins on both sides.
    pub fn placeholder() -> Self {
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (f32::MAX, f32::MAX, 0.0f32, 0.0f32);
        for area in ControllerArea::ALL {
            let r = area.rect();
            min_x = min_x.min(r.left);
            min_y = min_y.min(r.top);
            max_x = max_x.max(r.right);
            max_y = max_y.max(r.bottom);
        }
        let width = (max_x + min_x).ceil() as u32;
        let height = (max_y + min_y).ceil() as u32;

        let controller = Raster::filled(width, height, Color::rgba(0x40, 0x40, 0x40, 0xFF));
        ShellSkins {
            console: Raster::filled(FRAME_WIDTH as u32, FRAME_HEIGHT as u32, Color::BLACK),
            controller_areas: AreaTable::from_regions::<ControllerArea>(controller.size()),
            controller,
        }
    }

    /// Load skins named in `assets`, with placeholders for missing entries
    pub fn load(assets: &AssetConfig) -> Result<Self, ShellError> {
        let fallback = Self::placeholder();

        let console = match &assets.console_image {
            Some(path) => raster::load_png(path)?,
            None => fallback.console,
        };
        let controller = match &assets.controller_image {
            Some(path) => raster::load_png(path)?,
            None => fallback.controller,
        };
        let controller_areas = match &assets.controller_areas {
            Some(path) => AreaTable::load_json(path)?,
            None => AreaTable::from_regions::<ControllerArea>(controller.size()),
        };

        Ok(ShellSkins {
            console,
            controller,
            controller_areas,
        })
    }
}

/// View-model of the emulator page
pub struct EmulatorShell<E: EmulatorCore> {
    emulator: E,
    frames: FrameReceiver,
    converter: FrameConverter,
    noise: StaticNoise,
    console: LayeredSurface,
    screen: LayeredSurface,
    controller: LayeredSurface,
    keyboard: KeyboardHandler,
    touch: TouchTracker,
    redraw: Arc<RedrawHub>,
    config: ShellConfig,
}

impl<E: EmulatorCore> EmulatorShell<E> {
    /// Create a shell with the system clock and default keyboard bindings
    pub fn new(emulator: E, frames: FrameReceiver, skins: ShellSkins, config: ShellConfig) -> Self {
        Self::with_clock(emulator, frames, skins, config, Arc::new(SystemClock))
    }

    /// Create a shell whose overlays read time from `clock`
    pub fn with_clock(
        emulator: E,
        frames: FrameReceiver,
        skins: ShellSkins,
        config: ShellConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let density = config.display.pixel_density;
        let console_areas = AreaTable::new(skins.console.size());
        let screen_base = Raster::filled(FRAME_WIDTH as u32, FRAME_HEIGHT as u32, Color::BLACK);
        let screen_areas = AreaTable::from_regions::<EmulatorArea>(screen_base.size());

        let touch = TouchTracker::new(
            config.overlays.press_highlight_color(),
            config.overlays.press_highlight_ms,
        );

        let mut shell = EmulatorShell {
            emulator,
            frames,
            converter: FrameConverter::new(),
            noise: StaticNoise::new(),
            console: LayeredSurface::with_clock(skins.console, console_areas, density, Arc::clone(&clock)),
            screen: LayeredSurface::with_clock(screen_base, screen_areas, density, Arc::clone(&clock)),
            controller: LayeredSurface::with_clock(skins.controller, skins.controller_areas, density, clock),
            keyboard: KeyboardHandler::new(),
            touch,
            redraw: Arc::new(RedrawHub::new()),
            config,
        };
        shell.show_static();
        shell
    }

    /// Create a shell from a configuration, loading its skins and key bindings
    pub fn from_config(
        emulator: E,
        frames: FrameReceiver,
        config: ShellConfig,
        input: &InputConfig,
    ) -> Result<Self, ShellError> {
        let skins = ShellSkins::load(&config.assets)?;
        let (player1, player2) = input.mappings()?;
        let mut shell = Self::new(emulator, frames, skins, config);
        shell.keyboard = KeyboardHandler::with_mappings(player1, player2);
        Ok(shell)
    }

    /// Replace the static generator, e.g. with a seeded one
    pub fn with_noise(mut self, noise: StaticNoise) -> Self {
        self.noise = noise;
        self
    }

    /// Start the core
    pub fn power_on(&mut self) {
        if self.emulator.state() != EmulatorState::Stopped {
            return;
        }
        self.emulator.start();
        log::info!("Emulator powered on");
        self.redraw.publish(RedrawEvent::Console);
    }

    /// Stop the core and return the screen to static
    pub fn power_off(&mut self) {
        if self.emulator.state() == EmulatorState::Stopped {
            return;
        }
        self.emulator.stop();
        self.release_all_inputs();

        // Frames produced before the stop are stale
        match self.frames.latest() {
            Ok((_, dropped)) if dropped > 0 => log::debug!("Discarded {} stale frame(s)", dropped),
            _ => {}
        }

        log::info!("Emulator powered off");
        self.redraw.publish(RedrawEvent::Console);
        self.show_static();
    }

    /// Pause a running core or resume a paused one
    ///
    /// # Returns
    /// The core's state afterwards
    pub fn toggle_pause(&mut self) -> EmulatorState {
        match self.emulator.state() {
            EmulatorState::Running => {
                self.emulator.pause();
                log::info!("Emulator paused");
            }
            EmulatorState::Paused => {
                self.emulator.unpause();
                log::info!("Emulator resumed");
            }
            EmulatorState::Stopped => {}
        }
        self.emulator.state()
    }

    /// Hand a ROM image to the core
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), ShellError> {
        self.emulator.load_rom(rom).map_err(ShellError::Rom)?;
        log::info!("Loaded ROM ({} bytes)", rom.len());
        Ok(())
    }

    /// Refresh the emulator surface for one display tick
    ///
    /// While the core runs, the newest queued frame is shown and older ones
    /// are dropped. While it is stopped, queued frames are discarded and a
    /// fresh frame of static is drawn instead.
    ///
    /// # Returns
    /// true if the emulator surface was redrawn
    pub fn pump_frames(&mut self) -> Result<bool, ShellError> {
        let stopped = self.emulator.state() == EmulatorState::Stopped;
        let (frame, dropped) = match self.frames.latest() {
            Ok(latest) => latest,
            Err(FrameError::Disconnected) if stopped => (None, 0),
            Err(e) => return Err(e.into()),
        };

        if stopped {
            if frame.is_some() {
                log::debug!("Ignoring {} frame(s) received while stopped", dropped + 1);
            }
            return Ok(self.show_static());
        }

        if dropped >= self.config.display.frame_queue_warn_depth {
            log::warn!("Dropped {} queued frame(s)", dropped);
        }

        let Some(frame) = frame else {
            return Ok(false);
        };
        self.present_frame(&frame)?;
        Ok(true)
    }

    /// Fill the emulator surface with static if the core is stopped
    ///
    /// # Returns
    /// true if static was drawn
    pub fn show_static(&mut self) -> bool {
        if self.emulator.state() != EmulatorState::Stopped {
            return false;
        }
        let frame = self.noise.frame();
        match self.present_frame(&frame) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not show static: {}", e);
                false
            }
        }
    }

    fn present_frame(&mut self, frame: &[u8]) -> Result<(), ShellError> {
        let image = self.converter.convert(frame)?;
        self.screen.set_base_image(image)?;
        self.redraw.publish(RedrawEvent::Emulator);
        Ok(())
    }

    /// Show a message banner across the middle of the emulator screen
    ///
    /// # Arguments
    /// * `image` - Banner image, at most 256×40 to stay inside the banner strip
    pub fn show_banner(&self, image: Raster) -> OverlayId {
        let origin = self
            .screen
            .area_rect(EmulatorArea::CenterBanner.id())
            .map(|r| r.origin())
            .unwrap_or(Point::ORIGIN);
        let id = self
            .screen
            .compositor()
            .add_overlay(image, origin, self.config.overlays.banner_ms, 0);
        self.redraw.publish(RedrawEvent::Emulator);
        id
    }

    /// Route a touch on the controller surface to Player 1
    pub fn handle_touch(&mut self, touch_id: u64, phase: TouchPhase, point: Point) -> TouchOutcome {
        let outcome = self.touch.handle(
            touch_id,
            phase,
            point,
            &self.controller,
            self.emulator.controller(Player::One),
        );
        if outcome.changed() {
            self.redraw.publish(RedrawEvent::Controller);
        }
        outcome
    }

    /// Route a key event to the mapped player's controller
    pub fn handle_key(&mut self, key: PhysicalKey, pressed: bool) -> Option<ButtonEdge> {
        let edge = self.keyboard.handle_key(key, pressed)?;
        self.apply_edge(edge);
        Some(edge)
    }

    fn apply_edge(&mut self, edge: ButtonEdge) {
        let port = self.emulator.controller(edge.player);
        if edge.pressed {
            port.button_press(edge.button);
        } else {
            port.button_release(edge.button);
        }
    }

    fn release_all_inputs(&mut self) {
        for edge in self.keyboard.release_all() {
            self.apply_edge(edge);
        }
        self.touch
            .release_all(&self.controller, self.emulator.controller(Player::One));
        self.redraw.publish(RedrawEvent::Controller);
    }

    /// Rescale all surfaces' areas; sizes are in device pixels
    pub fn resize(&self, console: Size, screen: Size, controller: Size) {
        self.console.resize(console);
        self.screen.resize(screen);
        self.controller.resize(controller);
    }

    /// Show the controller areas for debugging
    pub fn show_controller_areas(&self, which: Option<ControllerArea>) -> OverlayId {
        let id = self.controller.show_areas(
            which.map(Region::id),
            self.config.overlays.area_debug_color(),
        );
        self.redraw.publish(RedrawEvent::Controller);
        id
    }

    /// Save the current emulator composite as a PNG
    ///
    /// # Returns
    /// Path of the written file
    pub fn snapshot(&self) -> Result<PathBuf, ShellError> {
        let image = self.screen.get_image();
        let path = raster::save_snapshot(
            &image,
            &self.config.snapshots.directory,
            "snapshot",
            self.config.snapshots.include_timestamp,
        )?;
        log::info!("Snapshot saved to {}", path.display());
        Ok(path)
    }

    /// Register for redraw events
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(RedrawEvent) + Send + Sync + 'static,
    {
        self.redraw.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.redraw.unsubscribe(id)
    }

    pub fn redraw_hub(&self) -> &Arc<RedrawHub> {
        &self.redraw
    }

    pub fn console(&self) -> &LayeredSurface {
        &self.console
    }

    pub fn screen(&self) -> &LayeredSurface {
        &self.screen
    }

    pub fn controller(&self) -> &LayeredSurface {
        &self.controller
    }

    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut E {
        &mut self.emulator
    }

    pub fn state(&self) -> EmulatorState {
        self.emulator.state()
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }
}
