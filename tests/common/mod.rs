// Common test utilities for compositor and shell integration tests
//
// Deterministic clocks, solid test images and a scripted emulator core.

#![allow(dead_code)]

use nes_shell::frames::{FrameSender, FRAME_SIZE};
use nes_shell::{
    Button, Color, Compositor, ControllerPort, EmulatorCore, EmulatorState, ManualClock, Player,
    Raster, RomError,
};
use std::sync::Arc;

pub const RED: Color = Color::rgba(0xFF, 0, 0, 0xFF);
pub const GREEN: Color = Color::rgba(0, 0xFF, 0, 0xFF);
pub const BLUE: Color = Color::rgba(0, 0, 0xFF, 0xFF);

/// Solid image of the given size
pub fn solid(width: u32, height: u32, color: Color) -> Raster {
    Raster::filled(width, height, color)
}

/// Compositor over a black base, driven by a manual clock
pub fn compositor(width: u32, height: u32) -> (Compositor, ManualClock) {
    let clock = ManualClock::new();
    let compositor = Compositor::with_clock(
        solid(width, height, Color::BLACK),
        Arc::new(clock.clone()),
    );
    (compositor, clock)
}

/// An index frame filled with one palette entry
pub fn index_frame(palette_index: u8) -> Vec<u8> {
    vec![palette_index; FRAME_SIZE]
}

/// Button edge recorded by a scripted controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Press(Button),
    Release(Button),
}

#[derive(Debug, Default)]
pub struct RecordingController {
    pub edges: Vec<Edge>,
}

impl ControllerPort for RecordingController {
    fn button_press(&mut self, button: Button) {
        self.edges.push(Edge::Press(button));
    }

    fn button_release(&mut self, button: Button) {
        self.edges.push(Edge::Release(button));
    }
}

/// Emulator core that records calls and emits frames only when asked
pub struct ScriptedCore {
    pub frames: FrameSender,
    pub state: EmulatorState,
    pub roms: Vec<Vec<u8>>,
    pub players: [RecordingController; 2],
}

impl ScriptedCore {
    pub fn new(frames: FrameSender) -> Self {
        ScriptedCore {
            frames,
            state: EmulatorState::Stopped,
            roms: Vec::new(),
            players: [RecordingController::default(), RecordingController::default()],
        }
    }

    /// Queue a frame filled with `palette_index`
    pub fn emit(&self, palette_index: u8) {
        self.frames.send(index_frame(palette_index)).unwrap();
    }
}

impl EmulatorCore for ScriptedCore {
    fn start(&mut self) {
        self.state = EmulatorState::Running;
    }

    fn stop(&mut self) {
        self.state = EmulatorState::Stopped;
    }

    fn pause(&mut self) {
        self.state = EmulatorState::Paused;
    }

    fn unpause(&mut self) {
        self.state = EmulatorState::Running;
    }

    fn load_rom(&mut self, rom: &[u8]) -> Result<(), RomError> {
        if rom.is_empty() {
            return Err("empty ROM".into());
        }
        self.roms.push(rom.to_vec());
        Ok(())
    }

    fn state(&self) -> EmulatorState {
        self.state
    }

    fn controller(&mut self, player: Player) -> &mut dyn ControllerPort {
        match player {
            Player::One => &mut self.players[0],
            Player::Two => &mut self.players[1],
        }
    }
}
