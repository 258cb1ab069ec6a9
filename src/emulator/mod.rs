// Emulator contract - What the shell needs from an NES core
//
// The core itself (CPU, PPU, APU, cartridge handling) lives elsewhere. The
// shell drives it through EmulatorCore and receives frames through the
// hand-off queue in crate::frames; a core is handed the FrameSender when it
// is constructed.

use crate::input::{Button, Player};
use std::error::Error;

/// Error returned by a core that rejects a ROM image
pub type RomError = Box<dyn Error + Send + Sync>;

/// Run state of an emulator core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmulatorState {
    Stopped,
    Running,
    Paused,
}

/// Button input of one controller
pub trait ControllerPort {
    fn button_press(&mut self, button: Button);
    fn button_release(&mut self, button: Button);
}

/// Control surface of an emulator core
pub trait EmulatorCore {
    /// Power on and begin producing frames
    fn start(&mut self);

    /// Power off; frames stop
    fn stop(&mut self);

    fn pause(&mut self);

    fn unpause(&mut self);

    /// Insert a ROM image
    ///
    /// # Arguments
    /// * `rom` - Raw ROM bytes, passed through uninterpreted
    fn load_rom(&mut self, rom: &[u8]) -> Result<(), RomError>;

    fn state(&self) -> EmulatorState;

    /// Controller plugged into the given port
    fn controller(&mut self, player: Player) -> &mut dyn ControllerPort;
}

/// Plain record of which buttons are held
///
/// Usable as a ControllerPort by cores that poll their input once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub button_a: bool,
    pub button_b: bool,
    pub select: bool,
    pub start: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ControllerState {
    /// Create a controller state with all buttons released
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, button: Button) -> &mut bool {
        match button {
            Button::A => &mut self.button_a,
            Button::B => &mut self.button_b,
            Button::Select => &mut self.select,
            Button::Start => &mut self.start,
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        match button {
            Button::A => self.button_a,
            Button::B => self.button_b,
            Button::Select => self.select,
            Button::Start => self.start,
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Left => self.left,
            Button::Right => self.right,
        }
    }

    /// Held buttons packed in NES shift-register order (A in bit 0 .. Right in bit 7)
    pub fn bits(&self) -> u8 {
        Button::ALL
            .iter()
            .enumerate()
            .filter(|&(_, &button)| self.is_pressed(button))
            .fold(0u8, |acc, (bit, _)| acc | (1 << bit))
    }
}

impl ControllerPort for ControllerState {
    fn button_press(&mut self, button: Button) {
        *self.slot(button) = true;
    }

    fn button_release(&mut self, button: Button) {
        *self.slot(button) = false;
    }
}
