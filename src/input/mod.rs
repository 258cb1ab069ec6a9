// Input module - Keyboard and touch bindings for the NES controllers
//
// This module provides:
// - Button and Player identifiers shared with the emulator contract
// - Keyboard mappings for both players, loadable from TOML
// - Touch tracking against the on-screen controller surface

pub mod config;
pub mod keyboard;
pub mod touch;

pub use config::{InputConfig, KeyboardMappingConfig};
pub use keyboard::{ButtonEdge, KeyboardHandler, KeyboardMapping};
pub use touch::{TouchOutcome, TouchPhase, TouchTracker};

/// Represents which player's controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Player 1
    One,
    /// Player 2
    Two,
}

/// NES controller button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// A button
    A,
    /// B button
    B,
    /// Select button
    Select,
    /// Start button
    Start,
    /// Up on D-pad
    Up,
    /// Down on D-pad
    Down,
    /// Left on D-pad
    Left,
    /// Right on D-pad
    Right,
}

impl Button {
    /// Every button, in controller shift-register order
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];
}
