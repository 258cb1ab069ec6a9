// Input configuration module
//
// Saves and loads keyboard mappings to/from TOML files. Keys are stored by
// their winit KeyCode names ("KeyX", "ArrowUp", ...).

use super::KeyboardMapping;
use crate::config::{self, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use winit::keyboard::KeyCode;

/// Serializable keyboard button mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardMappingConfig {
    /// Key for A button (as string, e.g., "KeyX")
    pub button_a: String,
    /// Key for B button
    pub button_b: String,
    /// Key for Select button
    pub select: String,
    /// Key for Start button
    pub start: String,
    /// Key for Up on D-pad
    pub up: String,
    /// Key for Down on D-pad
    pub down: String,
    /// Key for Left on D-pad
    pub left: String,
    /// Key for Right on D-pad
    pub right: String,
}

impl KeyboardMappingConfig {
    /// Create default keyboard mapping for Player 1
    pub fn player1_default() -> Self {
        Self::from_keyboard_mapping(&KeyboardMapping::player1_default())
    }

    /// Create default keyboard mapping for Player 2
    pub fn player2_default() -> Self {
        Self::from_keyboard_mapping(&KeyboardMapping::player2_default())
    }

    /// Convert to runtime KeyboardMapping
    pub fn to_keyboard_mapping(&self) -> Result<KeyboardMapping, ConfigError> {
        Ok(KeyboardMapping {
            button_a: string_to_keycode(&self.button_a)?,
            button_b: string_to_keycode(&self.button_b)?,
            select: string_to_keycode(&self.select)?,
            start: string_to_keycode(&self.start)?,
            up: string_to_keycode(&self.up)?,
            down: string_to_keycode(&self.down)?,
            left: string_to_keycode(&self.left)?,
            right: string_to_keycode(&self.right)?,
        })
    }

    /// Create from runtime KeyboardMapping
    pub fn from_keyboard_mapping(mapping: &KeyboardMapping) -> Self {
        Self {
            button_a: keycode_to_string(mapping.button_a),
            button_b: keycode_to_string(mapping.button_b),
            select: keycode_to_string(mapping.select),
            start: keycode_to_string(mapping.start),
            up: keycode_to_string(mapping.up),
            down: keycode_to_string(mapping.down),
            left: keycode_to_string(mapping.left),
            right: keycode_to_string(mapping.right),
        }
    }
}

/// Keyboard configuration for both players
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Keyboard mapping for Player 1
    pub keyboard_player1: KeyboardMappingConfig,
    /// Keyboard mapping for Player 2
    pub keyboard_player2: KeyboardMappingConfig,
}

impl InputConfig {
    /// Create a new input configuration with default mappings
    pub fn new() -> Self {
        Self {
            keyboard_player1: KeyboardMappingConfig::player1_default(),
            keyboard_player2: KeyboardMappingConfig::player2_default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        config::load_toml(path)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        config::save_toml(self, path)
    }

    /// Try to load configuration from file, or create default if it doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        config::load_toml_or_default(path)
    }

    /// Runtime mappings for Player 1 and Player 2
    pub fn mappings(&self) -> Result<(KeyboardMapping, KeyboardMapping), ConfigError> {
        Ok((
            self.keyboard_player1.to_keyboard_mapping()?,
            self.keyboard_player2.to_keyboard_mapping()?,
        ))
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert KeyCode to string representation
fn keycode_to_string(key: KeyCode) -> String {
    format!("{:?}", key)
}

/// Convert string to KeyCode
fn string_to_keycode(s: &str) -> Result<KeyCode, ConfigError> {
    let key = match s {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Enter" => KeyCode::Enter,
        "Space" => KeyCode::Space,
        "Tab" => KeyCode::Tab,
        "Escape" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        _ => return Err(ConfigError::InvalidKey(s.to_string())),
    };
    Ok(key)
}
