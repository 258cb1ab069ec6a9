// Keyboard input mapping module
//
// Maps physical keys to NES controller buttons for Player 1 and Player 2 and
// turns key events into button press/release edges.

use super::{Button, Player};
use std::collections::HashSet;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard mapping configuration for a single player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMapping {
    /// Key for A button
    pub button_a: KeyCode,
    /// Key for B button
    pub button_b: KeyCode,
    /// Key for Select button
    pub select: KeyCode,
    /// Key for Start button
    pub start: KeyCode,
    /// Key for Up on D-pad
    pub up: KeyCode,
    /// Key for Down on D-pad
    pub down: KeyCode,
    /// Key for Left on D-pad
    pub left: KeyCode,
    /// Key for Right on D-pad
    pub right: KeyCode,
}

impl KeyboardMapping {
    /// Create default keyboard mapping for Player 1
    ///
    /// # Default Mappings
    /// - Arrow keys: D-pad
    /// - X: A button
    /// - Z: B button
    /// - Enter: Start
    /// - Right Shift: Select
    pub fn player1_default() -> Self {
        Self {
            button_a: KeyCode::KeyX,
            button_b: KeyCode::KeyZ,
            select: KeyCode::ShiftRight,
            start: KeyCode::Enter,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
        }
    }

    /// Create default keyboard mapping for Player 2
    ///
    /// # Default Mappings
    /// - WASD: D-pad
    /// - K: A button
    /// - J: B button
    /// - Y: Start
    /// - U: Select
    pub fn player2_default() -> Self {
        Self {
            button_a: KeyCode::KeyK,
            button_b: KeyCode::KeyJ,
            select: KeyCode::KeyU,
            start: KeyCode::KeyY,
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
        }
    }

    /// Get the button for a given key code
    ///
    /// # Returns
    /// Some(Button) if the key is mapped to a button, None otherwise
    pub fn get_button(&self, key: KeyCode) -> Option<Button> {
        Button::ALL
            .iter()
            .copied()
            .find(|&button| self.key_for(button) == key)
    }

    /// Key bound to `button`
    pub fn key_for(&self, button: Button) -> KeyCode {
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
}

/// A button changing state on one controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    pub player: Player,
    pub button: Button,
    pub pressed: bool,
}

/// Keyboard input handler for NES controllers
///
/// Tracks held keys so that auto-repeat press events and releases of keys
/// that were never pressed do not produce edges. When a key is bound for
/// both players, Player 1 wins.
pub struct KeyboardHandler {
    /// Keyboard mapping for Player 1
    player1_mapping: KeyboardMapping,
    /// Keyboard mapping for Player 2
    player2_mapping: KeyboardMapping,
    /// Set of currently pressed keys
    pressed_keys: HashSet<KeyCode>,
}

impl KeyboardHandler {
    /// Create a new keyboard handler with default mappings
    pub fn new() -> Self {
        Self::with_mappings(
            KeyboardMapping::player1_default(),
            KeyboardMapping::player2_default(),
        )
    }

    /// Create a keyboard handler with custom mappings
    ///
    /// # Arguments
    /// * `player1_mapping` - Keyboard mapping for Player 1
    /// * `player2_mapping` - Keyboard mapping for Player 2
    pub fn with_mappings(
        player1_mapping: KeyboardMapping,
        player2_mapping: KeyboardMapping,
    ) -> Self {
        Self {
            player1_mapping,
            player2_mapping,
            pressed_keys: HashSet::new(),
        }
    }

    fn resolve(&self, key: KeyCode) -> Option<(Player, Button)> {
        self.player1_mapping
            .get_button(key)
            .map(|b| (Player::One, b))
            .or_else(|| self.player2_mapping.get_button(key).map(|b| (Player::Two, b)))
    }

    /// Handle a key event
    ///
    /// # Arguments
    /// * `physical_key` - The physical key
    /// * `pressed` - true for a press, false for a release
    ///
    /// # Returns
    /// The controller edge the event causes, if any
    pub fn handle_key(&mut self, physical_key: PhysicalKey, pressed: bool) -> Option<ButtonEdge> {
        let PhysicalKey::Code(key_code) = physical_key else {
            return None;
        };

        let changed = if pressed {
            self.pressed_keys.insert(key_code)
        } else {
            self.pressed_keys.remove(&key_code)
        };
        if !changed {
            return None;
        }

        self.resolve(key_code).map(|(player, button)| ButtonEdge {
            player,
            button,
            pressed,
        })
    }

    /// Check if a button is held for a given player
    pub fn is_button_pressed(&self, player: Player, button: Button) -> bool {
        self.pressed_keys
            .iter()
            .any(|&key| self.resolve(key) == Some((player, button)))
    }

    /// Forget every held key
    ///
    /// # Returns
    /// Release edges for the buttons that were held
    pub fn release_all(&mut self) -> Vec<ButtonEdge> {
        let keys: Vec<KeyCode> = self.pressed_keys.drain().collect();
        keys.into_iter()
            .filter_map(|key| self.resolve(key))
            .map(|(player, button)| ButtonEdge {
                player,
                button,
                pressed: false,
            })
            .collect()
    }

    /// Get keyboard mapping for Player 1
    pub fn player1_mapping(&self) -> &KeyboardMapping {
        &self.player1_mapping
    }

    /// Get keyboard mapping for Player 2
    pub fn player2_mapping(&self) -> &KeyboardMapping {
        &self.player2_mapping
    }

    /// Set keyboard mapping for Player 1
    pub fn set_player1_mapping(&mut self, mapping: KeyboardMapping) {
        self.player1_mapping = mapping;
    }

    /// Set keyboard mapping for Player 2
    pub fn set_player2_mapping(&mut self, mapping: KeyboardMapping) {
        self.player2_mapping = mapping;
    }
}

impl Default for KeyboardHandler {
    fn default() -> Self {
        Self::new()
    }
}
