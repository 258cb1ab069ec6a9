// Touch input - Drives controller buttons from touches on the controller surface
//
// Each touch id is tracked separately. A touch holds at most one button at a
// time; sliding onto another button releases the old one and presses the new
// one. A button held by several touches is released only when the last of
// them lifts. Pressing adds a highlight overlay over the touched area, which
// is removed again on release.

use super::Button;
use crate::areas::{ControllerArea, Region};
use crate::emulator::ControllerPort;
use crate::geometry::Point;
use crate::overlay::OverlayId;
use crate::raster::Color;
use crate::surface::LayeredSurface;
use std::collections::HashMap;

/// Phase of a touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Pressed,
    Moved,
    Released,
    Cancelled,
}

/// Button changes caused by one touch event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchOutcome {
    pub released: Option<Button>,
    pub pressed: Option<Button>,
}

impl TouchOutcome {
    /// True if the event pressed or released a button
    pub fn changed(&self) -> bool {
        self.released.is_some() || self.pressed.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    area: ControllerArea,
    highlight: Option<OverlayId>,
}

/// Tracks active touches on the controller surface
#[derive(Debug)]
pub struct TouchTracker {
    active: HashMap<u64, ActiveTouch>,
    highlight_color: Color,
    highlight_ms: u32,
}

impl TouchTracker {
    /// Create a tracker
    ///
    /// # Arguments
    /// * `highlight_color` - Tint drawn over a pressed button
    /// * `highlight_ms` - Maximum highlight time; 0 keeps it until release
    pub fn new(highlight_color: Color, highlight_ms: u32) -> Self {
        TouchTracker {
            active: HashMap::new(),
            highlight_color,
            highlight_ms,
        }
    }

    /// Handle one touch event
    ///
    /// # Arguments
    /// * `touch_id` - Identifier of the finger, stable from press to release
    /// * `phase` - Event phase
    /// * `point` - Device point on the controller surface
    /// * `surface` - Controller surface used for hit testing and highlights
    /// * `port` - Controller receiving the button edges
    pub fn handle(
        &mut self,
        touch_id: u64,
        phase: TouchPhase,
        point: Point,
        surface: &LayeredSurface,
        port: &mut dyn ControllerPort,
    ) -> TouchOutcome {
        match phase {
            TouchPhase::Pressed | TouchPhase::Moved => {
                let target = surface.hit_region::<ControllerArea>(point);
                let current = self.active.get(&touch_id).map(|t| t.area);
                if target == current {
                    return TouchOutcome::default();
                }

                let released = self.lift(touch_id, surface, port);
                let pressed = target.and_then(|area| self.press(touch_id, area, surface, port));
                TouchOutcome { released, pressed }
            }
            TouchPhase::Released | TouchPhase::Cancelled => TouchOutcome {
                released: self.lift(touch_id, surface, port),
                pressed: None,
            },
        }
    }

    /// Lift every active touch
    pub fn release_all(&mut self, surface: &LayeredSurface, port: &mut dyn ControllerPort) {
        let ids: Vec<u64> = self.active.keys().copied().collect();
        for id in ids {
            self.lift(id, surface, port);
        }
    }

    /// Buttons currently held by at least one touch
    pub fn held_buttons(&self) -> Vec<Button> {
        let mut buttons: Vec<Button> = self.active.values().map(|t| t.area.button()).collect();
        buttons.sort_by_key(|b| Button::ALL.iter().position(|x| x == b));
        buttons.dedup();
        buttons
    }

    fn is_held_by_other(&self, touch_id: u64, area: ControllerArea) -> bool {
        self.active
            .iter()
            .any(|(&id, touch)| id != touch_id && touch.area == area)
    }

    fn press(
        &mut self,
        touch_id: u64,
        area: ControllerArea,
        surface: &LayeredSurface,
        port: &mut dyn ControllerPort,
    ) -> Option<Button> {
        let already_held = self.is_held_by_other(touch_id, area);
        let highlight = surface.highlight_area(area.id(), self.highlight_color, self.highlight_ms);
        self.active.insert(touch_id, ActiveTouch { area, highlight });

        if already_held {
            return None;
        }
        log::debug!("Touch {} pressed {:?}", touch_id, area.button());
        port.button_press(area.button());
        Some(area.button())
    }

    fn lift(
        &mut self,
        touch_id: u64,
        surface: &LayeredSurface,
        port: &mut dyn ControllerPort,
    ) -> Option<Button> {
        let touch = self.active.remove(&touch_id)?;
        if let Some(id) = touch.highlight {
            surface.compositor().remove_overlay(id);
        }

        if self.is_held_by_other(touch_id, touch.area) {
            return None;
        }
        log::debug!("Touch {} released {:?}", touch_id, touch.area.button());
        port.button_release(touch.area.button());
        Some(touch.area.button())
    }
}
