// Region tables - Closed sets of named areas on the shell's images
//
// Geometry is expressed in the native pixels of the image the region lives on:
// the controller skin for ControllerArea, the 256×240 emulator frame for
// EmulatorArea.

use crate::geometry::Rect;
use crate::input::Button;

/// A closed set of named rectangles
pub trait Region: Copy + Eq + 'static {
    /// Every variant, in hit-test priority order
    const ALL: &'static [Self];

    /// Stable numeric id used as the area table key
    fn id(self) -> u32;

    /// Rectangle in native image pixels
    fn rect(self) -> Rect;

    fn from_id(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|region| region.id() == id)
    }
}

/// Touchable areas of the on-screen controller skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerArea {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    SelectButton,
    StartButton,
    AButton,
    BButton,
}

impl ControllerArea {
    /// Controller button pressed by touching this area
    pub fn button(self) -> Button {
        match self {
            ControllerArea::DPadUp => Button::Up,
            ControllerArea::DPadDown => Button::Down,
            ControllerArea::DPadLeft => Button::Left,
            ControllerArea::DPadRight => Button::Right,
            ControllerArea::SelectButton => Button::Select,
            ControllerArea::StartButton => Button::Start,
            ControllerArea::AButton => Button::A,
            ControllerArea::BButton => Button::B,
        }
    }

    /// Area that shows the given button
    pub fn for_button(button: Button) -> Self {
        match button {
            Button::Up => ControllerArea::DPadUp,
            Button::Down => ControllerArea::DPadDown,
            Button::Left => ControllerArea::DPadLeft,
            Button::Right => ControllerArea::DPadRight,
            Button::Select => ControllerArea::SelectButton,
            Button::Start => ControllerArea::StartButton,
            Button::A => ControllerArea::AButton,
            Button::B => ControllerArea::BButton,
        }
    }
}

impl Region for ControllerArea {
    const ALL: &'static [Self] = &[
        ControllerArea::DPadUp,
        ControllerArea::DPadDown,
        ControllerArea::DPadLeft,
        ControllerArea::DPadRight,
        ControllerArea::SelectButton,
        ControllerArea::StartButton,
        ControllerArea::AButton,
        ControllerArea::BButton,
    ];

    fn id(self) -> u32 {
        self as u32
    }

    fn rect(self) -> Rect {
        match self {
            ControllerArea::DPadUp => Rect::new(92.0, 80.0, 154.0, 127.0),
            ControllerArea::DPadDown => Rect::new(92.0, 179.0, 154.0, 225.0),
            ControllerArea::DPadLeft => Rect::new(49.0, 122.0, 97.0, 183.0),
            ControllerArea::DPadRight => Rect::new(150.0, 122.0, 195.0, 183.0),
            ControllerArea::SelectButton => Rect::new(258.0, 176.0, 313.0, 201.0),
            ControllerArea::StartButton => Rect::new(347.0, 176.0, 402.0, 201.0),
            ControllerArea::AButton => Rect::new(467.0, 150.0, 548.0, 228.0),
            ControllerArea::BButton => Rect::new(561.0, 150.0, 642.0, 228.0),
        }
    }
}

/// Areas of the 256×240 emulator frame used to place overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmulatorArea {
    /// Entire screen
    FullScreen,
    /// 20×20 box in the top left corner
    TopLeftFps,
    /// 20×20 box in the top right corner
    TopRightFps,
    /// 20×20 box in the bottom left corner
    BottomLeftFps,
    /// 20×20 box in the bottom right corner
    BottomRightFps,
    /// 40 pixel tall strip across the center for message banners
    CenterBanner,
}

impl Region for EmulatorArea {
    const ALL: &'static [Self] = &[
        EmulatorArea::FullScreen,
        EmulatorArea::TopLeftFps,
        EmulatorArea::TopRightFps,
        EmulatorArea::BottomLeftFps,
        EmulatorArea::BottomRightFps,
        EmulatorArea::CenterBanner,
    ];

    fn id(self) -> u32 {
        self as u32
    }

    fn rect(self) -> Rect {
        match self {
            EmulatorArea::FullScreen => Rect::new(0.0, 0.0, 256.0, 240.0),
            EmulatorArea::TopLeftFps => Rect::new(0.0, 0.0, 20.0, 20.0),
            EmulatorArea::TopRightFps => Rect::new(236.0, 0.0, 256.0, 20.0),
            EmulatorArea::BottomLeftFps => Rect::new(0.0, 220.0, 20.0, 240.0),
            EmulatorArea::BottomRightFps => Rect::new(236.0, 220.0, 256.0, 240.0),
            EmulatorArea::CenterBanner => Rect::new(0.0, 100.0, 256.0, 140.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for &area in ControllerArea::ALL {
            assert_eq!(ControllerArea::from_id(area.id()), Some(area));
        }
        for &area in EmulatorArea::ALL {
            assert_eq!(EmulatorArea::from_id(area.id()), Some(area));
        }
        assert_eq!(ControllerArea::from_id(99), None);
    }

    #[test]
    fn test_every_button_has_an_area() {
        for &area in ControllerArea::ALL {
            assert_eq!(ControllerArea::for_button(area.button()), area);
        }
    }

    #[test]
    fn test_rects_are_valid() {
        assert!(ControllerArea::ALL.iter().all(|a| a.rect().is_valid()));
        assert!(EmulatorArea::ALL.iter().all(|a| a.rect().is_valid()));
    }

    #[test]
    fn test_controller_buttons_do_not_overlap() {
        for (i, a) in ControllerArea::ALL.iter().enumerate() {
            for b in &ControllerArea::ALL[i + 1..] {
                let (ra, rb) = (a.rect(), b.rect());
                let overlap = ra.left < rb.right
                    && rb.left < ra.right
                    && ra.top < rb.bottom
                    && rb.top < ra.bottom;
                // The D-pad arms touch at the corners only
                if overlap {
                    let w = ra.right.min(rb.right) - ra.left.max(rb.left);
                    let h = ra.bottom.min(rb.bottom) - ra.top.max(rb.top);
                    assert!(w * h < 100.0, "{:?} and {:?} overlap", a, b);
                }
            }
        }
    }
}
