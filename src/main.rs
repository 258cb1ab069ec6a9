// NES Shell - Headless demonstration
//
// Drives the shell with a stand-in core that paints a scrolling test pattern,
// presses a few buttons through the touch path, shows a banner and writes a
// snapshot of the emulator screen. Set RUST_LOG=debug to follow along.

use nes_shell::frames::{FrameSender, FRAME_HEIGHT, FRAME_SIZE, FRAME_WIDTH};
use nes_shell::{
    frame_channel, Color, ControllerArea, ControllerPort, ControllerState, EmulatorCore,
    EmulatorShell, EmulatorState, InputConfig, Player, Point, Raster, Region, RomError,
    ShellConfig, TouchPhase,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Core that emits a test pattern instead of emulating anything
struct PatternCore {
    frames: FrameSender,
    state: EmulatorState,
    controllers: [ControllerState; 2],
    frame: usize,
}

impl PatternCore {
    fn new(frames: FrameSender) -> Self {
        PatternCore {
            frames,
            state: EmulatorState::Stopped,
            controllers: [ControllerState::new(); 2],
            frame: 0,
        }
    }

    /// Produce one frame if running
    fn step(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.state != EmulatorState::Running {
            return Ok(());
        }

        let mut buffer = vec![0u8; FRAME_SIZE];
        let held = self.controllers[0].bits() as usize;
        for y in 0..FRAME_HEIGHT {
            for x in 0..FRAME_WIDTH {
                buffer[y * FRAME_WIDTH + x] = (((x + self.frame) / 16 + y / 16 + held) % 64) as u8;
            }
        }
        self.frame += 1;
        self.frames.send(buffer)?;
        Ok(())
    }
}

impl EmulatorCore for PatternCore {
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
        if rom.len() < 16 || &rom[..4] != b"NES\x1A" {
            return Err("not an iNES image".into());
        }
        Ok(())
    }

    fn state(&self) -> EmulatorState {
        self.state
    }

    fn controller(&mut self, player: Player) -> &mut dyn ControllerPort {
        match player {
            Player::One => &mut self.controllers[0],
            Player::Two => &mut self.controllers[1],
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("NES Shell (nes-shell) v0.1.0");
    println!("============================");
    println!();

    let config = ShellConfig::load_or_default(nes_shell::shell::CONFIG_FILE);
    let input = InputConfig::load_or_default("input_config.toml");

    let (tx, rx) = frame_channel();
    let mut shell = EmulatorShell::from_config(PatternCore::new(tx), rx, config, &input)?;

    let redraws = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&redraws);
    shell.subscribe(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    if let Some(path) = std::env::args().nth(1) {
        let rom = std::fs::read(&path)?;
        match shell.load_rom(&rom) {
            Ok(()) => println!("Loaded ROM '{}'", path),
            Err(e) => println!("ROM '{}' rejected: {}", path, e),
        }
    }

    shell.power_on();

    let a_button = ControllerArea::AButton.rect();
    let touch_at = Point::new(
        (a_button.left + a_button.right) / 2.0,
        (a_button.top + a_button.bottom) / 2.0,
    );

    for tick in 0..120 {
        match tick {
            30 => {
                shell.handle_touch(1, TouchPhase::Pressed, touch_at);
            }
            45 => {
                shell.handle_touch(1, TouchPhase::Released, touch_at);
            }
            60 => {
                shell.show_banner(Raster::filled(256, 40, Color::rgba(0, 0, 0, 160)));
            }
            _ => {}
        }

        shell.emulator_mut().step()?;
        shell.pump_frames()?;
        let _ = shell.screen().get_image();
        let _ = shell.controller().get_image();
    }

    let overlay = shell.show_controller_areas(Some(ControllerArea::StartButton));
    println!(
        "Area overlay {} covers {:?}",
        overlay,
        shell.controller().area_rect(ControllerArea::StartButton.id())
    );

    let path = shell.snapshot()?;
    println!("Snapshot written to {}", path.display());

    shell.power_off();
    println!("Redraw notifications: {}", redraws.load(Ordering::Relaxed));
    Ok(())
}
