// Frame hand-off - Emulator index frames crossing from the core's thread to the shell
//
// The emulator core pushes 256×240 palette-index buffers into an unbounded
// FIFO; the shell drains it at its own cadence. Only the newest frame is ever
// shown, so a drain keeps the last buffer and drops the rest.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Width of an emulator frame in pixels
pub const FRAME_WIDTH: usize = 256;

/// Height of an emulator frame in pixels
pub const FRAME_HEIGHT: usize = 240;

/// Bytes in one index frame
pub const FRAME_SIZE: usize = FRAME_WIDTH * FRAME_HEIGHT;

/// Errors from the frame hand-off queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A frame buffer did not hold exactly `FRAME_SIZE` bytes
    WrongSize(usize),

    /// The other end of the queue was dropped
    Disconnected,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::WrongSize(len) => {
                write!(f, "Frame must be {} bytes, got {}", FRAME_SIZE, len)
            }
            FrameError::Disconnected => write!(f, "Frame queue disconnected"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Create a connected sender/receiver pair
pub fn frame_channel() -> (FrameSender, FrameReceiver) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (FrameSender { tx }, FrameReceiver { rx })
}

/// Producer end, held by the emulator core's frame callback
#[derive(Debug, Clone)]
pub struct FrameSender {
    tx: Sender<Box<[u8]>>,
}

impl FrameSender {
    /// Queue a frame, transferring ownership of the buffer
    pub fn send(&self, frame: impl Into<Box<[u8]>>) -> Result<(), FrameError> {
        let frame = frame.into();
        if frame.len() != FRAME_SIZE {
            return Err(FrameError::WrongSize(frame.len()));
        }
        self.tx.send(frame).map_err(|_| FrameError::Disconnected)
    }
}

/// Consumer end, held by the shell
#[derive(Debug)]
pub struct FrameReceiver {
    rx: Receiver<Box<[u8]>>,
}

impl FrameReceiver {
    /// Take the oldest queued frame without blocking
    ///
    /// # Returns
    /// `Ok(None)` when the queue is empty
    pub fn try_next(&self) -> Result<Option<Box<[u8]>>, FrameError> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(Some(frame)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(FrameError::Disconnected),
        }
    }

    /// Drain the queue and keep only the newest frame
    ///
    /// # Returns
    /// The newest frame, if any, and the number of older frames dropped
    pub fn latest(&self) -> Result<(Option<Box<[u8]>>, usize), FrameError> {
        let mut newest = None;
        let mut dropped = 0;

        loop {
            match self.rx.try_recv() {
                Ok(frame) => {
                    if newest.replace(frame).is_some() {
                        dropped += 1;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if newest.is_none() {
                        return Err(FrameError::Disconnected);
                    }
                    break;
                }
            }
        }

        Ok((newest, dropped))
    }

    /// Frames currently waiting
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Black palette index used by the static generator
pub const STATIC_BLACK: u8 = 0x0D;

/// White palette index used by the static generator
pub const STATIC_WHITE: u8 = 0x30;

/// Generator of "no signal" television static frames
///
/// Each pixel is independently black with probability 0.6, white otherwise.
#[derive(Debug)]
pub struct StaticNoise {
    rng: StdRng,
}

impl StaticNoise {
    /// Create a generator seeded from the OS
    pub fn new() -> Self {
        StaticNoise {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed
    pub fn from_seed(seed: u64) -> Self {
        StaticNoise {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fill `frame` with static
    pub fn fill(&mut self, frame: &mut [u8]) {
        for pixel in frame.iter_mut() {
            *pixel = if self.rng.gen_range(0..10) <= 5 {
                STATIC_BLACK
            } else {
                STATIC_WHITE
            };
        }
    }

    /// A new frame of static
    pub fn frame(&mut self) -> Box<[u8]> {
        let mut frame = vec![0u8; FRAME_SIZE].into_boxed_slice();
        self.fill(&mut frame);
        frame
    }
}

impl Default for StaticNoise {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(fill: u8) -> Vec<u8> {
        vec![fill; FRAME_SIZE]
    }

    #[test]
    fn test_latest_drops_older_frames() {
        let (tx, rx) = frame_channel();
        for i in 0..3 {
            tx.send(frame(i)).unwrap();
        }

        let (newest, dropped) = rx.latest().unwrap();
        assert_eq!(newest.unwrap()[0], 2);
        assert_eq!(dropped, 2);
        assert_eq!(rx.pending(), 0);
    }

    #[test]
    fn test_fifo_order() {
        let (tx, rx) = frame_channel();
        tx.send(frame(1)).unwrap();
        tx.send(frame(2)).unwrap();
        assert_eq!(rx.try_next().unwrap().unwrap()[0], 1);
        assert_eq!(rx.try_next().unwrap().unwrap()[0], 2);
        assert!(rx.try_next().unwrap().is_none());
    }

    #[test]
    fn test_wrong_size_rejected() {
        let (tx, rx) = frame_channel();
        assert_eq!(tx.send(vec![0u8; 10]), Err(FrameError::WrongSize(10)));
        assert_eq!(rx.pending(), 0);
    }

    #[test]
    fn test_disconnect() {
        let (tx, rx) = frame_channel();
        tx.send(frame(7)).unwrap();
        drop(tx);

        // Frames queued before the drop are still delivered
        let (newest, _) = rx.latest().unwrap();
        assert!(newest.is_some());
        assert_eq!(rx.latest(), Err(FrameError::Disconnected));

        let (tx, rx) = frame_channel();
        drop(rx);
        assert_eq!(tx.send(frame(0)), Err(FrameError::Disconnected));
    }

    #[test]
    fn test_static_is_mostly_black() {
        let mut noise = StaticNoise::from_seed(42);
        let frame = noise.frame();

        assert!(frame.iter().all(|&p| p == STATIC_BLACK || p == STATIC_WHITE));
        let black = frame.iter().filter(|&&p| p == STATIC_BLACK).count();
        let ratio = black as f64 / FRAME_SIZE as f64;
        assert!((0.55..0.65).contains(&ratio), "black ratio {}", ratio);
    }
}
