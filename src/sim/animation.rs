//! Cyclic sprite animation
//!
//! An animation is an ordered list of atlas frames advanced by render ticks.
//! Each sprite instance owns its own `Animation` values, so frame counters
//! never leak between entities of the same kind.

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// A cyclic frame sequencer.
///
/// The current index advances once per `delay` calls to [`advance`], wrapping
/// back to the first frame after the last. An empty frame list is a valid,
/// degenerate animation: advancing is a no-op and there is never a current
/// frame.
///
/// [`advance`]: Animation::advance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    frames: Vec<Rect>,
    delay: u32,
    counter: u32,
    index: usize,
}

impl Animation {
    /// Animation advancing one frame per render tick.
    pub fn new(frames: Vec<Rect>) -> Self {
        Self::with_delay(frames, 1)
    }

    /// Animation advancing one frame per `delay` render ticks.
    ///
    /// Panics if `delay` is zero; a zero delay is a programmer error, not a
    /// runtime condition.
    pub fn with_delay(frames: Vec<Rect>, delay: u32) -> Self {
        assert!(delay >= 1, "animation frame delay must be at least 1");
        Self {
            frames,
            delay,
            counter: 0,
            index: 0,
        }
    }

    /// The frame currently displayed, `None` for an empty frame list.
    pub fn current_frame(&self) -> Option<Rect> {
        self.frames.get(self.index).copied()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Advance by one render tick.
    pub fn advance(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.counter += 1;
        if self.counter < self.delay {
            return;
        }
        self.counter = 0;
        self.index = if self.index < self.frames.len() - 1 {
            self.index + 1
        } else {
            0
        };
    }
}
