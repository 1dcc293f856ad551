//! Frame-cycling animation state machine
//!
//! Idle shows the default frame. `play()` switches to Animating and asks the
//! host for a frame timer; each timer tick hides the current frame and shows
//! the next queued one. After the whole queue has been shown once the machine
//! falls back to the default frame and reports `Ended`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Named animation slots on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimationKind {
    /// Short flash on every accepted hop
    Movement,
    /// Death sequence; the entity is out of play while it runs
    Death,
}

/// Transitions reported by an animation machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEvent {
    Started,
    Ended,
}

#[derive(Debug, Clone)]
pub struct AnimationMachine<F> {
    default_frame: F,
    frames: VecDeque<F>,
    current: F,
    duration_ms: u32,
    passes: usize,
    animating: bool,
}

impl<F: Copy> AnimationMachine<F> {
    pub fn new(default_frame: F, frames: Vec<F>, duration_ms: u32) -> Result<Self, SetupError> {
        if frames.is_empty() {
            return Err(SetupError::NoFrames);
        }
        Ok(Self {
            default_frame,
            frames: frames.into(),
            current: default_frame,
            duration_ms,
            passes: 0,
            animating: false,
        })
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Frame currently on screen
    pub fn current_frame(&self) -> F {
        self.current
    }

    /// Frame timer interval: total duration split evenly over the queue
    pub fn frame_interval_ms(&self) -> u32 {
        (self.duration_ms / self.frames.len() as u32).max(1)
    }

    /// Start the animation. Ignored while already animating.
    pub fn play(&mut self) -> Option<AnimationEvent> {
        if self.animating {
            return None;
        }
        self.animating = true;
        self.passes = 0;
        Some(AnimationEvent::Started)
    }

    /// Advance one frame-timer tick. A tick that arrives while idle is stale
    /// and changes nothing.
    pub fn tick(&mut self) -> Option<AnimationEvent> {
        if !self.animating {
            return None;
        }

        self.passes += 1;
        if self.passes <= self.frames.len() {
            if let Some(frame) = self.frames.pop_front() {
                self.frames.push_back(frame);
                self.current = frame;
            }
            None
        } else {
            self.passes = 0;
            self.current = self.default_frame;
            self.animating = false;
            Some(AnimationEvent::Ended)
        }
    }
}
