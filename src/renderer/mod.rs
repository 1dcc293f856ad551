//! Render sink seam
//!
//! The simulation never draws. After every game tick it hands a sink one
//! `Placement` per entity (hidden ones included, so a sink can drop sprites
//! it showed before).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EntityId, Sprite};

/// Where and how to draw one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: EntityId,
    pub sprite: Sprite,
    /// Top-left corner
    pub pos: Vec2,
    /// Degrees clockwise
    pub rotation: f32,
    /// Draw flipped horizontally
    pub mirrored: bool,
    pub visible: bool,
    pub z: i32,
}

/// Receives a full set of placements per frame
pub trait RenderSink {
    fn present(&mut self, placements: &[Placement]);
}

/// Ignores every frame
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn present(&mut self, _placements: &[Placement]) {}
}

/// Keeps the most recent frame and counts frames
#[derive(Debug, Default, Clone)]
pub struct FrameRecorder {
    pub frames: u64,
    pub last: Vec<Placement>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placement(&self, id: EntityId) -> Option<&Placement> {
        self.last.iter().find(|placement| placement.id == id)
    }

    pub fn visible(&self) -> impl Iterator<Item = &Placement> {
        self.last.iter().filter(|placement| placement.visible)
    }
}

impl RenderSink for FrameRecorder {
    fn present(&mut self, placements: &[Placement]) {
        self.frames += 1;
        self.last.clear();
        self.last.extend_from_slice(placements);
    }
}
