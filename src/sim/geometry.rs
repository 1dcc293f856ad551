//! Axis-aligned rectangles for overlap tests
//!
//! Screen space: x grows right, y grows down, `min` is the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict intersection: rectangles that only share an edge do not overlap
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// Shrink horizontally by `fraction` of the width on each side
    pub fn narrowed(&self, fraction: f32) -> Rect {
        let cushion = self.size.x * fraction;
        Rect {
            min: Vec2::new(self.min.x + cushion, self.min.y),
            size: Vec2::new(self.size.x - 2.0 * cushion, self.size.y),
        }
    }
}
