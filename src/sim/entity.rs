//! Entity building blocks
//!
//! Every game object owns a `Body` (position, fixed extent, per-tick speed and
//! render state). Behaviour is layered on with small capability traits instead
//! of a class hierarchy:
//! - `Entity`: identity + body access
//! - `Movable`: fixed per-tick deltas
//! - `Collidable`: overlap tests against another entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::BASE_Z;
use crate::error::SetupError;

/// Stable entity id, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out session-unique entity ids
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    /// Start numbering at `first`
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Facing / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Sprite rotation (degrees clockwise) for a facing direction
    pub fn rotation_degrees(&self) -> f32 {
        match self {
            Heading::Up => 0.0,
            Heading::Right => 90.0,
            Heading::Down => 180.0,
            Heading::Left => 270.0,
        }
    }
}

/// What a render sink should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Frog,
    FrogHop,
    /// Death sequence frame (1-based)
    FrogDeath(u8),
    PodRacer,
    PodRacerX,
    Limo,
    LilyPad,
    Log,
    GoalEmpty,
    GoalFilled,
    BonusTime,
    Invulnerability,
}

/// Position, extent, speed and render state shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    size: Vec2,
    speed: Vec2,
    pub visible: bool,
    /// Degrees clockwise
    pub rotation: f32,
    pub z: i32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            speed: Vec2::ZERO,
            visible: true,
            rotation: 0.0,
            z: BASE_Z,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn speed(&self) -> Vec2 {
        self.speed
    }

    /// Set per-tick speed on both axes; negative speeds are rejected
    pub fn set_speed(&mut self, x: f32, y: f32) -> Result<(), SetupError> {
        if x < 0.0 {
            return Err(SetupError::NegativeSpeed(x));
        }
        if y < 0.0 {
            return Err(SetupError::NegativeSpeed(y));
        }
        self.speed = Vec2::new(x, y);
        Ok(())
    }

    /// Halt on both axes
    pub fn stop(&mut self) {
        self.speed = Vec2::ZERO;
    }

    /// Full footprint
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Anything with an id and a body
pub trait Entity {
    fn id(&self) -> EntityId;
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn x(&self) -> f32 {
        self.body().pos.x
    }

    fn y(&self) -> f32 {
        self.body().pos.y
    }
}

/// Fixed per-tick motion
pub trait Movable: Entity {
    fn move_left(&mut self) {
        let body = self.body_mut();
        body.pos.x -= body.speed.x;
    }

    fn move_right(&mut self) {
        let body = self.body_mut();
        body.pos.x += body.speed.x;
    }

    fn move_up(&mut self) {
        let body = self.body_mut();
        body.pos.y -= body.speed.y;
    }

    fn move_down(&mut self) {
        let body = self.body_mut();
        body.pos.y += body.speed.y;
    }

    fn step(&mut self, heading: Heading) {
        match heading {
            Heading::Left => self.move_left(),
            Heading::Right => self.move_right(),
            Heading::Up => self.move_up(),
            Heading::Down => self.move_down(),
        }
    }
}

/// Overlap testing
pub trait Collidable: Entity {
    /// Region this entity tests with
    fn hit_box(&self) -> Rect {
        self.body().bounds()
    }

    /// Whether this entity can be the other side of a collision at all
    fn in_play(&self) -> bool {
        self.body().visible
    }

    fn overlaps(&self, other: &dyn Collidable) -> bool {
        other.in_play() && self.hit_box().intersects(&other.body().bounds())
    }
}
