//! Lane obstacles: vehicles and rideable platforms
//!
//! Obstacles move forward by their lane's speed every game tick and teleport
//! to the opposite edge once fully off screen. Platform kinds additionally
//! keep a rider registry and drag mounted riders along.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Collidable, Entity, EntityId, Heading, Movable, Sprite};
use crate::consts::{BASE_Z, RIDER_Z};
use crate::error::SetupError;

/// Concrete obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    PodRacer,
    Limo,
    /// Fast pod racer: runs at twice its lane's speed
    PodRacerX,
    LilyPad,
    Log,
}

impl ObstacleKind {
    /// Sprite footprint
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::PodRacer | ObstacleKind::PodRacerX => Vec2::new(60.0, 40.0),
            ObstacleKind::Limo => Vec2::new(100.0, 40.0),
            ObstacleKind::LilyPad => Vec2::new(50.0, 40.0),
            ObstacleKind::Log => Vec2::new(150.0, 40.0),
        }
    }

    /// Multiplier applied to the speed a lane assigns
    pub fn speed_factor(&self) -> f32 {
        match self {
            // TODO: revisit once level 2 is playtested; stacks with the already higher lane speeds
            ObstacleKind::PodRacerX => 2.0,
            _ => 1.0,
        }
    }

    /// Rideable kinds (water levels)
    pub fn is_platform(&self) -> bool {
        matches!(self, ObstacleKind::LilyPad | ObstacleKind::Log)
    }

    pub fn sprite(&self) -> Sprite {
        match self {
            ObstacleKind::PodRacer => Sprite::PodRacer,
            ObstacleKind::PodRacerX => Sprite::PodRacerX,
            ObstacleKind::Limo => Sprite::Limo,
            ObstacleKind::LilyPad => Sprite::LilyPad,
            ObstacleKind::Log => Sprite::Log,
        }
    }
}

/// A mounted rider and the horizontal offset captured when it got on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rider {
    pub id: EntityId,
    pub offset: f32,
}

/// Riders currently carried by a platform, keyed by entity id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiderRegistry {
    riders: Vec<Rider>,
}

impl RiderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rider. A rider that is already mounted keeps its offset.
    pub fn mount(&mut self, id: EntityId, offset: f32) -> bool {
        if self.contains(id) {
            return false;
        }
        self.riders.push(Rider { id, offset });
        true
    }

    pub fn unmount(&mut self, id: EntityId) -> bool {
        let before = self.riders.len();
        self.riders.retain(|rider| rider.id != id);
        self.riders.len() != before
    }

    pub fn clear(&mut self) {
        self.riders.clear();
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.riders.iter().any(|rider| rider.id == id)
    }

    pub fn offset_of(&self, id: EntityId) -> Option<f32> {
        self.riders.iter().find(|rider| rider.id == id).map(|rider| rider.offset)
    }

    pub fn len(&self) -> usize {
        self.riders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }
}

/// Entities that can carry other entities
pub trait Rideable: Entity {
    fn riders(&self) -> Option<&RiderRegistry>;
    fn riders_mut(&mut self) -> Option<&mut RiderRegistry>;

    /// Mount `rider`, capturing `offset = self.x - rider.x` and raising it above the platform
    fn mount(&mut self, rider: &mut dyn Entity) -> bool {
        let offset = self.x() - rider.x();
        let Some(riders) = self.riders_mut() else {
            return false;
        };
        let mounted = riders.mount(rider.id(), offset);
        rider.body_mut().z = RIDER_Z;
        mounted
    }

    /// Pin a mounted rider to `self.x - offset`
    fn carry(&self, rider: &mut dyn Entity) {
        if let Some(offset) = self.riders().and_then(|riders| riders.offset_of(rider.id())) {
            rider.body_mut().pos.x = self.x() - offset;
        }
    }

    /// Release a rider and restore its z-order
    fn dismount(&mut self, rider: &mut dyn Entity) -> bool {
        let removed = self
            .riders_mut()
            .map(|riders| riders.unmount(rider.id()))
            .unwrap_or(false);
        if removed {
            rider.body_mut().z = BASE_Z;
        }
        removed
    }

    fn is_carrying(&self, id: EntityId) -> bool {
        self.riders().is_some_and(|riders| riders.contains(id))
    }
}

/// A pooled lane obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    id: EntityId,
    kind: ObstacleKind,
    direction: Heading,
    body: Body,
    riders: Option<RiderRegistry>,
}

impl Obstacle {
    /// New obstacle at the origin with zero speed; its lane places it and assigns speed.
    /// Any direction other than `Left` travels right.
    pub fn new(id: EntityId, kind: ObstacleKind, direction: Heading) -> Self {
        Self {
            id,
            kind,
            direction,
            body: Body::new(Vec2::ZERO, kind.size()),
            riders: kind.is_platform().then(RiderRegistry::new),
        }
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn direction(&self) -> Heading {
        self.direction
    }

    pub fn is_platform(&self) -> bool {
        self.kind.is_platform()
    }

    /// Right-moving sprites are drawn flipped
    pub fn is_mirrored(&self) -> bool {
        self.direction != Heading::Left
    }

    /// Apply the lane's speed (scaled by the kind's factor)
    pub fn set_lane_speed(&mut self, speed: f32) -> Result<(), SetupError> {
        if speed < 0.0 {
            return Err(SetupError::NegativeSpeed(speed));
        }
        self.body.set_speed(speed * self.kind.speed_factor(), 0.0)
    }

    /// Advance one tick, wrapping to the far edge once fully off screen
    pub fn move_forward(&mut self, playfield_width: f32) {
        if self.direction == Heading::Left {
            self.move_left();
            if self.body.pos.x <= -self.body.width() {
                self.body.pos.x = playfield_width;
            }
        } else {
            self.move_right();
            if self.body.pos.x >= playfield_width {
                self.body.pos.x = -self.body.width();
            }
        }
    }

    /// Fully outside the horizontal playfield
    pub fn is_offscreen(&self, playfield_width: f32) -> bool {
        self.body.pos.x <= -self.body.width() || self.body.pos.x >= playfield_width
    }
}

impl Entity for Obstacle {
    fn id(&self) -> EntityId {
        self.id
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Movable for Obstacle {}

impl Collidable for Obstacle {}

impl Rideable for Obstacle {
    fn riders(&self) -> Option<&RiderRegistry> {
        self.riders.as_ref()
    }

    fn riders_mut(&mut self) -> Option<&mut RiderRegistry> {
        self.riders.as_mut()
    }
}
