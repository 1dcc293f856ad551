//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-count based motion only (fixed per-tick deltas)
//! - Seeded RNG only
//! - Stable iteration order (lanes bottom to top, pools in creation order)
//! - No rendering, audio or platform dependencies; side effects leave as
//!   queued `Outbound` messages

pub mod animation;
pub mod entity;
pub mod events;
pub mod geometry;
pub mod goal;
pub mod lane;
pub mod obstacle;
pub mod player;
pub mod power_up;
pub mod rule;
pub mod session;

pub use animation::{AnimationEvent, AnimationKind, AnimationMachine};
pub use entity::{Body, Collidable, Entity, EntityId, Heading, IdSequence, Movable, Sprite};
pub use events::{GameEvent, MoveCommand, Outbound, SimEvent, TimerKind};
pub use geometry::Rect;
pub use goal::{Goal, GoalRow};
pub use lane::{Lane, Level};
pub use obstacle::{Obstacle, ObstacleKind, Rideable, Rider, RiderRegistry};
pub use player::{MoveBounds, MoveOutcome, PLAYER_ID, Player};
pub use power_up::{PowerUp, PowerUpDirector, PowerUpKind};
pub use rule::CollisionRule;
pub use session::{Session, SessionPhase};
