//! Frogger Sim - simulation core for a lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collision rules, session state machine)
//! - `platform`: Tick source, virtual clock, input mapping and the session driver
//! - `renderer`: Render sink seam (placements only, no pixels)
//! - `audio`: Sound effect ids and the audio sink seam
//! - `persistence`: Score store seam
//! - `settings`: Session configuration and static level tables

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SetupError};
pub use highscores::{HighScoreRecord, HighScores, SortOrder};
pub use settings::{Difficulty, GameSettings};

/// Game configuration constants
pub mod consts {
    /// Game tick interval (obstacle motion, collision detection)
    pub const GAME_TICK_MS: u32 = 15;
    /// Life countdown tick interval
    pub const COUNTDOWN_TICK_MS: u32 = 1000;
    /// Invulnerability countdown tick interval
    pub const INVULNERABILITY_TICK_MS: u32 = 1000;

    /// Movement pulse: one flash frame per accepted move
    pub const MOVEMENT_ANIMATION_MS: u32 = 45;
    /// Death sequence: four frames
    pub const DEATH_ANIMATION_MS: u32 = 1000;

    /// Player footprint
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Goal slot footprint
    pub const GOAL_SIZE: f32 = 50.0;
    /// Power-up footprint
    pub const POWER_UP_SIZE: f32 = 40.0;
    /// Fraction of a goal's width removed from each side of its hit box
    pub const GOAL_CUSHION: f32 = 0.45;

    /// Empty lanes reserved above and below the traffic lanes
    pub const SHOULDER_LANES: usize = 2;

    /// Z-order for regular sprites
    pub const BASE_Z: i32 = 1;
    /// Z-order for a player riding a platform
    pub const RIDER_Z: i32 = 100;
}
