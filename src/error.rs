//! Construction-time errors
//!
//! Runtime ticks never fail; everything that can go wrong is rejected when a
//! component is built.

/// A construction precondition was violated. No partial object is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("playfield width must be positive (got {0})")]
    PlayfieldWidth(f32),

    #[error("playfield height must be positive (got {0})")]
    PlayfieldHeight(f32),

    #[error("top road offset must not be negative (got {0})")]
    TopRoadOffset(f32),

    #[error("starting lives must be positive")]
    NoLives,

    #[error("life countdown must be at least one second")]
    ZeroCountdown,

    #[error("lane speed must not be negative (got {0})")]
    NegativeSpeed(f32),

    #[error("lane height must be positive (got {0})")]
    LaneHeight(f32),

    #[error("level {0} has no entry in the level table")]
    UnknownLevel(usize),

    #[error("level table is empty")]
    NoLevels,

    #[error("level {level} defines {found} lanes, expected {expected}")]
    LaneCount {
        level: usize,
        expected: usize,
        found: usize,
    },

    #[error("animation needs at least one frame")]
    NoFrames,

    #[error("tile width must be positive (got {0})")]
    TileWidth(f32),

    #[error("goal row needs at least one goal")]
    NoGoals,
}

/// Settings could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] SetupError),
}
