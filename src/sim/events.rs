//! Messages in and out of the session
//!
//! Everything the session wants from the outside world (sounds, timers,
//! notifications) is queued as `Outbound` in the order it happened. Internal
//! notifications between entities travel as `SimEvent`s.

use serde::{Deserialize, Serialize};

use super::animation::AnimationKind;
use super::entity::Heading;
use super::power_up::PowerUpKind;
use crate::audio::SoundEffect;

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCommand {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

impl MoveCommand {
    pub fn heading(&self) -> Heading {
        match self {
            MoveCommand::MoveLeft => Heading::Left,
            MoveCommand::MoveRight => Heading::Right,
            MoveCommand::MoveUp => Heading::Up,
            MoveCommand::MoveDown => Heading::Down,
        }
    }
}

/// Notifications for HUD and screen flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LivesChanged(u32),
    ScoreChanged(u32),
    /// Seconds elapsed on the life countdown
    CountdownUpdated(u32),
    GameOver(bool),
    WaterLevelStarted,
    WaterLevelEnded,
    InvulnerabilityStarted,
    /// Seconds of invulnerability elapsed
    InvulnerabilityUpdated(u32),
    InvulnerabilityEnded,
    /// 1-based level number
    LevelStarted(u32),
    GoalFilled(usize),
    PowerUpRevealed(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    /// A move was rejected at a boundary
    Bumped(Heading),
}

/// Timers the session asks its host to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKind {
    /// Obstacle motion and collision detection
    Game,
    LifeCountdown,
    Invulnerability,
    /// Frame timer of one of the player's animations
    Animation(AnimationKind),
}

/// Side effects for the host, in emission order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outbound {
    Event(GameEvent),
    Sound(SoundEffect),
    /// Start (or restart) a repeating timer
    StartTimer { timer: TimerKind, interval_ms: u32 },
    StopTimer(TimerKind),
}

/// Internal notifications, drained in FIFO order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    AnimationStarted(AnimationKind),
    AnimationEnded(AnimationKind),
    /// The player made a voluntary move
    PlayerMoved,
}
