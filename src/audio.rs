//! Sound effect ids and the audio sink seam
//!
//! The simulation only names effects; playback belongs to whatever sink the
//! host plugs in.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player hit by a vehicle
    ObstacleCollision,
    /// Player bumped a boundary or reached the top wall
    WallCollision,
    /// Player fell in the water
    FallInWater,
    /// Life countdown ran out
    TimerComplete,
    /// Player filled a goal
    PlayerAtHome,
    /// Every goal filled
    CompleteLevel,
    GameOver,
    /// Power-up collected
    PowerUp,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::ObstacleCollision => "obstacle_collision",
            SoundEffect::WallCollision => "wall_collision",
            SoundEffect::FallInWater => "fall_in_water",
            SoundEffect::TimerComplete => "timer_complete",
            SoundEffect::PlayerAtHome => "player_at_home",
            SoundEffect::CompleteLevel => "complete_level",
            SoundEffect::GameOver => "game_over",
            SoundEffect::PowerUp => "power_up",
        }
    }
}

/// Fire-and-forget playback
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every effect
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Logs each effect at debug level
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    muted: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        log::debug!("Playing sound: {}", effect.as_str());
    }
}

/// Remembers every effect in order
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }
}

impl RecordingAudio {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|played| **played == effect).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut audio = RecordingAudio::default();
        audio.play(SoundEffect::WallCollision);
        audio.play(SoundEffect::GameOver);
        audio.play(SoundEffect::WallCollision);
        assert_eq!(audio.played[1], SoundEffect::GameOver);
        assert_eq!(audio.count(SoundEffect::WallCollision), 2);
    }

    #[test]
    fn test_muted_log_sink_is_silent() {
        let mut audio = LogAudio::new();
        audio.set_muted(true);
        audio.play(SoundEffect::PowerUp);
        assert!(audio.is_muted());
    }
}
