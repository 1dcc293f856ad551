//! Session configuration and static level tables
//!
//! One immutable `GameSettings` is handed to every component at construction.
//! Level tables are input data; nothing edits them while a session runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SetupError};
use crate::sim::{Heading, ObstacleKind};

/// Difficulty selected when the session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Normal,
    /// One life, doubled score multiplier
    Hardcore,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hardcore => "Hardcore",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Difficulty::Normal),
            "hardcore" | "hard" => Some(Difficulty::Hardcore),
            _ => None,
        }
    }
}

/// One lane of a level table row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneConfig {
    /// Pixels per game tick (before any per-kind factor)
    pub speed: f32,
    pub direction: Heading,
    pub kind: ObstacleKind,
    /// Pooled obstacles in the lane
    pub population: u32,
}

impl LaneConfig {
    pub const fn new(speed: f32, direction: Heading, kind: ObstacleKind, population: u32) -> Self {
        Self {
            speed,
            direction,
            kind,
            population,
        }
    }
}

/// One level: lanes listed bottom to top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub lanes: Vec<LaneConfig>,
}

/// Immutable session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Y of the road's top line (goal row sits here)
    pub top_road_y: f32,
    /// Gap between the bottom lane's baseline and the playfield bottom
    pub bottom_lane_offset: f32,
    /// Distance covered by one player hop (also the goal tile width)
    pub player_step: f32,

    // === Lives & scoring ===
    pub normal_lives: u32,
    pub hardcore_lives: u32,
    pub normal_score_multiplier: u32,
    pub hardcore_score_multiplier: u32,

    // === Timers (seconds / ticks) ===
    pub life_countdown_secs: u32,
    pub bonus_time_secs: u32,
    pub invulnerability_secs: u32,
    /// Game ticks between pooled obstacle reveals
    pub obstacle_reveal_frequency: u64,

    // === Board contents ===
    pub goal_count: usize,
    pub bonus_time_spawn: Vec2,
    pub invulnerability_spawn: Vec2,
    pub lanes_per_level: usize,
    pub levels: Vec<LevelConfig>,
    /// Level ids played on water with platforms
    pub water_levels: Vec<usize>,
}

impl Default for GameSettings {
    fn default() -> Self {
        use Heading::{Left, Right};
        use ObstacleKind::{LilyPad, Limo, Log, PodRacer, PodRacerX};

        let levels = vec![
            LevelConfig {
                lanes: vec![
                    LaneConfig::new(0.75, Left, PodRacer, 2),
                    LaneConfig::new(1.0, Right, Limo, 2),
                    LaneConfig::new(1.25, Left, PodRacer, 3),
                    LaneConfig::new(1.5, Left, Limo, 3),
                    LaneConfig::new(1.75, Right, PodRacer, 3),
                ],
            },
            LevelConfig {
                lanes: vec![
                    LaneConfig::new(1.0, Left, Limo, 3),
                    LaneConfig::new(1.25, Right, PodRacerX, 3),
                    LaneConfig::new(1.5, Right, Limo, 3),
                    LaneConfig::new(1.75, Left, PodRacerX, 4),
                    LaneConfig::new(2.0, Right, Limo, 4),
                ],
            },
            LevelConfig {
                lanes: vec![
                    LaneConfig::new(2.0, Right, LilyPad, 4),
                    LaneConfig::new(3.0, Left, Log, 3),
                    LaneConfig::new(3.25, Right, Log, 3),
                    LaneConfig::new(2.25, Left, LilyPad, 3),
                    LaneConfig::new(4.0, Right, Log, 2),
                ],
            },
        ];

        Self {
            playfield_width: 650.0,
            playfield_height: 500.0,
            top_road_y: 145.0,
            bottom_lane_offset: 5.0,
            player_step: 50.0,

            normal_lives: 4,
            hardcore_lives: 1,
            normal_score_multiplier: 10,
            hardcore_score_multiplier: 20,

            life_countdown_secs: 20,
            bonus_time_secs: 10,
            invulnerability_secs: 5,
            obstacle_reveal_frequency: 50,

            goal_count: 5,
            bonus_time_spawn: Vec2::new(400.0, 305.0),
            invulnerability_spawn: Vec2::new(100.0, 205.0),
            lanes_per_level: 5,
            levels,
            water_levels: vec![2],
        }
    }
}

impl GameSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: GameSettings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {}x{} playfield, {} levels",
            settings.playfield_width,
            settings.playfield_height,
            settings.levels.len()
        );
        Ok(settings)
    }

    /// Check every construction precondition the session relies on
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.playfield_width <= 0.0 {
            return Err(SetupError::PlayfieldWidth(self.playfield_width));
        }
        if self.playfield_height <= 0.0 {
            return Err(SetupError::PlayfieldHeight(self.playfield_height));
        }
        if self.top_road_y < 0.0 {
            return Err(SetupError::TopRoadOffset(self.top_road_y));
        }
        if self.player_step <= 0.0 {
            return Err(SetupError::TileWidth(self.player_step));
        }
        if self.normal_lives == 0 || self.hardcore_lives == 0 {
            return Err(SetupError::NoLives);
        }
        if self.life_countdown_secs == 0 {
            return Err(SetupError::ZeroCountdown);
        }
        if self.goal_count == 0 {
            return Err(SetupError::NoGoals);
        }
        if self.levels.is_empty() {
            return Err(SetupError::NoLevels);
        }
        for (level, config) in self.levels.iter().enumerate() {
            if config.lanes.len() != self.lanes_per_level {
                return Err(SetupError::LaneCount {
                    level,
                    expected: self.lanes_per_level,
                    found: config.lanes.len(),
                });
            }
            if let Some(lane) = config.lanes.iter().find(|lane| lane.speed < 0.0) {
                return Err(SetupError::NegativeSpeed(lane.speed));
            }
        }
        Ok(())
    }

    /// Starting lives for a difficulty
    pub fn lives_for(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Normal => self.normal_lives,
            Difficulty::Hardcore => self.hardcore_lives,
        }
    }

    /// Score multiplier for a difficulty
    pub fn score_multiplier_for(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Normal => self.normal_score_multiplier,
            Difficulty::Hardcore => self.hardcore_score_multiplier,
        }
    }

    /// Table row for a level id
    pub fn level(&self, id: usize) -> Result<&LevelConfig, SetupError> {
        self.levels.get(id).ok_or(SetupError::UnknownLevel(id))
    }

    pub fn is_water_level(&self, id: usize) -> bool {
        self.water_levels.contains(&id)
    }

    pub fn is_last_level(&self, id: usize) -> bool {
        id + 1 >= self.levels.len()
    }

    /// Y of the bottom lane's baseline
    pub fn bottom_baseline(&self) -> f32 {
        self.playfield_height - self.bottom_lane_offset
    }

    /// Vertical space shared by the traffic lanes and their shoulders
    pub fn road_height(&self) -> f32 {
        self.playfield_height - (self.top_road_y + self.bottom_lane_offset)
    }

    /// Player spawn: centered horizontally, resting on the bottom baseline
    pub fn start_position(&self, player_size: Vec2) -> Vec2 {
        Vec2::new(
            self.playfield_width / 2.0 - player_size.x / 2.0,
            self.bottom_baseline() - player_size.y,
        )
    }
}
