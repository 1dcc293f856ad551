//! The player-controlled frog
//!
//! Created once per session and repositioned (never recreated) after each
//! death. Owns lives, score, facing, the invulnerability countdown and two
//! animation machines (movement pulse and death sequence).

use glam::Vec2;

use super::animation::{AnimationEvent, AnimationKind, AnimationMachine};
use super::entity::{Body, Collidable, Entity, EntityId, Heading, Movable, Sprite};
use crate::consts::{DEATH_ANIMATION_MS, MOVEMENT_ANIMATION_MS, PLAYER_SIZE};
use crate::error::SetupError;
use crate::settings::GameSettings;

/// The player's entity id
pub const PLAYER_ID: EntityId = EntityId(0);

/// Rectangle the player may move within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBounds {
    pub left: f32,
    pub right: f32,
    /// The road's top line
    pub top: f32,
    /// The bottom lane's baseline
    pub bottom: f32,
}

impl MoveBounds {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            left: 0.0,
            right: settings.playfield_width,
            top: settings.top_road_y,
            bottom: settings.bottom_baseline(),
        }
    }
}

/// Result of a directional command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Would have left the permitted rectangle; nothing changed
    Blocked,
}

#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    lives: u32,
    score: u32,
    facing: Heading,
    step: f32,
    invulnerable: bool,
    invulnerability_ticks: u32,
    invulnerability_secs: u32,
    movement: AnimationMachine<Sprite>,
    death: AnimationMachine<Sprite>,
}

impl Player {
    pub fn new(lives: u32, step: f32, invulnerability_secs: u32) -> Result<Self, SetupError> {
        if lives == 0 {
            return Err(SetupError::NoLives);
        }

        let movement =
            AnimationMachine::new(Sprite::Frog, vec![Sprite::FrogHop], MOVEMENT_ANIMATION_MS)?;
        let death = AnimationMachine::new(
            Sprite::Frog,
            (1..=4).map(Sprite::FrogDeath).collect(),
            DEATH_ANIMATION_MS,
        )?;

        let mut player = Self {
            body: Body::new(Vec2::ZERO, Vec2::splat(PLAYER_SIZE)),
            lives,
            score: 0,
            facing: Heading::Up,
            step,
            invulnerable: false,
            invulnerability_ticks: 0,
            invulnerability_secs,
            movement,
            death,
        };
        player.start_movement()?;
        Ok(player)
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn facing(&self) -> Heading {
        self.facing
    }

    /// Remove one life (clamped at zero) and return what is left
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn add_score(&mut self, seconds_left: u32, multiplier: u32) -> u32 {
        self.score = self.score.saturating_add(seconds_left.saturating_mul(multiplier));
        self.score
    }

    // === Movement ===

    pub fn start_movement(&mut self) -> Result<(), SetupError> {
        self.body.set_speed(self.step, self.step)
    }

    pub fn stop_movement(&mut self) {
        self.body.stop();
    }

    /// Controllable only while moving on both axes
    pub fn is_controllable(&self) -> bool {
        let speed = self.body.speed();
        speed.x > 0.0 && speed.y > 0.0
    }

    pub fn place_at(&mut self, pos: Vec2) {
        self.body.pos = pos;
    }

    /// Hop one step unless that would leave `bounds`
    pub fn try_move(&mut self, heading: Heading, bounds: &MoveBounds) -> MoveOutcome {
        let Body { pos, .. } = self.body;
        let allowed = match heading {
            Heading::Left => pos.x > bounds.left,
            Heading::Right => pos.x < bounds.right - self.body.width(),
            Heading::Up => pos.y > bounds.top,
            Heading::Down => pos.y < bounds.bottom - self.body.height(),
        };
        if !allowed {
            return MoveOutcome::Blocked;
        }

        if self.is_controllable() {
            self.facing = heading;
        }
        self.step(heading);
        if !self.is_dying() {
            self.body.rotation = self.facing.rotation_degrees();
        }
        MoveOutcome::Moved
    }

    // === Animations ===

    pub fn animation(&self, kind: AnimationKind) -> &AnimationMachine<Sprite> {
        match kind {
            AnimationKind::Movement => &self.movement,
            AnimationKind::Death => &self.death,
        }
    }

    pub fn animation_mut(&mut self, kind: AnimationKind) -> &mut AnimationMachine<Sprite> {
        match kind {
            AnimationKind::Movement => &mut self.movement,
            AnimationKind::Death => &mut self.death,
        }
    }

    pub fn is_dying(&self) -> bool {
        self.death.is_animating()
    }

    /// Flash the hop frame; suppressed while the death sequence runs
    pub fn play_movement_pulse(&mut self) -> Option<AnimationEvent> {
        if self.is_dying() {
            return None;
        }
        self.animation_mut(AnimationKind::Movement).play()
    }

    /// Frame to draw right now
    pub fn sprite(&self) -> Sprite {
        if self.death.is_animating() {
            return self.death.current_frame();
        }
        self.movement.current_frame()
    }

    // === Invulnerability ===

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn invulnerability_ticks(&self) -> u32 {
        self.invulnerability_ticks
    }

    /// Start (or restart) the invulnerability countdown
    pub fn grant_invulnerability(&mut self) {
        self.invulnerable = true;
        self.invulnerability_ticks = 0;
    }

    /// Count one second of invulnerability. Returns the seconds elapsed, or
    /// `None` when not invulnerable (a stale tick).
    pub fn tick_invulnerability(&mut self) -> Option<u32> {
        if !self.invulnerable {
            return None;
        }
        self.invulnerability_ticks += 1;
        Some(self.invulnerability_ticks)
    }

    pub fn invulnerability_expired(&self) -> bool {
        self.invulnerable && self.invulnerability_ticks >= self.invulnerability_secs
    }

    /// Drop invulnerability. Returns whether it was active.
    pub fn clear_invulnerability(&mut self) -> bool {
        let was_active = self.invulnerable;
        self.invulnerable = false;
        self.invulnerability_ticks = 0;
        was_active
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        PLAYER_ID
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Movable for Player {}

impl Collidable for Player {
    /// Out of play while hidden or mid-death
    fn in_play(&self) -> bool {
        self.body.visible && !self.is_dying()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> MoveBounds {
        MoveBounds {
            left: 0.0,
            right: 650.0,
            top: 145.0,
            bottom: 495.0,
        }
    }

    fn player_at(x: f32, y: f32) -> Player {
        let mut player = Player::new(4, 50.0, 5).unwrap();
        player.place_at(Vec2::new(x, y));
        player
    }

    #[test]
    fn test_zero_lives_rejected() {
        assert_eq!(Player::new(0, 50.0, 5).unwrap_err(), SetupError::NoLives);
    }

    #[test]
    fn test_accepted_move_updates_facing_and_rotation() {
        let mut player = player_at(300.0, 445.0);
        assert_eq!(player.try_move(Heading::Left, &bounds()), MoveOutcome::Moved);
        assert_eq!(player.x(), 250.0);
        assert_eq!(player.facing(), Heading::Left);
        assert_eq!(player.body().rotation, 270.0);

        assert_eq!(player.try_move(Heading::Up, &bounds()), MoveOutcome::Moved);
        assert_eq!(player.y(), 395.0);
        assert_eq!(player.body().rotation, 0.0);
    }

    #[test]
    fn test_boundaries_block_moves() {
        let mut player = player_at(0.0, 445.0);
        assert_eq!(player.try_move(Heading::Left, &bounds()), MoveOutcome::Blocked);
        assert_eq!(player.try_move(Heading::Down, &bounds()), MoveOutcome::Blocked);
        assert_eq!(player.body().pos, Vec2::new(0.0, 445.0));

        let mut player = player_at(600.0, 145.0);
        assert_eq!(player.try_move(Heading::Right, &bounds()), MoveOutcome::Blocked);
        assert_eq!(player.try_move(Heading::Up, &bounds()), MoveOutcome::Blocked);
    }

    #[test]
    fn test_stopped_player_keeps_facing() {
        let mut player = player_at(300.0, 445.0);
        player.stop_movement();
        assert!(!player.is_controllable());
        assert_eq!(player.try_move(Heading::Left, &bounds()), MoveOutcome::Moved);
        assert_eq!(player.facing(), Heading::Up);
        assert_eq!(player.x(), 300.0);
    }

    #[test]
    fn test_lives_clamp_at_zero() {
        let mut player = Player::new(1, 50.0, 5).unwrap();
        assert_eq!(player.lose_life(), 0);
        assert_eq!(player.lose_life(), 0);
    }

    #[test]
    fn test_score_accumulates() {
        let mut player = player_at(0.0, 0.0);
        assert_eq!(player.add_score(15, 10), 150);
        assert_eq!(player.add_score(3, 20), 210);
    }

    #[test]
    fn test_death_takes_player_out_of_play() {
        let mut player = player_at(0.0, 0.0);
        assert!(player.in_play());
        player.animation_mut(AnimationKind::Death).play();
        assert!(!player.in_play());
        assert_eq!(player.play_movement_pulse(), None);
        player.animation_mut(AnimationKind::Death).tick();
        assert_eq!(player.sprite(), Sprite::FrogDeath(1));
    }

    #[test]
    fn test_invulnerability_countdown() {
        let mut player = player_at(0.0, 0.0);
        assert_eq!(player.tick_invulnerability(), None);

        player.grant_invulnerability();
        for expected in 1..=5 {
            assert_eq!(player.tick_invulnerability(), Some(expected));
        }
        assert!(player.invulnerability_expired());
        assert!(player.clear_invulnerability());
        assert!(!player.clear_invulnerability());
        assert!(!player.is_invulnerable());
    }
}
