//! Session orchestration
//!
//! The session owns the player, the current level, the goal row and the
//! power-up pool. It reacts to timer ticks and player commands, resolves
//! collisions through collision rules and runs the life/score/level state
//! machine. It never talks to the outside world directly: sounds, timer
//! requests and notifications are queued as `Outbound` messages for the host.
//!
//! Every timer handler re-checks the current state before acting, so a tick
//! that arrives after its timer was logically stopped is harmless.

use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::animation::{AnimationEvent, AnimationKind};
use super::entity::{Collidable, Entity, IdSequence, Sprite};
use super::events::{GameEvent, MoveCommand, Outbound, SimEvent, TimerKind};
use super::goal::GoalRow;
use super::lane::Level;
use super::obstacle::{ObstacleKind, Rideable};
use super::player::{MoveBounds, MoveOutcome, PLAYER_ID, Player};
use super::power_up::{PowerUpDirector, PowerUpKind};
use super::rule::CollisionRule;
use crate::audio::SoundEffect;
use crate::consts::{COUNTDOWN_TICK_MS, GAME_TICK_MS, INVULNERABILITY_TICK_MS};
use crate::error::SetupError;
use crate::highscores::HighScoreRecord;
use crate::renderer::{Placement, RenderSink};
use crate::settings::{Difficulty, GameSettings};

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Player in control
    Playing,
    /// Death animation in flight; controls and countdown stopped
    Dying,
    /// Next level just built; back to `Playing` on the next game tick
    LevelTransition,
    /// Run ended
    GameOver,
}

/// What the player touched, captured before the matching rule runs
#[derive(Debug, Clone, Copy, PartialEq)]
enum Contact {
    Obstacle {
        lane: usize,
        index: usize,
        kind: ObstacleKind,
    },
    Goal(usize),
    PowerUp {
        index: usize,
        kind: PowerUpKind,
    },
}

type SessionRule = CollisionRule<Session>;

/// Rule set wired once per session
#[derive(Debug)]
struct CollisionRules {
    vehicle: SessionRule,
    platform: SessionRule,
    goal: SessionRule,
    bonus_time: SessionRule,
    invulnerability: SessionRule,
    water: SessionRule,
}

impl CollisionRules {
    fn wire() -> Self {
        Self {
            vehicle: SessionRule::new()
                .guard(|s| !s.player.is_invulnerable())
                .on_match(|s| {
                    s.play(SoundEffect::ObstacleCollision);
                    s.kill_player("hit by traffic");
                }),
            platform: SessionRule::new()
                .guard(|s| !s.player.is_dying())
                .on_match(Session::mount_player),
            goal: SessionRule::new().on_match(Session::reach_goal),
            bonus_time: SessionRule::new().on_match(|s| {
                if s.collect_power_up() {
                    s.wind_back_countdown();
                }
            }),
            invulnerability: SessionRule::new().on_match(|s| {
                if s.collect_power_up() {
                    s.grant_invulnerability();
                }
            }),
            water: SessionRule::new()
                .guard(Session::player_in_lanes)
                .guard(|s| !s.level.is_riding(PLAYER_ID))
                .guard(|s| !s.player.is_dying())
                .guard(|s| s.phase != SessionPhase::GameOver)
                .guard(|s| !s.player.is_invulnerable())
                .guard(|s| s.level.is_water())
                .on_match(|s| {
                    s.play(SoundEffect::FallInWater);
                    s.kill_player("fell in the water");
                }),
        }
    }

    fn for_contact(&self, contact: Contact) -> &SessionRule {
        match contact {
            Contact::Obstacle { kind, .. } if kind.is_platform() => &self.platform,
            Contact::Obstacle { .. } => &self.vehicle,
            Contact::Goal(_) => &self.goal,
            Contact::PowerUp {
                kind: PowerUpKind::BonusTime,
                ..
            } => &self.bonus_time,
            Contact::PowerUp {
                kind: PowerUpKind::Invulnerability,
                ..
            } => &self.invulnerability,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    settings: GameSettings,
    difficulty: Difficulty,
    score_multiplier: u32,
    bounds: MoveBounds,
    phase: SessionPhase,

    // === Board ===
    player: Player,
    level: Level,
    goals: GoalRow,
    power_ups: PowerUpDirector,
    ids: IdSequence,

    // === Clocks ===
    game_ticks: u64,
    /// Seconds elapsed on the life countdown
    countdown_ticks: u32,
    reveal_pending: bool,
    /// Game tick on which the countdown last restarted
    countdown_restarted_at: Option<u64>,
    /// Game tick on which invulnerability was last granted
    invulnerability_granted_at: Option<u64>,

    // === Collision resolution ===
    rules: Rc<CollisionRules>,
    contact: Option<Contact>,

    // === Queues ===
    sim_events: VecDeque<SimEvent>,
    outbox: VecDeque<Outbound>,
}

impl Session {
    /// Build a session on level 1. The outbox starts with the initial HUD
    /// events and the game/countdown timer requests.
    pub fn new(settings: GameSettings, difficulty: Difficulty, seed: u64) -> Result<Self, SetupError> {
        settings.validate()?;

        let mut ids = IdSequence::starting_at(PLAYER_ID.0 + 1);
        let mut player = Player::new(
            settings.lives_for(difficulty),
            settings.player_step,
            settings.invulnerability_secs,
        )?;
        player.place_at(settings.start_position(player.body().size()));

        let goals = GoalRow::new(&settings, &mut ids)?;
        let power_ups = PowerUpDirector::new(&settings, &mut ids, seed);
        let level = Level::build(&settings, 0, &mut ids)?;

        let mut session = Self {
            score_multiplier: settings.score_multiplier_for(difficulty),
            bounds: MoveBounds::from_settings(&settings),
            settings,
            difficulty,
            phase: SessionPhase::Playing,
            player,
            level,
            goals,
            power_ups,
            ids,
            game_ticks: 0,
            countdown_ticks: 0,
            reveal_pending: false,
            countdown_restarted_at: None,
            invulnerability_granted_at: None,
            rules: Rc::new(CollisionRules::wire()),
            contact: None,
            sim_events: VecDeque::new(),
            outbox: VecDeque::new(),
        };
        session.begin();
        Ok(session)
    }

    fn begin(&mut self) {
        log::info!(
            "Session started: {} difficulty, {} lives",
            self.difficulty.as_str(),
            self.player.lives()
        );
        self.emit(GameEvent::LevelStarted(1));
        if self.level.is_water() {
            self.emit(GameEvent::WaterLevelStarted);
        }
        self.emit(GameEvent::LivesChanged(self.player.lives()));
        self.emit(GameEvent::ScoreChanged(self.player.score()));
        self.emit(GameEvent::CountdownUpdated(0));
        self.start_timer(TimerKind::Game, GAME_TICK_MS);
        self.start_timer(TimerKind::LifeCountdown, COUNTDOWN_TICK_MS);
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn goals(&self) -> &GoalRow {
        &self.goals
    }

    pub fn power_ups(&self) -> &PowerUpDirector {
        &self.power_ups
    }

    pub fn game_ticks(&self) -> u64 {
        self.game_ticks
    }

    pub fn countdown_ticks(&self) -> u32 {
        self.countdown_ticks
    }

    /// Take everything queued for the host, oldest first
    pub fn drain_outbound(&mut self) -> Vec<Outbound> {
        self.outbox.drain(..).collect()
    }

    /// Record to hand to the score store
    pub fn score_record(&self, name: impl Into<String>) -> HighScoreRecord {
        HighScoreRecord::new(self.player.score(), name, self.level.id() as u32 + 1)
    }

    // === Entry points ===

    /// Dispatch a timer tick
    pub fn on_timer(&mut self, timer: TimerKind) {
        match timer {
            TimerKind::Game => self.on_game_tick(),
            TimerKind::LifeCountdown => self.on_countdown_tick(),
            TimerKind::Invulnerability => self.on_invulnerability_tick(),
            TimerKind::Animation(kind) => self.on_animation_tick(kind),
        }
        self.process_sim_events();
    }

    /// Apply a directional command. Ignored unless the player is in control.
    pub fn handle_command(&mut self, command: MoveCommand) {
        if self.phase != SessionPhase::Playing {
            log::trace!("Ignoring {command:?} while {:?}", self.phase);
            return;
        }

        let heading = command.heading();
        match self.player.try_move(heading, &self.bounds) {
            MoveOutcome::Moved => {
                if let Some(event) = self.player.play_movement_pulse() {
                    self.push_animation_event(AnimationKind::Movement, event);
                }
                self.sim_events.push_back(SimEvent::PlayerMoved);
            }
            MoveOutcome::Blocked => {
                self.play(SoundEffect::WallCollision);
                self.emit(GameEvent::Bumped(heading));
            }
        }
        self.process_sim_events();
    }

    /// One placement per entity: obstacles, goals, power-ups, then the player
    pub fn placements(&self) -> Vec<Placement> {
        let mut placements = Vec::new();
        for obstacle in self.level.obstacles() {
            placements.push(placement(obstacle, obstacle.kind().sprite(), obstacle.is_mirrored()));
        }
        for goal in self.goals.goals() {
            placements.push(placement(goal, goal.sprite(), false));
        }
        for power_up in self.power_ups.power_ups() {
            placements.push(placement(power_up, power_up.kind().sprite(), false));
        }
        placements.push(placement(&self.player, self.player.sprite(), false));
        placements
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.present(&self.placements());
    }

    // === Timer handlers ===

    fn on_game_tick(&mut self) {
        match self.phase {
            SessionPhase::GameOver => return,
            SessionPhase::LevelTransition => self.phase = SessionPhase::Playing,
            SessionPhase::Playing | SessionPhase::Dying => {}
        }
        self.game_ticks += 1;

        self.level.move_obstacles();
        self.level.carry_rider(&mut self.player);

        self.detect_collisions();
        self.check_top_wall();
        let rules = Rc::clone(&self.rules);
        rules.water.evaluate(self);
        self.check_goals();
        self.reveal_pooled_obstacles();
    }

    fn on_countdown_tick(&mut self) {
        if !self.is_active() || self.restarted_this_instant(self.countdown_restarted_at) {
            return;
        }

        self.countdown_ticks += 1;
        if let Some(kind) = self.power_ups.on_countdown_tick(self.countdown_ticks) {
            self.emit(GameEvent::PowerUpRevealed(kind));
        }
        self.emit(GameEvent::CountdownUpdated(self.countdown_ticks));

        if self.countdown_ticks >= self.settings.life_countdown_secs {
            self.play(SoundEffect::TimerComplete);
            self.kill_player("ran out of time");
        }
    }

    fn on_invulnerability_tick(&mut self) {
        if self.restarted_this_instant(self.invulnerability_granted_at) {
            return;
        }
        let Some(elapsed) = self.player.tick_invulnerability() else {
            return;
        };
        self.emit(GameEvent::InvulnerabilityUpdated(elapsed));
        if self.player.invulnerability_expired() {
            self.end_invulnerability();
        }
    }

    fn on_animation_tick(&mut self, kind: AnimationKind) {
        if let Some(event) = self.player.animation_mut(kind).tick() {
            self.push_animation_event(kind, event);
        }
    }

    fn push_animation_event(&mut self, kind: AnimationKind, event: AnimationEvent) {
        let event = match event {
            AnimationEvent::Started => SimEvent::AnimationStarted(kind),
            AnimationEvent::Ended => SimEvent::AnimationEnded(kind),
        };
        self.sim_events.push_back(event);
    }

    fn process_sim_events(&mut self) {
        while let Some(event) = self.sim_events.pop_front() {
            match event {
                SimEvent::AnimationStarted(kind) => {
                    let interval_ms = self.player.animation(kind).frame_interval_ms();
                    self.start_timer(TimerKind::Animation(kind), interval_ms);
                    if kind == AnimationKind::Death {
                        self.player.stop_movement();
                    }
                }
                SimEvent::AnimationEnded(kind) => {
                    self.stop_timer(TimerKind::Animation(kind));
                    if kind == AnimationKind::Death {
                        self.finish_death();
                    }
                }
                SimEvent::PlayerMoved => {
                    if self.level.dismount(&mut self.player) {
                        log::trace!("Player hopped off a platform");
                    }
                }
            }
        }
    }

    // === Collisions ===

    /// Everything currently touching the player
    fn contacts(&self) -> Vec<Contact> {
        let player: &dyn Collidable = &self.player;
        let mut contacts = Vec::new();

        for (lane, row) in self.level.lanes().iter().enumerate() {
            for (index, obstacle) in row.obstacles().iter().enumerate() {
                if obstacle.body().visible && obstacle.overlaps(player) {
                    contacts.push(Contact::Obstacle {
                        lane,
                        index,
                        kind: obstacle.kind(),
                    });
                }
            }
        }
        for (index, goal) in self.goals.goals().iter().enumerate() {
            if goal.overlaps(player) {
                contacts.push(Contact::Goal(index));
            }
        }
        for (index, power_up) in self.power_ups.power_ups().iter().enumerate() {
            if power_up.overlaps(player) {
                contacts.push(Contact::PowerUp {
                    index,
                    kind: power_up.kind(),
                });
            }
        }
        contacts
    }

    /// Re-test a contact; an earlier rule may have moved or killed the player
    fn still_touching(&self, contact: Contact) -> bool {
        let player: &dyn Collidable = &self.player;
        match contact {
            Contact::Obstacle { lane, index, .. } => self
                .level
                .obstacle(lane, index)
                .is_some_and(|obstacle| obstacle.body().visible && obstacle.overlaps(player)),
            Contact::Goal(index) => self
                .goals
                .goals()
                .get(index)
                .is_some_and(|goal| goal.overlaps(player)),
            Contact::PowerUp { index, .. } => self
                .power_ups
                .get(index)
                .is_some_and(|power_up| power_up.overlaps(player)),
        }
    }

    fn detect_collisions(&mut self) {
        let rules = Rc::clone(&self.rules);
        for contact in self.contacts() {
            if self.is_game_over() || !self.still_touching(contact) {
                continue;
            }
            self.contact = Some(contact);
            rules.for_contact(contact).evaluate(self);
            self.contact = None;
        }
    }

    /// Reaching the top line anywhere but a goal is fatal, invulnerable or not
    fn check_top_wall(&mut self) {
        if !self.is_active() || self.player.is_dying() {
            return;
        }
        if self.player.y() <= self.settings.top_road_y {
            self.play(SoundEffect::WallCollision);
            self.kill_player("hit the top wall");
        }
    }

    fn player_in_lanes(&self) -> bool {
        self.player.y()
            < self.settings.playfield_height - self.player.body().height() - self.settings.bottom_lane_offset
    }

    fn mount_player(&mut self) {
        let Some(Contact::Obstacle { lane, index, .. }) = self.contact else {
            return;
        };
        if let Some(platform) = self.level.obstacle_mut(lane, index) {
            if platform.mount(&mut self.player) {
                log::trace!("Player mounted {:?} at x={}", platform.kind(), platform.x());
            }
        }
    }

    fn reach_goal(&mut self) {
        let Some(Contact::Goal(index)) = self.contact else {
            return;
        };
        let Some(goal) = self.goals.get_mut(index) else {
            return;
        };
        if !goal.try_fill() {
            return;
        }

        self.emit(GameEvent::GoalFilled(index));
        self.play(SoundEffect::PlayerAtHome);
        let seconds_left = self
            .settings
            .life_countdown_secs
            .saturating_sub(self.countdown_ticks);
        let score = self.player.add_score(seconds_left, self.score_multiplier);
        self.emit(GameEvent::ScoreChanged(score));
        log::debug!(
            "Goal {} filled ({}/{}), score {}",
            index,
            self.goals.filled_count(),
            self.goals.len(),
            score
        );

        self.return_player_to_start();
        self.reset_countdown();
    }

    /// Mark the touched power-up collected. Returns false if it already was.
    fn collect_power_up(&mut self) -> bool {
        let Some(Contact::PowerUp { index, kind }) = self.contact else {
            return false;
        };
        let collected = self
            .power_ups
            .get_mut(index)
            .is_some_and(|power_up| power_up.try_collect());
        if collected {
            self.play(SoundEffect::PowerUp);
            self.emit(GameEvent::PowerUpCollected(kind));
            log::debug!("Collected {}", kind.as_str());
        }
        collected
    }

    fn wind_back_countdown(&mut self) {
        self.countdown_ticks = self
            .countdown_ticks
            .saturating_sub(self.settings.bonus_time_secs);
        self.emit(GameEvent::CountdownUpdated(self.countdown_ticks));
    }

    fn grant_invulnerability(&mut self) {
        self.player.grant_invulnerability();
        self.invulnerability_granted_at = Some(self.game_ticks);
        self.emit(GameEvent::InvulnerabilityStarted);
        self.start_timer(TimerKind::Invulnerability, INVULNERABILITY_TICK_MS);
        log::debug!("Invulnerable for {}s", self.settings.invulnerability_secs);
    }

    fn end_invulnerability(&mut self) {
        if self.player.clear_invulnerability() {
            self.stop_timer(TimerKind::Invulnerability);
            self.emit(GameEvent::InvulnerabilityEnded);
            log::debug!("Invulnerability ended");
        }
    }

    // === Progression ===

    fn check_goals(&mut self) {
        if self.is_game_over() || !self.goals.all_filled() {
            return;
        }
        if self.settings.is_last_level(self.level.id()) {
            log::info!("Final level complete");
            self.game_over();
        } else {
            self.complete_level();
        }
    }

    fn complete_level(&mut self) {
        if self.level.is_water() {
            self.emit(GameEvent::WaterLevelEnded);
        }
        self.play(SoundEffect::CompleteLevel);
        self.goals.clear_all();
        self.end_invulnerability();

        let next = self.level.id() + 1;
        if self.settings.is_water_level(next) {
            self.emit(GameEvent::WaterLevelStarted);
        }
        self.return_player_to_start();

        match Level::build(&self.settings, next, &mut self.ids) {
            Ok(level) => self.level = level,
            Err(err) => {
                log::error!("Cannot build level {}: {}", next + 1, err);
                self.game_over();
                return;
            }
        }
        self.power_ups.reset_all();
        self.reveal_pending = false;
        self.phase = SessionPhase::LevelTransition;

        log::info!("Level {} complete, starting level {}", next, next + 1);
        self.emit(GameEvent::LevelStarted(next as u32 + 1));
    }

    /// Pooled traffic appears every few ticks, or every tick until something shows up
    fn reveal_pooled_obstacles(&mut self) {
        if self.level.is_water() || self.is_game_over() {
            return;
        }
        let frequency = self.settings.obstacle_reveal_frequency.max(1);
        if self.game_ticks % frequency != 0 && !self.reveal_pending {
            return;
        }
        let revealed = self.level.reveal_offscreen();
        if revealed > 0 {
            log::debug!("Revealed {revealed} pooled obstacles");
        }
        self.reveal_pending = revealed == 0;
    }

    // === Lives ===

    /// Start the death sequence. At most one runs at a time.
    fn kill_player(&mut self, cause: &str) {
        if !self.is_active() || self.player.is_dying() {
            return;
        }
        log::debug!("Player died: {cause}");

        self.level.clear_riders(&mut self.player);
        self.stop_timer(TimerKind::LifeCountdown);
        self.end_invulnerability();
        let lives = self.player.lose_life();
        self.emit(GameEvent::LivesChanged(lives));
        self.phase = SessionPhase::Dying;

        if let Some(event) = self.player.animation_mut(AnimationKind::Death).play() {
            self.push_animation_event(AnimationKind::Death, event);
        }
    }

    fn finish_death(&mut self) {
        if self.phase != SessionPhase::Dying {
            return;
        }
        if self.player.lives() == 0 {
            self.game_over();
            return;
        }

        self.level.reset_lanes();
        self.reveal_pending = false;
        self.return_player_to_start();
        if let Err(err) = self.player.start_movement() {
            log::warn!("Player cannot move: {err}");
        }
        self.reset_countdown();
        self.phase = SessionPhase::Playing;
        log::debug!("Respawned with {} lives", self.player.lives());
    }

    fn game_over(&mut self) {
        if self.is_game_over() {
            return;
        }
        self.phase = SessionPhase::GameOver;

        self.stop_timer(TimerKind::Game);
        self.stop_timer(TimerKind::LifeCountdown);
        self.player.stop_movement();
        self.end_invulnerability();
        self.player.body_mut().visible = false;

        self.play(SoundEffect::GameOver);
        self.emit(GameEvent::GameOver(true));
        log::info!(
            "Game over: score {} on level {}",
            self.player.score(),
            self.level.id() + 1
        );
    }

    // === Helpers ===

    /// Playing or between levels; the countdown runs and deaths are possible
    fn is_active(&self) -> bool {
        matches!(
            self.phase,
            SessionPhase::Playing | SessionPhase::LevelTransition
        )
    }

    /// A 1s timer restarted on the current game tick cannot be due yet; a
    /// tick arriving now was collected before the restart.
    fn restarted_this_instant(&self, restarted_at: Option<u64>) -> bool {
        restarted_at == Some(self.game_ticks)
    }

    fn return_player_to_start(&mut self) {
        self.level.clear_riders(&mut self.player);
        let start = self.settings.start_position(self.player.body().size());
        self.player.place_at(start);
    }

    fn reset_countdown(&mut self) {
        self.countdown_ticks = 0;
        self.countdown_restarted_at = Some(self.game_ticks);
        self.start_timer(TimerKind::LifeCountdown, COUNTDOWN_TICK_MS);
        self.emit(GameEvent::CountdownUpdated(0));
    }

    fn emit(&mut self, event: GameEvent) {
        self.outbox.push_back(Outbound::Event(event));
    }

    fn play(&mut self, effect: SoundEffect) {
        self.outbox.push_back(Outbound::Sound(effect));
    }

    fn start_timer(&mut self, timer: TimerKind, interval_ms: u32) {
        self.outbox.push_back(Outbound::StartTimer { timer, interval_ms });
    }

    fn stop_timer(&mut self, timer: TimerKind) {
        self.outbox.push_back(Outbound::StopTimer(timer));
    }
}

fn placement(entity: &dyn Entity, sprite: Sprite, mirrored: bool) -> Placement {
    let body = entity.body();
    Placement {
        id: entity.id(),
        sprite,
        pos: body.pos,
        rotation: body.rotation,
        mirrored,
        visible: body.visible,
        z: body.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BASE_Z, RIDER_Z};
    use crate::sim::entity::Heading;
    use glam::Vec2;

    fn session() -> Session {
        let mut session = Session::new(GameSettings::default(), Difficulty::Normal, 11).unwrap();
        session.drain_outbound();
        session
    }

    fn clear_traffic(session: &mut Session) {
        for obstacle in session.level.obstacles_mut() {
            obstacle.body_mut().visible = false;
        }
    }

    fn events(outbound: &[Outbound]) -> Vec<GameEvent> {
        outbound
            .iter()
            .filter_map(|message| match message {
                Outbound::Event(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    fn sounds(outbound: &[Outbound]) -> Vec<SoundEffect> {
        outbound
            .iter()
            .filter_map(|message| match message {
                Outbound::Sound(effect) => Some(*effect),
                _ => None,
            })
            .collect()
    }

    /// Run the death animation to its end
    fn finish_death_animation(session: &mut Session) {
        for _ in 0..5 {
            session.on_timer(TimerKind::Animation(AnimationKind::Death));
        }
    }

    #[test]
    fn test_startup_outbound() {
        let mut session = Session::new(GameSettings::default(), Difficulty::Normal, 1).unwrap();
        let outbound = session.drain_outbound();
        assert_eq!(
            events(&outbound),
            vec![
                GameEvent::LevelStarted(1),
                GameEvent::LivesChanged(4),
                GameEvent::ScoreChanged(0),
                GameEvent::CountdownUpdated(0),
            ]
        );
        assert!(outbound.contains(&Outbound::StartTimer {
            timer: TimerKind::Game,
            interval_ms: 15
        }));
        assert!(outbound.contains(&Outbound::StartTimer {
            timer: TimerKind::LifeCountdown,
            interval_ms: 1000
        }));
        assert_eq!(session.player().body().pos, Vec2::new(300.0, 445.0));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = GameSettings {
            playfield_height: -5.0,
            ..Default::default()
        };
        assert_eq!(
            Session::new(settings, Difficulty::Normal, 1).unwrap_err(),
            SetupError::PlayfieldHeight(-5.0)
        );
    }

    #[test]
    fn test_bump_at_bottom_edge() {
        let mut session = session();
        session.handle_command(MoveCommand::MoveDown);
        let outbound = session.drain_outbound();
        assert_eq!(sounds(&outbound), vec![SoundEffect::WallCollision]);
        assert_eq!(events(&outbound), vec![GameEvent::Bumped(Heading::Down)]);
        assert_eq!(session.player().y(), 445.0);
    }

    #[test]
    fn test_accepted_move_pulses_once() {
        let mut session = session();
        session.handle_command(MoveCommand::MoveUp);
        assert_eq!(session.player().y(), 395.0);
        assert_eq!(
            session.drain_outbound(),
            vec![Outbound::StartTimer {
                timer: TimerKind::Animation(AnimationKind::Movement),
                interval_ms: 45
            }]
        );
        assert_eq!(session.player().sprite(), Sprite::Frog);

        session.on_timer(TimerKind::Animation(AnimationKind::Movement));
        assert_eq!(session.player().sprite(), Sprite::FrogHop);
        session.on_timer(TimerKind::Animation(AnimationKind::Movement));
        assert_eq!(
            session.drain_outbound(),
            vec![Outbound::StopTimer(TimerKind::Animation(AnimationKind::Movement))]
        );
        assert_eq!(session.player().sprite(), Sprite::Frog);
    }

    #[test]
    fn test_vehicle_kills_unless_invulnerable() {
        let mut session = session();
        clear_traffic(&mut session);
        session.handle_command(MoveCommand::MoveUp);
        let car = session.level.obstacle_mut(0, 0).unwrap();
        car.body_mut().visible = true;
        car.body_mut().pos.x = 300.0;

        session.player.grant_invulnerability();
        session.on_timer(TimerKind::Game);
        assert_eq!(session.phase(), SessionPhase::Playing);

        session.player.clear_invulnerability();
        session.drain_outbound();
        session.on_timer(TimerKind::Game);
        let outbound = session.drain_outbound();
        assert_eq!(session.phase(), SessionPhase::Dying);
        assert_eq!(session.player().lives(), 3);
        assert_eq!(sounds(&outbound), vec![SoundEffect::ObstacleCollision]);
        assert!(outbound.contains(&Outbound::StopTimer(TimerKind::LifeCountdown)));
        assert!(outbound.contains(&Outbound::StartTimer {
            timer: TimerKind::Animation(AnimationKind::Death),
            interval_ms: 250
        }));
        assert!(!session.player().is_controllable());
    }

    #[test]
    fn test_top_wall_is_fatal_even_when_invulnerable() {
        let mut session = session();
        clear_traffic(&mut session);
        session.player.grant_invulnerability();
        session.player.place_at(Vec2::new(75.0, 145.0));
        session.on_timer(TimerKind::Game);
        let outbound = session.drain_outbound();
        assert_eq!(session.phase(), SessionPhase::Dying);
        assert!(sounds(&outbound).contains(&SoundEffect::WallCollision));
        assert!(events(&outbound).contains(&GameEvent::InvulnerabilityEnded));
    }

    #[test]
    fn test_goal_scores_remaining_seconds() {
        let mut session = session();
        clear_traffic(&mut session);
        for _ in 0..5 {
            session.on_timer(TimerKind::LifeCountdown);
        }
        session.drain_outbound();

        session.player.place_at(Vec2::new(300.0, 145.0));
        session.on_timer(TimerKind::Game);
        let outbound = session.drain_outbound();
        let events = events(&outbound);
        assert!(events.contains(&GameEvent::GoalFilled(2)));
        assert!(events.contains(&GameEvent::ScoreChanged(150)));
        assert_eq!(sounds(&outbound), vec![SoundEffect::PlayerAtHome]);
        assert_eq!(session.player().body().pos, Vec2::new(300.0, 445.0));
        assert_eq!(session.countdown_ticks(), 0);
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_countdown_expiry_then_respawn() {
        let mut session = session();
        clear_traffic(&mut session);
        session.handle_command(MoveCommand::MoveUp);
        for _ in 0..20 {
            session.on_timer(TimerKind::LifeCountdown);
        }
        let outbound = session.drain_outbound();
        assert!(sounds(&outbound).contains(&SoundEffect::TimerComplete));
        assert_eq!(session.phase(), SessionPhase::Dying);

        // Stale countdown tick and commands while dying change nothing
        session.on_timer(TimerKind::LifeCountdown);
        session.handle_command(MoveCommand::MoveLeft);
        assert_eq!(session.countdown_ticks(), 20);
        assert_eq!(session.player().x(), 300.0);

        finish_death_animation(&mut session);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert_eq!(session.player().lives(), 3);
        assert_eq!(session.player().body().pos, Vec2::new(300.0, 445.0));
        assert_eq!(session.countdown_ticks(), 0);
        assert!(session.player().is_controllable());
    }

    #[test]
    fn test_bonus_time_power_up() {
        let mut session = session();
        clear_traffic(&mut session);
        for _ in 0..4 {
            session.on_timer(TimerKind::LifeCountdown);
        }
        session.power_ups.get_mut(0).unwrap().reveal();
        session.player.place_at(Vec2::new(395.0, 295.0));
        session.drain_outbound();

        session.on_timer(TimerKind::Game);
        let outbound = session.drain_outbound();
        assert_eq!(sounds(&outbound), vec![SoundEffect::PowerUp]);
        assert_eq!(
            events(&outbound),
            vec![
                GameEvent::PowerUpCollected(PowerUpKind::BonusTime),
                GameEvent::CountdownUpdated(0),
            ]
        );
        assert!(session.power_ups().get(0).unwrap().is_collected());

        // One-shot
        session.on_timer(TimerKind::Game);
        assert!(sounds(&session.drain_outbound()).is_empty());
    }

    #[test]
    fn test_invulnerability_power_up_counts_down() {
        let mut session = session();
        clear_traffic(&mut session);
        session.power_ups.get_mut(1).unwrap().reveal();
        session.player.place_at(Vec2::new(95.0, 195.0));
        session.on_timer(TimerKind::Game);
        let outbound = session.drain_outbound();
        assert!(events(&outbound).contains(&GameEvent::InvulnerabilityStarted));
        assert!(outbound.contains(&Outbound::StartTimer {
            timer: TimerKind::Invulnerability,
            interval_ms: 1000
        }));

        for _ in 0..5 {
            session.on_timer(TimerKind::Game);
            session.on_timer(TimerKind::Invulnerability);
        }
        let outbound = session.drain_outbound();
        assert_eq!(
            events(&outbound),
            vec![
                GameEvent::InvulnerabilityUpdated(1),
                GameEvent::InvulnerabilityUpdated(2),
                GameEvent::InvulnerabilityUpdated(3),
                GameEvent::InvulnerabilityUpdated(4),
                GameEvent::InvulnerabilityUpdated(5),
                GameEvent::InvulnerabilityEnded,
            ]
        );
        assert!(outbound.contains(&Outbound::StopTimer(TimerKind::Invulnerability)));

        // Late tick after the stop
        session.on_timer(TimerKind::Invulnerability);
        assert!(session.drain_outbound().is_empty());
    }

    #[test]
    fn test_invulnerability_tick_on_grant_instant_is_ignored() {
        let mut session = session();
        clear_traffic(&mut session);
        session.power_ups.get_mut(1).unwrap().reveal();
        session.player.place_at(Vec2::new(95.0, 195.0));

        // Collected on a game tick, with an invulnerability tick due at the same instant
        session.on_timer(TimerKind::Game);
        session.on_timer(TimerKind::Invulnerability);
        let first = events(&session.drain_outbound());
        assert!(first.contains(&GameEvent::InvulnerabilityStarted));
        assert!(!first
            .iter()
            .any(|event| matches!(event, GameEvent::InvulnerabilityUpdated(_))));

        session.on_timer(TimerKind::Game);
        session.on_timer(TimerKind::Invulnerability);
        assert_eq!(
            events(&session.drain_outbound()),
            vec![GameEvent::InvulnerabilityUpdated(1)]
        );
    }

    #[test]
    fn test_countdown_tick_on_goal_instant_is_ignored() {
        let mut session = session();
        clear_traffic(&mut session);
        session.on_timer(TimerKind::LifeCountdown);
        session.player.place_at(Vec2::new(300.0, 145.0));

        session.on_timer(TimerKind::Game);
        session.on_timer(TimerKind::LifeCountdown);
        assert_eq!(session.countdown_ticks(), 0);

        session.on_timer(TimerKind::Game);
        session.on_timer(TimerKind::LifeCountdown);
        assert_eq!(session.countdown_ticks(), 1);
    }

    #[test]
    fn test_level_transition_lasts_one_tick() {
        let mut session = session();
        session.complete_level();
        assert_eq!(session.phase(), SessionPhase::LevelTransition);
        assert_eq!(session.level().id(), 1);
        session.handle_command(MoveCommand::MoveUp);
        assert_eq!(session.player().y(), 445.0);

        session.on_timer(TimerKind::Game);
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_water_level_events() {
        let mut session = session();
        session.complete_level();
        session.drain_outbound();
        session.complete_level();
        let events = events(&session.drain_outbound());
        assert!(events.contains(&GameEvent::WaterLevelStarted));
        assert!(events.contains(&GameEvent::LevelStarted(3)));
        assert!(session.level().is_water());
    }

    fn water_session() -> Session {
        let mut session = session();
        session.complete_level();
        session.complete_level();
        session.on_timer(TimerKind::Game);
        session.drain_outbound();
        session
    }

    #[test]
    fn test_open_water_is_fatal() {
        let mut session = water_session();
        // Lily pads in the first lane sit at x = 56, 218, 380, 542 (+ drift)
        session.player.place_at(Vec2::new(300.0, 445.0));
        session.handle_command(MoveCommand::MoveUp);
        session.on_timer(TimerKind::Game);
        assert_eq!(session.phase(), SessionPhase::Dying);
        assert!(sounds(&session.drain_outbound()).contains(&SoundEffect::FallInWater));
    }

    #[test]
    fn test_shoulder_is_dry_and_invulnerability_keeps_player_afloat() {
        let mut session = water_session();
        session.player.place_at(Vec2::new(300.0, 445.0));
        session.on_timer(TimerKind::Game);
        assert!(!session.player_in_lanes());
        assert_eq!(session.phase(), SessionPhase::Playing);

        session.player.grant_invulnerability();
        session.handle_command(MoveCommand::MoveUp);
        session.on_timer(TimerKind::Game);
        assert!(session.player_in_lanes());
        assert!(!session.level().is_riding(PLAYER_ID));
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(!sounds(&session.drain_outbound()).contains(&SoundEffect::FallInWater));
    }

    #[test]
    fn test_platform_carries_player() {
        let mut session = water_session();
        let pad_x = session.level().obstacle(0, 2).unwrap().x();
        session.player.place_at(Vec2::new(pad_x, 445.0));
        session.handle_command(MoveCommand::MoveUp);

        session.on_timer(TimerKind::Game);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(session.level().is_riding(PLAYER_ID));
        assert_eq!(session.player().body().z, RIDER_Z);
        let offset = session.level().obstacle(0, 2).unwrap().x() - session.player().x();

        for _ in 0..10 {
            session.on_timer(TimerKind::Game);
        }
        let pad_x = session.level().obstacle(0, 2).unwrap().x();
        assert_eq!(session.player().x(), pad_x - offset);
        assert_eq!(session.phase(), SessionPhase::Playing);

        // A voluntary hop releases the rider
        session.handle_command(MoveCommand::MoveDown);
        assert!(!session.level().is_riding(PLAYER_ID));
        assert_eq!(session.player().body().z, BASE_Z);
    }

    #[test]
    fn test_score_record() {
        let mut session = session();
        session.player.add_score(12, 10);
        let record = session.score_record("frog");
        assert_eq!(record, HighScoreRecord::new(120, "frog", 1));
    }

    #[test]
    fn test_placements_cover_every_entity() {
        let session = session();
        let placements = session.placements();
        let obstacles = session.level().obstacles().count();
        assert_eq!(placements.len(), obstacles + 5 + 2 + 1);
        let player = placements.last().unwrap();
        assert_eq!(player.id, PLAYER_ID);
        assert_eq!(player.sprite, Sprite::Frog);
        assert!(placements.iter().any(|p| p.mirrored));
    }
}
