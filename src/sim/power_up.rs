//! One-shot collectibles and their randomized reveal
//!
//! Power-ups are pooled: the director owns one of each kind for the whole
//! session, reveals a random eligible one at a random countdown second and
//! hides them all again when a level is reset.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Collidable, Entity, EntityId, IdSequence, Sprite};
use crate::consts::POWER_UP_SIZE;
use crate::settings::GameSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Winds the life countdown back
    BonusTime,
    /// Temporary immunity to vehicles and water
    Invulnerability,
}

impl PowerUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::BonusTime => "Bonus Time",
            PowerUpKind::Invulnerability => "Invulnerability",
        }
    }

    pub fn sprite(&self) -> Sprite {
        match self {
            PowerUpKind::BonusTime => Sprite::BonusTime,
            PowerUpKind::Invulnerability => Sprite::Invulnerability,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    id: EntityId,
    kind: PowerUpKind,
    body: Body,
    collected: bool,
}

impl PowerUp {
    /// Hidden and uncollected until revealed
    pub fn new(id: EntityId, kind: PowerUpKind, pos: Vec2) -> Self {
        let mut body = Body::new(pos, Vec2::splat(POWER_UP_SIZE));
        body.visible = false;
        Self {
            id,
            kind,
            body,
            collected: false,
        }
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Hidden and still collectible
    pub fn is_eligible(&self) -> bool {
        !self.body.visible && !self.collected
    }

    pub fn reveal(&mut self) {
        self.body.visible = true;
    }

    /// Collect once; the power-up stays hidden for the rest of the level
    pub fn try_collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        self.body.visible = false;
        true
    }

    pub fn reset(&mut self) {
        self.collected = false;
        self.body.visible = false;
    }
}

impl Entity for PowerUp {
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

impl Collidable for PowerUp {
    fn in_play(&self) -> bool {
        self.body.visible && !self.collected
    }

    fn overlaps(&self, other: &dyn Collidable) -> bool {
        self.in_play() && other.in_play() && self.hit_box().intersects(&other.body().bounds())
    }
}

/// Owns the power-up pool and decides when one appears
#[derive(Debug, Clone)]
pub struct PowerUpDirector {
    power_ups: Vec<PowerUp>,
    rng: Pcg32,
    countdown_secs: u32,
    reveal_at: u32,
}

impl PowerUpDirector {
    pub fn new(settings: &GameSettings, ids: &mut IdSequence, seed: u64) -> Self {
        let power_ups = vec![
            PowerUp::new(ids.next_id(), PowerUpKind::BonusTime, settings.bonus_time_spawn),
            PowerUp::new(
                ids.next_id(),
                PowerUpKind::Invulnerability,
                settings.invulnerability_spawn,
            ),
        ];
        let mut director = Self {
            power_ups,
            rng: Pcg32::seed_from_u64(seed),
            countdown_secs: settings.life_countdown_secs.max(1),
            reveal_at: 0,
        };
        director.reveal_at = director.draw_reveal_tick();
        director
    }

    /// Countdown second at which the next reveal happens
    pub fn reveal_at(&self) -> u32 {
        self.reveal_at
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn get(&self, index: usize) -> Option<&PowerUp> {
        self.power_ups.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PowerUp> {
        self.power_ups.get_mut(index)
    }

    /// Uniform over `[countdown / 4, countdown)`
    fn draw_reveal_tick(&mut self) -> u32 {
        self.rng
            .random_range(self.countdown_secs / 4..self.countdown_secs)
    }

    /// Called on every life-countdown second with the seconds elapsed.
    /// Returns the kind revealed, if any.
    pub fn on_countdown_tick(&mut self, elapsed: u32) -> Option<PowerUpKind> {
        if elapsed != self.reveal_at {
            return None;
        }

        let eligible: Vec<usize> = self
            .power_ups
            .iter()
            .enumerate()
            .filter(|(_, power_up)| power_up.is_eligible())
            .map(|(index, _)| index)
            .collect();

        let revealed = if eligible.is_empty() {
            None
        } else {
            let pick = eligible[self.rng.random_range(0..eligible.len())];
            let power_up = &mut self.power_ups[pick];
            power_up.reveal();
            log::debug!("Revealed power-up {}", power_up.kind().as_str());
            Some(power_up.kind())
        };

        self.reveal_at = self.draw_reveal_tick();
        revealed
    }

    /// Hide everything and make it collectible again
    pub fn reset_all(&mut self) {
        for power_up in &mut self.power_ups {
            power_up.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn director(seed: u64) -> PowerUpDirector {
        PowerUpDirector::new(&GameSettings::default(), &mut IdSequence::default(), seed)
    }

    #[test]
    fn test_pool_starts_hidden() {
        let director = director(1);
        assert_eq!(director.power_ups().len(), 2);
        assert!(director.power_ups().iter().all(PowerUp::is_eligible));
        assert_eq!(director.power_ups()[0].body().pos, Vec2::new(400.0, 305.0));
    }

    #[test]
    fn test_reveal_only_on_target_tick() {
        let mut director = director(7);
        let target = director.reveal_at();
        if target > 0 {
            assert_eq!(director.on_countdown_tick(target - 1), None);
            assert_eq!(director.reveal_at(), target);
        }
        assert!(director.on_countdown_tick(target).is_some());
        assert_eq!(
            director.power_ups().iter().filter(|p| p.body().visible).count(),
            1
        );
    }

    #[test]
    fn test_nothing_eligible_still_redraws() {
        let mut director = director(3);
        for index in 0..2 {
            director.get_mut(index).unwrap().try_collect();
        }
        let target = director.reveal_at();
        assert_eq!(director.on_countdown_tick(target), None);
        assert!((5..20).contains(&director.reveal_at()));
    }

    #[test]
    fn test_collect_is_one_shot_until_reset() {
        let mut director = director(3);
        let power_up = director.get_mut(1).unwrap();
        power_up.reveal();
        assert!(power_up.try_collect());
        assert!(!power_up.try_collect());
        assert!(!power_up.body().visible);
        assert!(!power_up.is_eligible());

        director.reset_all();
        assert!(director.power_ups().iter().all(PowerUp::is_eligible));
    }

    #[test]
    fn test_reveal_ticks_cover_window() {
        let mut director = director(42);
        let mut seen = [false; 20];
        for _ in 0..2000 {
            let target = director.reveal_at();
            seen[target as usize] = true;
            director.on_countdown_tick(target);
            director.reset_all();
        }
        assert!(seen[..5].iter().all(|hit| !hit));
        assert!(seen[5..].iter().all(|hit| *hit));
    }

    proptest! {
        #[test]
        fn prop_reveal_tick_in_window(seed in any::<u64>(), countdown in 1u32..120) {
            let settings = GameSettings {
                life_countdown_secs: countdown,
                ..Default::default()
            };
            let mut director = PowerUpDirector::new(&settings, &mut IdSequence::default(), seed);
            for _ in 0..8 {
                let target = director.reveal_at();
                prop_assert!(target >= countdown / 4 && target < countdown);
                director.on_countdown_tick(target);
            }
        }
    }
}
