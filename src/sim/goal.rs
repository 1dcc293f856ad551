//! Goal slots ("homes") along the top of the board

use glam::Vec2;

use super::entity::{Body, Collidable, Entity, EntityId, IdSequence, Sprite};
use super::geometry::Rect;
use crate::consts::{GOAL_CUSHION, GOAL_SIZE};
use crate::error::SetupError;
use crate::settings::GameSettings;

/// A landing slot. Once filled it stays filled until the row is cleared.
#[derive(Debug, Clone)]
pub struct Goal {
    id: EntityId,
    body: Body,
    filled: bool,
}

impl Goal {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::splat(GOAL_SIZE)),
            filled: false,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Mark the slot filled. Returns false if it already was.
    pub fn try_fill(&mut self) -> bool {
        if self.filled {
            return false;
        }
        self.filled = true;
        true
    }

    pub fn clear(&mut self) {
        self.filled = false;
    }

    pub fn sprite(&self) -> Sprite {
        if self.filled {
            Sprite::GoalFilled
        } else {
            Sprite::GoalEmpty
        }
    }
}

impl Entity for Goal {
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

impl Collidable for Goal {
    /// Only the central band counts
    fn hit_box(&self) -> Rect {
        self.body.bounds().narrowed(GOAL_CUSHION)
    }

    fn overlaps(&self, other: &dyn Collidable) -> bool {
        !self.filled && other.in_play() && self.hit_box().intersects(&other.body().bounds())
    }
}

/// Fixed row of goals spread across the top road line
#[derive(Debug, Clone)]
pub struct GoalRow {
    goals: Vec<Goal>,
}

impl GoalRow {
    /// Lay out `goal_count` slots on the player-step tile grid with equal
    /// whole-tile gaps between them
    pub fn new(settings: &GameSettings, ids: &mut IdSequence) -> Result<Self, SetupError> {
        let count = settings.goal_count;
        if count == 0 {
            return Err(SetupError::NoGoals);
        }
        let tile = settings.player_step;
        if tile <= 0.0 {
            return Err(SetupError::TileWidth(tile));
        }

        let y = settings.top_road_y;
        let goals = if count == 1 {
            let x = (settings.playfield_width - GOAL_SIZE) / 2.0;
            vec![Goal::new(ids.next_id(), Vec2::new(x, y))]
        } else {
            let tiles = (settings.playfield_width / tile) as usize;
            let gap_tiles = tiles.saturating_sub(count) / (count - 1);
            let gap = tile * gap_tiles as f32;

            let mut x = 0.0;
            let mut goals = Vec::with_capacity(count);
            for _ in 0..count {
                goals.push(Goal::new(ids.next_id(), Vec2::new(x, y)));
                x += gap + GOAL_SIZE;
            }
            goals
        };

        Ok(Self { goals })
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Goal> {
        self.goals.get_mut(index)
    }

    pub fn filled_count(&self) -> usize {
        self.goals.iter().filter(|goal| goal.is_filled()).count()
    }

    pub fn all_filled(&self) -> bool {
        self.goals.iter().all(Goal::is_filled)
    }

    pub fn clear_all(&mut self) {
        for goal in &mut self.goals {
            goal.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Visitor {
        body: Body,
    }

    impl Entity for Visitor {
        fn id(&self) -> EntityId {
            EntityId(0)
        }
        fn body(&self) -> &Body {
            &self.body
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
    }

    impl Collidable for Visitor {}

    fn visitor_at(x: f32, y: f32) -> Visitor {
        Visitor {
            body: Body::new(Vec2::new(x, y), Vec2::splat(50.0)),
        }
    }

    fn row() -> GoalRow {
        GoalRow::new(&GameSettings::default(), &mut IdSequence::default()).unwrap()
    }

    #[test]
    fn test_default_row_layout() {
        let row = row();
        let xs: Vec<f32> = row.goals().iter().map(|goal| goal.x()).collect();
        assert_eq!(xs, vec![0.0, 150.0, 300.0, 450.0, 600.0]);
        assert!(row.goals().iter().all(|goal| goal.y() == 145.0));
    }

    #[test]
    fn test_centered_player_fills_cushion_does_not() {
        let goal = Goal::new(EntityId(1), Vec2::new(300.0, 145.0));
        assert!(goal.overlaps(&visitor_at(300.0, 145.0)));
        // Overlaps the goal only inside its right-hand cushion
        assert!(!goal.overlaps(&visitor_at(328.0, 145.0)));
        // Overlaps the goal only inside its left-hand cushion
        assert!(!goal.overlaps(&visitor_at(252.0, 145.0)));
    }

    #[test]
    fn test_filled_goal_is_never_hit_again() {
        let mut goal = Goal::new(EntityId(1), Vec2::new(300.0, 145.0));
        assert!(goal.try_fill());
        assert!(!goal.try_fill());
        assert!(!goal.overlaps(&visitor_at(300.0, 145.0)));
        assert_eq!(goal.sprite(), Sprite::GoalFilled);
    }

    #[test]
    fn test_row_fill_and_clear() {
        let mut row = row();
        for index in 0..row.len() {
            assert!(!row.all_filled());
            row.get_mut(index).unwrap().try_fill();
        }
        assert!(row.all_filled());
        assert_eq!(row.filled_count(), 5);

        row.clear_all();
        assert_eq!(row.filled_count(), 0);
    }

    #[test]
    fn test_empty_row_rejected() {
        let settings = GameSettings {
            goal_count: 0,
            ..Default::default()
        };
        assert_eq!(
            GoalRow::new(&settings, &mut IdSequence::default()).unwrap_err(),
            SetupError::NoGoals
        );
    }
}
