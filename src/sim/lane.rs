//! Lanes and levels
//!
//! A lane is a fixed pool of obstacles sharing one speed. Only the first
//! obstacle starts visible; hidden ones are revealed once they have drifted
//! fully off screen, so traffic thickens without allocating anything.
//! A level stacks its lanes bottom to top above a shoulder row.

use super::entity::{Entity, EntityId, IdSequence};
use super::obstacle::{Obstacle, Rideable};
use crate::consts::{BASE_Z, SHOULDER_LANES};
use crate::error::SetupError;
use crate::settings::{GameSettings, LaneConfig};

#[derive(Debug, Clone)]
pub struct Lane {
    speed: f32,
    obstacles: Vec<Obstacle>,
    playfield_width: f32,
}

impl Lane {
    /// Take ownership of a pool and give every obstacle the lane speed
    pub fn new(speed: f32, mut obstacles: Vec<Obstacle>, playfield_width: f32) -> Result<Self, SetupError> {
        if speed < 0.0 {
            return Err(SetupError::NegativeSpeed(speed));
        }
        for obstacle in &mut obstacles {
            obstacle.set_lane_speed(speed)?;
        }
        Ok(Self {
            speed,
            obstacles,
            playfield_width,
        })
    }

    /// Build the pool a table row describes
    pub fn from_config(
        config: &LaneConfig,
        ids: &mut IdSequence,
        playfield_width: f32,
    ) -> Result<Self, SetupError> {
        let obstacles = (0..config.population)
            .map(|_| Obstacle::new(ids.next_id(), config.kind, config.direction))
            .collect();
        let mut lane = Self::new(config.speed, obstacles, playfield_width)?;
        lane.align_x();
        Ok(lane)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    /// Center each obstacle in an equal share of the playfield width
    pub fn align_x(&mut self) {
        if self.obstacles.is_empty() {
            return;
        }
        let gap = (self.playfield_width as u32 / self.obstacles.len() as u32) as f32;
        let mut start = 0.0;
        for obstacle in &mut self.obstacles {
            obstacle.body_mut().pos.x = (gap - obstacle.body().width()) / 2.0 + start;
            start += gap;
        }
    }

    /// Center each obstacle vertically in the lane band starting at `lane_top`
    pub fn align_y(&mut self, lane_height: f32, lane_top: f32) -> Result<(), SetupError> {
        if lane_height <= 0.0 {
            return Err(SetupError::LaneHeight(lane_height));
        }
        for obstacle in &mut self.obstacles {
            obstacle.body_mut().pos.y = (lane_height - obstacle.body().height()) / 2.0 + lane_top;
        }
        Ok(())
    }

    /// Hide everything but the first obstacle
    pub fn reset(&mut self) {
        for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
            obstacle.body_mut().visible = index == 0;
        }
    }

    /// Reveal hidden obstacles sitting fully off screen. Returns how many.
    pub fn reveal_offscreen(&mut self) -> usize {
        let width = self.playfield_width;
        let mut revealed = 0;
        for obstacle in &mut self.obstacles {
            if !obstacle.body().visible && obstacle.is_offscreen(width) {
                obstacle.body_mut().visible = true;
                revealed += 1;
            }
        }
        revealed
    }

    pub fn move_all(&mut self) {
        let width = self.playfield_width;
        for obstacle in &mut self.obstacles {
            obstacle.move_forward(width);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    id: usize,
    water: bool,
    lanes: Vec<Lane>,
}

impl Level {
    /// Build level `id` from its table row
    pub fn build(settings: &GameSettings, id: usize, ids: &mut IdSequence) -> Result<Self, SetupError> {
        let config = settings.level(id)?;
        let water = settings.is_water_level(id);

        let lane_count = config.lanes.len();
        let lane_height = settings.road_height() / (lane_count + SHOULDER_LANES) as f32;

        let mut lanes = Vec::with_capacity(lane_count);
        let mut lane_top = settings.bottom_baseline() - lane_height;
        for lane_config in &config.lanes {
            lane_top -= lane_height;
            let mut lane = Lane::from_config(lane_config, ids, settings.playfield_width)?;
            lane.align_y(lane_height, lane_top)?;
            lanes.push(lane);
        }

        let mut level = Self { id, water, lanes };
        level.reset_lanes();
        log::info!(
            "Built level {} ({} lanes{})",
            id + 1,
            lane_count,
            if water { ", water" } else { "" }
        );
        Ok(level)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_water(&self) -> bool {
        self.water
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.lanes.iter().flat_map(|lane| lane.obstacles().iter())
    }

    pub fn obstacles_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.lanes.iter_mut().flat_map(|lane| lane.obstacles_mut().iter_mut())
    }

    /// Obstacle by `(lane, index)`
    pub fn obstacle(&self, lane: usize, index: usize) -> Option<&Obstacle> {
        self.lanes.get(lane)?.obstacles().get(index)
    }

    pub fn obstacle_mut(&mut self, lane: usize, index: usize) -> Option<&mut Obstacle> {
        self.lanes.get_mut(lane)?.obstacles_mut().get_mut(index)
    }

    /// Back to one visible obstacle per lane. Water levels keep every platform.
    pub fn reset_lanes(&mut self) {
        if self.water {
            return;
        }
        for lane in &mut self.lanes {
            lane.reset();
        }
    }

    pub fn move_obstacles(&mut self) {
        for lane in &mut self.lanes {
            lane.move_all();
        }
    }

    pub fn reveal_offscreen(&mut self) -> usize {
        self.lanes.iter_mut().map(Lane::reveal_offscreen).sum()
    }

    // === Riders ===

    /// Pin `rider` to every platform that carries it
    pub fn carry_rider(&self, rider: &mut dyn Entity) {
        for obstacle in self.obstacles() {
            obstacle.carry(rider);
        }
    }

    pub fn is_riding(&self, id: EntityId) -> bool {
        self.obstacles().any(|obstacle| obstacle.is_carrying(id))
    }

    /// Release `rider` from whatever it rides. Returns whether it was riding.
    pub fn dismount(&mut self, rider: &mut dyn Entity) -> bool {
        let mut released = false;
        for obstacle in self.obstacles_mut() {
            released |= obstacle.dismount(rider);
        }
        released
    }

    /// Empty every rider registry and restore `rider`'s z-order
    pub fn clear_riders(&mut self, rider: &mut dyn Entity) {
        for obstacle in self.obstacles_mut() {
            if let Some(riders) = obstacle.riders_mut() {
                riders.clear();
            }
        }
        rider.body_mut().z = BASE_Z;
    }
}
