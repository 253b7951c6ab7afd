//! Enemies and the wave spawner

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::control::Controllable;
use crate::consts::*;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Bat,
    Golem,
}

impl EnemyKind {
    /// Points per combo step when this enemy is hit
    pub fn base_points(self) -> u64 {
        match self {
            EnemyKind::Slime => 100,
            EnemyKind::Bat => 150,
            EnemyKind::Golem => 300,
        }
    }

    /// Drift speed (world units per second)
    fn drift_speed(self) -> f32 {
        match self {
            EnemyKind::Slime => 0.8,
            EnemyKind::Bat => 1.6,
            EnemyKind::Golem => 0.4,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity remembered while stopped by the session
    pub stopped_vel: Option<Vec2>,
    /// Seconds until removal once the destroy sequence has started
    pub dying: Option<f32>,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius: ENEMY_RADIUS,
            stopped_vel: None,
            dying: None,
        }
    }

    /// Start the destroy sequence. Returns false if it was already running.
    pub fn begin_destroy(&mut self, delay: f32) -> bool {
        if self.dying.is_some() {
            return false;
        }
        self.dying = Some(delay);
        self.vel = Vec2::ZERO;
        self.stopped_vel = None;
        true
    }

    pub fn is_dying(&self) -> bool {
        self.dying.is_some()
    }

    /// Advance the destroy countdown. Returns true once the enemy should be removed.
    pub fn tick_dying(&mut self, dt: f32) -> bool {
        match self.dying.as_mut() {
            Some(remaining) => {
                *remaining -= dt;
                *remaining <= 0.0
            }
            None => false,
        }
    }
}

impl Controllable for Enemy {
    fn stop(&mut self) {
        if self.stopped_vel.is_none() {
            self.stopped_vel = Some(self.vel);
            self.vel = Vec2::ZERO;
        }
    }

    fn resume(&mut self) {
        if let Some(vel) = self.stopped_vel.take() {
            self.vel = vel;
        }
    }
}

/// Wave spawner (deterministic per run seed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub seed: u64,
    /// Waves spawned so far this run
    pub wave_index: u32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            wave_index: 0,
        }
    }

    /// Forget all progress (retry)
    pub fn reset(&mut self) {
        self.wave_index = 0;
    }

    /// Roll the next wave. `next_id` allocates entity IDs.
    pub fn spawn_wave(&mut self, count: u32, mut next_id: impl FnMut() -> u32) -> Vec<Enemy> {
        // Mix wave number into the run seed so each wave differs but replays identically
        let wave_seed = (self.wave_index as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.seed);
        let mut rng = Pcg32::seed_from_u64(wave_seed);

        let margin = ENEMY_RADIUS * 2.0;
        let enemies = (0..count)
            .map(|_| {
                let kind = match rng.random_range(0..10) {
                    0..=4 => EnemyKind::Slime,
                    5..=7 => EnemyKind::Bat,
                    _ => EnemyKind::Golem,
                };
                // Upper half of the arena, clear of the bullet spawn area
                let pos = Vec2::new(
                    rng.random_range(-ARENA_HALF_WIDTH + margin..ARENA_HALF_WIDTH - margin),
                    rng.random_range(0.0..ARENA_HALF_HEIGHT - margin),
                );
                let heading = rng.random_range(0.0..std::f32::consts::TAU);
                let vel = Vec2::new(heading.cos(), heading.sin()) * kind.drift_speed();
                Enemy::new(next_id(), kind, pos, vel)
            })
            .collect();

        log::info!("Spawned wave {} ({} enemies)", self.wave_index, count);
        self.wave_index += 1;
        enemies
    }
}
