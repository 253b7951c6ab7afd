//! The player: physics body, health and bullet-spawning behaviour

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::control::Controllable;
use crate::consts::PLAYER_RADIUS;

/// Player hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: u8,
    pub max: u8,
}

impl Health {
    pub fn new(max: u8) -> Self {
        Self { current: max, max }
    }

    /// Lose one hit point. Returns the remaining health.
    pub fn decrease(&mut self) -> u8 {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: Health,
    /// Velocity remembered while stopped by the session
    pub stopped_vel: Option<Vec2>,
    /// Seconds until a replacement bullet is spawned
    pub respawn_timer: f32,
}

impl Player {
    pub fn new(max_health: u8) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: Health::new(max_health),
            stopped_vel: None,
            respawn_timer: 0.0,
        }
    }

    /// Put the player back at the origin, motionless
    pub fn reset_motion(&mut self) {
        self.pos = Vec2::ZERO;
        self.vel = Vec2::ZERO;
        self.stopped_vel = None;
    }

    /// Start moving
    pub fn launch(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Count down to the next bullet. Returns true when one should spawn.
    pub fn tick_respawn(&mut self, dt: f32) -> bool {
        self.respawn_timer -= dt;
        self.respawn_timer <= 0.0
    }
}

impl Controllable for Player {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_saturates() {
        let mut health = Health::new(2);
        assert_eq!(health.decrease(), 1);
        assert_eq!(health.decrease(), 0);
        assert_eq!(health.decrease(), 0);
        assert!(health.is_depleted());
        health.reset();
        assert_eq!(health.current, 2);
    }

    #[test]
    fn test_reset_motion_clears_stop() {
        let mut player = Player::new(3);
        player.pos = Vec2::new(1.0, 2.0);
        player.launch(Vec2::X);
        player.stop();
        player.reset_motion();
        assert_eq!(player.pos, Vec2::ZERO);
        assert_eq!(player.vel, Vec2::ZERO);
        // Nothing left to restore
        player.resume();
        assert_eq!(player.vel, Vec2::ZERO);
    }
}
