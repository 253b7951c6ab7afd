//! Gameplay tuning
//!
//! Data-driven balance values. Loaded from a JSON file when one is given,
//! otherwise the compiled-in defaults from `consts` are used.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::direction_from_degrees;

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bullet ===
    /// Launch speed (world units per second)
    pub bullet_speed: f32,
    /// Lifetime once released (seconds)
    pub bullet_alive_time: f32,
    /// Real-time delay before a spawned bullet arms (seconds)
    pub arming_delay: f32,
    /// Die cue duration after hitting the player (seconds)
    pub bullet_death_time: f32,
    /// Delay before the player spawns a replacement bullet (seconds)
    pub bullet_respawn_delay: f32,
    /// Where new bullets appear
    pub bullet_spawn: Vec2,

    // === Player ===
    pub player_max_health: u8,
    pub player_speed: f32,
    /// Launch heading in degrees (0 = +X, counter-clockwise)
    pub player_launch_degrees: f32,

    // === Enemies ===
    pub enemy_death_time: f32,
    /// Enemies in the first wave
    pub enemy_base_wave: u32,
    /// Upper bound on enemies per wave
    pub enemy_max_wave: u32,

    // === Round ===
    pub round_seconds: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            bullet_speed: BULLET_SPEED,
            bullet_alive_time: BULLET_ALIVE_TIME,
            arming_delay: ARMING_DELAY,
            bullet_death_time: BULLET_DEATH_TIME,
            bullet_respawn_delay: BULLET_RESPAWN_DELAY,
            bullet_spawn: Vec2::new(0.0, -ARENA_HALF_HEIGHT * 0.6),

            player_max_health: PLAYER_MAX_HEALTH,
            player_speed: PLAYER_SPEED,
            player_launch_degrees: 45.0,

            enemy_death_time: ENEMY_DEATH_TIME,
            enemy_base_wave: ENEMY_BASE_WAVE,
            enemy_max_wave: ENEMY_MAX_WAVE,

            round_seconds: ROUND_SECONDS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read tuning {}: {e}, using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Invalid tuning {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Player launch velocity
    pub fn player_launch_velocity(&self) -> Vec2 {
        direction_from_degrees(self.player_launch_degrees) * self.player_speed
    }

    /// Number of enemies in the given wave (0-based)
    pub fn wave_size(&self, wave_index: u32) -> u32 {
        (self.enemy_base_wave + wave_index).min(self.enemy_max_wave)
    }
}
