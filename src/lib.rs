//! Ricochet - A drag-to-aim, reflect-and-bounce arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bullet state machine, session, collisions)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard recorded at game over

pub mod highscores;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed physics timestep (50 Hz)
    pub const PHYSICS_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena half extents (world units, centered on origin)
    pub const ARENA_HALF_WIDTH: f32 = 4.5;
    pub const ARENA_HALF_HEIGHT: f32 = 8.0;

    /// Real-time delay before a fresh bullet collides or accepts input
    pub const ARMING_DELAY: f32 = 0.2;
    /// Sprite art faces up, so world angles are offset by a quarter turn
    pub const SPRITE_FACING_OFFSET: f32 = 90.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 0.25;
    pub const BULLET_SPEED: f32 = 14.0;
    pub const BULLET_ALIVE_TIME: f32 = 3.0;
    /// How long the die cue plays before the bullet is removed
    pub const BULLET_DEATH_TIME: f32 = 0.4;
    pub const BULLET_RESPAWN_DELAY: f32 = 0.5;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_MAX_HEALTH: u8 = 3;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 0.45;
    pub const ENEMY_DEATH_TIME: f32 = 0.3;
    pub const ENEMY_BASE_WAVE: u32 = 3;
    pub const ENEMY_MAX_WAVE: u32 = 12;

    /// Round length in seconds
    pub const ROUND_SECONDS: f32 = 60.0;

    /// Scene loaded by "return to title"
    pub const TITLE_SCENE: &str = "TitleScreen";
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Heading of a direction vector in degrees, in [-180, 180]
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}

/// Unit vector for a heading in degrees
#[inline]
pub fn direction_from_degrees(angle: f32) -> Vec2 {
    let rad = angle.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!((normalize_degrees(450.0) - 90.0).abs() < 1e-4);
        assert!(normalize_degrees(-1e-9) < 360.0);
    }

    #[test]
    fn test_heading_roundtrip() {
        let dir = direction_from_degrees(135.0);
        assert!((heading_degrees(dir) - 135.0).abs() < 1e-3);
    }
}
