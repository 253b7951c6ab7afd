//! Collision detection and response
//!
//! Contacts are produced as an ordered queue of records, one per collision
//! *start*, and consumed once per physics step by the bullet.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use crate::consts::{ARENA_HALF_HEIGHT, ARENA_HALF_WIDTH};

/// Which arena wall was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Top,
    Left,
    Right,
    Bottom,
}

impl WallSide {
    /// Normal pointing back into the arena
    pub fn normal(self) -> Vec2 {
        match self {
            WallSide::Top => Vec2::NEG_Y,
            WallSide::Bottom => Vec2::Y,
            WallSide::Left => Vec2::X,
            WallSide::Right => Vec2::NEG_X,
        }
    }
}

/// What the bullet collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKind {
    Player,
    Enemy { id: u32, kind: EnemyKind },
    Wall(WallSide),
    /// Any untagged solid body (host-delivered)
    Other,
}

impl ContactKind {
    /// Identity used to report only the start of a contact
    pub fn key(&self) -> ContactKey {
        match *self {
            ContactKind::Player => ContactKey::Player,
            ContactKind::Enemy { id, .. } => ContactKey::Enemy(id),
            ContactKind::Wall(side) => ContactKey::Wall(side),
            ContactKind::Other => ContactKey::Other,
        }
    }
}

/// Body identity without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactKey {
    Player,
    Enemy(u32),
    Wall(WallSide),
    Other,
}

/// A collision-start record delivered to the bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub other: ContactKind,
    /// Surface normal at contact, pointing toward the bullet
    pub normal: Vec2,
}

/// Cosmetic effect spawned when the bullet bounces off a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflectEffect {
    pub pos: Vec2,
    pub scale: Vec2,
    /// Z rotation in degrees
    pub rotation: f32,
}

impl ReflectEffect {
    /// Place the effect at `pos`, oriented for the wall that was hit
    pub fn at_wall(pos: Vec2, side: WallSide) -> Self {
        let (scale, rotation) = match side {
            WallSide::Top => (Vec2::new(1.0, -1.0), 0.0),
            WallSide::Left => (Vec2::ONE, -90.0),
            WallSide::Right => (Vec2::ONE, 90.0),
            WallSide::Bottom => (Vec2::ONE, 0.0),
        };
        Self {
            pos,
            scale,
            rotation,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Overlap between a circle and the arena walls, one entry per wall touched.
/// Returns (side, penetration).
pub fn circle_wall_overlaps(pos: Vec2, radius: f32) -> Vec<(WallSide, f32)> {
    let mut hits = Vec::new();
    let top = pos.y + radius - ARENA_HALF_HEIGHT;
    if top > 0.0 {
        hits.push((WallSide::Top, top));
    }
    let bottom = -ARENA_HALF_HEIGHT - (pos.y - radius);
    if bottom > 0.0 {
        hits.push((WallSide::Bottom, bottom));
    }
    let left = -ARENA_HALF_WIDTH - (pos.x - radius);
    if left > 0.0 {
        hits.push((WallSide::Left, left));
    }
    let right = pos.x + radius - ARENA_HALF_WIDTH;
    if right > 0.0 {
        hits.push((WallSide::Right, right));
    }
    hits
}

/// Keep a moving circle inside the arena, bouncing its velocity off any wall
/// it crossed. Used for bodies that don't report contacts (player, enemies).
pub fn bounce_in_arena(pos: &mut Vec2, vel: &mut Vec2, radius: f32) {
    for (side, depth) in circle_wall_overlaps(*pos, radius) {
        let normal = side.normal();
        *pos += normal * depth;
        if vel.dot(normal) < 0.0 {
            *vel = reflect_velocity(*vel, normal);
        }
    }
}

/// Circle-circle overlap. Returns (normal from `b` toward `a`, penetration).
pub fn circle_circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> Option<(Vec2, f32)> {
    let delta = a - b;
    let dist = delta.length();
    let penetration = ra + rb - dist;
    if penetration <= 0.0 {
        return None;
    }
    // Concentric circles have no defined normal; push straight up
    let normal = delta.try_normalize().unwrap_or(Vec2::Y);
    Some((normal, penetration))
}
