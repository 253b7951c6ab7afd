//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed physics timestep
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies (those consume `GameEvent`s)

pub mod bullet;
pub mod collision;
pub mod control;
pub mod enemy;
pub mod player;
pub mod score;
pub mod session;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, BulletPhase, aim_rotation, flight_rotation, launch_direction};
pub use collision::{Contact, ContactKind, ReflectEffect, WallSide, reflect_velocity};
pub use control::{ControlSet, ControlTarget, Controllable};
pub use enemy::{Enemy, EnemyKind, Spawner};
pub use player::{Health, Player};
pub use score::{RoundTimer, ScoreBoard};
pub use session::Session;
pub use state::{BulletCue, GameEvent, GameState, Outbox, Request, SoundCue, World};
pub use tick::{TickInput, advance, resolve_contacts, tick_frame, tick_physics};
