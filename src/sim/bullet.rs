//! The drag-to-aim bullet
//!
//! Lifecycle: `Arming -> Idle -> Held -> Released -> (Dying) -> Destroyed`.
//!
//! The bullet never touches the session or other entities directly. Every
//! transition writes [`Request`]s and [`GameEvent`]s into an [`Outbox`] that
//! the tick driver commits once the bullet is done for the step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, ContactKey, ContactKind, ReflectEffect, reflect_velocity};
use super::state::{BulletCue, GameEvent, Outbox, Request, SoundCue};
use super::tick::TickInput;
use crate::consts::{BULLET_RADIUS, SPRITE_FACING_OFFSET};
use crate::tuning::Tuning;
use crate::{heading_degrees, normalize_degrees};

/// Bullet lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletPhase {
    /// Just spawned; collider off, input ignored until the delay (real time) elapses
    Arming { remaining: f32 },
    /// Waiting for the pointer to grab it
    Idle,
    /// Being dragged; velocity pinned to zero
    Held,
    /// In flight, reflecting and counting down
    Released,
    /// Hit the player; playing the die cue until the lifetime runs out
    Dying,
    /// Removal pending
    Destroyed,
}

/// Launch direction for a drag released at `release_point`.
///
/// Points from the release point back through the bullet (slingshot style).
/// A zero-length drag falls back to straight up.
pub fn launch_direction(pos: Vec2, release_point: Vec2) -> Vec2 {
    (pos - release_point).try_normalize().unwrap_or(Vec2::Y)
}

/// Sprite rotation (degrees) for a bullet travelling along `vel`
pub fn flight_rotation(vel: Vec2) -> f32 {
    normalize_degrees(heading_degrees(vel)) - SPRITE_FACING_OFFSET
}

/// Sprite rotation (degrees) while aiming from `pos` toward `pointer`
pub fn aim_rotation(pos: Vec2, pointer: Vec2) -> f32 {
    heading_degrees(pointer - pos) + SPRITE_FACING_OFFSET
}

/// A bullet entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Z rotation in degrees
    pub rotation: f32,
    pub vel: Vec2,
    /// Velocity sampled at the start of the physics step (pre-collision)
    pub last_vel: Vec2,
    pub radius: f32,
    pub phase: BulletPhase,
    /// Seconds of flight left; only counts down once released
    pub lifetime: f32,
    /// Enemy hits since release
    pub combo: u32,
    pub collider_enabled: bool,
    /// Point where the pointer let go
    pub release_point: Option<Vec2>,
    speed: f32,
    death_time: f32,
    stretching: bool,
    /// Bodies overlapping at the end of the last physics step
    touching: Vec<ContactKey>,
}

impl Bullet {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            rotation: 0.0,
            vel: Vec2::ZERO,
            last_vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            phase: BulletPhase::Arming {
                remaining: tuning.arming_delay,
            },
            lifetime: tuning.bullet_alive_time,
            combo: 0,
            collider_enabled: false,
            release_point: None,
            speed: tuning.bullet_speed,
            death_time: tuning.bullet_death_time,
            stretching: false,
            touching: Vec::new(),
        }
    }

    pub fn is_armed(&self) -> bool {
        !matches!(self.phase, BulletPhase::Arming { .. })
    }

    /// Launched at some point (in flight, dying or destroyed)
    pub fn is_released(&self) -> bool {
        matches!(
            self.phase,
            BulletPhase::Released | BulletPhase::Dying | BulletPhase::Destroyed
        )
    }

    pub fn is_destroyed(&self) -> bool {
        self.phase == BulletPhase::Destroyed
    }

    /// Advance the arming delay by real (unscaled) time. Returns true on the
    /// call that arms the bullet.
    pub fn arm(&mut self, real_dt: f32) -> bool {
        let BulletPhase::Arming { remaining } = &mut self.phase else {
            return false;
        };
        *remaining -= real_dt;
        if *remaining > 0.0 {
            return false;
        }
        self.phase = BulletPhase::Idle;
        self.collider_enabled = true;
        true
    }

    /// Frame phase: pointer handling and lifetime countdown.
    ///
    /// The caller skips this entirely while the session is game over.
    pub fn update(&mut self, input: &TickInput, dt: f32, out: &mut Outbox) {
        if !self.is_armed() || self.is_destroyed() {
            return;
        }

        if self.is_released() {
            self.tick_lifetime(dt, out);
            return;
        }

        if self.phase == BulletPhase::Held {
            self.rotation = aim_rotation(self.pos, input.pointer);
        }

        if input.pressed {
            out.request(Request::FreezeAll);
            out.cue(BulletCue::SpinStop);
            self.press();
            out.sound(SoundCue::Grab);
        }

        if input.held {
            if self.phase == BulletPhase::Held {
                self.vel = Vec2::ZERO;
                out.emit(GameEvent::Trail {
                    from: self.pos,
                    to: input.pointer,
                });
                if !self.stretching {
                    self.stretching = true;
                    out.cue(BulletCue::Stretch);
                }
            }
        } else if input.released {
            self.release(input.pointer, out);
        }
    }

    /// Grab the bullet. Only an idle (armed, unreleased) bullet can be grabbed.
    pub fn press(&mut self) {
        if self.phase != BulletPhase::Idle {
            return;
        }
        self.vel = Vec2::ZERO;
        self.phase = BulletPhase::Held;
    }

    /// Let go at `release_point` and launch. No-op unless held.
    pub fn release(&mut self, release_point: Vec2, out: &mut Outbox) {
        if self.phase != BulletPhase::Held {
            return;
        }

        self.release_point = Some(release_point);
        self.vel = launch_direction(self.pos, release_point) * self.speed;
        // Pre-collision vector until the next physics sample
        self.last_vel = self.vel;
        self.phase = BulletPhase::Released;
        self.stretching = false;

        log::debug!(
            "Bullet released at {:?}, velocity {:?}",
            release_point,
            self.vel
        );
        out.cue(BulletCue::Shoot);
        out.sound(SoundCue::Shoot);
        out.emit(GameEvent::TrailEnd);
    }

    /// Physics phase: remember the velocity before this step's collisions
    pub fn sample_velocity(&mut self) {
        self.last_vel = self.vel;
    }

    /// Physics phase: move
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Keep only contacts that started this step, and remember what is
    /// currently overlapping.
    pub fn begin_contacts(&mut self, overlapping: Vec<Contact>) -> Vec<Contact> {
        let previous = std::mem::take(&mut self.touching);
        self.touching = overlapping.iter().map(|c| c.other.key()).collect();
        overlapping
            .into_iter()
            .filter(|c| !previous.contains(&c.other.key()))
            .collect()
    }

    /// React to one collision-start record
    pub fn on_collision(&mut self, contact: &Contact, out: &mut Outbox) {
        match self.phase {
            BulletPhase::Released => {}
            BulletPhase::Dying | BulletPhase::Destroyed => return,
            _ => {
                // Enemies bumping into a resting bullet only get a reaction
                if matches!(contact.other, ContactKind::Enemy { .. }) {
                    out.cue(BulletCue::AngryToHappy);
                }
                return;
            }
        }

        if contact.other == ContactKind::Player {
            self.hit_player(out);
            return;
        }

        self.vel = reflect_velocity(self.last_vel, contact.normal);
        // Further contacts in the same step chain off this reflection
        self.last_vel = self.vel;
        self.rotation = flight_rotation(self.vel);

        match contact.other {
            ContactKind::Enemy { id, kind } => {
                self.combo += 1;
                log::debug!("Enemy {id} ({kind:?}) hit, combo {}", self.combo);
                out.request(Request::ComboScore {
                    kind,
                    combo: self.combo,
                });
                out.request(Request::DestroyEnemy(id));
                out.sound(SoundCue::EnemyHit);
            }
            ContactKind::Wall(side) => {
                out.emit(GameEvent::ReflectEffect(ReflectEffect::at_wall(self.pos, side)));
                out.sound(SoundCue::WallBounce);
            }
            ContactKind::Player | ContactKind::Other => {}
        }
    }

    fn hit_player(&mut self, out: &mut Outbox) {
        log::info!("Bullet hit the player");
        out.request(Request::HitPlayer);
        self.vel = Vec2::ZERO;
        self.last_vel = Vec2::ZERO;
        self.collider_enabled = false;
        self.phase = BulletPhase::Dying;
        // Removal goes through the normal lifetime path once the die cue has played
        self.lifetime = self.lifetime.min(self.death_time);
        out.cue(BulletCue::Die);
        out.sound(SoundCue::PlayerHit);
    }

    fn tick_lifetime(&mut self, dt: f32, out: &mut Outbox) {
        self.lifetime -= dt;
        if self.lifetime < 0.0 {
            self.destroy(out);
        }
    }

    /// Resume the world, cash in the combo and schedule removal. Runs once.
    fn destroy(&mut self, out: &mut Outbox) {
        if self.is_destroyed() {
            return;
        }
        log::info!("Bullet expired with combo {}", self.combo);
        self.phase = BulletPhase::Destroyed;
        self.vel = Vec2::ZERO;
        self.collider_enabled = false;
        out.request(Request::ResumeAll);
        out.request(Request::FinalCombo(self.combo));
        out.request(Request::Despawn);
        out.emit(GameEvent::BulletDestroyed { combo: self.combo });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::WallSide;
    use crate::sim::enemy::EnemyKind;

    fn armed_bullet(pos: Vec2) -> Bullet {
        let tuning = Tuning::default();
        let mut bullet = Bullet::new(pos, &tuning);
        assert!(bullet.arm(tuning.arming_delay));
        bullet
    }

    fn launched_bullet(vel: Vec2) -> Bullet {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let mut out = Outbox::default();
        bullet.press();
        bullet.release(-vel.normalize(), &mut out);
        bullet.sample_velocity();
        bullet
    }

    #[test]
    fn test_arming_delay() {
        let tuning = Tuning::default();
        let mut bullet = Bullet::new(Vec2::ZERO, &tuning);
        assert!(!bullet.collider_enabled);
        assert!(!bullet.arm(0.1));
        assert!(!bullet.is_armed());

        // Input is ignored while arming
        let mut out = Outbox::default();
        bullet.update(&TickInput::press(Vec2::ONE), 0.1, &mut out);
        assert!(out.requests.is_empty());
        assert!(out.events.is_empty());

        assert!(bullet.arm(0.15));
        assert!(bullet.collider_enabled);
        assert_eq!(bullet.phase, BulletPhase::Idle);
        assert!(!bullet.arm(1.0));
    }

    #[test]
    fn test_press_freezes_world() {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let mut out = Outbox::default();
        bullet.update(&TickInput::press(Vec2::new(0.0, -1.0)), 0.016, &mut out);

        assert_eq!(bullet.phase, BulletPhase::Held);
        assert_eq!(out.requests, vec![Request::FreezeAll]);
        assert!(out.events.contains(&GameEvent::Cue(BulletCue::SpinStop)));
        assert!(out.events.contains(&GameEvent::Sound(SoundCue::Grab)));
        assert!(out.events.contains(&GameEvent::Cue(BulletCue::Stretch)));
    }

    #[test]
    fn test_hold_tracks_pointer() {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let mut out = Outbox::default();
        bullet.update(&TickInput::press(Vec2::new(1.0, 0.0)), 0.016, &mut out);
        bullet.update(&TickInput::hold(Vec2::new(1.0, 0.0)), 0.016, &mut out);
        // Pointer due east: 0° + 90° sprite offset
        assert!((bullet.rotation - 90.0).abs() < 1e-4);
        assert_eq!(bullet.vel, Vec2::ZERO);

        // Stretch cue only once per hold
        let stretches = out
            .events
            .iter()
            .filter(|e| **e == GameEvent::Cue(BulletCue::Stretch))
            .count();
        assert_eq!(stretches, 1);
        let trails = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Trail { .. }))
            .count();
        assert_eq!(trails, 2);
    }

    #[test]
    fn test_release_launches_away_from_pointer() {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let mut out = Outbox::default();
        bullet.update(&TickInput::press(Vec2::ZERO), 0.016, &mut out);
        bullet.update(&TickInput::release(Vec2::new(0.0, -2.0)), 0.016, &mut out);

        assert_eq!(bullet.phase, BulletPhase::Released);
        assert_eq!(bullet.release_point, Some(Vec2::new(0.0, -2.0)));
        assert!((bullet.vel - Vec2::new(0.0, Tuning::default().bullet_speed)).length() < 1e-4);
        assert!(out.events.contains(&GameEvent::Cue(BulletCue::Shoot)));
        assert!(out.events.contains(&GameEvent::TrailEnd));

        // Released is terminal for aiming
        bullet.press();
        assert_eq!(bullet.phase, BulletPhase::Released);
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let mut out = Outbox::default();
        bullet.update(&TickInput::release(Vec2::new(0.0, -2.0)), 0.016, &mut out);

        assert_eq!(bullet.phase, BulletPhase::Idle);
        assert_eq!(bullet.vel, Vec2::ZERO);
        assert!(out.requests.is_empty());
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_zero_drag_falls_back_to_up() {
        assert_eq!(launch_direction(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)), Vec2::Y);

        let mut bullet = armed_bullet(Vec2::new(1.0, 1.0));
        let mut out = Outbox::default();
        bullet.press();
        bullet.release(Vec2::new(1.0, 1.0), &mut out);
        assert!(!bullet.vel.is_nan());
        assert!((bullet.vel.length() - Tuning::default().bullet_speed).abs() < 1e-4);
    }

    #[test]
    fn test_wall_bounce_reflects_and_spawns_effect() {
        let mut bullet = launched_bullet(Vec2::new(0.0, 1.0));
        bullet.pos = Vec2::new(2.0, 3.0);
        let incoming = bullet.last_vel;
        let mut out = Outbox::default();
        bullet.on_collision(
            &Contact {
                other: ContactKind::Wall(WallSide::Top),
                normal: Vec2::NEG_Y,
            },
            &mut out,
        );

        assert!((bullet.vel - Vec2::new(incoming.x, -incoming.y)).length() < 1e-4);
        // Heading straight down: 270° - 90°
        assert!((bullet.rotation - 180.0).abs() < 1e-3);
        assert_eq!(
            out.events[0],
            GameEvent::ReflectEffect(ReflectEffect {
                pos: Vec2::new(2.0, 3.0),
                scale: Vec2::new(1.0, -1.0),
                rotation: 0.0,
            })
        );
        assert_eq!(out.events[1], GameEvent::Sound(SoundCue::WallBounce));
        assert_eq!(bullet.combo, 0);
    }

    #[test]
    fn test_enemy_hits_build_combo() {
        let mut bullet = launched_bullet(Vec2::new(1.0, 0.0));
        let mut out = Outbox::default();
        for id in 1..=3 {
            bullet.on_collision(
                &Contact {
                    other: ContactKind::Enemy {
                        id,
                        kind: EnemyKind::Bat,
                    },
                    normal: Vec2::NEG_X,
                },
                &mut out,
            );
            assert_eq!(bullet.combo, id);
        }
        assert!(out.requests.contains(&Request::ComboScore {
            kind: EnemyKind::Bat,
            combo: 3
        }));
        assert!(out.requests.contains(&Request::DestroyEnemy(2)));
    }

    #[test]
    fn test_player_hit() {
        let mut bullet = launched_bullet(Vec2::new(1.0, 0.0));
        let mut out = Outbox::default();
        let contact = Contact {
            other: ContactKind::Player,
            normal: Vec2::NEG_X,
        };
        bullet.on_collision(&contact, &mut out);
        bullet.on_collision(&contact, &mut out);

        assert_eq!(bullet.vel, Vec2::ZERO);
        assert_eq!(bullet.phase, BulletPhase::Dying);
        assert_eq!(out.requests, vec![Request::HitPlayer]);
        let dies = out
            .events
            .iter()
            .filter(|e| **e == GameEvent::Cue(BulletCue::Die))
            .count();
        assert_eq!(dies, 1);
        assert!(bullet.lifetime <= Tuning::default().bullet_death_time);
    }

    #[test]
    fn test_unreleased_bullet_ignores_collisions() {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let mut out = Outbox::default();
        bullet.on_collision(
            &Contact {
                other: ContactKind::Enemy {
                    id: 1,
                    kind: EnemyKind::Slime,
                },
                normal: Vec2::X,
            },
            &mut out,
        );
        bullet.on_collision(
            &Contact {
                other: ContactKind::Player,
                normal: Vec2::X,
            },
            &mut out,
        );
        assert_eq!(out.events, vec![GameEvent::Cue(BulletCue::AngryToHappy)]);
        assert!(out.requests.is_empty());
        assert_eq!(bullet.combo, 0);
    }

    #[test]
    fn test_lifetime_destroys_once() {
        let mut bullet = launched_bullet(Vec2::new(1.0, 0.0));
        bullet.combo = 4;
        let mut out = Outbox::default();
        let input = TickInput::default();

        bullet.update(&input, 2.9, &mut out);
        assert!(out.requests.is_empty());
        // Exactly zero is not yet below zero
        bullet.update(&input, 0.1, &mut out);
        assert!(!bullet.is_destroyed() || bullet.lifetime < 0.0);

        bullet.update(&input, 0.1, &mut out);
        bullet.update(&input, 0.1, &mut out);
        assert!(bullet.is_destroyed());
        assert_eq!(
            out.requests,
            vec![Request::ResumeAll, Request::FinalCombo(4), Request::Despawn]
        );
    }

    #[test]
    fn test_begin_contacts_reports_starts_only() {
        let mut bullet = armed_bullet(Vec2::ZERO);
        let wall = Contact {
            other: ContactKind::Wall(WallSide::Left),
            normal: Vec2::X,
        };
        assert_eq!(bullet.begin_contacts(vec![wall]).len(), 1);
        assert!(bullet.begin_contacts(vec![wall]).is_empty());
        assert!(bullet.begin_contacts(Vec::new()).is_empty());
        assert_eq!(bullet.begin_contacts(vec![wall]).len(), 1);
    }
}
