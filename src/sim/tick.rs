//! Fixed timestep simulation tick
//!
//! Each frame runs zero or more fixed physics steps followed by one
//! variable-rate frame step:
//! - physics: sample pre-collision velocity, integrate, detect contacts,
//!   resolve them in order, commit requests
//! - frame: arming delay, pointer input, lifetimes, timers, spawning

use glam::Vec2;

use super::collision::{
    Contact, ContactKind, bounce_in_arena, circle_circle_overlap, circle_wall_overlaps,
};
use super::session::Session;
use super::state::{GameEvent, GameState, Outbox, Request, World};
use crate::consts::{MAX_SUBSTEPS, PHYSICS_DT};

/// Pointer state for a single frame, already in world space
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in world space
    pub pointer: Vec2,
    /// Pointer went down this frame
    pub pressed: bool,
    /// Pointer is down (also true on the frame it went down)
    pub held: bool,
    /// Pointer went up this frame
    pub released: bool,
}

impl TickInput {
    /// Pointer hovering, button up
    pub fn hover(pointer: Vec2) -> Self {
        Self {
            pointer,
            ..Default::default()
        }
    }

    pub fn press(pointer: Vec2) -> Self {
        Self {
            pointer,
            pressed: true,
            held: true,
            released: false,
        }
    }

    pub fn hold(pointer: Vec2) -> Self {
        Self {
            pointer,
            held: true,
            ..Default::default()
        }
    }

    pub fn release(pointer: Vec2) -> Self {
        Self {
            pointer,
            released: true,
            ..Default::default()
        }
    }
}

/// Advance the game by one rendered frame of `frame_dt` seconds
pub fn advance(state: &mut GameState, input: &TickInput, frame_dt: f32) {
    state.accumulator += frame_dt;

    let mut substeps = 0;
    while state.accumulator >= PHYSICS_DT && substeps < MAX_SUBSTEPS {
        tick_physics(state, PHYSICS_DT);
        state.accumulator -= PHYSICS_DT;
        substeps += 1;
    }
    if substeps == MAX_SUBSTEPS && state.accumulator >= PHYSICS_DT {
        log::warn!("Dropping {:.3}s of simulation time", state.accumulator);
        state.accumulator = 0.0;
    }

    tick_frame(state, input, frame_dt);
}

/// One fixed physics step
pub fn tick_physics(state: &mut GameState, dt: f32) {
    let world = &mut state.world;
    world.time_ticks += 1;

    // Reflection must use the velocity from before this step's collisions
    if let Some(bullet) = world.bullet.as_mut() {
        bullet.sample_velocity();
        bullet.integrate(dt);
    }

    let player = &mut world.player;
    player.pos += player.vel * dt;
    bounce_in_arena(&mut player.pos, &mut player.vel, player.radius);

    for enemy in world.enemies.iter_mut().filter(|e| !e.is_dying()) {
        enemy.pos += enemy.vel * dt;
        bounce_in_arena(&mut enemy.pos, &mut enemy.vel, enemy.radius);
    }

    let contacts = collect_contacts(world);
    resolve_contacts(state, &contacts);
}

/// Find bodies the bullet overlaps, push it out of them, and return the
/// contacts that started this step (walls, then player, then enemies by id).
pub fn collect_contacts(world: &mut World) -> Vec<Contact> {
    let Some(bullet) = world.bullet.as_mut() else {
        return Vec::new();
    };
    if !bullet.collider_enabled {
        return Vec::new();
    }

    let mut overlapping = Vec::new();

    for (side, depth) in circle_wall_overlaps(bullet.pos, bullet.radius) {
        let normal = side.normal();
        bullet.pos += normal * depth;
        overlapping.push(Contact {
            other: ContactKind::Wall(side),
            normal,
        });
    }

    let player = &world.player;
    if let Some((normal, depth)) =
        circle_circle_overlap(bullet.pos, bullet.radius, player.pos, player.radius)
    {
        if bullet.is_released() {
            bullet.pos += normal * depth;
        }
        overlapping.push(Contact {
            other: ContactKind::Player,
            normal,
        });
    }

    for enemy in world.enemies.iter().filter(|e| !e.is_dying()) {
        if let Some((normal, depth)) =
            circle_circle_overlap(bullet.pos, bullet.radius, enemy.pos, enemy.radius)
        {
            if bullet.is_released() {
                bullet.pos += normal * depth;
            }
            overlapping.push(Contact {
                other: ContactKind::Enemy {
                    id: enemy.id,
                    kind: enemy.kind,
                },
                normal,
            });
        }
    }

    bullet.begin_contacts(overlapping)
}

/// Deliver an ordered queue of collision-start records to the bullet, then
/// commit what it asked for. Hosts with their own physics call this directly.
pub fn resolve_contacts(state: &mut GameState, contacts: &[Contact]) {
    if contacts.is_empty() {
        return;
    }
    let GameState { session, world, .. } = state;

    let mut out = Outbox::default();
    if let Some(bullet) = world.bullet.as_mut() {
        for contact in contacts {
            log::debug!("Contact {:?} normal {:?}", contact.other, contact.normal);
            bullet.on_collision(contact, &mut out);
        }
    }
    commit(session, world, out);
}

/// One variable-rate frame step. `dt` is real elapsed time.
pub fn tick_frame(state: &mut GameState, input: &TickInput, dt: f32) {
    let GameState { session, world, .. } = state;
    let mut out = Outbox::default();

    // Arming runs on real time and is never frozen
    if let Some(bullet) = world.bullet.as_mut() {
        if bullet.arm(dt) {
            log::debug!("Bullet armed");
        }
        if !session.is_game_over() {
            bullet.update(input, dt, &mut out);
        }
    }
    commit(session, world, out);

    // Finish destroy sequences
    let before = world.enemies.len();
    world.enemies.retain_mut(|e| !e.tick_dying(dt));
    let mut enemies_changed = world.enemies.len() != before;

    if !session.is_game_over() && world.timer.tick(dt) {
        log::info!("Time up");
        session.report_game_over(world);
    }

    if !session.is_game_over() {
        // Wait for the world to be resumed before refilling
        if world.enemies.is_empty() && !session.is_frozen() {
            enemies_changed |= world.spawn_wave() > 0;
        }

        if world.bullet.is_none() && world.player.tick_respawn(dt) {
            world.spawn_bullet();
        }
    }

    if enemies_changed {
        session.register_control_set(world);
    }
}

/// Apply requests in order, after the events that produced them
pub fn commit(session: &mut Session, world: &mut World, out: Outbox) {
    world.events.extend(out.events);

    for request in out.requests {
        match request {
            Request::FreezeAll => session.freeze_all(world),
            Request::ResumeAll => session.resume_all(world),
            Request::HitPlayer => {
                world.events.push(GameEvent::PlayerFlash);
                let remaining = world.player.health.decrease();
                log::info!("Player hit, {remaining} health left");
                if remaining == 0 {
                    session.report_game_over(world);
                }
            }
            Request::ComboScore { kind, combo } => {
                let points = world.score.update_combo_score(kind, combo);
                log::debug!("Combo x{combo} on {kind:?}: +{points}");
            }
            Request::DestroyEnemy(id) => world.destroy_enemy(id),
            Request::FinalCombo(combo) => {
                let bonus = world.score.calculate_final_combo_score(combo);
                if bonus > 0 {
                    log::info!("Combo x{combo} bonus +{bonus}");
                }
            }
            Request::Despawn => world.despawn_bullet(),
        }
    }
}
