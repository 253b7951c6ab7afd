//! Integration test harness.
//!
//! Everything runs headless through the public tick driver.

#![allow(dead_code)]

use glam::Vec2;
use ricochet::sim::{BulletPhase, GameEvent, GameState, TickInput, advance};

pub const FRAME_DT: f32 = 1.0 / 60.0;

/// Run idle frames until the first bullet has armed
pub fn armed_game(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    for _ in 0..60 {
        advance(&mut state, &TickInput::default(), FRAME_DT);
        if state.bullet().is_some_and(|b| b.phase == BulletPhase::Idle) {
            return state;
        }
    }
    panic!("bullet never armed");
}

/// Grab the bullet where it sits and let go at `release_point`
pub fn launch(state: &mut GameState, release_point: Vec2) {
    let pos = state.bullet().expect("no bullet").pos;
    advance(state, &TickInput::press(pos), FRAME_DT);
    advance(state, &TickInput::release(release_point), FRAME_DT);
}

pub fn count_events(events: &[GameEvent], wanted: &GameEvent) -> usize {
    events.iter().filter(|e| *e == wanted).count()
}
