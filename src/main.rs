//! Ricochet entry point
//!
//! Runs a scripted headless session: grabs each bullet as soon as it arms,
//! drags it, lets go, and logs what the presentation layer would be told.
//!
//! Usage: `ricochet [tuning.json] [seed] [highscores.json]`

use glam::Vec2;

use ricochet::{HighScores, Tuning};
use ricochet::sim::{BulletPhase, GameEvent, GameState, TickInput, advance};

/// Frame length for the scripted run (60 fps)
const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames the pointer is held before letting go
const DRAG_FRAMES: u32 = 20;
/// Length of the scripted run in frames
const RUN_FRAMES: u32 = 60 * 90;

/// Scripted pointer: sweeps a drag below the bullet at a slowly changing angle
struct Script {
    drag_frames: u32,
    shots: u32,
}

impl Script {
    fn input(&mut self, state: &GameState) -> TickInput {
        let Some(bullet) = state.bullet() else {
            return TickInput::default();
        };

        match bullet.phase {
            BulletPhase::Idle => {
                self.drag_frames = 0;
                TickInput::press(bullet.pos)
            }
            BulletPhase::Held => {
                // Pull back and to the side; the launch goes the opposite way
                let sweep = (self.shots as f32 * 0.7).sin() * 1.5;
                let pointer = bullet.pos + Vec2::new(sweep, -2.0);
                self.drag_frames += 1;
                if self.drag_frames >= DRAG_FRAMES {
                    self.shots += 1;
                    TickInput::release(pointer)
                } else {
                    TickInput::hold(pointer)
                }
            }
            _ => TickInput::hover(bullet.pos),
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Ricochet (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = args.next().map(Tuning::load).unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let scores_path = args.next();

    let mut state = GameState::with_tuning(seed, tuning);
    if let Some(path) = &scores_path {
        state.world.high_scores = HighScores::load(path);
    }
    let mut script = Script {
        drag_frames: 0,
        shots: 0,
    };

    for frame in 0..RUN_FRAMES {
        let input = script.input(&state);
        advance(&mut state, &input, FRAME_DT);

        for event in state.world.drain_events() {
            match event {
                GameEvent::Sound(sound) => {
                    log::trace!("frame {frame}: sound #{} ({sound:?})", sound.index())
                }
                GameEvent::Trail { .. } => {}
                other => log::debug!("frame {frame}: {other:?}"),
            }
        }

        if state.session.is_game_over() {
            log::info!("Game over after {frame} frames");
            if let Some(path) = &scores_path
                && let Err(e) = state.world.high_scores.save(path)
            {
                log::warn!("Failed to save high scores: {e}");
            }
            break;
        }
    }

    let world = &state.world;
    println!(
        "Shots: {}  Score: {}  Best combo: {}  Health: {}/{}  Player at {:?}",
        script.shots,
        world.score.score,
        world.score.best_combo,
        world.player.health.current,
        world.player.health.max,
        state.player_pos(),
    );

    state.session.return_to_title(&mut state.world);
    for event in state.world.drain_events() {
        log::info!("{event:?}");
    }
}
