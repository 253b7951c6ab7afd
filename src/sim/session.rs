//! Session coordinator
//!
//! One per run, owned by [`GameState`](super::GameState) and handed to
//! whatever needs it. Owns the game-over flag and the control set, and
//! drives the game-over / retry / title transitions.

use serde::{Deserialize, Serialize};

use super::control::{ControlSet, ControlTarget};
use super::state::{GameEvent, SoundCue, World};
use crate::consts::TITLE_SCENE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    game_over: bool,
    /// Set between freeze_all and resume_all
    frozen: bool,
    controls: ControlSet,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    /// Snapshot the player and every current enemy.
    ///
    /// Must be called again whenever enemies spawn or are removed.
    pub fn register_control_set(&mut self, world: &World) {
        self.controls.clear();
        self.controls.push(ControlTarget::Player);
        for enemy in &world.enemies {
            self.controls.push(ControlTarget::Enemy(enemy.id));
        }
        log::debug!("Registered {} control targets", self.controls.len());
    }

    /// Stop every registered target that still exists
    pub fn freeze_all(&mut self, world: &mut World) {
        self.frozen = true;
        for target in self.controls.iter() {
            match world.controllable_mut(target) {
                Some(object) => object.stop(),
                None => log::debug!("Skipping removed target {target:?}"),
            }
        }
    }

    /// Resume every registered target that still exists
    pub fn resume_all(&mut self, world: &mut World) {
        self.frozen = false;
        for target in self.controls.iter() {
            match world.controllable_mut(target) {
                Some(object) => object.resume(),
                None => log::debug!("Skipping removed target {target:?}"),
            }
        }
    }

    /// Enter game over. Calls while already game over do nothing.
    pub fn report_game_over(&mut self, world: &mut World) {
        if self.game_over {
            log::debug!("Game over already reported");
            return;
        }

        log::info!("Game Over. Score {}", world.score.score);
        world.events.push(GameEvent::Sound(SoundCue::GameOver));

        self.game_over = true;
        world.erase_bullet();
        world.timer.stop();
        world.events.push(GameEvent::GameOverView { visible: true });
        world.record_high_score();
    }

    /// Reset the run in place. Leaves the world as a fresh game would be,
    /// apart from the leaderboard.
    pub fn retry(&mut self, world: &mut World) {
        log::info!("Retry");
        world.events.push(GameEvent::Sound(SoundCue::Confirm));

        self.game_over = false;
        self.frozen = false;

        world.reset_run();
        world.events.push(GameEvent::GameOverView { visible: false });

        self.register_control_set(world);
    }

    /// Ask the host to load the title scene
    pub fn return_to_title(&self, world: &mut World) {
        log::info!("Returning to title");
        world.events.push(GameEvent::LoadScene(TITLE_SCENE.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use glam::Vec2;

    #[test]
    fn test_register_snapshots_enemies() {
        let mut state = GameState::new(1);
        assert_eq!(state.session.controls().len(), 1);

        state.world.spawn_wave();
        // Snapshot, not auto-tracking
        assert_eq!(state.session.controls().len(), 1);

        state.session.register_control_set(&state.world);
        assert_eq!(
            state.session.controls().len(),
            1 + state.world.enemies.len()
        );
    }

    #[test]
    fn test_freeze_and_resume_skip_removed() {
        let mut state = GameState::new(1);
        state.world.spawn_wave();
        state.session.register_control_set(&state.world);
        let player_vel = state.world.player.vel;
        let survivor_vel = state.world.enemies[1].vel;

        // Remove one enemy after registration
        let removed = state.world.enemies.remove(0).id;
        assert!(state.session.controls().contains(ControlTarget::Enemy(removed)));

        state.session.freeze_all(&mut state.world);
        assert!(state.session.is_frozen());
        assert_eq!(state.world.player.vel, Vec2::ZERO);
        assert!(state.world.enemies.iter().all(|e| e.vel == Vec2::ZERO));

        state.session.resume_all(&mut state.world);
        assert!(!state.session.is_frozen());
        assert_eq!(state.world.player.vel, player_vel);
        assert_eq!(state.world.enemies[0].vel, survivor_vel);
    }

    #[test]
    fn test_game_over_is_guarded() {
        let mut state = GameState::new(1);
        state.world.spawn_bullet();
        state.session.report_game_over(&mut state.world);

        assert!(state.session.is_game_over());
        assert!(state.world.bullet.is_none());
        assert!(!state.world.timer.running);

        let events = state.world.drain_events();
        assert!(events.contains(&GameEvent::GameOverView { visible: true }));

        state.session.report_game_over(&mut state.world);
        assert!(state.world.drain_events().is_empty());
    }

    #[test]
    fn test_return_to_title() {
        let mut state = GameState::new(1);
        state.session.return_to_title(&mut state.world);
        assert_eq!(
            state.world.drain_events(),
            vec![GameEvent::LoadScene("TitleScreen".to_string())]
        );
    }
}
