//! Score keeping and the round timer

use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;

/// Points multiplier for the end-of-flight combo bonus
pub const COMBO_BONUS_FACTOR: u64 = 10;

/// Running score for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u64,
    /// Longest combo of the run
    pub best_combo: u32,
    /// Bonus awarded by the most recent bullet
    pub last_bonus: u64,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score an enemy hit at the given combo step
    pub fn update_combo_score(&mut self, kind: EnemyKind, combo: u32) -> u64 {
        let points = kind.base_points() * combo as u64;
        self.score += points;
        self.best_combo = self.best_combo.max(combo);
        points
    }

    /// Award the end-of-flight bonus. Single hits earn nothing extra.
    pub fn calculate_final_combo_score(&mut self, combo: u32) -> u64 {
        let bonus = if combo >= 2 {
            (combo as u64).pow(2) * COMBO_BONUS_FACTOR
        } else {
            0
        };
        self.score += bonus;
        self.last_bonus = bonus;
        bonus
    }

    pub fn reset_score(&mut self) {
        *self = Self::default();
    }
}

/// Countdown for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundTimer {
    pub remaining: f32,
    pub duration: f32,
    pub running: bool,
}

impl RoundTimer {
    /// A full, running timer
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            duration,
            running: true,
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Refill and start
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    /// Advance the timer. Returns true on the tick it runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            self.running = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_score_scales_with_combo() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.update_combo_score(EnemyKind::Slime, 1), 100);
        assert_eq!(board.update_combo_score(EnemyKind::Slime, 2), 200);
        assert_eq!(board.update_combo_score(EnemyKind::Golem, 3), 900);
        assert_eq!(board.score, 1200);
        assert_eq!(board.best_combo, 3);
    }

    #[test]
    fn test_final_combo_bonus() {
        let mut board = ScoreBoard::new();
        assert_eq!(board.calculate_final_combo_score(0), 0);
        assert_eq!(board.calculate_final_combo_score(1), 0);
        assert_eq!(board.calculate_final_combo_score(3), 90);
        assert_eq!(board.score, 90);
        assert_eq!(board.last_bonus, 90);

        board.reset_score();
        assert_eq!(board, ScoreBoard::default());
    }

    #[test]
    fn test_timer_expires_once() {
        let mut timer = RoundTimer::new(1.0);
        assert!(!timer.tick(0.6));
        assert!(timer.tick(0.6));
        assert!(!timer.tick(0.6));
        assert_eq!(timer.remaining, 0.0);

        timer.reset();
        assert!(timer.running);
        assert_eq!(timer.remaining, 1.0);
        timer.stop();
        assert!(!timer.tick(5.0));
    }
}
