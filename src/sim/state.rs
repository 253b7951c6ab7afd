//! Game state and core simulation types
//!
//! Everything the simulation owns lives here. Presentation (sprites, sound,
//! particles) only ever sees the outbound [`GameEvent`] queue.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::collision::ReflectEffect;
use super::control::{ControlTarget, Controllable};
use super::enemy::{Enemy, EnemyKind, Spawner};
use super::player::Player;
use super::score::{RoundTimer, ScoreBoard};
use super::session::Session;
use crate::highscores::HighScores;
use crate::tuning::Tuning;

/// Named animation cues on the bullet sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletCue {
    /// Rewind and play the idle spin
    SpinStart,
    /// Pause and rewind the idle spin
    SpinStop,
    Stretch,
    Shoot,
    AngryToHappy,
    Die,
}

/// Sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    WallBounce,
    EnemyHit,
    PlayerHit,
    Grab,
    GameOver,
    /// Retry confirmation (shares the shoot sample)
    Confirm,
}

impl SoundCue {
    /// Slot in the host's sound bank
    pub fn index(self) -> u8 {
        match self {
            SoundCue::Shoot | SoundCue::Confirm => 0,
            SoundCue::WallBounce => 1,
            SoundCue::EnemyHit => 2,
            SoundCue::PlayerHit => 3,
            SoundCue::Grab => 4,
            SoundCue::GameOver => 5,
        }
    }
}

/// Outbound notifications for the presentation layer (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue(BulletCue),
    Sound(SoundCue),
    /// Aim line from the bullet to the pointer
    Trail { from: Vec2, to: Vec2 },
    TrailEnd,
    ReflectEffect(ReflectEffect),
    PlayerFlash,
    BulletSpawned { pos: Vec2 },
    BulletDestroyed { combo: u32 },
    EnemyDestroyed { id: u32, kind: EnemyKind },
    GameOverView { visible: bool },
    LoadScene(String),
}

/// Side effects a controller asks the driver to apply after it has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    FreezeAll,
    ResumeAll,
    /// Damage + flash the player
    HitPlayer,
    ComboScore { kind: EnemyKind, combo: u32 },
    DestroyEnemy(u32),
    FinalCombo(u32),
    /// Remove the (destroyed) bullet
    Despawn,
}

/// Requests and events produced during one phase
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pub requests: Vec<Request>,
    pub events: Vec<GameEvent>,
}

impl Outbox {
    pub fn request(&mut self, request: Request) {
        self.requests.push(request);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn cue(&mut self, cue: BulletCue) {
        self.events.push(GameEvent::Cue(cue));
    }

    pub fn sound(&mut self, sound: SoundCue) {
        self.events.push(GameEvent::Sound(sound));
    }
}

/// Every entity and collaborator the session coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub tuning: Tuning,
    pub player: Player,
    /// Live enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// At most one bullet at a time
    pub bullet: Option<Bullet>,
    pub score: ScoreBoard,
    pub timer: RoundTimer,
    pub spawner: Spawner,
    pub high_scores: HighScores,
    /// Undrained notifications, oldest first
    pub events: Vec<GameEvent>,
    /// Physics tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl World {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut player = Player::new(tuning.player_max_health);
        player.launch(tuning.player_launch_velocity());

        Self {
            player,
            enemies: Vec::new(),
            bullet: None,
            score: ScoreBoard::new(),
            timer: RoundTimer::new(tuning.round_seconds),
            spawner: Spawner::new(seed),
            high_scores: HighScores::new(),
            events: Vec::new(),
            time_ticks: 0,
            next_id: 1,
            tuning,
        }
    }

    /// Put every per-run field back to its `new` value. Tuning, the
    /// leaderboard and undrained events are kept.
    pub fn reset_run(&mut self) {
        self.player.reset_motion();
        self.player.launch(self.tuning.player_launch_velocity());
        self.player.health.reset();
        self.player.respawn_timer = 0.0;
        self.score.reset_score();

        self.clear_enemies();
        self.bullet = None;
        self.spawner.reset();
        self.timer.reset();
        self.time_ticks = 0;
        self.next_id = 1;
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Resolve a registered target; `None` once it has been removed
    pub fn controllable_mut(&mut self, target: ControlTarget) -> Option<&mut dyn Controllable> {
        match target {
            ControlTarget::Player => Some(&mut self.player),
            ControlTarget::Enemy(id) => self
                .enemy_mut(id)
                .map(|enemy| enemy as &mut dyn Controllable),
        }
    }

    /// Spawn a fresh (arming) bullet at the tuned spawn point
    pub fn spawn_bullet(&mut self) {
        let pos = self.tuning.bullet_spawn;
        self.bullet = Some(Bullet::new(pos, &self.tuning));
        self.events.push(GameEvent::BulletSpawned { pos });
        self.events.push(GameEvent::Cue(BulletCue::SpinStart));
        log::debug!("Bullet spawned at {pos:?}");
    }

    /// Remove any bullet without scoring it and schedule a replacement
    pub fn erase_bullet(&mut self) {
        if self.bullet.take().is_some() {
            log::debug!("Bullet erased");
        }
        self.player.respawn_timer = self.tuning.bullet_respawn_delay;
    }

    /// Remove the bullet if it has finished its destroy sequence
    pub fn despawn_bullet(&mut self) {
        if self.bullet.as_ref().is_some_and(|b| b.is_destroyed()) {
            self.erase_bullet();
        }
    }

    /// Start an enemy's destroy sequence (delayed removal)
    pub fn destroy_enemy(&mut self, id: u32) {
        let delay = self.tuning.enemy_death_time;
        let Some(enemy) = self.enemy_mut(id) else {
            log::debug!("Enemy {id} already removed");
            return;
        };
        if enemy.begin_destroy(delay) {
            let kind = enemy.kind;
            self.events.push(GameEvent::EnemyDestroyed { id, kind });
        }
    }

    /// Spawn the next wave. Returns the number of enemies added.
    pub fn spawn_wave(&mut self) -> usize {
        let count = self.tuning.wave_size(self.spawner.wave_index);
        let next_id = &mut self.next_id;
        let wave = self.spawner.spawn_wave(count, || {
            let id = *next_id;
            *next_id += 1;
            id
        });
        let added = wave.len();
        self.enemies.extend(wave);
        self.enemies.sort_by_key(|e| e.id);
        added
    }

    pub fn clear_enemies(&mut self) {
        self.enemies.clear();
    }

    /// Record the current run on the leaderboard
    pub fn record_high_score(&mut self) -> Option<usize> {
        let rank = self.high_scores.add_score(
            self.score.score,
            self.score.best_combo,
            self.spawner.wave_index,
            self.time_ticks,
        );
        if let Some(rank) = rank {
            log::info!("New high score #{rank}: {}", self.score.score);
        }
        rank
    }
}

/// Complete game state: the session plus the world it coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub session: Session,
    pub world: World,
    /// Unsimulated frame time carried to the next physics step
    #[serde(skip)]
    pub(crate) accumulator: f32,
}

impl GameState {
    /// Create a new game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let world = World::new(seed, tuning);
        let mut session = Session::new();
        session.register_control_set(&world);
        log::info!("New game (seed {seed})");
        Self {
            session,
            world,
            accumulator: 0.0,
        }
    }

    pub fn bullet(&self) -> Option<&Bullet> {
        self.world.bullet.as_ref()
    }

    /// Player position, for hosts that render it
    pub fn player_pos(&self) -> Vec2 {
        self.world.player.pos
    }
}
