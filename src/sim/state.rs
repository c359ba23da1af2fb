//! Game state and core simulation types
//!
//! `GameState` owns the playfield, the timer registry and the external
//! collaborators (sound sink, high-score store). The per-tick logic lives in
//! `tick.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{Explosion, ScoreBubble};
use super::entity::Entity;
use super::formation::Formation;
use super::projectile::Missile;
use super::stray::StrayEnemy;
use super::timers::{Clock, TimerId, TimerRegistry};
use crate::audio::{SoundEffect, SoundSink};
use crate::consts::*;
use crate::highscores::HighScoreStore;
use crate::settings::Settings;

/// Phase the paused game returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resume {
    Playing,
    Countdown,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    StartMenu,
    /// Between waves, counting down to the next formation
    Countdown,
    /// Active gameplay
    Playing,
    /// Frozen; every gameplay timer is suspended
    Paused { resume: Resume },
    /// Player destroyed, explosion showing before game over
    PlayerExploding,
    /// Run ended (continue / restart / menu)
    GameOver,
    /// Qualifying score waiting for a name
    HighScoreEntry,
}

impl GamePhase {
    /// Phases in which entities move
    pub fn simulates(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::PlayerExploding)
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    /// Never below zero
    pub health: i32,
    pub score: u64,
    pub level: u32,
    /// Invulnerable after a hit
    pub flinching: bool,
    /// Cannot fire; cleared after STUN_DURATION
    pub stunned: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            entity: Entity::new(
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                PLAYER_SIZE,
                PLAYER_COLLISION,
            ),
            health: PLAYER_MAX_HEALTH,
            score: 0,
            level: STARTING_LEVEL,
            flinching: false,
            stunned: false,
        }
    }
}

impl Player {
    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// Full health, back at the start position, no held keys
    pub fn respawn(&mut self) {
        self.health = PLAYER_MAX_HEALTH;
        self.flinching = false;
        self.stunned = false;
        self.entity.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.entity.heading = Default::default();
    }

    pub fn reset_score_and_level(&mut self) {
        self.score = 0;
        self.level = STARTING_LEVEL;
    }

    /// Take `damage` unless flinching. Returns true if it landed.
    pub fn hit(&mut self, damage: u32) -> bool {
        if self.flinching {
            return false;
        }
        self.health = (self.health - damage as i32).max(0);
        self.flinching = true;
        self.stunned = true;
        true
    }

    /// Clear expired hit windows and apply held movement
    pub fn update(&mut self, timers: &TimerRegistry, sensitivity: f32) {
        if self.stunned && timers.exceeded(TimerId::Flinch, STUN_DURATION) {
            self.stunned = false;
        }

        let pos = &mut self.entity.pos;
        if self.entity.heading.down {
            pos.y = (pos.y + sensitivity).min(PLAYER_MAX_Y);
        } else if self.entity.heading.up {
            pos.y = (pos.y - sensitivity).max(PLAYER_MIN_Y);
        }

        if self.flinching && timers.exceeded(TimerId::Flinch, FLINCH_DURATION) {
            self.flinching = false;
        }
    }
}

/// Three barrier groups of 4x4 cells between the player and the formation
pub fn barrier_grid() -> Vec<Entity> {
    let half = BARRIER_CELL / 2.0;
    let mut cells = Vec::with_capacity(BARRIER_GROUPS * BARRIER_CELLS_PER_GROUP);
    for group in 0..BARRIER_GROUPS {
        for cell in 0..BARRIER_CELLS_PER_GROUP {
            let left = BARRIER_ORIGIN_X + BARRIER_CELL * (cell / 15) as f32;
            let top = BARRIER_ORIGIN_Y
                + group as f32 * BARRIER_GROUP_SPACING
                + (cell % 20) as f32 * BARRIER_CELL;
            cells.push(Entity::new(
                Vec2::new(left + half, top + half),
                (BARRIER_CELL, BARRIER_CELL),
                (BARRIER_CELL, BARRIER_CELL),
            ));
        }
    }
    cells
}

/// Every entity on the playfield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playfield {
    pub player: Player,
    pub formation: Formation,
    pub player_missiles: Vec<Missile>,
    pub enemy_missiles: Vec<Missile>,
    pub barriers: Vec<Entity>,
    pub stray: StrayEnemy,
    pub explosions: Vec<Explosion>,
    pub score_bubbles: Vec<ScoreBubble>,
}

impl Playfield {
    /// Fresh formation and barriers, transient lists cleared.
    /// Score and level are kept.
    pub fn start_wave(&mut self) {
        self.player_missiles.clear();
        self.enemy_missiles.clear();
        self.explosions.clear();
        self.score_bubbles.clear();
        self.stray.clear();
        self.player.respawn();
        self.formation.populate();
        self.barriers = barrier_grid();
    }
}

/// Complete game session
pub struct GameState {
    pub phase: GamePhase,
    pub field: Playfield,
    pub timers: TimerRegistry,
    pub settings: Settings,
    pub continues: u32,
    /// Whether the last game over offered a continue
    pub continue_available: bool,
    /// High scores were checked for the current game over
    high_score_checked: bool,
    /// Settings toast text
    pub(crate) message: Option<String>,
    sound: Box<dyn SoundSink>,
    high_scores: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("phase", &self.phase)
            .field("level", &self.field.player.level)
            .field("score", &self.field.player.score)
            .field("continues", &self.continues)
            .finish_non_exhaustive()
    }
}

impl GameState {
    /// A session sitting at the start menu
    pub fn new(
        clock: Box<dyn Clock>,
        sound: Box<dyn SoundSink>,
        high_scores: Box<dyn HighScoreStore>,
        settings: Settings,
    ) -> Self {
        Self {
            phase: GamePhase::StartMenu,
            field: Playfield::default(),
            timers: TimerRegistry::new(clock),
            settings,
            continues: STARTING_CONTINUES,
            continue_available: false,
            high_score_checked: false,
            message: None,
            sound,
            high_scores,
        }
    }

    pub fn high_scores(&self) -> &dyn HighScoreStore {
        self.high_scores.as_ref()
    }

    pub(crate) fn high_scores_mut(&mut self) -> &mut dyn HighScoreStore {
        self.high_scores.as_mut()
    }

    /// Forward a sound effect if sound is enabled
    pub(crate) fn play(&mut self, effect: SoundEffect) {
        if self.settings.sound {
            self.sound.play(effect);
        }
    }

    pub(crate) fn high_score_checked(&self) -> bool {
        self.high_score_checked
    }

    pub(crate) fn set_high_score_checked(&mut self, checked: bool) {
        self.high_score_checked = checked;
    }

    /// Begin a wave at the current level and reset per-wave timers
    pub(crate) fn start_wave(&mut self) {
        self.field.start_wave();
        self.timers.set(TimerId::EnemyShot);
        self.timers.set(TimerId::StraySpawn);
        self.timers.reset(TimerId::Flinch);
        self.timers.reset(TimerId::Countdown);
        self.timers.reset(TimerId::PlayerExplosion);
        self.high_score_checked = false;
        self.phase = GamePhase::Playing;
        log::info!(
            "Wave started: level {}, {} ships, {} continues",
            self.field.player.level,
            self.field.formation.len(),
            self.continues
        );
    }

    /// Fresh run: full continues, zero score, first level
    pub(crate) fn start_run(&mut self) {
        self.continues = STARTING_CONTINUES;
        self.field.player.reset_score_and_level();
        self.high_scores.begin_run();
        self.start_wave();
    }
}
