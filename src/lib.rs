//! Side Invaders - a sideways invaders arcade core
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (formation, missiles, collisions, phases)
//! - `audio`: Sound effect events and sinks
//! - `highscores`: Top-10 leaderboard store
//! - `settings`: Player preferences
//!
//! Rendering, audio playback and menus live outside this crate. They read
//! `GameState::sprites()` and `GameState::hud()` each frame.

pub mod audio;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use audio::{SoundEffect, SoundQueue, SoundSink};
pub use error::PersistError;
pub use highscores::{HighScoreStore, HighScores};
pub use settings::{Setting, Settings};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed timestep
    pub const SIM_DT: Duration = Duration::from_micros(16_667);

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 640.0;
    pub const PLAYFIELD_HEIGHT: f32 = 480.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 60.0;
    pub const PLAYER_START_Y: f32 = 210.0;
    pub const PLAYER_SIZE: (f32, f32) = (35.0, 35.0);
    pub const PLAYER_COLLISION: (f32, f32) = (25.0, 30.0);
    pub const PLAYER_MIN_Y: f32 = 0.0;
    pub const PLAYER_MAX_Y: f32 = 440.0;
    pub const PLAYER_MAX_HEALTH: i32 = 3;
    /// Missiles leave the nose of the ship, not its center
    pub const PLAYER_MUZZLE_OFFSET: f32 = 18.0;
    pub const STARTING_LEVEL: u32 = 1;
    pub const STARTING_CONTINUES: u32 = 3;
    /// Damage taken when a formation ship rams the player
    pub const CONTACT_DAMAGE: u32 = 1;

    /// Enemy ships
    pub const ENEMY_SIZE: (f32, f32) = (30.0, 30.0);
    pub const ENEMY_COLLISION: (f32, f32) = (25.0, 30.0);
    pub const FORMATION_COLUMNS: usize = 5;
    pub const FORMATION_ROWS: usize = 10;
    pub const FORMATION_ORIGIN_X: f32 = 430.0;
    pub const FORMATION_ORIGIN_Y: f32 = 50.0;
    pub const FORMATION_SPACING_X: f32 = 60.0;
    pub const FORMATION_SPACING_Y: f32 = 40.0;
    pub const MAX_RANK: u8 = 3;
    /// Formation turns around when its leading ship crosses these rows
    pub const FORMATION_UPPER_LIMIT: f32 = 20.0;
    pub const FORMATION_LOWER_LIMIT: f32 = 460.0;
    /// Pivot: ticks 1..PIVOT_TICKS-1 move left, the last tick flips direction
    pub const PIVOT_TICKS: u32 = 6;
    pub const PIVOT_STEP: f32 = 2.0;
    pub const BASE_MOVE_SPEED: f32 = 0.4;
    /// Cheat keys nudge the shared speed by this much
    pub const CHEAT_SPEED_STEP: f32 = 0.4;
    /// Speed tiers as (kills below, speed); the last entry is open-ended
    pub const SPEED_TIERS: [(u32, f32); 8] = [
        (10, 0.4),
        (20, 0.8),
        (30, 1.2),
        (40, 1.6),
        (45, 2.0),
        (47, 3.0),
        (48, 4.0),
        (49, 7.0),
    ];
    pub const FINAL_TIER_SPEED: f32 = 9.0;
    /// Shared sprite strip
    pub const ENEMY_FRAME_COUNT: usize = 10;
    pub const ENEMY_FRAME_INTERVAL: Duration = Duration::from_millis(75);
    pub const STRAY_FRAME_DIVISOR: usize = 4;

    /// Missiles
    pub const MISSILE_SIZE: (f32, f32) = (20.0, 3.0);
    pub const MISSILE_COLLISION: (f32, f32) = (14.0, 3.0);
    pub const MISSILE_SPEED: f32 = 3.0;
    pub const ENEMY_MISSILE_DAMAGE: u32 = 1;
    pub const PLAYER_SHOT_COOLDOWN: Duration = Duration::from_millis(350);
    pub const ENEMY_SHOT_BASE: Duration = Duration::from_millis(800);
    pub const ENEMY_SHOT_STEP: Duration = Duration::from_millis(100);
    pub const ENEMY_SHOT_MIN: Duration = Duration::from_millis(200);

    /// Stray enemy
    pub const STRAY_SPAWN_INTERVAL: Duration = Duration::from_secs(20);
    pub const STRAY_EDGE_MARGIN: f32 = 20.0;
    pub const STRAY_SPEED: f32 = 1.0;
    pub const STRAY_DRIFT: f32 = 0.1;
    pub const STRAY_TOP_LANE: f32 = 20.0;
    pub const STRAY_BOTTOM_LANE: f32 = 460.0;

    /// Barriers
    pub const BARRIER_GROUPS: usize = 3;
    pub const BARRIER_CELLS_PER_GROUP: usize = 40;
    pub const BARRIER_CELL: f32 = 4.0;
    pub const BARRIER_ORIGIN_X: f32 = 140.0;
    pub const BARRIER_ORIGIN_Y: f32 = 50.0;
    pub const BARRIER_GROUP_SPACING: f32 = 150.0;

    /// Effects
    pub const EXPLOSION_TICKS_PER_FRAME: u32 = 4;
    pub const SCORE_BUBBLE_TICKS: u32 = 60;
    pub const SCORE_BUBBLE_RISE: f32 = 0.5;

    /// Phase timings
    pub const COUNTDOWN_DURATION: Duration = Duration::from_secs(3);
    pub const PLAYER_EXPLOSION_DURATION: Duration = Duration::from_secs(1);
    pub const FLINCH_DURATION: Duration = Duration::from_secs(2);
    /// Firing is locked for this long after a hit
    pub const STUN_DURATION: Duration = Duration::from_millis(500);
    /// Blink period while flinching
    pub const FLINCH_BLINK: Duration = Duration::from_millis(100);
    pub const SETTING_MESSAGE_DURATION: Duration = Duration::from_millis(1500);
}
