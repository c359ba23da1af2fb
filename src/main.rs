//! Side Invaders headless demo
//!
//! Drives the core with a simple bot on a manual 60 Hz clock, logging phase
//! changes and printing the final HUD as JSON. Run with
//! `RUST_LOG=info side-invaders [seconds]`.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use rand::Rng;

use side_invaders::consts::*;
use side_invaders::sim::{Command, GamePhase, GameState, ManualClock};
use side_invaders::{HighScores, Setting, Settings, SoundQueue};

/// Default simulated play time
const DEFAULT_SECONDS: u32 = 120;

/// Bot holds still when the target lane is this close
const BOT_DEADBAND: f32 = 4.0;

fn data_dir() -> PathBuf {
    std::env::temp_dir().join("side-invaders")
}

/// Steer toward the nearest firing lane and shoot whenever possible
fn drive_bot(state: &mut GameState, rng: &mut impl Rng) {
    let player_y = state.field.player.pos().y;
    let target = state
        .field
        .formation
        .closest_bottom_most(player_y)
        .map(|lane| lane.y + rng.random_range(-15.0..15.0))
        .unwrap_or(PLAYER_START_Y);

    state.move_up(target < player_y - BOT_DEADBAND);
    state.move_down(target > player_y + BOT_DEADBAND);
    if rng.random_bool(0.8) {
        state.fire();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seconds = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u32>().ok())
        .unwrap_or(DEFAULT_SECONDS);
    log::info!("Side Invaders demo: {seconds}s of simulated play");

    let dir = data_dir();
    if let Err(err) = std::fs::create_dir_all(&dir) {
        log::warn!("Cannot create {}: {err}", dir.display());
    }
    let settings_path = dir.join("settings.json");
    let scores_path = dir.join("highscores.json");

    let clock = ManualClock::new();
    let sounds = SoundQueue::new();
    let scores = Rc::new(RefCell::new(HighScores::load_from(&scores_path)));
    let mut state = GameState::new(
        Box::new(clock.clone()),
        Box::new(sounds.clone()),
        Box::new(Rc::clone(&scores)),
        Settings::load_from(&settings_path),
    );
    let mut rng = rand::rng();

    state.apply(Command::NewGame);
    state.apply(Command::Toggle(Setting::SensitivityUp));

    let mut last_phase = state.phase;
    let mut sounds_played = 0usize;
    for _ in 0..seconds * TICK_RATE {
        match state.phase {
            GamePhase::Playing => drive_bot(&mut state, &mut rng),
            GamePhase::GameOver if state.continue_available => state.continue_request(),
            GamePhase::GameOver => break,
            GamePhase::HighScoreEntry => state.apply(Command::SubmitHighScore("BOT".to_string())),
            _ => {}
        }

        state.update();
        clock.advance(SIM_DT);
        sounds_played += sounds.drain().len();

        if state.phase != last_phase {
            log::info!("Phase {:?} -> {:?}", last_phase, state.phase);
            last_phase = state.phase;
        }
    }

    log::info!("{sounds_played} sound effects played");

    if let Err(err) = scores.borrow().save_to(&scores_path) {
        log::error!("Failed to save high scores: {err}");
    }
    if let Err(err) = state.settings.save_to(&settings_path) {
        log::error!("Failed to save settings: {err}");
    }

    match serde_json::to_string_pretty(&state.hud()) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize HUD: {err}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless demo only runs natively
}
