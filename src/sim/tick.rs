//! Fixed timestep simulation tick
//!
//! `GameState::update` advances one tick. Input arrives between ticks as
//! `Command`s (or the intent helpers that wrap them); timing that is not
//! per-tick motion goes through the timer registry.

use glam::Vec2;

use super::collision::{ResolveContext, resolve};
use super::effects::advance_effects;
use super::projectile::{Missile, advance_missiles, enemy_shot_interval};
use super::state::{GamePhase, GameState, Playfield, Resume};
use super::timers::TimerId;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::settings::Setting;

/// Everything the outside world can ask of the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a run from the start menu
    NewGame,
    /// Abandon the current game
    MainMenu,
    /// Held state of the up key
    MoveUp(bool),
    /// Held state of the down key
    MoveDown(bool),
    Fire,
    PauseToggle,
    /// Fresh game while playing, start menu after game over
    Restart,
    /// Spend a continue after game over
    Continue,
    /// Speed the formation up by hand (disables scoring for the wave)
    CheatFaster,
    CheatSlower,
    Toggle(Setting),
    SubmitHighScore(String),
    SkipHighScore,
}

impl GameState {
    /// Apply a single command. Commands that make no sense in the current
    /// phase are ignored.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::NewGame => {
                if self.phase == GamePhase::StartMenu {
                    log::info!("New game");
                    self.start_run();
                }
            }
            Command::MainMenu => self.return_to_menu(),
            Command::MoveUp(held) => self.field.player.entity.heading.up = held,
            Command::MoveDown(held) => self.field.player.entity.heading.down = held,
            Command::Fire => self.fire_player_missile(),
            Command::PauseToggle => self.toggle_pause(),
            Command::Restart => match self.phase {
                GamePhase::GameOver => self.return_to_menu(),
                GamePhase::Playing
                | GamePhase::Countdown
                | GamePhase::Paused { .. }
                | GamePhase::PlayerExploding => {
                    log::info!("Restarting");
                    self.timers.resume();
                    self.start_run();
                }
                GamePhase::StartMenu | GamePhase::HighScoreEntry => {}
            },
            Command::Continue => self.spend_continue(),
            Command::CheatFaster => self.cheat(CHEAT_SPEED_STEP),
            Command::CheatSlower => self.cheat(-CHEAT_SPEED_STEP),
            Command::Toggle(setting) => {
                let message = self.settings.toggle(setting);
                log::info!("{message}");
                self.message = Some(message);
                self.timers.set(TimerId::SettingMessage);
            }
            Command::SubmitHighScore(name) => {
                if self.phase == GamePhase::HighScoreEntry {
                    let (score, level) = (self.field.player.score, self.field.player.level);
                    log::info!("High score submitted: {name} {score} (level {level})");
                    self.high_scores_mut().submit(&name, score, level);
                    self.phase = GamePhase::GameOver;
                }
            }
            Command::SkipHighScore => {
                if self.phase == GamePhase::HighScoreEntry {
                    self.phase = GamePhase::GameOver;
                }
            }
        }
    }

    pub fn move_up(&mut self, held: bool) {
        self.apply(Command::MoveUp(held));
    }

    pub fn move_down(&mut self, held: bool) {
        self.apply(Command::MoveDown(held));
    }

    pub fn fire(&mut self) {
        self.apply(Command::Fire);
    }

    pub fn pause_toggle(&mut self) {
        self.apply(Command::PauseToggle);
    }

    pub fn restart_request(&mut self) {
        self.apply(Command::Restart);
    }

    pub fn continue_request(&mut self) {
        self.apply(Command::Continue);
    }

    /// Advance the game by one tick
    pub fn update(&mut self) {
        if self.message.is_some() && self.timers.exceeded(TimerId::SettingMessage, SETTING_MESSAGE_DURATION) {
            self.message = None;
        }

        if self.phase.simulates() {
            self.simulate();
        } else if self.phase == GamePhase::Countdown
            && self.timers.elapsed(TimerId::Countdown) >= COUNTDOWN_DURATION
        {
            self.field.player.level += 1;
            self.start_wave();
        }
    }

    fn simulate(&mut self) {
        let exploding = self.phase == GamePhase::PlayerExploding;

        if !exploding {
            let sensitivity = self.settings.sensitivity();
            self.field.player.update(&self.timers, sensitivity);
        }
        self.field.formation.advance(&mut self.timers);
        self.fire_enemy_missile();
        advance_missiles(&mut self.field.player_missiles);
        advance_missiles(&mut self.field.enemy_missiles);
        self.field.stray.update(&mut self.timers);

        let ctx = ResolveContext {
            level: self.field.player.level,
            award_points: !self.field.formation.cheat_active(),
            player_vulnerable: !exploding,
            explosions: self.settings.explosions,
            score_bubbles: self.settings.score_bubbles,
        };
        let report = resolve(&mut self.field, &ctx);
        for effect in report.sounds.iter().copied() {
            self.play(effect);
        }
        if report.player_hit {
            self.timers.set(TimerId::Flinch);
        }
        if report.player_destroyed {
            log::info!("Player destroyed at level {}", self.field.player.level);
            self.timers.set(TimerId::PlayerExplosion);
            self.phase = GamePhase::PlayerExploding;
        }

        advance_effects(&mut self.field.explosions, &mut self.field.score_bubbles);

        if report.invaded {
            log::info!("Formation broke through");
            self.enter_game_over();
        } else if self.phase == GamePhase::PlayerExploding {
            if self.timers.exceeded(TimerId::PlayerExplosion, PLAYER_EXPLOSION_DURATION) {
                self.enter_game_over();
            }
        } else if self.field.formation.is_empty() {
            log::info!("Wave {} cleared", self.field.player.level);
            self.timers.set(TimerId::Countdown);
            self.phase = GamePhase::Countdown;
        }
    }

    fn fire_player_missile(&mut self) {
        if self.phase != GamePhase::Playing
            || self.field.player.stunned
            || !self.timers.exceeded(TimerId::PlayerShot, PLAYER_SHOT_COOLDOWN)
        {
            return;
        }
        self.timers.set(TimerId::PlayerShot);
        let muzzle = self.field.player.pos() + Vec2::new(PLAYER_MUZZLE_OFFSET, 0.0);
        self.field.player_missiles.push(Missile::player(muzzle));
        self.play(SoundEffect::PlayerShot);
    }

    fn fire_enemy_missile(&mut self) {
        let interval = enemy_shot_interval(self.field.player.level);
        if !self.timers.exceeded(TimerId::EnemyShot, interval) {
            return;
        }
        let Some(origin) = self
            .field
            .formation
            .closest_bottom_most(self.field.player.pos().y)
        else {
            return;
        };
        self.timers.set(TimerId::EnemyShot);
        self.field.enemy_missiles.push(Missile::enemy(origin));
        self.play(SoundEffect::EnemyShot);
    }

    fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing | GamePhase::Countdown => {
                let resume = if self.phase == GamePhase::Playing {
                    Resume::Playing
                } else {
                    Resume::Countdown
                };
                self.timers.suspend();
                self.phase = GamePhase::Paused { resume };
                log::info!("Paused");
            }
            GamePhase::Paused { resume } => {
                let paused_for = self.timers.resume();
                self.phase = match resume {
                    Resume::Playing => GamePhase::Playing,
                    Resume::Countdown => GamePhase::Countdown,
                };
                log::info!("Resumed after {:.1}s", paused_for.as_secs_f32());
            }
            _ => {}
        }
    }

    fn cheat(&mut self, delta: f32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.field.formation.cheat_adjust(delta);
        log::info!(
            "Cheat: formation speed {:.1}, scoring off for this wave",
            self.field.formation.move_speed()
        );
    }

    fn spend_continue(&mut self) {
        if self.phase != GamePhase::GameOver || self.continues == 0 {
            return;
        }
        self.continues -= 1;
        log::info!("Continue used, {} left", self.continues);
        self.start_wave();
    }

    fn return_to_menu(&mut self) {
        if self.phase == GamePhase::StartMenu {
            return;
        }
        self.timers.resume();
        self.continues = STARTING_CONTINUES;
        self.field = Playfield::default();
        self.phase = GamePhase::StartMenu;
        log::info!("Back to start menu");
    }

    fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.continue_available = self.continues > 0;
        log::info!(
            "Game over: score {}, level {}, {} continues left",
            self.field.player.score,
            self.field.player.level,
            self.continues
        );

        if self.continues > 0 || self.high_score_checked() {
            return;
        }
        self.set_high_score_checked(true);
        let score = self.field.player.score;
        let store = self.high_scores();
        if !store.has_attempted_this_run() && store.qualifies(score) {
            log::info!("Score {score} qualifies for the high score table");
            self.phase = GamePhase::HighScoreEntry;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::audio::SoundQueue;
    use crate::highscores::HighScores;
    use crate::settings::Settings;
    use crate::sim::effects::ExplosionKind;
    use crate::sim::timers::ManualClock;

    fn new_state() -> (GameState, ManualClock, SoundQueue) {
        let clock = ManualClock::new();
        let sounds = SoundQueue::default();
        let state = GameState::new(
            Box::new(clock.clone()),
            Box::new(sounds.clone()),
            Box::new(HighScores::default()),
            Settings::default(),
        );
        (state, clock, sounds)
    }

    fn playing() -> (GameState, ManualClock, SoundQueue) {
        let (mut state, clock, sounds) = new_state();
        state.apply(Command::NewGame);
        assert_eq!(state.phase, GamePhase::Playing);
        (state, clock, sounds)
    }

    /// Put an enemy missile where it will meet the player this tick
    fn shoot_player(state: &mut GameState) {
        let at = state.field.player.pos() + Vec2::new(MISSILE_SPEED, 0.0);
        state.field.enemy_missiles.push(Missile::enemy(at));
    }

    /// Three hits spaced past the flinch window
    fn destroy_player(state: &mut GameState, clock: &ManualClock) {
        for _ in 0..PLAYER_MAX_HEALTH {
            shoot_player(state);
            state.update();
            clock.advance(FLINCH_DURATION + Duration::from_millis(100));
        }
    }

    #[test]
    fn test_new_game_from_menu() {
        let (mut state, _, _) = new_state();
        assert_eq!(state.phase, GamePhase::StartMenu);
        state.update();
        assert_eq!(state.phase, GamePhase::StartMenu);

        state.apply(Command::NewGame);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.field.formation.len(), FORMATION_COLUMNS * FORMATION_ROWS);
        assert_eq!(state.field.barriers.len(), BARRIER_GROUPS * BARRIER_CELLS_PER_GROUP);
        assert_eq!(state.field.player.level, STARTING_LEVEL);
        assert_eq!(state.continues, STARTING_CONTINUES);
    }

    #[test]
    fn test_tick_pause() {
        let (mut state, _, _) = playing();

        state.pause_toggle();
        assert_eq!(
            state.phase,
            GamePhase::Paused {
                resume: Resume::Playing
            }
        );

        state.pause_toggle();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_paused_ticks_freeze_everything() {
        let (mut state, clock, _) = playing();
        state.update();
        state.fire();
        clock.advance(Duration::from_millis(100));
        let ships: Vec<Vec2> = state.field.formation.ships.iter().map(|s| s.pos()).collect();
        let missile = state.field.player_missiles[0].pos();
        let shot_elapsed = state.timers.elapsed(TimerId::EnemyShot);

        state.pause_toggle();
        for _ in 0..100 {
            clock.advance(Duration::from_millis(16));
            state.update();
        }
        let frozen: Vec<Vec2> = state.field.formation.ships.iter().map(|s| s.pos()).collect();
        assert_eq!(ships, frozen);
        assert_eq!(state.field.player_missiles[0].pos(), missile);
        assert_eq!(state.timers.elapsed(TimerId::EnemyShot), shot_elapsed);

        state.pause_toggle();
        assert_eq!(state.timers.elapsed(TimerId::EnemyShot), shot_elapsed);
    }

    #[test]
    fn test_paused_ticks_freeze_every_timer() {
        let (mut state, clock, _) = playing();
        state.fire();
        state.apply(Command::Toggle(Setting::Explosions));
        shoot_player(&mut state);
        state.update();
        clock.advance(Duration::from_millis(100));

        let readings = |state: &GameState| -> Vec<Duration> {
            TimerId::ALL
                .iter()
                .filter(|id| id.follows_pause())
                .map(|&id| state.timers.elapsed(id))
                .collect()
        };
        let before = readings(&state);

        state.pause_toggle();
        for _ in 0..120 {
            clock.advance(Duration::from_millis(16));
            state.update();
        }
        assert_eq!(readings(&state), before);
        assert_eq!(state.message.as_deref(), Some("Explosions OFF"));

        state.pause_toggle();
        assert_eq!(readings(&state), before);
    }

    #[test]
    fn test_zero_length_pause_is_idempotent() {
        let (mut state, clock, _) = playing();
        clock.advance(Duration::from_millis(250));
        state.update();
        let before = state.timers.elapsed(TimerId::StraySpawn);
        let ships = state.field.formation.ships.clone();

        state.pause_toggle();
        state.pause_toggle();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.timers.elapsed(TimerId::StraySpawn), before);
        assert_eq!(state.field.formation.ships, ships);
    }

    #[test]
    fn test_pause_only_from_active_phases() {
        let (mut state, _, _) = new_state();
        state.pause_toggle();
        assert_eq!(state.phase, GamePhase::StartMenu);
        assert!(!state.timers.is_suspended());
    }

    #[test]
    fn test_pause_keeps_flinch_window() {
        let (mut state, clock, _) = playing();
        shoot_player(&mut state);
        state.update();
        assert!(state.field.player.flinching);

        clock.advance(Duration::from_millis(1500));
        state.pause_toggle();
        clock.advance(Duration::from_secs(10));
        state.pause_toggle();
        state.update();
        assert!(state.field.player.flinching);

        clock.advance(Duration::from_millis(600));
        state.update();
        assert!(!state.field.player.flinching);
    }

    #[test]
    fn test_fire_cooldown() {
        let (mut state, clock, sounds) = playing();
        state.fire();
        state.fire();
        assert_eq!(state.field.player_missiles.len(), 1);
        assert_eq!(
            state.field.player_missiles[0].pos(),
            state.field.player.pos() + Vec2::new(PLAYER_MUZZLE_OFFSET, 0.0)
        );

        clock.advance(PLAYER_SHOT_COOLDOWN);
        state.fire();
        assert_eq!(state.field.player_missiles.len(), 1);

        clock.advance(Duration::from_millis(1));
        state.fire();
        assert_eq!(state.field.player_missiles.len(), 2);
        assert_eq!(
            sounds.drain(),
            vec![SoundEffect::PlayerShot, SoundEffect::PlayerShot]
        );
    }

    #[test]
    fn test_stunned_player_cannot_fire() {
        let (mut state, clock, _) = playing();
        shoot_player(&mut state);
        state.update();
        assert!(state.field.player.stunned);
        state.fire();
        assert!(state.field.player_missiles.is_empty());

        clock.advance(STUN_DURATION + Duration::from_millis(1));
        state.update();
        assert!(!state.field.player.stunned);
        // Still inside the flinch window
        assert!(state.field.player.flinching);
        state.fire();
        assert_eq!(state.field.player_missiles.len(), 1);
    }

    #[test]
    fn test_enemy_fires_from_nearest_lane() {
        let (mut state, clock, sounds) = playing();
        state.update();
        assert!(state.field.enemy_missiles.is_empty());

        clock.advance(enemy_shot_interval(1) + Duration::from_millis(1));
        state.update();
        assert_eq!(state.field.enemy_missiles.len(), 1);
        assert!(sounds.drain().contains(&SoundEffect::EnemyShot));
    }

    #[test]
    fn test_sound_setting_mutes_sink() {
        let (mut state, _, sounds) = playing();
        state.apply(Command::Toggle(Setting::Sound));
        assert!(!state.settings.sound);
        state.fire();
        assert_eq!(state.field.player_missiles.len(), 1);
        assert!(sounds.drain().is_empty());
    }

    #[test]
    fn test_movement_uses_sensitivity() {
        let (mut state, _, _) = playing();
        let start = state.field.player.pos().y;
        state.move_down(true);
        state.update();
        assert_eq!(state.field.player.pos().y, start + state.settings.sensitivity());
        state.move_down(false);
        state.update();
        assert_eq!(state.field.player.pos().y, start + state.settings.sensitivity());
    }

    #[test]
    fn test_wave_clear_counts_down_to_next_level() {
        let (mut state, clock, _) = playing();
        // The rightmost column starts past the edge where missiles are
        // culled; step the whole formation in by one column first
        for ship in &mut state.field.formation.ships {
            ship.entity.pos.x -= FORMATION_SPACING_X;
        }
        // One missile per ship, arriving this tick
        let targets: Vec<Vec2> = state.field.formation.ships.iter().map(|s| s.pos()).collect();
        assert!(targets.iter().all(|t| t.x < PLAYFIELD_WIDTH));
        for pos in targets {
            state
                .field
                .player_missiles
                .push(Missile::player(pos - Vec2::new(MISSILE_SPEED, 0.0)));
        }
        state.update();
        assert!(state.field.formation.is_empty());
        assert!(state.field.player_missiles.is_empty());
        assert_eq!(state.field.formation.kills(), 50);
        assert_eq!(state.field.formation.move_speed(), FINAL_TIER_SPEED);
        // 5 ships each of ranks 0..=2 plus 35 of rank 3, at level 1
        assert_eq!(state.field.player.score, 5 * 60 + 5 * 45 + 5 * 30 + 35 * 15);
        assert_eq!(state.phase, GamePhase::Countdown);

        clock.advance(Duration::from_secs(2));
        state.update();
        assert_eq!(state.phase, GamePhase::Countdown);

        clock.advance(Duration::from_secs(1));
        state.update();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.field.player.level, STARTING_LEVEL + 1);
        assert_eq!(state.field.formation.len(), FORMATION_COLUMNS * FORMATION_ROWS);
        assert_eq!(state.field.formation.move_speed(), BASE_MOVE_SPEED);
        assert!(state.field.player_missiles.is_empty());
        assert!(state.field.enemy_missiles.is_empty());
    }

    #[test]
    fn test_cheat_mode_blocks_scoring() {
        let (mut state, _, _) = playing();
        state.apply(Command::CheatFaster);
        assert!(state.field.formation.cheat_active());
        assert_eq!(state.field.formation.move_speed(), BASE_MOVE_SPEED + CHEAT_SPEED_STEP);

        let target = state.field.formation.ships[0].pos();
        state
            .field
            .player_missiles
            .push(Missile::player(target - Vec2::new(MISSILE_SPEED, 0.0)));
        state.update();
        assert_eq!(state.field.formation.kills(), 1);
        assert_eq!(state.field.player.score, 0);
        assert_eq!(state.field.formation.move_speed(), BASE_MOVE_SPEED + CHEAT_SPEED_STEP);
    }

    #[test]
    fn test_three_hits_end_the_game() {
        let (mut state, clock, sounds) = playing();
        destroy_player(&mut state, &clock);
        assert_eq!(state.phase, GamePhase::PlayerExploding);
        assert_eq!(state.field.player.health, 0);
        assert!(sounds.drain().contains(&SoundEffect::ExplosionPlayer));
        assert!(state.field.explosions.iter().any(|e| e.kind == ExplosionKind::Player));

        // Firing and damage are off while exploding
        state.fire();
        assert!(state.field.player_missiles.is_empty());

        // The explosion window ran out while waiting after the last hit
        state.update();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.continue_available);
        assert_eq!(state.continues, STARTING_CONTINUES);

        state.continue_request();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.continues, STARTING_CONTINUES - 1);
        assert_eq!(state.field.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.field.player.level, STARTING_LEVEL);

        // Continue outside game over does nothing
        state.continue_request();
        assert_eq!(state.continues, STARTING_CONTINUES - 1);
    }

    #[test]
    fn test_continue_keeps_score() {
        let (mut state, clock, _) = playing();
        state.field.player.score = 1234;
        state.field.player.level = 4;
        destroy_player(&mut state, &clock);
        state.update();
        assert_eq!(state.phase, GamePhase::GameOver);

        state.continue_request();
        assert_eq!(state.field.player.score, 1234);
        assert_eq!(state.field.player.level, 4);
    }

    #[test]
    fn test_no_continues_left() {
        let (mut state, clock, _) = playing();
        state.continues = 0;
        state.field.player.score = 0;
        destroy_player(&mut state, &clock);
        state.update();
        // A zero score never qualifies
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.continue_available);

        state.continue_request();
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.continues, 0);
    }

    #[test]
    fn test_high_score_entry_once() {
        let (mut state, clock, _) = playing();
        state.continues = 0;
        state.field.player.score = 5000;
        destroy_player(&mut state, &clock);
        state.update();
        assert_eq!(state.phase, GamePhase::HighScoreEntry);

        state.apply(Command::SubmitHighScore("ACE".to_string()));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.high_scores().has_attempted_this_run());
        assert!(!state.high_scores().qualifies(0));

        state.update();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_paths() {
        let (mut state, clock, _) = playing();
        state.field.player.score = 300;
        state.restart_request();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.field.player.score, 0);

        destroy_player(&mut state, &clock);
        state.update();
        assert_eq!(state.phase, GamePhase::GameOver);
        state.restart_request();
        assert_eq!(state.phase, GamePhase::StartMenu);
        assert_eq!(state.continues, STARTING_CONTINUES);
    }

    #[test]
    fn test_main_menu_while_paused() {
        let (mut state, _, _) = playing();
        state.pause_toggle();
        state.apply(Command::MainMenu);
        assert_eq!(state.phase, GamePhase::StartMenu);
        assert!(!state.timers.is_suspended());
        assert!(state.field.formation.is_empty());
    }

    #[test]
    fn test_invasion_is_game_over() {
        let (mut state, _, _) = playing();
        state.field.formation.ships[0].entity.pos.x = -5.0;
        state.update();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_setting_toast_expires() {
        let (mut state, clock, _) = new_state();
        state.apply(Command::Toggle(Setting::Explosions));
        assert!(state.message.is_some());
        clock.advance(SETTING_MESSAGE_DURATION + Duration::from_millis(1));
        state.update();
        assert!(state.message.is_none());
    }
}
