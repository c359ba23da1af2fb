//! Game settings and preferences
//!
//! Persisted separately from high scores as JSON. Toggled in game through
//! `Command::Toggle`; each change returns the toast text to show.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Player sensitivity bounds (pixels per tick)
pub const MIN_SENSITIVITY: u8 = 1;
pub const MAX_SENSITIVITY: u8 = 10;

/// A toggleable preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Setting {
    Sound,
    Explosions,
    ScoreBubbles,
    Background,
    BackgroundScrolling,
    SensitivityUp,
    SensitivityDown,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Forward sound effects to the sink
    pub sound: bool,

    // === Visual Effects ===
    /// Spawn explosion effects
    pub explosions: bool,
    /// Spawn floating score bubbles
    pub score_bubbles: bool,
    /// Frontend draws the background image
    pub background: bool,
    /// Frontend scrolls the background
    pub background_scrolling: bool,

    // === Controls ===
    /// Player vertical speed, MIN_SENSITIVITY..=MAX_SENSITIVITY
    pub player_sensitivity: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            explosions: true,
            score_bubbles: true,
            background: true,
            background_scrolling: true,
            player_sensitivity: 3,
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}

impl Settings {
    /// Player movement per tick
    pub fn sensitivity(&self) -> f32 {
        self.player_sensitivity
            .clamp(MIN_SENSITIVITY, MAX_SENSITIVITY) as f32
    }

    /// Flip or step a setting. Returns the message to display.
    pub fn toggle(&mut self, setting: Setting) -> String {
        match setting {
            Setting::Sound => {
                self.sound = !self.sound;
                format!("Sound {}", on_off(self.sound))
            }
            Setting::Explosions => {
                self.explosions = !self.explosions;
                format!("Explosions {}", on_off(self.explosions))
            }
            Setting::ScoreBubbles => {
                self.score_bubbles = !self.score_bubbles;
                format!("Score bubbles {}", on_off(self.score_bubbles))
            }
            Setting::Background => {
                self.background = !self.background;
                format!("Background {}", on_off(self.background))
            }
            Setting::BackgroundScrolling => {
                self.background_scrolling = !self.background_scrolling;
                format!("Background scrolling {}", on_off(self.background_scrolling))
            }
            Setting::SensitivityUp => {
                self.player_sensitivity = self
                    .player_sensitivity
                    .saturating_add(1)
                    .clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
                format!("Sensitivity {}", self.player_sensitivity)
            }
            Setting::SensitivityDown => {
                self.player_sensitivity = self
                    .player_sensitivity
                    .saturating_sub(1)
                    .clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
                format!("Sensitivity {}", self.player_sensitivity)
            }
        }
    }

    /// Load from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        let loaded = std::fs::read_to_string(path)
            .map_err(PersistError::from)
            .and_then(|json| serde_json::from_str::<Self>(&json).map_err(PersistError::from));
        match loaded {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring settings in {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_messages() {
        let mut settings = Settings::default();
        assert_eq!(settings.toggle(Setting::Sound), "Sound OFF");
        assert!(!settings.sound);
        assert_eq!(settings.toggle(Setting::Sound), "Sound ON");
        assert_eq!(settings.toggle(Setting::ScoreBubbles), "Score bubbles OFF");
        assert_eq!(
            settings.toggle(Setting::BackgroundScrolling),
            "Background scrolling OFF"
        );
    }

    #[test]
    fn test_sensitivity_bounds() {
        let mut settings = Settings::default();
        assert_eq!(settings.sensitivity(), 3.0);
        for _ in 0..20 {
            settings.toggle(Setting::SensitivityUp);
        }
        assert_eq!(settings.player_sensitivity, MAX_SENSITIVITY);
        for _ in 0..20 {
            settings.toggle(Setting::SensitivityDown);
        }
        assert_eq!(settings.toggle(Setting::SensitivityDown), "Sensitivity 1");
    }

    #[test]
    fn test_out_of_range_sensitivity_from_file() {
        let mut settings: Settings = serde_json::from_str(r#"{"player_sensitivity": 255}"#).unwrap();
        assert_eq!(settings.sensitivity(), MAX_SENSITIVITY as f32);
        assert_eq!(settings.toggle(Setting::SensitivityUp), "Sensitivity 10");

        settings.player_sensitivity = 255;
        assert_eq!(settings.toggle(Setting::SensitivityDown), "Sensitivity 10");

        settings.player_sensitivity = 0;
        assert_eq!(settings.toggle(Setting::SensitivityUp), "Sensitivity 1");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"sound": false}"#).unwrap();
        assert!(!settings.sound);
        assert_eq!(settings.player_sensitivity, 3);
        assert!(settings.explosions);
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("side-invaders-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.toggle(Setting::Background);
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        std::fs::remove_file(&path).unwrap();
    }
}
