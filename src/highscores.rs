//! High score leaderboard system
//!
//! Top 10 scores, persisted as JSON. The game talks to it through the
//! `HighScoreStore` trait so tests and frontends can swap in their own.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// What the game needs from a leaderboard
pub trait HighScoreStore {
    /// A name was already submitted since the last `begin_run`
    fn has_attempted_this_run(&self) -> bool;
    /// Whether `score` would make the table
    fn qualifies(&self, score: u64) -> bool;
    /// Record a score; returns the rank achieved (1-indexed)
    fn submit(&mut self, name: &str, score: u64, level: u32) -> Option<usize>;
    /// A new run started from the menu
    fn begin_run(&mut self);
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Player's score
    pub score: u64,
    /// Level reached
    pub level: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted by score, highest first
    pub entries: Vec<HighScoreEntry>,
    #[serde(skip)]
    attempted: bool,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64, level: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.trim().to_string(),
            score,
            level,
        };

        // Find insertion point (sorted descending by score)
        let rank = match self.entries.iter().position(|e| score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file. A missing or unreadable file gives an empty table.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        }
        match Self::read(path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::warn!("Ignoring high scores in {}: {err}", path.display());
                Self::new()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        let mut scores: Self = serde_json::from_str(&json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl HighScoreStore for HighScores {
    fn has_attempted_this_run(&self) -> bool {
        self.attempted
    }

    fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    fn submit(&mut self, name: &str, score: u64, level: u32) -> Option<usize> {
        self.attempted = true;
        self.add_score(name, score, level)
    }

    fn begin_run(&mut self) {
        self.attempted = false;
    }
}

/// Shared handle, so the owner can persist the table the game writes to
impl<T: HighScoreStore> HighScoreStore for Rc<RefCell<T>> {
    fn has_attempted_this_run(&self) -> bool {
        self.borrow().has_attempted_this_run()
    }

    fn qualifies(&self, score: u64) -> bool {
        self.borrow().qualifies(score)
    }

    fn submit(&mut self, name: &str, score: u64, level: u32) -> Option<usize> {
        self.borrow_mut().submit(name, score, level)
    }

    fn begin_run(&mut self) {
        self.borrow_mut().begin_run();
    }
}
