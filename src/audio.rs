//! Sound effect events
//!
//! The core never plays audio itself. It hands `SoundEffect`s to a
//! `SoundSink`, and a frontend maps them to clips.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player fired a missile
    PlayerShot,
    /// Formation fired a missile
    EnemyShot,
    /// Formation ship destroyed
    Explosion,
    /// Stray enemy destroyed
    ExplosionStray,
    /// Player destroyed
    ExplosionPlayer,
}

impl SoundEffect {
    /// Clip name a frontend can look up
    pub fn clip_name(self) -> &'static str {
        match self {
            SoundEffect::PlayerShot => "player_shot",
            SoundEffect::EnemyShot => "enemy_shot",
            SoundEffect::Explosion => "explosion",
            SoundEffect::ExplosionStray => "explosion_stray",
            SoundEffect::ExplosionPlayer => "explosion_player",
        }
    }
}

/// Receiver of sound effect requests
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SoundSink for NullSink {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Buffers effects until the frontend drains them.
///
/// Clones share one buffer, so a caller can keep a handle after giving the
/// sink to a `GameState`.
#[derive(Debug, Default, Clone)]
pub struct SoundQueue {
    queued: Rc<RefCell<Vec<SoundEffect>>>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued effect, oldest first
    pub fn drain(&self) -> Vec<SoundEffect> {
        std::mem::take(&mut *self.queued.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.queued.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.borrow().is_empty()
    }
}

impl SoundSink for SoundQueue {
    fn play(&mut self, effect: SoundEffect) {
        self.queued.borrow_mut().push(effect);
    }
}
