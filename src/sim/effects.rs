//! Cosmetic effects: explosions and floating score bubbles
//!
//! Neither takes part in collisions. Both age once per active tick and
//! report when they are finished.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Explosion sprite sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// Formation ship
    Ship,
    Stray,
    Player,
}

impl ExplosionKind {
    pub fn frame_count(self) -> usize {
        match self {
            ExplosionKind::Ship => 8,
            ExplosionKind::Stray => 10,
            ExplosionKind::Player => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub kind: ExplosionKind,
    pub frame: usize,
    ticks_in_frame: u32,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, pos: Vec2) -> Self {
        Self {
            pos,
            kind,
            frame: 0,
            ticks_in_frame: 0,
        }
    }

    pub fn advance(&mut self) {
        self.ticks_in_frame += 1;
        if self.ticks_in_frame >= EXPLOSION_TICKS_PER_FRAME {
            self.ticks_in_frame = 0;
            self.frame += 1;
        }
    }

    pub fn is_done(&self) -> bool {
        self.frame >= self.kind.frame_count()
    }
}

/// Points awarded, floating up from where they were earned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBubble {
    pub pos: Vec2,
    pub points: u64,
    pub ticks_left: u32,
}

impl ScoreBubble {
    pub fn new(points: u64, pos: Vec2) -> Self {
        Self {
            pos,
            points,
            ticks_left: SCORE_BUBBLE_TICKS,
        }
    }

    pub fn advance(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.pos.y -= SCORE_BUBBLE_RISE;
    }

    pub fn is_done(&self) -> bool {
        self.ticks_left == 0
    }
}

/// Age every effect and drop the finished ones
pub fn advance_effects(explosions: &mut Vec<Explosion>, bubbles: &mut Vec<ScoreBubble>) {
    explosions.retain_mut(|e| {
        e.advance();
        !e.is_done()
    });
    bubbles.retain_mut(|b| {
        b.advance();
        !b.is_done()
    });
}
