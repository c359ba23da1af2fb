//! Read-only views for an external renderer
//!
//! `sprites()` flattens the playfield into a draw list; `hud()` collects the
//! numbers shown around it. Both are serializable so a frontend in another
//! process can consume them as JSON.

use glam::Vec2;
use serde::Serialize;

use super::effects::ExplosionKind;
use super::formation::EnemyKind;
use super::state::{GamePhase, GameState};
use super::timers::TimerId;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Player,
    Enemy { rank: u8 },
    Stray,
    PlayerMissile,
    EnemyMissile,
    Barrier,
    Explosion(ExplosionKind),
    ScoreBubble { points: u64 },
}

/// One thing to draw, centered on `pos`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    /// Animation frame index within the kind's strip
    pub frame: usize,
}

impl Sprite {
    fn still(kind: SpriteKind, pos: Vec2) -> Self {
        Self { kind, pos, frame: 0 }
    }
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub health: i32,
    pub continues: u32,
    /// Whole seconds left before the next wave
    pub countdown: Option<u32>,
    /// Settings toast
    pub message: Option<String>,
}

impl GameState {
    /// Draw list, back to front
    pub fn sprites(&self) -> Vec<Sprite> {
        let field = &self.field;
        let mut sprites = Vec::with_capacity(
            field.barriers.len() + field.formation.len() + field.player_missiles.len() + 16,
        );

        sprites.extend(
            field
                .barriers
                .iter()
                .map(|b| Sprite::still(SpriteKind::Barrier, b.pos)),
        );

        let frame = field.formation.frame();
        for ship in &field.formation.ships {
            let rank = match ship.kind {
                EnemyKind::Rank(rank) => rank,
                EnemyKind::Stray => MAX_RANK,
            };
            sprites.push(Sprite {
                kind: SpriteKind::Enemy { rank },
                pos: ship.pos(),
                frame,
            });
        }
        if let Some(stray) = &field.stray.ship {
            sprites.push(Sprite {
                kind: SpriteKind::Stray,
                pos: stray.pos(),
                frame: field.formation.stray_frame(),
            });
        }

        if self.player_visible() {
            sprites.push(Sprite::still(SpriteKind::Player, field.player.pos()));
        }

        sprites.extend(
            field
                .player_missiles
                .iter()
                .map(|m| Sprite::still(SpriteKind::PlayerMissile, m.pos())),
        );
        sprites.extend(
            field
                .enemy_missiles
                .iter()
                .map(|m| Sprite::still(SpriteKind::EnemyMissile, m.pos())),
        );

        for explosion in &field.explosions {
            sprites.push(Sprite {
                kind: SpriteKind::Explosion(explosion.kind),
                pos: explosion.pos,
                frame: explosion.frame,
            });
        }
        for bubble in &field.score_bubbles {
            sprites.push(Sprite::still(
                SpriteKind::ScoreBubble {
                    points: bubble.points,
                },
                bubble.pos,
            ));
        }

        sprites
    }

    /// Hidden once destroyed; blinks while flinching
    fn player_visible(&self) -> bool {
        match self.phase {
            GamePhase::StartMenu | GamePhase::PlayerExploding => return false,
            GamePhase::GameOver | GamePhase::HighScoreEntry if self.field.player.is_destroyed() => {
                return false;
            }
            _ => {}
        }
        if !self.field.player.flinching {
            return true;
        }
        let blinks = self.timers.elapsed(TimerId::Flinch).as_millis() / FLINCH_BLINK.as_millis();
        blinks % 2 == 1
    }

    pub fn hud(&self) -> Hud {
        let countdown = match self.phase {
            GamePhase::Countdown => Some(self.countdown_seconds()),
            _ => None,
        };
        Hud {
            phase: self.phase,
            score: self.field.player.score,
            level: self.field.player.level,
            health: self.field.player.health,
            continues: self.continues,
            countdown,
            message: self.message.clone(),
        }
    }

    /// Seconds remaining, rounded up (3, 2, 1)
    fn countdown_seconds(&self) -> u32 {
        let left = COUNTDOWN_DURATION.saturating_sub(self.timers.elapsed(TimerId::Countdown));
        left.as_secs() as u32 + u32::from(left.subsec_nanos() > 0)
    }
}
