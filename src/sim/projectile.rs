//! Player and enemy missiles
//!
//! Player missiles fly right, enemy missiles fly left. Both move a fixed
//! distance per tick and are culled once they leave the playfield.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::consts::*;

/// Who fired a missile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissileOwner {
    Player,
    Enemy,
}

/// A missile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Missile {
    pub entity: Entity,
    pub owner: MissileOwner,
    /// Health removed on a player hit
    pub damage: u32,
}

impl Missile {
    fn new(owner: MissileOwner, pos: Vec2, damage: u32) -> Self {
        let mut entity = Entity::new(pos, MISSILE_SIZE, MISSILE_COLLISION);
        match owner {
            MissileOwner::Player => entity.heading.right = true,
            MissileOwner::Enemy => entity.heading.left = true,
        }
        Self {
            entity,
            owner,
            damage,
        }
    }

    pub fn player(pos: Vec2) -> Self {
        Self::new(MissileOwner::Player, pos, 0)
    }

    pub fn enemy(pos: Vec2) -> Self {
        Self::new(MissileOwner::Enemy, pos, ENEMY_MISSILE_DAMAGE)
    }

    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    pub fn velocity(&self) -> Vec2 {
        match self.owner {
            MissileOwner::Player => Vec2::new(MISSILE_SPEED, 0.0),
            MissileOwner::Enemy => Vec2::new(-MISSILE_SPEED, 0.0),
        }
    }

    pub fn advance(&mut self) {
        self.entity.pos += self.velocity();
    }

    /// Past the edge it is flying toward
    pub fn off_screen(&self) -> bool {
        match self.owner {
            MissileOwner::Player => self.entity.pos.x > PLAYFIELD_WIDTH,
            MissileOwner::Enemy => self.entity.pos.x < 0.0,
        }
    }
}

/// Move every missile one tick and drop the ones that left the playfield
pub fn advance_missiles(missiles: &mut Vec<Missile>) {
    missiles.retain_mut(|missile| {
        missile.advance();
        !missile.off_screen()
    });
}

/// Time between enemy shots at `level`
pub fn enemy_shot_interval(level: u32) -> Duration {
    ENEMY_SHOT_BASE
        .saturating_sub(ENEMY_SHOT_STEP * level)
        .max(ENEMY_SHOT_MIN)
}
