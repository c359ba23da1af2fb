//! Enemy formation: the grid of invaders marching toward the player
//!
//! Ships sweep up and down the playfield. Whenever the leading ship reaches
//! a turning row, every ship takes a short sidestep toward the player (the
//! pivot) and then reverses vertical direction. Speed grows with kills in
//! fixed tiers; the sprite frame is shared by the whole formation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::timers::{TimerId, TimerRegistry};
use crate::consts::*;

/// Ship kinds. Lower ranks are worth more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Formation ship, rank 0..=MAX_RANK
    Rank(u8),
    /// Bonus ship crossing on its own
    Stray,
}

impl EnemyKind {
    /// Points for destroying a ship of this kind at `level`
    pub fn points(self, level: u32) -> u64 {
        let level = level as u64;
        match self {
            EnemyKind::Rank(rank) => {
                let rank = rank.min(MAX_RANK) as u64;
                (10 + level * 5) * (4 - rank)
            }
            EnemyKind::Stray => 170 + 30 * level,
        }
    }
}

/// A single enemy ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyShip {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub dead: bool,
    /// Mid-pivot (sidestepping left)
    pub pivoting: bool,
    pub pivot_ticks: u32,
}

impl EnemyShip {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        let mut entity = Entity::new(pos, ENEMY_SIZE, ENEMY_COLLISION);
        entity.set_down();
        Self {
            entity,
            kind,
            dead: false,
            pivoting: false,
            pivot_ticks: 0,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.entity.pos
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }

    pub fn points(&self, level: u32) -> u64 {
        self.kind.points(level)
    }

    /// Advance one tick at `speed`
    pub fn step(&mut self, speed: f32) {
        if self.pivoting {
            self.pivot_ticks += 1;
            if self.pivot_ticks == PIVOT_TICKS {
                self.pivot_ticks = 0;
                self.pivoting = false;
                self.entity.flip_vertical();
                return;
            }
            self.entity.pos.x -= PIVOT_STEP;
            return;
        }

        if self.entity.heading.up {
            self.entity.pos.y -= speed;
        } else if self.entity.heading.down {
            self.entity.pos.y += speed;
        }
    }
}

/// Shared speed for a kill count, ignoring cheats
pub fn speed_for_kills(kills: u32) -> f32 {
    SPEED_TIERS
        .iter()
        .find(|(below, _)| kills < *below)
        .map(|(_, speed)| *speed)
        .unwrap_or(FINAL_TIER_SPEED)
}

/// The enemy grid and its shared state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub ships: Vec<EnemyShip>,
    /// Shared vertical speed (pixels per tick)
    move_speed: f32,
    /// Kills this wave
    kills: u32,
    /// Speed was adjusted by hand; tiers and scoring are off until next wave
    cheat: bool,
    /// Shared sprite frame
    frame: usize,
    frame_forward: bool,
}

impl Default for Formation {
    fn default() -> Self {
        Self {
            ships: Vec::new(),
            move_speed: BASE_MOVE_SPEED,
            kills: 0,
            cheat: false,
            frame: 0,
            frame_forward: true,
        }
    }
}

impl Formation {
    /// A fresh full grid
    pub fn populated() -> Self {
        let mut formation = Self::default();
        formation.populate();
        formation
    }

    /// Fill the grid and reset shared state for a new wave
    pub fn populate(&mut self) {
        self.ships.clear();
        for row in 0..FORMATION_ROWS {
            for col in 0..FORMATION_COLUMNS {
                let rank = (row as u8).min(MAX_RANK);
                let pos = Vec2::new(
                    FORMATION_ORIGIN_X + col as f32 * FORMATION_SPACING_X,
                    FORMATION_ORIGIN_Y + row as f32 * FORMATION_SPACING_Y,
                );
                self.ships.push(EnemyShip::new(EnemyKind::Rank(rank), pos));
            }
        }
        self.move_speed = BASE_MOVE_SPEED;
        self.kills = 0;
        self.cheat = false;
        self.frame = 0;
        self.frame_forward = true;
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn cheat_active(&self) -> bool {
        self.cheat
    }

    /// Shared formation sprite frame
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Stray sprites use a shorter strip driven by the same counter
    pub fn stray_frame(&self) -> usize {
        self.frame / STRAY_FRAME_DIVISOR
    }

    /// Move every ship one tick and cycle the sprite frame
    pub fn advance(&mut self, timers: &mut TimerRegistry) {
        self.update_direction();
        let speed = self.move_speed;
        for ship in &mut self.ships {
            ship.step(speed);
        }
        self.advance_frame(timers);
    }

    /// Start a pivot when the leading ship reaches its turning row
    fn update_direction(&mut self) {
        let Some(first) = self.ships.first() else {
            return;
        };
        if first.pivoting {
            return;
        }
        let turn = if first.entity.heading.up {
            self.ships
                .iter()
                .map(|s| s.entity.pos.y)
                .fold(f32::INFINITY, f32::min)
                < FORMATION_UPPER_LIMIT
        } else {
            self.ships
                .iter()
                .map(|s| s.entity.pos.y)
                .fold(f32::NEG_INFINITY, f32::max)
                > FORMATION_LOWER_LIMIT
        };
        if turn {
            for ship in &mut self.ships {
                ship.pivoting = true;
            }
        }
    }

    /// Ping-pong across the sprite strip
    fn advance_frame(&mut self, timers: &mut TimerRegistry) {
        if !timers.exceeded(TimerId::FormationFrame, ENEMY_FRAME_INTERVAL) {
            return;
        }
        timers.set(TimerId::FormationFrame);
        if self.frame_forward {
            if self.frame + 1 >= ENEMY_FRAME_COUNT {
                self.frame = ENEMY_FRAME_COUNT - 1;
                self.frame_forward = false;
            } else {
                self.frame += 1;
            }
        } else if self.frame == 0 {
            self.frame = 1;
            self.frame_forward = true;
        } else {
            self.frame -= 1;
        }
    }

    /// Count a kill and move up the speed tiers
    pub fn record_kill(&mut self) {
        self.kills += 1;
        if !self.cheat {
            self.move_speed = speed_for_kills(self.kills);
        }
    }

    /// Hand-adjust the shared speed; turns cheat mode on
    pub fn cheat_adjust(&mut self, delta: f32) {
        self.cheat = true;
        self.move_speed = (self.move_speed + delta).max(0.0);
    }

    /// Drop ships marked dead
    pub fn remove_dead(&mut self) {
        self.ships.retain(|s| !s.dead);
    }

    /// A ship has slipped past the left edge
    pub fn invaded(&self) -> bool {
        self.ships.iter().any(|s| !s.dead && s.entity.pos.x < 0.0)
    }

    /// Firing position for the next enemy missile
    ///
    /// Keeps only the most advanced ship per column (equal x, largest y),
    /// then picks the one whose lane is nearest the player. Enemy missiles
    /// fly horizontally, so lanes are compared on the vertical axis.
    pub fn closest_bottom_most(&self, player_y: f32) -> Option<Vec2> {
        closest_bottom_most(self.ships.iter().filter(|s| !s.dead).map(|s| s.pos()), player_y)
    }
}

/// Column-deduplicated nearest lane to `player_y`. First found wins ties.
///
/// Lanes are compared on y because missiles travel along x.
pub fn closest_bottom_most(points: impl IntoIterator<Item = Vec2>, player_y: f32) -> Option<Vec2> {
    let mut lanes: Vec<Vec2> = Vec::new();
    for point in points {
        match lanes.iter_mut().find(|lane| lane.x == point.x) {
            Some(lane) if point.y > lane.y => *lane = point,
            Some(_) => {}
            None => lanes.push(point),
        }
    }

    let mut best: Option<(f32, Vec2)> = None;
    for lane in lanes {
        let offset = (lane.y - player_y).abs();
        if best.is_none_or(|(d, _)| offset < d) {
            best = Some((offset, lane));
        }
    }
    best.map(|(_, lane)| lane)
}
