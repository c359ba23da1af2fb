//! Stray enemy: a lone bonus ship crossing the playfield on its own timer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::formation::{EnemyKind, EnemyShip};
use super::timers::{TimerId, TimerRegistry};
use crate::consts::*;

/// Singleton stray enemy and its spawn bookkeeping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrayEnemy {
    /// The active ship, if any
    pub ship: Option<EnemyShip>,
    /// Side the previous stray came from
    came_from_left: bool,
}

impl StrayEnemy {
    pub fn is_active(&self) -> bool {
        self.ship.is_some()
    }

    pub fn clear(&mut self) {
        self.ship = None;
    }

    /// Spawn when due, otherwise move the active ship.
    /// Returns true when a new stray appeared this tick.
    pub fn update(&mut self, timers: &mut TimerRegistry) -> bool {
        match self.ship.as_mut() {
            Some(ship) => {
                let pos = &mut ship.entity.pos;
                pos.x += if ship.entity.heading.right { STRAY_SPEED } else { -STRAY_SPEED };
                pos.y += if ship.entity.heading.down { STRAY_DRIFT } else { -STRAY_DRIFT };
                if pos.x > PLAYFIELD_WIDTH + STRAY_EDGE_MARGIN || pos.x < -STRAY_EDGE_MARGIN {
                    log::debug!("Stray enemy escaped");
                    self.ship = None;
                }
                false
            }
            None if timers.exceeded(TimerId::StraySpawn, STRAY_SPAWN_INTERVAL) => {
                timers.set(TimerId::StraySpawn);
                self.spawn();
                true
            }
            None => false,
        }
    }

    /// Enter from the side opposite the previous stray
    fn spawn(&mut self) {
        let from_left = !self.came_from_left;
        self.came_from_left = from_left;

        let (x, y) = if from_left {
            (-STRAY_EDGE_MARGIN, STRAY_TOP_LANE)
        } else {
            (PLAYFIELD_WIDTH + STRAY_EDGE_MARGIN, STRAY_BOTTOM_LANE)
        };
        let mut ship = EnemyShip::new(EnemyKind::Stray, Vec2::new(x, y));
        if from_left {
            ship.entity.set_down();
            ship.entity.heading.right = true;
        } else {
            ship.entity.set_up();
            ship.entity.heading.left = true;
        }
        log::debug!("Stray enemy spawned from the {}", if from_left { "left" } else { "right" });
        self.ship = Some(ship);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timers::ManualClock;
    use std::time::Duration;

    fn setup() -> (ManualClock, TimerRegistry) {
        let clock = ManualClock::new();
        let mut timers = TimerRegistry::new(Box::new(clock.clone()));
        timers.set(TimerId::StraySpawn);
        (clock, timers)
    }

    #[test]
    fn test_waits_for_interval() {
        let (clock, mut timers) = setup();
        let mut stray = StrayEnemy::default();
        clock.advance(STRAY_SPAWN_INTERVAL);
        assert!(!stray.update(&mut timers));
        clock.advance(Duration::from_millis(1));
        assert!(stray.update(&mut timers));
        assert!(stray.is_active());
    }

    #[test]
    fn test_alternates_sides() {
        let (clock, mut timers) = setup();
        let mut stray = StrayEnemy::default();

        clock.advance(STRAY_SPAWN_INTERVAL * 2);
        stray.update(&mut timers);
        let first = stray.ship.clone().unwrap();
        assert_eq!(first.pos().x, -STRAY_EDGE_MARGIN);
        assert!(first.entity.heading.down);

        stray.clear();
        clock.advance(STRAY_SPAWN_INTERVAL * 2);
        stray.update(&mut timers);
        let second = stray.ship.clone().unwrap();
        assert_eq!(second.pos().x, PLAYFIELD_WIDTH + STRAY_EDGE_MARGIN);
        assert!(second.entity.heading.up);
    }

    #[test]
    fn test_crosses_and_leaves() {
        let (clock, mut timers) = setup();
        let mut stray = StrayEnemy::default();
        clock.advance(STRAY_SPAWN_INTERVAL * 2);
        stray.update(&mut timers);

        stray.update(&mut timers);
        let ship = stray.ship.clone().unwrap();
        assert_eq!(ship.pos().x, -STRAY_EDGE_MARGIN + STRAY_SPEED);
        assert!(ship.pos().y > STRAY_TOP_LANE);

        let crossing = ((PLAYFIELD_WIDTH + 2.0 * STRAY_EDGE_MARGIN) / STRAY_SPEED) as usize + 2;
        for _ in 0..crossing {
            stray.update(&mut timers);
        }
        assert!(!stray.is_active());
    }

    #[test]
    fn test_no_second_stray_while_active() {
        let (clock, mut timers) = setup();
        let mut stray = StrayEnemy::default();
        clock.advance(STRAY_SPAWN_INTERVAL * 2);
        assert!(stray.update(&mut timers));
        clock.advance(STRAY_SPAWN_INTERVAL * 2);
        assert!(!stray.update(&mut timers));
        assert_eq!(stray.ship.as_ref().unwrap().pos().x, -STRAY_EDGE_MARGIN + STRAY_SPEED);
    }
}
