//! Base entity: a positioned sprite box with a tighter hit box
//!
//! Everything that moves or collides is an `Entity`. The draw box and the
//! collision box are both centered on `pos`; only the collision box takes
//! part in overlap tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (min corner, max corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Movement direction flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// A positioned game object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Center position
    pub pos: Vec2,
    /// Sprite box (width, height)
    pub size: Vec2,
    /// Hit box (width, height), never larger than `size`
    pub collision: Vec2,
    pub heading: Heading,
}

impl Entity {
    pub fn new(pos: Vec2, size: (f32, f32), collision: (f32, f32)) -> Self {
        let size = Vec2::new(size.0, size.1);
        let collision = Vec2::new(collision.0, collision.1).min(size);
        Self {
            pos,
            size,
            collision,
            heading: Heading::default(),
        }
    }

    /// Hit box in world coordinates
    pub fn hit_box(&self) -> Rect {
        Rect::from_center(self.pos, self.collision)
    }

    /// Sprite box in world coordinates
    pub fn draw_box(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn intersects(&self, other: &Entity) -> bool {
        self.hit_box().intersects(&other.hit_box())
    }

    pub fn set_up(&mut self) {
        self.heading.up = true;
        self.heading.down = false;
    }

    pub fn set_down(&mut self) {
        self.heading.up = false;
        self.heading.down = true;
    }

    /// Swap up/down
    pub fn flip_vertical(&mut self) {
        if self.heading.up {
            self.set_down();
        } else {
            self.set_up();
        }
    }
}
