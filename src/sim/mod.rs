//! Simulation module
//!
//! All gameplay logic lives here:
//! - Per-tick motion, elapsed-time rules through `TimerRegistry`
//! - Injected clock, sound sink and high-score store
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod entity;
pub mod formation;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod stray;
pub mod tick;
pub mod timers;

pub use collision::{CollisionReport, ResolveContext, resolve};
pub use effects::{Explosion, ExplosionKind, ScoreBubble};
pub use entity::{Entity, Heading, Rect};
pub use formation::{EnemyKind, EnemyShip, Formation, closest_bottom_most};
pub use projectile::{Missile, MissileOwner};
pub use snapshot::{Hud, Sprite, SpriteKind};
pub use state::{GamePhase, GameState, Playfield, Player, Resume};
pub use stray::StrayEnemy;
pub use tick::Command;
pub use timers::{Clock, ManualClock, SystemClock, TimerId, TimerRegistry};
