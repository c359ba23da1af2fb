//! Named elapsed-time counters over a monotonic clock
//!
//! Each gameplay feature (shot cooldown, flinch window, countdown, ...) owns
//! one `TimerId`. Pausing suspends the whole registry: elapsed values freeze
//! at the pause instant, and resuming shifts every stored instant forward by
//! the paused duration so no timer observes time spent paused.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock {
    /// Time since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `std::time::Instant`
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Timer identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// When the current pause began
    Pause,
    /// Inter-wave countdown
    Countdown,
    /// Player explosion display window
    PlayerExplosion,
    /// Post-hit invulnerability window
    Flinch,
    /// Player shot cooldown
    PlayerShot,
    /// Enemy shot interval
    EnemyShot,
    /// Stray enemy spawn interval
    StraySpawn,
    /// Formation sprite animation
    FormationFrame,
    /// Settings toast
    SettingMessage,
}

impl TimerId {
    pub const ALL: [TimerId; 9] = [
        TimerId::Pause,
        TimerId::Countdown,
        TimerId::PlayerExplosion,
        TimerId::Flinch,
        TimerId::PlayerShot,
        TimerId::EnemyShot,
        TimerId::StraySpawn,
        TimerId::FormationFrame,
        TimerId::SettingMessage,
    ];

    /// Every timer but the pause timer itself freezes while suspended
    pub fn follows_pause(self) -> bool {
        self != TimerId::Pause
    }
}

/// Registry of timer start instants
pub struct TimerRegistry {
    clock: Box<dyn Clock>,
    instants: HashMap<TimerId, Duration>,
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("now", &self.clock.now())
            .field("instants", &self.instants)
            .finish()
    }
}

impl TimerRegistry {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            instants: HashMap::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Record "now" against `id`
    pub fn set(&mut self, id: TimerId) {
        let now = self.clock.now();
        self.instants.insert(id, now);
    }

    /// Clear `id`; it then reads as infinitely elapsed
    pub fn reset(&mut self, id: TimerId) {
        self.instants.remove(&id);
    }

    /// Shift the stored instant forward by `delta`
    pub fn offset(&mut self, id: TimerId, delta: Duration) {
        if let Some(instant) = self.instants.get_mut(&id) {
            *instant += delta;
        }
    }

    pub fn is_set(&self, id: TimerId) -> bool {
        self.instants.contains_key(&id)
    }

    /// Time since `id` was set. Unset timers return `Duration::MAX`.
    ///
    /// While suspended, gameplay timers are measured against the pause
    /// instant, so their values hold still.
    pub fn elapsed(&self, id: TimerId) -> Duration {
        let Some(&start) = self.instants.get(&id) else {
            return Duration::MAX;
        };
        let now = match self.instants.get(&TimerId::Pause) {
            Some(&paused_at) if id.follows_pause() => paused_at,
            _ => self.clock.now(),
        };
        now.saturating_sub(start)
    }

    /// Strictly more than `limit` has elapsed
    pub fn exceeded(&self, id: TimerId, limit: Duration) -> bool {
        self.elapsed(id) > limit
    }

    pub fn is_suspended(&self) -> bool {
        self.is_set(TimerId::Pause)
    }

    /// Freeze every timer at the current instant
    pub fn suspend(&mut self) {
        if !self.is_suspended() {
            self.set(TimerId::Pause);
        }
    }

    /// Unfreeze, fast-forwarding every timer across the pause.
    /// Returns the paused duration.
    pub fn resume(&mut self) -> Duration {
        let Some(paused_at) = self.instants.remove(&TimerId::Pause) else {
            return Duration::ZERO;
        };
        let paused_for = self.clock.now().saturating_sub(paused_at);
        for (id, instant) in self.instants.iter_mut() {
            // Timers set mid-pause read zero until resume, so they restart now
            if id.follows_pause() {
                *instant = (*instant).min(paused_at) + paused_for;
            }
        }
        paused_for
    }
}
