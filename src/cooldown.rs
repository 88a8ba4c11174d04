//! Per-user trigger cooldown
//!
//! Entries are never evicted; the registry grows with the number of distinct
//! users that ever hit a gated trigger.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default window between two allowed menu triggers
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15);

/// Trigger families that are rate limited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerCategory {
    Menu,
}

/// Source of monotonic time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

pub struct CooldownGuard<C: Clock = SystemClock> {
    window: Duration,
    clock: C,
    last_allowed: Mutex<HashMap<(String, TriggerCategory), Instant>>,
}

impl CooldownGuard<SystemClock> {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, SystemClock)
    }
}

impl<C: Clock> CooldownGuard<C> {
    pub fn with_clock(window: Duration, clock: C) -> Self {
        Self {
            window,
            clock,
            last_allowed: Mutex::new(HashMap::new()),
        }
    }

    /// True and stamps now if the window since the last allowed trigger has
    /// passed; false otherwise (the stamp is left alone)
    pub fn allow(&self, user_id: &str, category: TriggerCategory) -> bool {
        let now = self.clock.now();
        let mut last_allowed = self.last_allowed.lock().unwrap();
        let key = (user_id.to_string(), category);
        if let Some(last) = last_allowed.get(&key) {
            if now.saturating_duration_since(*last) < self.window {
                return false;
            }
        }
        last_allowed.insert(key, now);
        true
    }
}
