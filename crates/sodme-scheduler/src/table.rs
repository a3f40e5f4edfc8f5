use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::calendar::{next_fire_after, TimerName};

/// One timer's next scheduled fire instant, the unit persisted across
/// restarts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub name: TimerName,
    pub next_fire: DateTime<Utc>,
}

/// Tracks the next fire instant for every fixed daily timer. Restart
/// survival is just reloading the persisted `TimerState` rows instead of
/// recomputing from "now" — a timer whose fire time already passed while
/// the process was down fires as soon as the table is polled again rather
/// than silently skipping to the next day.
pub struct TimerTable {
    next_fire: HashMap<TimerName, DateTime<Utc>>,
}

impl TimerTable {
    /// Fresh table: every timer's first fire is computed from `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        let next_fire = TimerName::ALL
            .into_iter()
            .map(|t| (t, next_fire_after(t, now)))
            .collect();
        Self { next_fire }
    }

    /// Rebuilds the table from persisted state (restart survival). Any
    /// timer missing from `states` is scheduled fresh from `now`.
    pub fn restore(states: &[TimerState], now: DateTime<Utc>) -> Self {
        let mut table = Self::new(now);
        for state in states {
            table.next_fire.insert(state.name, state.next_fire);
        }
        table
    }

    pub fn persisted_state(&self) -> Vec<TimerState> {
        self.next_fire
            .iter()
            .map(|(name, next_fire)| TimerState { name: *name, next_fire: *next_fire })
            .collect()
    }

    /// Every timer whose scheduled fire instant is at or before `now`,
    /// each immediately rescheduled to its next occurrence so a second
    /// call at the same `now` never reports it again.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<TimerName> {
        let mut fired = Vec::new();
        for name in TimerName::ALL {
            let scheduled = self.next_fire[&name];
            if scheduled <= now {
                fired.push(name);
                self.next_fire.insert(name, next_fire_after(name, now));
            }
        }
        fired
    }

    pub fn next_fire_for(&self, name: TimerName) -> DateTime<Utc> {
        self.next_fire[&name]
    }
}
