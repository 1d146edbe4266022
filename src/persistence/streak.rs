//! Daily check-in streak
//!
//! Days are whole days since the Unix epoch in the user's clock. A check-in
//! on the day after the previous one extends the streak; any gap restarts
//! it at 1.

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreError, load_json, save_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckIn {
    First,
    /// Already checked in today (or the clock went backwards); nothing changed
    AlreadyToday,
    Continued,
    /// A day was missed
    Restarted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub best: u32,
    pub total: u32,
    pub last_day: Option<u32>,
}

impl Streak {
    pub const STORAGE_KEY: &'static str = "calm_arcade_streak";

    pub fn check_in(&mut self, day: u32) -> CheckIn {
        let outcome = match self.last_day {
            None => CheckIn::First,
            Some(last) if day <= last => return CheckIn::AlreadyToday,
            Some(last) if day == last + 1 => CheckIn::Continued,
            Some(_) => CheckIn::Restarted,
        };

        self.current = match outcome {
            CheckIn::Continued => self.current + 1,
            _ => 1,
        };
        self.best = self.best.max(self.current);
        self.total += 1;
        self.last_day = Some(day);
        outcome
    }

    /// Load from the store, starting fresh on a missing or corrupt record
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Ok(Some(streak)) => streak,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Discarding streak record: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        save_json(store, Self::STORAGE_KEY, self)
    }
}
