use chrono::{Local, Utc};

use super::domain::TimeOfDay;
use crate::config::ClockZone;

/// Source of the reference time used for working-hours checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeOfDay;
}

/// Reads the wall clock in the configured zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: ClockZone,
}

impl SystemClock {
    pub fn new(zone: ClockZone) -> Self {
        Self { zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(ClockZone::Local)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimeOfDay {
        let time = match self.zone {
            ClockZone::Local => Local::now().time(),
            ClockZone::Utc => Utc::now().time(),
        };
        TimeOfDay::truncated(time)
    }
}

/// Clock pinned to a single time of day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeOfDay);

impl Clock for FixedClock {
    fn now(&self) -> TimeOfDay {
        self.0
    }
}
