//! Wall-clock access for slot computation
//!
//! Availability for "today" depends on the current local time. Reading it
//! through a trait keeps the calculator deterministic under test.

use chrono::{Local, NaiveDateTime};

/// Source of the current local date and time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
