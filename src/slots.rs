//! Slot Availability Calculator
//!
//! Translates the selected services, the selected date and the current time
//! into the ordered list of appointment slots a customer may pick.
//!
//! # Algorithm
//!
//! | Step | Rule |
//! |------|------|
//! | 1 | `duration` = sum of the selected services' working time; none selected → no slots |
//! | 2 | Earliest start = now rounded **up** to the granularity when the date is today, else opening time |
//! | 3 | Clamp the earliest start to opening time |
//! | 4 | Emit `{t, t + duration}` every `SLOT_STEP_MINUTES` while `t + duration <= closing time` |
//!
//! Clearing a selected time that dropped out of the result is done by
//! `reconcile::reconcile_selected_time`.
//!
//! # Design
//!
//! - **Pure logic**: no I/O; the current time is an argument
//! - **Bounded**: the sequence is finite and never wraps past midnight

use crate::catalog::{Service, total_minutes};
use crate::types::ClockTime;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Business Hours
// ============================================================================

/// Daily opening window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// Fixed opening hours: 09:00 to 18:00
pub const BUSINESS_HOURS: BusinessHours = BusinessHours {
    start: ClockTime::from_hm(9, 0),
    end: ClockTime::from_hm(18, 0),
};

/// Spacing between consecutive slot starts
pub const SLOT_STEP_MINUTES: u32 = 10;

// ============================================================================
// Time Slots
// ============================================================================

/// A candidate appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeSlot {
    /// Length in minutes; zero when `end` precedes `start`
    pub fn duration(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Round `minutes` up to the next multiple of `step`
#[inline]
pub fn ceil_to_step(minutes: u32, step: u32) -> u32 {
    minutes.div_ceil(step) * step
}

/// True when `date` is the local calendar day of `now`
#[inline]
pub fn is_same_day(date: NaiveDate, now: NaiveDateTime) -> bool {
    date == now.date()
}

/// Earliest start time offered for `date`, before any duration check.
///
/// Returns None when "now" rounds past midnight, i.e. nothing is left today.
pub fn earliest_start(date: NaiveDate, now: NaiveDateTime, hours: BusinessHours, step: u32) -> Option<ClockTime> {
    let opening = hours.start.minutes();
    let candidate = if is_same_day(date, now) {
        ceil_to_step(now.hour() * 60 + now.minute(), step)
    } else {
        opening
    };
    ClockTime::from_minutes(candidate.max(opening))
}

/// Slots for an explicit duration within `hours`.
///
/// `step` must be non-zero.
pub fn slots_for_duration(
    duration: u32,
    date: NaiveDate,
    now: NaiveDateTime,
    hours: BusinessHours,
    step: u32,
) -> Vec<TimeSlot> {
    debug_assert!(step > 0, "slot step must be positive");

    let Some(first) = earliest_start(date, now, hours, step) else {
        return Vec::new();
    };
    let closing = hours.end.minutes();

    let mut slots = Vec::new();
    let mut t = first.minutes();
    while let Some(end) = t.checked_add(duration).filter(|end| *end <= closing) {
        // Both bounds sit at or before closing, so they are valid times of day.
        if let (Some(start), Some(end)) = (ClockTime::from_minutes(t), ClockTime::from_minutes(end)) {
            slots.push(TimeSlot { start, end });
        }
        t += step;
    }
    slots
}

/// Offerable slots for the selected services on the selected date.
///
/// No date or no services yields an empty list. A total duration of zero
/// yields zero-length slots.
pub fn available_slots(services: &[Service], date: Option<NaiveDate>, now: NaiveDateTime) -> Vec<TimeSlot> {
    let Some(date) = date else {
        return Vec::new();
    };
    if services.is_empty() {
        return Vec::new();
    }
    slots_for_duration(total_minutes(services), date, now, BUSINESS_HOURS, SLOT_STEP_MINUTES)
}

/// Whether `time` is the start of one of `slots`
pub fn contains_start(slots: &[TimeSlot], time: ClockTime) -> bool {
    slots.iter().any(|slot| slot.start == time)
}
