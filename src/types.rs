//! Shared value types for the booking widget
//!
//! Wizard steps and booking statuses are enums with `strum` derives so their
//! textual forms live in one place. `ClockTime` replaces `"HH:MM"` strings
//! with a validated minute-of-day.

use crate::error::{BookingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

// ============================================================================
// Wizard Steps
// ============================================================================

/// A phase of the booking wizard.
///
/// # Step Flow
///
/// ```text
/// Schedule (services, staff, date, time)
///     ↓
/// Info (customer details, confirmation)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BookingStep {
    #[default]
    Schedule,
    Info,
}

impl BookingStep {
    /// All steps in wizard order
    pub const ALL: [Self; 2] = [Self::Schedule, Self::Info];

    /// Zero-based position in the wizard
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Schedule => 0,
            Self::Info => 1,
        }
    }

    /// The following step, or None at the last step
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Schedule => Some(Self::Info),
            Self::Info => None,
        }
    }

    /// The preceding step, or None at the first step
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Schedule => None,
            Self::Info => Some(Self::Schedule),
        }
    }
}

// ============================================================================
// Booking Status
// ============================================================================

/// Approval state of a created booking as reported by the booking API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    WaitingApprove,
    Approved,
    Reject,
    Complete,
}

impl BookingStatus {
    /// Human-readable label for confirmation screens
    pub const fn label(self) -> &'static str {
        match self {
            Self::WaitingApprove => "Waiting for approval",
            Self::Approved => "Approved",
            Self::Reject => "Rejected",
            Self::Complete => "Completed",
        }
    }
}

// ============================================================================
// Clock Time
// ============================================================================

/// Minutes in one day; every `ClockTime` is strictly below this.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time of day with minute precision.
///
/// Textual form is `HH:MM`. The booking API expects `HH:MM:SS`, see
/// [`ClockTime::to_wire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build from hour and minute literals.
    ///
    /// # Panics
    ///
    /// Panics when `hour >= 24` or `minute >= 60` (a compile error in const
    /// contexts). Use [`ClockTime::try_from_hm`] for untrusted input.
    pub const fn from_hm(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "invalid clock time");
        Self(hour * 60 + minute)
    }

    /// Build from hour and minute, rejecting out-of-range values
    pub const fn try_from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Build from minute of day, rejecting values past midnight
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes as u16))
    }

    /// Minute of day (0..1440)
    #[inline]
    pub const fn minutes(self) -> u32 {
        self.0 as u32
    }

    #[inline]
    pub const fn hour(self) -> u32 {
        self.0 as u32 / 60
    }

    #[inline]
    pub const fn minute(self) -> u32 {
        self.0 as u32 % 60
    }

    /// `HH:MM:SS` form used by the booking creation request
    pub fn to_wire(self) -> String {
        format!("{self}:00")
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = BookingError;

    /// Accepts `HH:MM` and `HH:MM:SS` (seconds are dropped)
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BookingError::parse(format!("invalid time '{s}', expected HH:MM"));

        let mut parts = s.trim().split(':');
        let hour: u16 = parts
            .next()
            .and_then(|h| h.parse().ok())
            .ok_or_else(invalid)?;
        let minute: u16 = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            let seconds: u16 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Self::try_from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
