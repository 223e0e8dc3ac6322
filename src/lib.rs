//! Booking Widget Library
//!
//! Headless core of a two-step booking wizard: the step flow state machine,
//! slot availability, the booking wire format and a session driver that
//! talks to the booking API.

pub mod api;
pub mod booking;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod plan;
pub mod reconcile;
pub mod session;
pub mod slots;
pub mod store;
pub mod types;
pub mod validation;

// Re-export main types for convenience
pub use api::BookingApi;
#[cfg(feature = "http")]
pub use api::HttpBookingApi;
pub use booking::{Booking, BookingRequest, normalize_create_response};
pub use catalog::{CustomerRecord, Employee, Service};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::WidgetConfig;
pub use error::{BookingError, Result};
pub use session::{BookingSession, LoadTicket, RefreshReport};
pub use slots::{TimeSlot, available_slots};
pub use store::{BookingState, BookingStore, SubscriptionId};
pub use types::{BookingStatus, BookingStep, ClockTime};
pub use validation::{CustomerInfo, CustomerInfoPatch};
