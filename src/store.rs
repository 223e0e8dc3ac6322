//! Booking Step Flow State Machine
//!
//! `BookingStore` is the single source of truth for wizard progress and every
//! booking selection. It enforces step ordering and validation gates and
//! notifies subscribers synchronously after each mutation.
//!
//! # Design Principles
//!
//! - **Instantiable**: no global store; each widget session owns its own
//! - **Snapshot replacement**: every mutation builds a new `BookingState` and
//!   swaps it in before any listener runs, so listeners never see partial state
//! - **Re-entrant**: listeners receive the store handle and may mutate it; the
//!   nested mutation applies immediately and broadcasts again
//! - **Silent gates**: refused transitions are no-ops, not errors
//!
//! # Step Flow
//!
//! ```text
//! Schedule ──(services + date + time)──▶ Info
//!    ▲                                    │
//!    └──────────── go back ───────────────┘
//! ```

use crate::catalog::{self, Employee, Service};
use crate::types::{BookingStep, ClockTime};
use crate::validation::{CustomerInfo, CustomerInfoPatch};
use chrono::NaiveDate;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Message shown while no service is selected
pub const SERVICES_REQUIRED_MESSAGE: &str = "Please select at least one service";

// ============================================================================
// Booking State
// ============================================================================

/// Immutable snapshot of the booking aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingState {
    /// Step currently shown
    pub current_step: BookingStep,
    /// Steps that passed their gate, in completion order, without duplicates
    pub completed_steps: Vec<BookingStep>,
    /// `None` means "no preference"
    pub selected_staff: Option<Employee>,
    /// Insertion-ordered, unique by id
    pub selected_services: Vec<Service>,
    pub selected_date: Option<NaiveDate>,
    pub selected_time: Option<ClockTime>,
    pub customer_info: CustomerInfo,
    /// Transient message for the services selection
    pub services_error: Option<String>,
}

impl BookingState {
    pub fn is_step_completed(&self, step: BookingStep) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn is_service_selected(&self, service_id: i64) -> bool {
        self.selected_services.iter().any(|s| s.id == service_id)
    }

    /// Total appointment length in minutes
    pub fn total_service_minutes(&self) -> u32 {
        catalog::total_minutes(&self.selected_services)
    }

    pub fn total_service_price(&self) -> f64 {
        catalog::total_price(&self.selected_services)
    }
}

// ============================================================================
// Store
// ============================================================================

/// Handle returned by [`BookingStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change listener; receives the store so it can read or mutate it
pub type Listener = Rc<dyn Fn(&BookingStore)>;

struct StoreInner {
    state: RefCell<Rc<BookingState>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
}

/// Booking wizard store.
///
/// Cloning the store clones the handle; clones share state and listeners.
/// The store is single-threaded (`!Send`).
///
/// # Example
///
/// ```
/// use booking_widget::store::BookingStore;
/// use booking_widget::types::BookingStep;
///
/// let store = BookingStore::new();
/// assert_eq!(store.state().current_step, BookingStep::Schedule);
///
/// // Nothing selected yet: the schedule gate refuses to advance
/// store.go_to_next_step();
/// assert_eq!(store.state().current_step, BookingStep::Schedule);
/// assert!(store.state().services_error.is_some());
/// ```
#[derive(Clone)]
pub struct BookingStore {
    inner: Rc<StoreInner>,
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BookingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingStore")
            .field("state", &self.state())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl BookingStore {
    /// Create a store holding the default aggregate
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(BookingState::default())),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> Rc<BookingState> {
        Rc::clone(&self.inner.state.borrow())
    }

    // ------------------------------------------------------------------------
    // Subscription
    // ------------------------------------------------------------------------

    /// Register a listener called after every mutation, in subscription order
    pub fn subscribe(&self, listener: impl Fn(&BookingStore) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Replace the snapshot with an updated copy, then broadcast
    fn set(&self, update: impl FnOnce(&mut BookingState)) {
        let mut next = BookingState::clone(&self.state());
        update(&mut next);
        *self.inner.state.borrow_mut() = Rc::new(next);
        self.emit();
    }

    fn emit(&self) {
        // Snapshot the listener list so listeners may (un)subscribe while running
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(self);
        }
    }

    // ------------------------------------------------------------------------
    // Step Navigation
    // ------------------------------------------------------------------------

    /// Jump to a step without any gating
    pub fn set_current_step(&self, step: BookingStep) {
        debug!("Current step set to {}", step);
        self.set(|s| s.current_step = step);
    }

    /// Mark a step complete; no-op if it already is
    pub fn complete_step(&self, step: BookingStep) {
        if self.state().is_step_completed(step) {
            return;
        }
        debug!("Step {} completed", step);
        self.set(|s| s.completed_steps.push(step));
    }

    /// Navigate to `step` if it is not ahead of the user's progress.
    ///
    /// Allowed when the target is at or before the current step, is already
    /// completed, or directly follows a completed step. Otherwise ignored.
    pub fn go_to_step(&self, step: BookingStep) {
        let state = self.state();
        let allowed = step.index() <= state.current_step.index()
            || state.is_step_completed(step)
            || step
                .previous()
                .is_some_and(|previous| state.is_step_completed(previous));

        if allowed {
            debug!("Navigating from {} to {}", state.current_step, step);
            self.set(|s| s.current_step = step);
        } else {
            debug!("Refused navigation from {} to {}", state.current_step, step);
        }
    }

    /// Advance one step if the current step's gate passes.
    ///
    /// Leaving `schedule` requires services, then date and time. On success
    /// the current step is recorded as completed and the next step shown in
    /// a single update.
    pub fn go_to_next_step(&self) {
        let current = self.state().current_step;
        let Some(next) = current.next() else {
            return;
        };

        if current == BookingStep::Schedule && !(self.validate_services() && self.validate_schedule()) {
            debug!("Gate for {} not satisfied, staying", current);
            return;
        }

        debug!("Advancing from {} to {}", current, next);
        self.set(|s| {
            if !s.completed_steps.contains(&current) {
                s.completed_steps.push(current);
            }
            s.current_step = next;
        });
    }

    /// Go back one step; no-op at the first step
    pub fn go_to_previous_step(&self) {
        if let Some(previous) = self.state().current_step.previous() {
            self.set(|s| s.current_step = previous);
        }
    }

    // ------------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------------

    pub fn set_selected_staff(&self, staff: Option<Employee>) {
        self.set(|s| s.selected_staff = staff);
    }

    /// Replace the selection wholesale (duplicates by id are dropped)
    pub fn set_selected_services(&self, services: Vec<Service>) {
        let mut unique: Vec<Service> = Vec::with_capacity(services.len());
        for service in services {
            if !unique.iter().any(|s| s.id == service.id) {
                unique.push(service);
            }
        }
        self.set(|s| s.selected_services = unique);
    }

    /// Append a service unless one with the same id is selected
    pub fn add_service(&self, service: Service) {
        if self.state().is_service_selected(service.id) {
            return;
        }
        self.set(|s| {
            s.selected_services.push(service);
            s.services_error = None;
        });
    }

    /// Drop a service by id, then refresh the services error
    pub fn remove_service(&self, service_id: i64) {
        self.set(|s| s.selected_services.retain(|service| service.id != service_id));
        self.validate_services();
    }

    pub fn set_selected_date(&self, date: NaiveDate) {
        self.set(|s| s.selected_date = Some(date));
    }

    pub fn set_selected_time(&self, time: Option<ClockTime>) {
        self.set(|s| s.selected_time = time);
    }

    /// Shallow-merge contact fields
    pub fn set_customer_info(&self, patch: CustomerInfoPatch) {
        self.set(|s| s.customer_info.apply(patch));
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    pub fn validate_customer_info(&self) -> bool {
        self.state().customer_info.is_valid()
    }

    /// At least one service must be selected.
    ///
    /// Failure sets the services error and clears all completed steps.
    /// Success clears the error.
    pub fn validate_services(&self) -> bool {
        if self.state().selected_services.is_empty() {
            debug!("No services selected, resetting completed steps");
            self.set(|s| {
                s.services_error = Some(SERVICES_REQUIRED_MESSAGE.to_string());
                s.completed_steps.clear();
            });
            return false;
        }
        self.set(|s| s.services_error = None);
        true
    }

    /// Both a date and a time must be selected
    pub fn validate_schedule(&self) -> bool {
        let state = self.state();
        state.selected_date.is_some() && state.selected_time.is_some()
    }

    pub fn clear_services_error(&self) {
        self.set(|s| s.services_error = None);
    }

    // ------------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------------

    /// Restore every field to its default
    pub fn reset_booking(&self) {
        debug!("Booking reset");
        self.set(|s| *s = BookingState::default());
    }
}
