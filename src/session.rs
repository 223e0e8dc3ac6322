//! Booking session driver
//!
//! Plays the part of the surrounding UI: it owns a store, the last loaded
//! catalogs, a clock and an API client, and sequences the calls the screens
//! would make. The store stays a pure data/transition layer.
//!
//! # Stale Results
//!
//! Catalog loads are tagged with a [`LoadTicket`]. Starting a new load or
//! tearing the session down bumps the generation, and results carrying an
//! older ticket are dropped instead of overwriting newer state.

use crate::api::BookingApi;
use crate::booking::{self, Booking, BookingRequest};
use crate::catalog::{Employee, Service};
use crate::clock::Clock;
use crate::error::{BookingError, Result};
use crate::reconcile;
use crate::slots::{self, TimeSlot};
use crate::store::BookingStore;
use crate::types::{BookingStep, ClockTime};
use crate::validation::{self, CustomerInfoPatch};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Generation marker for an in-flight catalog load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What a catalog refresh pruned from the selection, and which fetches failed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub removed_services: Vec<Service>,
    pub cleared_staff: Option<Employee>,
    /// Set when the service catalog could not be fetched
    pub services_error: Option<String>,
    /// Set when the staff catalog could not be fetched
    pub staff_error: Option<String>,
}

impl RefreshReport {
    pub fn is_empty(&self) -> bool {
        self.removed_services.is_empty()
            && self.cleared_staff.is_none()
            && self.services_error.is_none()
            && self.staff_error.is_none()
    }

    /// User-facing warnings, one per kind of change or failure
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(e) = &self.services_error {
            warnings.push(format!("Could not load services: {e}"));
        }
        if let Some(e) = &self.staff_error {
            warnings.push(format!("Could not load staff: {e}"));
        }
        if !self.removed_services.is_empty() {
            warnings.push("Some previously selected services no longer exist and were removed.".to_string());
        }
        if self.cleared_staff.is_some() {
            warnings.push("The selected staff no longer exists and was cleared.".to_string());
        }
        warnings
    }
}

/// One booking wizard session
pub struct BookingSession<A, C> {
    api: A,
    clock: C,
    store: BookingStore,
    services: Vec<Service>,
    employees: Vec<Employee>,
    generation: u64,
    customer_found: bool,
    last_booking: Option<Booking>,
}

impl<A: BookingApi, C: Clock> BookingSession<A, C> {
    /// Start a session with a fresh store, today preselected
    pub fn new(api: A, clock: C) -> Self {
        let store = BookingStore::new();
        store.set_selected_date(clock.now().date());
        Self::with_store(api, clock, store)
    }

    /// Start a session over an existing store (left as is)
    pub fn with_store(api: A, clock: C, store: BookingStore) -> Self {
        Self {
            api,
            clock,
            store,
            services: Vec::new(),
            employees: Vec::new(),
            generation: 0,
            customer_found: false,
            last_booking: None,
        }
    }

    pub fn store(&self) -> &BookingStore {
        &self.store
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Whether the last phone lookup filled in a known customer
    pub fn customer_found(&self) -> bool {
        self.customer_found
    }

    pub fn last_booking(&self) -> Option<&Booking> {
        self.last_booking.as_ref()
    }

    // ------------------------------------------------------------------------
    // Catalogs
    // ------------------------------------------------------------------------

    /// Start a load; any earlier ticket becomes stale
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Invalidate all outstanding loads
    pub fn teardown(&mut self) {
        self.generation += 1;
    }

    /// Store a loaded service catalog and prune stale selections.
    ///
    /// Returns None when the ticket is stale and the result was dropped.
    pub fn apply_services(&mut self, ticket: LoadTicket, services: Vec<Service>) -> Option<Vec<Service>> {
        if !self.is_current(ticket) {
            warn!("Dropping stale service catalog ({} entries)", services.len());
            return None;
        }
        self.services = services;
        Some(reconcile::reconcile_services(&self.store, &self.services))
    }

    /// Store a loaded staff catalog and clear a stale staff selection.
    ///
    /// Returns None when the ticket is stale; otherwise the cleared employee,
    /// if any.
    pub fn apply_employees(&mut self, ticket: LoadTicket, employees: Vec<Employee>) -> Option<Option<Employee>> {
        if !self.is_current(ticket) {
            warn!("Dropping stale staff catalog ({} entries)", employees.len());
            return None;
        }
        self.employees = employees;
        Some(reconcile::reconcile_staff(&self.store, &self.employees))
    }

    /// Fetch both catalogs and reconcile the selection against them.
    ///
    /// Each catalog is applied as soon as it arrives; a failed fetch is
    /// recorded in the report and does not hold back the other one.
    pub fn load_catalogs(&mut self) -> RefreshReport {
        let ticket = self.begin_load();
        let mut report = RefreshReport::default();

        match self.api.services() {
            Ok(services) => {
                info!("Loaded {} services", services.len());
                if let Some(removed) = self.apply_services(ticket, services) {
                    report.removed_services = removed;
                }
            }
            Err(e) => {
                warn!("Failed to load services: {}", e);
                report.services_error = Some(e.to_string());
            }
        }

        match self.api.employees() {
            Ok(employees) => {
                info!("Loaded {} staff", employees.len());
                if let Some(cleared) = self.apply_employees(ticket, employees) {
                    report.cleared_staff = cleared;
                }
            }
            Err(e) => {
                warn!("Failed to load staff: {}", e);
                report.staff_error = Some(e.to_string());
            }
        }

        report
    }

    // ------------------------------------------------------------------------
    // Schedule Step
    // ------------------------------------------------------------------------

    /// Compute slots for the current selection and drop a stale selected time
    pub fn available_slots(&self) -> Vec<TimeSlot> {
        let state = self.store.state();
        let slots = slots::available_slots(&state.selected_services, state.selected_date, self.clock.now());
        reconcile::reconcile_selected_time(&self.store, &slots);
        slots
    }

    /// Select or deselect a service, then refresh availability
    pub fn toggle_service(&self, service: &Service) {
        if self.store.state().is_service_selected(service.id) {
            self.store.remove_service(service.id);
        } else {
            self.store.add_service(service.clone());
        }
        self.available_slots();
    }

    /// Select a catalog service by id
    pub fn select_service_by_id(&self, service_id: i64) -> Result<()> {
        let service = self
            .services
            .iter()
            .find(|s| s.id == service_id)
            .ok_or_else(|| BookingError::validation(format!("Unknown service id {service_id}")))?;
        if !self.store.state().is_service_selected(service_id) {
            self.toggle_service(service);
        }
        Ok(())
    }

    /// Select a catalog employee by id; `None` means no preference
    pub fn select_staff_by_id(&self, staff_id: Option<i64>) -> Result<()> {
        let staff = match staff_id {
            Some(id) => Some(
                self.employees
                    .iter()
                    .find(|e| e.id == id)
                    .cloned()
                    .ok_or_else(|| BookingError::validation(format!("Unknown staff id {id}")))?,
            ),
            None => None,
        };
        self.store.set_selected_staff(staff);
        Ok(())
    }

    /// Pick a calendar day, then refresh availability
    pub fn select_date(&self, date: NaiveDate) {
        self.store.set_selected_date(date);
        self.available_slots();
    }

    /// Pick a slot start; it must be one of the current slots
    pub fn select_time(&self, time: ClockTime) -> Result<()> {
        let slots = self.available_slots();
        if !slots::contains_start(&slots, time) {
            return Err(BookingError::validation(format!("{time} is not an available time")));
        }
        self.store.set_selected_time(Some(time));
        Ok(())
    }

    /// "Continue" on the schedule step
    pub fn continue_to_info(&self) -> Result<()> {
        let state = self.store.state();
        if state.selected_services.is_empty() {
            return Err(BookingError::validation("Please select at least one service."));
        }
        if state.selected_date.is_none() || state.selected_time.is_none() {
            return Err(BookingError::validation("Please select date and time first."));
        }

        self.store.complete_step(BookingStep::Schedule);
        self.store.go_to_next_step();
        Ok(())
    }

    /// "Back" on the info step
    pub fn back_to_schedule(&self) {
        self.store.go_to_previous_step();
    }

    // ------------------------------------------------------------------------
    // Info Step
    // ------------------------------------------------------------------------

    /// Store the phone number and, once long enough, look up the customer.
    ///
    /// The first match fills name and email. Lookup failures are logged and
    /// otherwise ignored.
    pub fn set_phone(&mut self, phone: &str) {
        self.store
            .set_customer_info(CustomerInfoPatch::default().phone(phone));
        self.customer_found = false;

        if !validation::is_lookup_ready(phone) {
            return;
        }

        match self.api.find_customers_by_phone(phone) {
            Ok(customers) => {
                if let Some(customer) = customers.into_iter().next() {
                    info!("Returning customer found by phone");
                    self.store.set_customer_info(
                        CustomerInfoPatch::default()
                            .name(customer.customer_name)
                            .email(customer.customer_email),
                    );
                    self.customer_found = true;
                }
            }
            Err(e) => warn!("Customer lookup failed: {}", e),
        }
    }

    /// Edit name or email; clears the "returning customer" marker
    pub fn set_contact(&mut self, patch: CustomerInfoPatch) {
        if patch.name.is_some() || patch.email.is_some() {
            self.customer_found = false;
        }
        self.store.set_customer_info(patch);
    }

    /// "Continue" on the info step: every gate must pass.
    ///
    /// Returns the request that confirming would submit.
    pub fn review(&self) -> Result<BookingRequest> {
        if !self.store.validate_customer_info() {
            return Err(BookingError::validation(
                "Please fill in required fields. Name and phone are required (email must be valid if provided).",
            ));
        }
        let services_ok = self.store.validate_services();
        let schedule_ok = self.store.validate_schedule();
        if !services_ok {
            return Err(BookingError::validation("Please select at least one service."));
        }
        if !schedule_ok {
            return Err(BookingError::validation("Please select date and time first."));
        }
        BookingRequest::from_state(&self.store.state())
    }

    /// Submit the booking.
    ///
    /// On failure the store is left untouched so the user can retry.
    pub fn confirm_booking(&mut self) -> Result<Booking> {
        let request = BookingRequest::from_state(&self.store.state())?;
        let raw = self.api.create_booking(&request)?;
        let booking = booking::resolve_create_response(&raw, &request);

        info!("Booking created, code {}", booking.code_or_na());
        self.last_booking = Some(booking.clone());
        Ok(booking)
    }

    /// Leave the confirmation screen and start over
    pub fn return_home(&mut self) {
        self.last_booking = None;
        self.customer_found = false;
        self.store.reset_booking();
    }
}
