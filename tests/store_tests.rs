//! Store scenarios exercised through the public API
//!
//! Unit tests next to the store cover single operations; these walk the
//! wizard the way a screen would, combining the store with slot
//! computation and reconciliation.

use booking_widget::catalog::{Employee, Service};
use booking_widget::reconcile;
use booking_widget::slots::available_slots;
use booking_widget::store::{BookingState, BookingStore, SERVICES_REQUIRED_MESSAGE};
use booking_widget::types::{BookingStep, ClockTime};
use booking_widget::validation::{CustomerInfoPatch, is_valid_email};
use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::rc::Rc;

fn service(id: i64, minutes: u32) -> Service {
    Service {
        id,
        document_id: Some(format!("svc-{id}")),
        service_name: format!("Service {id}"),
        service_price: 15.0,
        working_time: minutes,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    today().and_hms_opt(h, m, 0).expect("valid time")
}

// =============================================================================
// Full Wizard Walk
// =============================================================================

#[test]
fn test_book_today_afternoon() {
    let store = BookingStore::new();
    store.add_service(service(1, 30));
    store.set_selected_date(today());

    let state = store.state();
    let slots = available_slots(&state.selected_services, state.selected_date, at(14, 3));
    assert_eq!(slots[0].start, ClockTime::from_hm(14, 10));
    assert_eq!(slots[0].end, ClockTime::from_hm(14, 40));

    store.set_selected_time(Some(slots[0].start));
    store.go_to_next_step();

    let state = store.state();
    assert_eq!(state.current_step, BookingStep::Info);
    assert_eq!(state.completed_steps, vec![BookingStep::Schedule]);
    assert!(state.services_error.is_none());

    store.set_customer_info(CustomerInfoPatch::default().name("An").phone("0901234567"));
    assert!(store.validate_customer_info());
}

#[test]
fn test_reset_after_confirmation() {
    let store = BookingStore::new();
    store.add_service(service(1, 30));
    store.add_service(service(2, 45));
    store.set_selected_staff(Some(Employee {
        id: 7,
        document_id: Some("emp-7".to_string()),
        employee_name: "Mai".to_string(),
        employee_phone: Some("0900000007".to_string()),
        employee_email: None,
        employee_avatar: None,
    }));
    store.set_selected_date(today());
    store.set_selected_time(Some(ClockTime::from_hm(15, 0)));
    store.go_to_next_step();
    store.set_customer_info(
        CustomerInfoPatch::default()
            .name("An")
            .email("an@example.com")
            .phone("0901234567"),
    );
    store.set_selected_services(Vec::new());
    store.validate_services();
    store.complete_step(BookingStep::Schedule);

    let populated = store.state();
    assert_eq!(populated.completed_steps, vec![BookingStep::Schedule]);
    assert_eq!(populated.current_step, BookingStep::Info);
    assert!(populated.selected_staff.is_some());
    assert_eq!(populated.customer_info.email, "an@example.com");
    assert!(populated.services_error.is_some());

    store.reset_booking();
    assert_eq!(*store.state(), BookingState::default());
}

// =============================================================================
// Gates
// =============================================================================

#[test]
fn test_services_gate_blocks_and_resets_progress() {
    let store = BookingStore::new();
    store.complete_step(BookingStep::Schedule);
    store.set_selected_date(today());
    store.set_selected_time(Some(ClockTime::from_hm(10, 0)));

    store.go_to_next_step();

    let state = store.state();
    assert_eq!(state.current_step, BookingStep::Schedule);
    assert_eq!(state.services_error.as_deref(), Some(SERVICES_REQUIRED_MESSAGE));
    assert!(state.completed_steps.is_empty());
}

#[test]
fn test_schedule_gate_needs_time() {
    let store = BookingStore::new();
    store.add_service(service(1, 30));
    store.set_selected_date(today());

    store.go_to_next_step();
    assert_eq!(store.state().current_step, BookingStep::Schedule);
    assert!(store.state().completed_steps.is_empty());
}

#[test]
fn test_info_unreachable_before_schedule_done() {
    let store = BookingStore::new();
    store.go_to_step(BookingStep::Info);
    assert_eq!(store.state().current_step, BookingStep::Schedule);

    store.complete_step(BookingStep::Schedule);
    store.go_to_step(BookingStep::Info);
    assert_eq!(store.state().current_step, BookingStep::Info);
}

#[test]
fn test_email_rules() {
    for ok in ["a@b.co", "first.last@example.com", "x+tag@sub.domain.org"] {
        assert!(is_valid_email(ok), "{ok} should be accepted");
    }
    for bad in ["a@b", "a b@c.d", "@b.co", "a@.co", "plain"] {
        assert!(!is_valid_email(bad), "{bad} should be rejected");
    }

    let store = BookingStore::new();
    store.set_customer_info(CustomerInfoPatch::default().name("An").phone("1").email("a@b"));
    assert!(!store.validate_customer_info());
    store.set_customer_info(CustomerInfoPatch::default().email(""));
    assert!(store.validate_customer_info());
    store.set_customer_info(CustomerInfoPatch::default().name("  "));
    assert!(!store.validate_customer_info());
}

// =============================================================================
// Stale Selections
// =============================================================================

#[test]
fn test_time_cleared_when_duration_grows() {
    let store = BookingStore::new();
    store.add_service(service(1, 30));
    store.set_selected_date(today());
    store.set_selected_time(Some(ClockTime::from_hm(17, 30)));

    store.add_service(service(2, 45));
    let state = store.state();
    let slots = available_slots(&state.selected_services, state.selected_date, at(8, 0));

    assert!(reconcile::reconcile_selected_time(&store, &slots));
    assert!(store.state().selected_time.is_none());
}

#[test]
fn test_time_cleared_when_day_moves_on() {
    let store = BookingStore::new();
    store.add_service(service(1, 30));
    store.set_selected_date(today());
    store.set_selected_time(Some(ClockTime::from_hm(14, 10)));

    let state = store.state();
    let slots = available_slots(&state.selected_services, state.selected_date, at(14, 11));
    assert_eq!(slots[0].start, ClockTime::from_hm(14, 20));

    assert!(reconcile::reconcile_selected_time(&store, &slots));
    assert!(store.state().selected_time.is_none());
}

// =============================================================================
// Listeners
// =============================================================================

#[test]
fn test_listener_driven_reconciliation() {
    // A screen-like listener keeps the selected time valid on every change
    let store = BookingStore::new();
    let runs = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&runs);
    store.subscribe(move |store| {
        *counter.borrow_mut() += 1;
        let state = store.state();
        let slots = available_slots(&state.selected_services, state.selected_date, at(8, 0));
        reconcile::reconcile_selected_time(store, &slots);
    });

    store.add_service(service(1, 30));
    store.set_selected_date(today());
    store.set_selected_time(Some(ClockTime::from_hm(17, 30)));
    assert_eq!(store.state().selected_time, Some(ClockTime::from_hm(17, 30)));

    store.add_service(service(2, 60));
    assert!(store.state().selected_time.is_none());
    assert!(*runs.borrow() >= 4);
}
