//! Stale selection reconciliation
//!
//! Catalogs and slot lists are refreshed outside the store. After each refresh
//! the caller runs these functions to prune selections that no longer exist.
//! They only go through the store's public setters and are idempotent: a
//! second run with the same inputs changes nothing.

use crate::catalog::{Employee, Service};
use crate::slots::{self, TimeSlot};
use crate::store::BookingStore;
use std::collections::HashSet;
use tracing::warn;

/// Remove selected services missing from `catalog`; returns what was removed.
///
/// An empty catalog is treated as "not loaded" and prunes nothing.
pub fn reconcile_services(store: &BookingStore, catalog: &[Service]) -> Vec<Service> {
    let state = store.state();
    if catalog.is_empty() || state.selected_services.is_empty() {
        return Vec::new();
    }

    let valid_ids: HashSet<i64> = catalog.iter().map(|s| s.id).collect();
    let stale: Vec<Service> = state
        .selected_services
        .iter()
        .filter(|s| !valid_ids.contains(&s.id))
        .cloned()
        .collect();

    for service in &stale {
        warn!(
            "Selected service {} ({}) no longer exists, removing",
            service.id, service.service_name
        );
        store.remove_service(service.id);
    }
    stale
}

/// Clear the selected staff if it is missing from `catalog`; returns the
/// employee that was cleared.
///
/// An empty catalog is treated as "not loaded" and clears nothing.
pub fn reconcile_staff(store: &BookingStore, catalog: &[Employee]) -> Option<Employee> {
    let selected = store.state().selected_staff.clone()?;
    if catalog.is_empty() || catalog.iter().any(|e| e.id == selected.id) {
        return None;
    }

    warn!(
        "Selected staff {} ({}) no longer exists, clearing",
        selected.id, selected.employee_name
    );
    store.set_selected_staff(None);
    Some(selected)
}

/// Clear the selected time if it is not the start of any slot in `slots`.
///
/// Returns true when the time was cleared.
pub fn reconcile_selected_time(store: &BookingStore, slots: &[TimeSlot]) -> bool {
    let Some(time) = store.state().selected_time else {
        return false;
    };
    if slots::contains_start(slots, time) {
        return false;
    }

    warn!("Selected time {} is no longer available, clearing", time);
    store.set_selected_time(None);
    true
}
