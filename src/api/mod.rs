//! Remote booking API boundary
//!
//! The session driver talks to the booking backend only through
//! [`BookingApi`]. The blocking HTTP implementation lives in `http` behind the
//! default `http` feature; tests substitute in-memory fakes.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpBookingApi;

use crate::booking::BookingRequest;
use crate::catalog::{CustomerRecord, Employee, Service};
use crate::error::Result;
use serde_json::Value;

/// Operations the widget needs from the booking backend
pub trait BookingApi {
    /// Service catalog, sorted by name
    fn services(&self) -> Result<Vec<Service>>;

    /// Staff catalog with avatars, sorted by name
    fn employees(&self) -> Result<Vec<Employee>>;

    /// Customers whose phone equals `phone`, in server order
    fn find_customers_by_phone(&self, phone: &str) -> Result<Vec<CustomerRecord>>;

    /// Submit a booking and return the raw response body.
    ///
    /// The body is left unparsed; see `booking::resolve_create_response`.
    fn create_booking(&self, request: &BookingRequest) -> Result<Value>;
}

impl<A: BookingApi + ?Sized> BookingApi for &A {
    fn services(&self) -> Result<Vec<Service>> {
        (**self).services()
    }

    fn employees(&self) -> Result<Vec<Employee>> {
        (**self).employees()
    }

    fn find_customers_by_phone(&self, phone: &str) -> Result<Vec<CustomerRecord>> {
        (**self).find_customers_by_phone(phone)
    }

    fn create_booking(&self, request: &BookingRequest) -> Result<Value> {
        (**self).create_booking(request)
    }
}
