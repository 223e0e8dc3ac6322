//! Blocking HTTP client for the booking API (`ureq`)

use super::BookingApi;
use crate::booking::BookingRequest;
use crate::catalog::{self, CustomerRecord, Employee, ListResponse, Service};
use crate::config::WidgetConfig;
use crate::error::{BookingError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// `BookingApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpBookingApi {
    pub fn new(config: &WidgetConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&format!("booking-widget/{}", env!("CARGO_PKG_VERSION")))
            .build();

        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let mut request = self.agent.get(&self.url(path)).set("Accept", "application/json");
        for (key, value) in query {
            request = request.query(key, value);
        }
        debug!("GET {}{}", self.base_url, path);

        let response = request.call().map_err(map_ureq_error)?;
        let list: ListResponse<T> = response.into_json()?;
        Ok(list.data)
    }
}

impl BookingApi for HttpBookingApi {
    fn services(&self) -> Result<Vec<Service>> {
        self.get_list("/services", &[("sort", "service_name:ASC")])
    }

    fn employees(&self) -> Result<Vec<Employee>> {
        self.get_list(
            "/employees",
            &[("sort", "employee_name:ASC"), ("populate", "employee_avatar")],
        )
    }

    fn find_customers_by_phone(&self, phone: &str) -> Result<Vec<CustomerRecord>> {
        debug!("GET {}/customers (phone lookup)", self.base_url);
        let response = self
            .agent
            .get(&self.url("/customers"))
            .query("filters[customer_phone][$eq]", phone)
            .call()
            .map_err(map_ureq_error)?;

        let raw: Value = response.into_json()?;
        Ok(catalog::parse_customer_response(raw)?)
    }

    fn create_booking(&self, request: &BookingRequest) -> Result<Value> {
        debug!("POST {}/bookings/create-with-customer", self.base_url);
        let response = self
            .agent
            .post(&self.url("/bookings/create-with-customer"))
            .send_json(request.envelope())
            .map_err(map_ureq_error)?;

        Ok(response.into_json()?)
    }
}

/// Translate a `ureq` failure into the widget's error taxonomy
fn map_ureq_error(err: ureq::Error) -> BookingError {
    match err {
        ureq::Error::Status(status, response) => {
            let body: Option<Value> = response.into_json().ok();
            let message = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| "Request failed".to_string());
            error!("Booking API returned {}: {}", status, message);
            BookingError::api(status, message)
        }
        ureq::Error::Transport(transport) => {
            error!("Booking API unreachable: {}", transport);
            BookingError::transport(transport.to_string())
        }
    }
}

/// `message` at the top level, or under `error` for structured API errors
fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error")?.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
