//! Booking creation wire format
//!
//! Builds the creation request from a store snapshot and turns whatever the
//! API answers into a canonical [`Booking`].
//!
//! # Response Normalization
//!
//! The creation endpoint has answered in several envelopes over time. Each
//! known envelope is an extractor; they are tried in order and the first
//! match wins:
//!
//! | Order | Location |
//! |-------|----------|
//! | 1 | `raw.data` |
//! | 2 | `raw.data.data` |
//! | 3 | `raw.data.booking` |
//! | 4 | `raw.booking` |
//! | 5 | `raw` |
//!
//! When nothing matches, a record is synthesized from the request with status
//! `waiting_approve`, so a successful POST is never reported as a failure.

use crate::error::{BookingError, Result};
use crate::store::BookingState;
use crate::types::BookingStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

// ============================================================================
// Request
// ============================================================================

/// Payload for `POST /bookings/create-with-customer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    /// `YYYY-MM-DD`
    pub booking_date: String,
    /// `HH:MM:SS`
    pub booking_time: String,
    pub booking_note: String,
    /// Staff document id; `None` means no preference
    pub employee_id: Option<String>,
    /// Service document ids in selection order
    pub service_id: Vec<String>,
}

/// `{ "data": request }` body the endpoint expects
#[derive(Debug, Serialize)]
pub struct BookingEnvelope<'a> {
    pub data: &'a BookingRequest,
}

impl BookingRequest {
    /// Build the request from a store snapshot.
    ///
    /// # Errors
    ///
    /// `Validation` when date or time is missing, or when the selected staff
    /// or any selected service has no document id.
    pub fn from_state(state: &BookingState) -> Result<Self> {
        let (Some(date), Some(time)) = (state.selected_date, state.selected_time) else {
            return Err(BookingError::validation("Please select date and time first."));
        };

        let employee_id = match &state.selected_staff {
            Some(staff) => Some(staff.document_id.clone().ok_or_else(|| {
                BookingError::validation("Selected staff is missing documentId. Please re-select staff.")
            })?),
            None => None,
        };

        let service_id = state
            .selected_services
            .iter()
            .map(|s| {
                s.document_id.clone().ok_or_else(|| {
                    BookingError::validation(
                        "Selected service is missing documentId. Please re-select services.",
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let info = &state.customer_info;
        Ok(Self {
            customer_name: info.name.clone(),
            customer_email: (!info.email.is_empty()).then(|| info.email.clone()),
            customer_phone: info.phone.clone(),
            booking_date: date.format("%Y-%m-%d").to_string(),
            booking_time: time.to_wire(),
            booking_note: String::new(),
            employee_id,
            service_id,
        })
    }

    pub fn envelope(&self) -> BookingEnvelope<'_> {
        BookingEnvelope { data: self }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Canonical created-booking record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(rename = "documentId", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub note: Option<String>,
    pub booking_date: String,
    pub booking_time: String,
    pub booking_end: Option<String>,
    pub booking_status: Option<BookingStatus>,
    pub booking_code: Option<String>,
}

impl Booking {
    /// Record used when the response matched no known envelope
    pub fn fallback(request: &BookingRequest) -> Self {
        Self {
            id: 0,
            document_id: None,
            name: request.customer_name.clone(),
            email: request.customer_email.clone(),
            phone: request.customer_phone.clone(),
            note: None,
            booking_date: request.booking_date.clone(),
            booking_time: request.booking_time.clone(),
            booking_end: None,
            booking_status: Some(BookingStatus::WaitingApprove),
            booking_code: None,
        }
    }

    /// Booking code for display, `N/A` when the server did not assign one
    pub fn code_or_na(&self) -> &str {
        self.booking_code.as_deref().unwrap_or("N/A")
    }
}

/// Required string field
fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)?.as_str().map(str::to_string)
}

/// Field that must be present and either null or a string.
///
/// Outer `None` rejects the candidate; inner `None` is JSON null.
fn nullable_string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<Option<String>> {
    match obj.get(key)? {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

/// Numeric id; integral floats are accepted
fn id_field(obj: &serde_json::Map<String, Value>) -> Option<i64> {
    let id = obj.get("id")?;
    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Accept `value` as a booking record if it has the canonical field types
pub fn as_booking(value: &Value) -> Option<Booking> {
    let obj = value.as_object()?;

    let id = id_field(obj)?;
    let name = string_field(obj, "name")?;
    let email = nullable_string_field(obj, "email")?;
    let phone = string_field(obj, "phone")?;
    let booking_date = string_field(obj, "booking_date")?;
    let booking_time = string_field(obj, "booking_time")?;
    let booking_end = nullable_string_field(obj, "booking_end")?;
    let raw_status = nullable_string_field(obj, "booking_status")?;
    let booking_code = nullable_string_field(obj, "booking_code")?;

    let booking_status = raw_status.and_then(|s| match s.parse::<BookingStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            warn!("Unknown booking status '{}' in response, ignoring", s);
            None
        }
    });

    Some(Booking {
        id,
        document_id: obj.get("documentId").and_then(Value::as_str).map(str::to_string),
        name,
        email,
        phone,
        note: obj.get("note").and_then(Value::as_str).map(str::to_string),
        booking_date,
        booking_time,
        booking_end,
        booking_status,
        booking_code,
    })
}

type Extractor = fn(&Value) -> Option<Booking>;

/// Known response envelopes, in priority order
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("data", |raw| as_booking(raw.get("data")?)),
    ("data.data", |raw| as_booking(raw.get("data")?.get("data")?)),
    ("data.booking", |raw| as_booking(raw.get("data")?.get("booking")?)),
    ("booking", |raw| as_booking(raw.get("booking")?)),
    ("root", as_booking),
];

/// Find the booking record in a creation response, if any envelope matches
pub fn normalize_create_response(raw: &Value) -> Option<Booking> {
    if !raw.is_object() {
        return None;
    }
    EXTRACTORS.iter().find_map(|(_, extract)| extract(raw))
}

/// Normalize the response or synthesize a record from the request
pub fn resolve_create_response(raw: &Value, request: &BookingRequest) -> Booking {
    normalize_create_response(raw).unwrap_or_else(|| {
        warn!("Unrecognized booking response shape, using request data");
        Booking::fallback(request)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Employee, Service};
    use crate::types::ClockTime;
    use crate::validation::CustomerInfo;
    use chrono::NaiveDate;
    use serde_json::json;

    fn service(id: i64, doc: Option<&str>) -> Service {
        Service {
            id,
            document_id: doc.map(str::to_string),
            service_name: format!("Service {id}"),
            service_price: 25.0,
            working_time: 30,
        }
    }

    fn ready_state() -> BookingState {
        BookingState {
            selected_services: vec![service(1, Some("svc-a")), service(2, Some("svc-b"))],
            selected_date: NaiveDate::from_ymd_opt(2026, 3, 10),
            selected_time: Some(ClockTime::from_hm(14, 10)),
            customer_info: CustomerInfo {
                name: "An".to_string(),
                email: String::new(),
                phone: "0901234567".to_string(),
            },
            ..BookingState::default()
        }
    }

    fn booking_json() -> Value {
        json!({
            "id": 12,
            "documentId": "bk-12",
            "name": "An",
            "email": null,
            "phone": "0901234567",
            "note": null,
            "booking_date": "2026-03-10",
            "booking_time": "14:10:00",
            "booking_end": "14:40:00",
            "booking_status": "waiting_approve",
            "booking_code": "BK-0012"
        })
    }

    // =========================================================================
    // Request Tests
    // =========================================================================

    #[test]
    fn test_request_from_state() {
        let request = BookingRequest::from_state(&ready_state()).expect("Should build");
        assert_eq!(request.booking_date, "2026-03-10");
        assert_eq!(request.booking_time, "14:10:00");
        assert_eq!(request.customer_email, None);
        assert_eq!(request.employee_id, None);
        assert_eq!(request.service_id, vec!["svc-a", "svc-b"]);
        assert_eq!(request.booking_note, "");
    }

    #[test]
    fn test_request_serializes_camel_case_envelope() {
        let request = BookingRequest::from_state(&ready_state()).expect("Should build");
        let body = serde_json::to_value(request.envelope()).expect("serialize");
        assert_eq!(body["data"]["customerName"], "An");
        assert_eq!(body["data"]["customerEmail"], Value::Null);
        assert_eq!(body["data"]["bookingTime"], "14:10:00");
        assert_eq!(body["data"]["employeeId"], Value::Null);
        assert_eq!(body["data"]["serviceId"], json!(["svc-a", "svc-b"]));
    }

    #[test]
    fn test_request_requires_schedule() {
        let state = BookingState {
            selected_time: None,
            ..ready_state()
        };
        let err = BookingRequest::from_state(&state).unwrap_err();
        assert!(err.to_string().contains("date and time"));
    }

    #[test]
    fn test_request_requires_document_ids() {
        let state = BookingState {
            selected_services: vec![service(1, None)],
            ..ready_state()
        };
        assert!(BookingRequest::from_state(&state).is_err());

        let state = BookingState {
            selected_staff: Some(Employee {
                id: 3,
                document_id: None,
                employee_name: "Mai".to_string(),
                employee_phone: None,
                employee_email: None,
                employee_avatar: None,
            }),
            ..ready_state()
        };
        let err = BookingRequest::from_state(&state).unwrap_err();
        assert!(err.to_string().contains("staff"));
    }

    // =========================================================================
    // Normalization Tests
    // =========================================================================

    #[test]
    fn test_normalize_each_envelope() {
        let shapes = [
            json!({ "data": booking_json() }),
            json!({ "data": { "data": booking_json() } }),
            json!({ "data": { "booking": booking_json() } }),
            json!({ "booking": booking_json() }),
            booking_json(),
        ];
        for shape in shapes {
            let booking = normalize_create_response(&shape)
                .unwrap_or_else(|| panic!("Should normalize {shape}"));
            assert_eq!(booking.id, 12);
            assert_eq!(booking.booking_code.as_deref(), Some("BK-0012"));
            assert_eq!(booking.booking_status, Some(BookingStatus::WaitingApprove));
        }
    }

    #[test]
    fn test_normalize_prefers_outer_envelope() {
        let mut inner = booking_json();
        inner["id"] = json!(99);
        let mut outer = booking_json();
        outer["data"] = inner;
        let raw = json!({ "data": outer });

        assert_eq!(normalize_create_response(&raw).map(|b| b.id), Some(12));
    }

    #[test]
    fn test_normalize_rejects_wrong_types() {
        let mut missing_email = booking_json();
        missing_email.as_object_mut().expect("object").remove("email");
        assert!(normalize_create_response(&json!({ "data": missing_email })).is_none());

        let mut string_id = booking_json();
        string_id["id"] = json!("12");
        assert!(normalize_create_response(&string_id).is_none());

        assert!(normalize_create_response(&json!("ok")).is_none());
        assert!(normalize_create_response(&json!(null)).is_none());
    }

    #[test]
    fn test_unknown_status_is_dropped() {
        let mut raw = booking_json();
        raw["booking_status"] = json!("on_hold");
        let booking = normalize_create_response(&raw).expect("Should normalize");
        assert_eq!(booking.booking_status, None);
    }

    #[test]
    fn test_fallback_uses_request() {
        let request = BookingRequest::from_state(&ready_state()).expect("Should build");
        let booking = resolve_create_response(&json!({ "ok": true }), &request);

        assert_eq!(booking.id, 0);
        assert_eq!(booking.name, "An");
        assert_eq!(booking.booking_time, "14:10:00");
        assert_eq!(booking.booking_status, Some(BookingStatus::WaitingApprove));
        assert_eq!(booking.code_or_na(), "N/A");
    }
}
