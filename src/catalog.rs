//! Catalog entities served by the booking API
//!
//! Services and employees are selected by the user; customer records come back
//! from the phone lookup. Field names follow the API's JSON so the types
//! deserialize straight from responses.

use serde::{Deserialize, Serialize};

// ============================================================================
// Services
// ============================================================================

/// A bookable service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    #[serde(rename = "documentId", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub service_name: String,
    /// Non-negative price, currency-agnostic
    #[serde(default)]
    pub service_price: f64,
    /// Duration in minutes
    #[serde(default)]
    pub working_time: u32,
}

// ============================================================================
// Employees
// ============================================================================

/// A staff member who can perform services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    #[serde(rename = "documentId", default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    pub employee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_avatar: Option<Media>,
}

impl Employee {
    /// Avatar URL resolved against the CDN base, if the employee has one
    pub fn avatar_url(&self, cdn_base: &str) -> Option<String> {
        self.employee_avatar
            .as_ref()
            .and_then(Media::url)
            .map(|url| to_absolute_url(url, cdn_base))
    }
}

/// Attributes shared by both media shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttributes {
    pub url: String,
    #[serde(rename = "alternativeText", default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Wrapped media entry: `{ id, attributes: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: i64,
    pub attributes: MediaAttributes,
}

/// Media reference in either of the two shapes the API produces.
///
/// Newer responses flatten the media object; older ones wrap it in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Media {
    Flat {
        id: i64,
        #[serde(flatten)]
        attributes: MediaAttributes,
    },
    Wrapped { data: Option<MediaEntry> },
}

impl Media {
    /// The media URL, whichever shape it arrived in
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Flat { attributes, .. } => Some(attributes.url.as_str()),
            Self::Wrapped { data } => data.as_ref().map(|entry| entry.attributes.url.as_str()),
        }
    }
}

/// Prefix relative URLs with the CDN base; absolute URLs pass through.
pub fn to_absolute_url(url: &str, cdn_base: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return url.to_string();
    }
    format!("{cdn_base}{url}")
}

// ============================================================================
// Customers
// ============================================================================

/// A customer found by phone lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
}

/// Lookup entries arrive flat or nested under `attributes`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CustomerEntry {
    Nested { attributes: CustomerRecord },
    Flat(CustomerRecord),
}

impl From<CustomerEntry> for CustomerRecord {
    fn from(entry: CustomerEntry) -> Self {
        match entry {
            CustomerEntry::Nested { attributes } => attributes,
            CustomerEntry::Flat(record) => record,
        }
    }
}

/// Generic `{ data: [...] }` list envelope used by the catalog endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Parse a customer lookup response into records, in server order
pub fn parse_customer_response(raw: serde_json::Value) -> serde_json::Result<Vec<CustomerRecord>> {
    let list: ListResponse<CustomerEntry> = serde_json::from_value(raw)?;
    Ok(list.data.into_iter().map(CustomerRecord::from).collect())
}

// ============================================================================
// Display Helpers
// ============================================================================

/// Sum of working time over services, in minutes
pub fn total_minutes(services: &[Service]) -> u32 {
    services
        .iter()
        .fold(0u32, |sum, s| sum.saturating_add(s.working_time))
}

/// Sum of prices over services
pub fn total_price(services: &[Service]) -> f64 {
    services.iter().map(|s| s.service_price).sum()
}

/// `"1h 30m"`, `"2h"`, `"45m"`; empty for zero
pub fn format_duration(minutes: u32) -> String {
    if minutes == 0 {
        return String::new();
    }
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// USD currency form with thousands separators, e.g. `$1,234.50`
pub fn format_price(price: f64) -> String {
    let negative = price < 0.0;
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Pill filter value matching every service
pub const ALL_SERVICES_PILL: &str = "all";

/// Distinct trimmed service names, sorted, for the filter pills
pub fn service_pills(services: &[Service]) -> Vec<String> {
    let mut names: Vec<String> = services
        .iter()
        .map(|s| s.service_name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Services matching both the pill (exact name, case-insensitive, or `all`)
/// and the free-text search (substring, case-insensitive).
pub fn filter_services<'a>(services: &'a [Service], search: &str, pill: &str) -> Vec<&'a Service> {
    let query = search.trim().to_lowercase();
    services
        .iter()
        .filter(|s| {
            let name = s.service_name.trim().to_lowercase();
            let matches_pill = pill == ALL_SERVICES_PILL || name == pill.to_lowercase();
            let matches_search = query.is_empty() || name.contains(&query);
            matches_pill && matches_search
        })
        .collect()
}
