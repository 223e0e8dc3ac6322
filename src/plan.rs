//! Booking plan files for headless bookings.
//!
//! A plan captures every choice a user would make in the wizard so the CLI
//! can drive a session end to end without prompts.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::ClockTime;
use crate::validation::{self, CustomerInfo};

/// A complete set of wizard choices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPlan {
    /// Catalog ids of the services to book, in display order
    pub service_ids: Vec<i64>,
    /// Catalog id of the preferred staff member; omitted for no preference
    #[serde(default)]
    pub staff_id: Option<i64>,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub customer: CustomerInfo,
}

impl BookingPlan {
    /// Save plan to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize plan to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write plan to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load plan from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read plan from {:?}", path.as_ref()))?;

        let plan: Self = serde_json::from_str(&content).context("Failed to parse plan JSON")?;

        Ok(plan)
    }

    /// Checks that need no catalog: the rest happens against the live session
    pub fn validate(&self) -> Result<()> {
        if self.service_ids.is_empty() {
            anyhow::bail!("At least one service id must be specified");
        }
        let mut ids = self.service_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.service_ids.len() {
            anyhow::bail!("Service ids must not repeat");
        }

        if self.customer.name.trim().is_empty() {
            anyhow::bail!("Customer name must be specified");
        }
        if self.customer.phone.trim().is_empty() {
            anyhow::bail!("Customer phone must be specified");
        }
        let email = self.customer.email.trim();
        if !email.is_empty() && !validation::is_valid_email(email) {
            anyhow::bail!("Customer email '{}' is not a valid address", email);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn plan() -> BookingPlan {
        BookingPlan {
            service_ids: vec![1, 2],
            staff_id: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 11).expect("date"),
            time: ClockTime::from_hm(10, 30),
            customer: CustomerInfo {
                name: "An".to_string(),
                email: "an@example.com".to_string(),
                phone: "0901234567".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_plan() {
        assert!(plan().validate().is_ok());
    }

    #[test]
    fn test_plan_file_round_trip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        plan().save_to_file(&path).expect("Should save");

        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("\"time\": \"10:30\""));
        assert!(content.contains("\"date\": \"2026-03-11\""));

        assert_eq!(BookingPlan::load_from_file(&path).expect("Should load"), plan());
    }

    #[test]
    fn test_plan_rejects_bad_input() {
        let mut p = plan();
        p.service_ids.clear();
        assert!(p.validate().is_err());

        let mut p = plan();
        p.service_ids = vec![1, 1];
        assert!(p.validate().is_err());

        let mut p = plan();
        p.customer.phone = " ".to_string();
        assert!(p.validate().is_err());

        let mut p = plan();
        p.customer.email = "an@example".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_plan_rejects_malformed_time() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("plan.json");
        std::fs::write(
            &path,
            r#"{"service_ids":[1],"date":"2026-03-11","time":"25:00","customer":{"name":"An","phone":"1"}}"#,
        )
        .expect("write");
        assert!(BookingPlan::load_from_file(&path).is_err());
    }
}
