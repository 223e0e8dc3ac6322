//! Customer input validation shared by the store and the session driver

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Basic `local@domain.tld` shape
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Phone numbers shorter than this never trigger a customer lookup
pub const MIN_LOOKUP_PHONE_LEN: usize = 7;

/// Contact details entered on the info step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Partial update for [`CustomerInfo`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInfoPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

impl CustomerInfo {
    /// Shallow merge: fields present in the patch replace existing values
    pub fn apply(&mut self, patch: CustomerInfoPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }

    /// Name and phone are required; email is optional but must be well formed
    pub fn is_valid(&self) -> bool {
        if self.name.trim().is_empty() || self.phone.trim().is_empty() {
            return false;
        }
        let email = self.email.trim();
        email.is_empty() || is_valid_email(email)
    }
}

/// Whether `email` has the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether a phone number is long enough to look up
pub fn is_lookup_ready(phone: &str) -> bool {
    phone.chars().count() >= MIN_LOOKUP_PHONE_LEN
}
