//! Guest contact details and their validation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Dietary requirements a guest can flag
pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Nut Allergy",
    "Shellfish Allergy",
    "Halal",
    "Kosher",
];

/// Occasions a guest can mention
pub const OCCASIONS: &[&str] = &[
    "Birthday",
    "Anniversary",
    "Date Night",
    "Business Dinner",
    "Engagement",
    "Graduation",
    "Other Celebration",
];

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("hardcoded email pattern should always compile")
});

/// Contact details of the person booking
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Dietary requirements
    #[serde(default)]
    pub dietary: Vec<String>,
    /// Occasion being celebrated
    #[serde(default)]
    pub occasion: Option<String>,
    /// Free-form requests
    #[serde(default)]
    pub special_requests: String,
}

impl GuestInfo {
    /// Full name for display
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Checks the required fields
    ///
    /// # Errors
    ///
    /// Returns every problem found, in form order.
    pub fn validate(&self) -> Result<(), GuestErrors> {
        let mut errors = Vec::new();

        if self.first_name.trim().is_empty() {
            errors.push(GuestError::FirstNameRequired);
        }
        if self.last_name.trim().is_empty() {
            errors.push(GuestError::LastNameRequired);
        }
        if self.email.trim().is_empty() {
            errors.push(GuestError::EmailRequired);
        } else if !EMAIL.is_match(&self.email) {
            errors.push(GuestError::InvalidEmail);
        }
        if self.phone.trim().is_empty() {
            errors.push(GuestError::PhoneRequired);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(GuestErrors(errors))
        }
    }
}

/// A single problem with the guest details
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuestError {
    /// First name missing
    #[error("First name is required")]
    FirstNameRequired,
    /// Last name missing
    #[error("Last name is required")]
    LastNameRequired,
    /// Email missing
    #[error("Email is required")]
    EmailRequired,
    /// Email malformed
    #[error("Invalid email address")]
    InvalidEmail,
    /// Phone missing
    #[error("Phone number is required")]
    PhoneRequired,
}

/// All problems with the submitted guest details
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("Invalid guest details: {}", ErrorList(.0))]
pub struct GuestErrors(pub Vec<GuestError>);

struct ErrorList<'a>(&'a [GuestError]);

impl fmt::Display for ErrorList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}
