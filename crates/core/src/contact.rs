//! Contact inquiry submitted from the public site.
//!
//! Inquiries are transient: validated, relayed, then dropped. The two
//! validation flavours share the predicates of [`crate::validation`] and only
//! differ in how they treat the phone number: the interactive form lets it be
//! blank, the server relay requires it.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_email, validate_phone};

/// A contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInquiry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// First rule an inquiry breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactViolation {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Invalid phone number format. Please include the country code, e.g. +33 6 12 34 56 78")]
    InvalidPhone,
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl ContactInquiry {
    fn missing_required(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .into_iter()
            .any(|f| is_blank(f))
    }

    /// Checks run while the visitor fills the form. A blank phone is allowed.
    pub fn validate_client(&self) -> Result<(), ContactViolation> {
        if self.missing_required() {
            return Err(ContactViolation::MissingFields);
        }
        if !validate_email(&self.email) {
            return Err(ContactViolation::InvalidEmail);
        }
        if !is_blank(&self.phone) && !validate_phone(&self.phone) {
            return Err(ContactViolation::InvalidPhone);
        }
        Ok(())
    }

    /// Checks run by the relay on every request, whatever the client did.
    /// A blank phone fails as `InvalidPhone`.
    pub fn validate_server(&self) -> Result<(), ContactViolation> {
        if self.missing_required() {
            return Err(ContactViolation::MissingFields);
        }
        if !validate_email(&self.email) {
            return Err(ContactViolation::InvalidEmail);
        }
        if !validate_phone(&self.phone) {
            return Err(ContactViolation::InvalidPhone);
        }
        Ok(())
    }
}
