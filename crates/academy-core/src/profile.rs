//! Profile completion form: field validation and date entry formatting.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub(crate) static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

pub(crate) static DOB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/\d{4}$").expect("dob regex is valid")
});

pub(crate) static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("pincode regex is valid"));

pub const GENDERS: [&str; 3] = ["Male", "Female", "Others"];

/// A field-level validation failure. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileFormError {
    #[error("Name is required")]
    NameRequired,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Select a gender")]
    InvalidGender,
    #[error("Address is required")]
    AddressRequired,
    #[error("Pincode must be 6 digits")]
    InvalidPincode,
    #[error("Qualification is required")]
    QualificationRequired,
    #[error("Date of birth must be DD/MM/YYYY")]
    InvalidDob,
}

/// The profile-completion submission.
///
/// Serializes directly as the `POST /complete-profile` body.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub address: String,
    pub pincode: String,
    pub qualification: String,
    pub dob: String,
}

impl ProfileForm {
    /// Checks every field, reporting the first failure in display order.
    ///
    /// # Errors
    /// Returns the failing field's user-facing message.
    pub fn validate(&self) -> Result<(), ProfileFormError> {
        if self.name.trim().is_empty() {
            return Err(ProfileFormError::NameRequired);
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ProfileFormError::InvalidEmail);
        }
        if !GENDERS.contains(&self.gender.as_str()) {
            return Err(ProfileFormError::InvalidGender);
        }
        if self.address.trim().is_empty() {
            return Err(ProfileFormError::AddressRequired);
        }
        if !PINCODE_RE.is_match(&self.pincode) {
            return Err(ProfileFormError::InvalidPincode);
        }
        if self.qualification.trim().is_empty() {
            return Err(ProfileFormError::QualificationRequired);
        }
        if !DOB_RE.is_match(&self.dob) {
            return Err(ProfileFormError::InvalidDob);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn sample(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            gender: "Female".to_string(),
            address: "12 MG Road, Pune".to_string(),
            pincode: "411001".to_string(),
            qualification: "B.Ed".to_string(),
            dob: "14/03/1990".to_string(),
        }
    }
}

/// Formats raw date input into `DD/MM/YYYY` as the user types.
///
/// Non-digits are stripped, slashes inserted after the day and month groups,
/// and input beyond eight digits discarded.
pub fn format_dob(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(8).collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}/{}", &digits[..2], &digits[2..]),
        _ => format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}
