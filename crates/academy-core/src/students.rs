//! Student details form: validation and submission to `POST /user-details`.

use serde::Serialize;
use thiserror::Error;

use crate::api::{ApiError, Gateway};
use crate::profile::{DOB_RE, EMAIL_RE, GENDERS, PINCODE_RE};

/// Tagged onto every submission so the backend can tell clients apart.
const SUBMISSION_SOURCE: &str = "cli";

/// A field-level validation failure. The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentFormError {
    #[error("Gender is required")]
    GenderRequired,
    #[error("Valid email is required")]
    InvalidEmail,
    #[error("Alternate mobile must be 10 digits only")]
    InvalidAltMobile,
    #[error("Address is required")]
    AddressRequired,
    #[error("Valid pincode is required")]
    InvalidPincode,
    #[error("Qualification is required")]
    QualificationRequired,
    #[error("DOB must be in dd/mm/yyyy format")]
    InvalidDob,
}

/// The student-details submission for one user.
///
/// `alt_mobile` is optional and sent as `null` when absent; everything else
/// is required.
#[derive(Debug, Clone, Serialize)]
pub struct StudentDetails {
    pub user_id: u64,
    pub gender: String,
    pub alt_mobile: Option<String>,
    pub alt_email: String,
    pub address: String,
    pub pincode: String,
    pub qualification: String,
    pub dob: String,
}

impl StudentDetails {
    /// Checks every field, reporting the first failure in display order.
    ///
    /// # Errors
    /// Returns the failing field's user-facing message.
    pub fn validate(&self) -> Result<(), StudentFormError> {
        if !GENDERS.contains(&self.gender.as_str()) {
            return Err(StudentFormError::GenderRequired);
        }
        if !EMAIL_RE.is_match(self.alt_email.trim()) {
            return Err(StudentFormError::InvalidEmail);
        }
        if let Some(mobile) = &self.alt_mobile {
            if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
                return Err(StudentFormError::InvalidAltMobile);
            }
        }
        if self.address.trim().is_empty() {
            return Err(StudentFormError::AddressRequired);
        }
        if !PINCODE_RE.is_match(&self.pincode) {
            return Err(StudentFormError::InvalidPincode);
        }
        if self.qualification.trim().is_empty() {
            return Err(StudentFormError::QualificationRequired);
        }
        if !DOB_RE.is_match(&self.dob) {
            return Err(StudentFormError::InvalidDob);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn sample(user_id: u64) -> Self {
        Self {
            user_id,
            gender: "Female".to_string(),
            alt_mobile: None,
            alt_email: "parent@x.com".to_string(),
            address: "12 MG Road, Pune".to_string(),
            pincode: "411001".to_string(),
            qualification: "Class 8".to_string(),
            dob: "14/03/2012".to_string(),
        }
    }
}

#[derive(Serialize)]
struct AdditionalField {
    source: &'static str,
}

#[derive(Serialize)]
struct SavePayload<'a> {
    #[serde(flatten)]
    details: &'a StudentDetails,
    additional_field: AdditionalField,
}

/// Saves student details. Validation failures never reach the gateway.
///
/// # Errors
/// Returns the failing field's message, or the classified API failure.
pub async fn save(gateway: &Gateway, details: &StudentDetails) -> Result<(), SaveError> {
    details.validate()?;

    let _: serde_json::Value = gateway
        .post_json(
            "/user-details",
            &SavePayload {
                details,
                additional_field: AdditionalField {
                    source: SUBMISSION_SOURCE,
                },
            },
            None,
        )
        .await?;
    Ok(())
}

/// Student save failure.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{0}")]
    Invalid(#[from] StudentFormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
