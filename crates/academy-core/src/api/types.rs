//! Wire types for the academy backend.
//!
//! The backend speaks camelCase JSON; error bodies carry `{message}`.

use serde::{Deserialize, Serialize};

/// The logged-in user as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    /// A profile is complete iff both name and email are non-empty.
    pub fn profile_complete(&self) -> bool {
        has_value(self.name.as_deref()) && has_value(self.email.as_deref())
    }
}

fn has_value(field: Option<&str>) -> bool {
    field.is_some_and(|s| !s.trim().is_empty())
}

#[derive(Debug, Serialize)]
pub struct SendOtpRequest<'a> {
    pub phone: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub phone: &'a str,
    pub code: &'a str,
}

/// `POST /verify-otp` success payload.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOtpResponse {
    pub token: String,
    pub user: UserProfile,
}

/// `GET /dashboard` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardData {
    pub total_students: u32,
    pub total_teachers: u32,
    pub today_attendance: f64,
    pub pending_fees: i64,
    pub upcoming_exams: u32,
    pub recent_admissions: u32,
    pub name: String,
}

/// A user row from the management endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedUser {
    pub id: String,
    pub phone: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub active: bool,
}

/// `POST /add-users` body.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: profile completeness requires both name and email non-empty.
    #[test]
    fn test_profile_complete() {
        let mut user = UserProfile {
            id: "u1".to_string(),
            phone: "9876543210".to_string(),
            name: None,
            email: None,
        };
        assert!(!user.profile_complete());

        user.name = Some("Asha".to_string());
        assert!(!user.profile_complete());

        user.email = Some("  ".to_string());
        assert!(!user.profile_complete());

        user.email = Some("asha@x.com".to_string());
        assert!(user.profile_complete());
    }

    /// Test: dashboard payload decodes from the backend's camelCase shape.
    #[test]
    fn test_dashboard_decodes_camel_case() {
        let data: DashboardData = serde_json::from_value(serde_json::json!({
            "totalStudents": 412,
            "totalTeachers": 28,
            "todayAttendance": 91.5,
            "pendingFees": 152000,
            "upcomingExams": 3,
            "recentAdmissions": 12,
            "name": "Asha"
        }))
        .unwrap();

        assert_eq!(data.total_students, 412);
        assert_eq!(data.name, "Asha");
    }

    /// Test: missing dashboard fields fall back to defaults.
    #[test]
    fn test_dashboard_missing_fields_default() {
        let data: DashboardData =
            serde_json::from_value(serde_json::json!({"totalStudents": 10})).unwrap();
        assert_eq!(data.total_students, 10);
        assert_eq!(data.upcoming_exams, 0);
        assert_eq!(data.name, "");
    }

    /// Test: user profile tolerates absent optional fields.
    #[test]
    fn test_user_profile_optional_fields() {
        let user: UserProfile =
            serde_json::from_value(serde_json::json!({"id": "u1", "phone": "9876543210"}))
                .unwrap();
        assert_eq!(user.name, None);
        assert!(!user.profile_complete());
    }
}
