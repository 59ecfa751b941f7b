//! User management calls (authenticated area).

use crate::api::types::{ManagedUser, NewUser};
use crate::api::{ApiError, Gateway};

/// Lists all managed users.
///
/// # Errors
/// Returns the classified failure.
pub async fn list(gateway: &Gateway) -> Result<Vec<ManagedUser>, ApiError> {
    gateway.get_json("/users", None).await
}

/// Fetches one user by id.
///
/// # Errors
/// Returns the classified failure.
pub async fn details(gateway: &Gateway, id: &str) -> Result<ManagedUser, ApiError> {
    gateway.get_json(&format!("/users/{id}"), None).await
}

/// Toggles a user's active flag, returning the updated row.
///
/// # Errors
/// Returns the classified failure.
pub async fn toggle_status(gateway: &Gateway, id: &str) -> Result<ManagedUser, ApiError> {
    gateway
        .post_json(
            &format!("/users/{id}/toggle-status"),
            &serde_json::json!({}),
            None,
        )
        .await
}

/// Registers a new user.
///
/// # Errors
/// Returns the classified failure.
pub async fn add(gateway: &Gateway, user: &NewUser) -> Result<ManagedUser, ApiError> {
    gateway.post_json("/add-users", user, None).await
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::TokenCell;

    fn gateway_for(server: &MockServer) -> Gateway {
        let cell = TokenCell::new();
        cell.set(Some("tok".to_string()));
        Gateway::new(server.uri(), cell)
    }

    /// Test: listing decodes user rows, absent fields included.
    #[tokio::test]
    async fn test_list_users() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "u1", "phone": "9876543210", "name": "Asha", "role": "teacher", "active": true},
                {"id": "u2", "phone": "9123456780"}
            ])))
            .mount(&server)
            .await;

        let users = list(&gateway_for(&server)).await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].role.as_deref(), Some("teacher"));
        assert!(!users[1].active);
    }

    /// Test: toggling hits the per-user endpoint and returns the new state.
    #[tokio::test]
    async fn test_toggle_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/u1/toggle-status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
                {"id": "u1", "phone": "9876543210", "active": false}
            )))
            .mount(&server)
            .await;

        let user = toggle_status(&gateway_for(&server), "u1").await.unwrap();
        assert!(!user.active);
    }

    /// Test: adding serializes only the fields that are set.
    #[tokio::test]
    async fn test_add_user_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/add-users"))
            .and(body_json(serde_json::json!(
                {"name": "Ravi", "phone": "9123456780", "role": "accountant"}
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(
                {"id": "u9", "phone": "9123456780", "name": "Ravi", "role": "accountant", "active": true}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let user = add(
            &gateway_for(&server),
            &NewUser {
                name: "Ravi".to_string(),
                phone: "9123456780".to_string(),
                email: None,
                role: Some("accountant".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.id, "u9");
    }
}
