//! Integration tests for login/logout commands.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn verify_response(token: &str, name: Option<&str>, email: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "token": token,
        "user": {
            "id": "u1",
            "phone": "9876543210",
            "name": name,
            "email": email
        }
    })
}

/// Test: full OTP login persists the token to auth.json.
#[tokio::test]
async fn test_login_stores_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-otp"))
        .and(body_json(serde_json::json!({"phone": "9876543210"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify-otp"))
        .and(body_json(
            serde_json::json!({"phone": "9876543210", "code": "482913"}),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(verify_response("tok-1", Some("Asha"), Some("asha@x.com"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp = tempdir().unwrap();
    cargo_bin_cmd!("academy")
        .env("ACADEMY_HOME", temp.path())
        .env("ACADEMY_BASE_URL", mock_server.uri())
        .arg("login")
        .write_stdin("9876543210\n482913\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in. Welcome, Asha."));

    let contents = fs::read_to_string(temp.path().join("auth.json")).unwrap();
    assert!(contents.contains("tok-1"), "Token should be in auth.json");
}

/// Test: a wrong code shows the backend's message and allows a retry within
/// the same login.
#[tokio::test]
async fn test_login_retries_after_invalid_otp() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify-otp"))
        .and(body_json(
            serde_json::json!({"phone": "9876543210", "code": "000000"}),
        ))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"message": "Invalid OTP"})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify-otp"))
        .and(body_json(
            serde_json::json!({"phone": "9876543210", "code": "482913"}),
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(verify_response("tok-2", Some("Asha"), None)),
        )
        .mount(&mock_server)
        .await;

    let temp = tempdir().unwrap();
    cargo_bin_cmd!("academy")
        .env("ACADEMY_HOME", temp.path())
        .env("ACADEMY_BASE_URL", mock_server.uri())
        .arg("login")
        .write_stdin("9876543210\n000000\n482913\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid OTP (1 failed attempts)"))
        .stdout(predicate::str::contains("Logged in."));
}

/// Test: an incomplete profile is pointed at `profile complete` after login.
#[tokio::test]
async fn test_login_hints_incomplete_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify-otp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(verify_response("tok-3", None, None)),
        )
        .mount(&mock_server)
        .await;

    let temp = tempdir().unwrap();
    cargo_bin_cmd!("academy")
        .env("ACADEMY_HOME", temp.path())
        .env("ACADEMY_BASE_URL", mock_server.uri())
        .arg("login")
        .write_stdin("9876543210\n482913\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile is incomplete"));
}

/// Test: logout clears the persisted token.
#[tokio::test]
async fn test_logout_clears_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let temp = tempdir().unwrap();
    fs::write(temp.path().join("auth.json"), r#"{"token": "tok-1"}"#).unwrap();

    cargo_bin_cmd!("academy")
        .env("ACADEMY_HOME", temp.path())
        .env("ACADEMY_BASE_URL", mock_server.uri())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!temp.path().join("auth.json").exists());
}

/// Test: logout without a session shows a message, not an error.
#[test]
fn test_logout_when_not_logged_in() {
    let temp = tempdir().unwrap();

    cargo_bin_cmd!("academy")
        .env("ACADEMY_HOME", temp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session."));
}

/// Test: login while a session exists refuses instead of stacking tokens.
#[test]
fn test_login_refuses_when_already_logged_in() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("auth.json"), r#"{"token": "tok-1"}"#).unwrap();

    cargo_bin_cmd!("academy")
        .env("ACADEMY_HOME", temp.path())
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Already logged in"));
}
