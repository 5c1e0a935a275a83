//! Integration tests for registration, login, and the token gate.

use http::StatusCode;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_register_and_login() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("register");

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": email,
                "password": "Password123",
                "first_name": "Aiko",
                "last_name": "Tanaka",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["email"], email.as_str());
    assert_eq!(response.body["first_name"], "Aiko");
    assert_eq!(response.body["status"], "active");
    assert!(
        response.body.get("password_hash").is_none(),
        "password hash must never be serialized"
    );

    let token = app.login(&email, "Password123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("dup");
    app.register_and_login(&email, "Password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": email,
                "password": "Password123",
                "first_name": "Second",
                "last_name": "Copy",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Email already registered");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let Some(app) = TestApp::spawn().await else { return };

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": helpers::unique_email("weak"),
                "password": "password",
                "first_name": "Weak",
                "last_name": "Password",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let Some(app) = TestApp::spawn().await else { return };

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(serde_json::json!({
                "email": "not-an-email",
                "password": "Password123",
                "first_name": "Bad",
                "last_name": "Email",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("wrongpw");
    app.register_and_login(&email, "Password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": email,
                "password": "Password456",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Incorrect email or password");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let Some(app) = TestApp::spawn().await else { return };

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": helpers::unique_email("nobody"),
                "password": "Password123",
            })),
            None,
        )
        .await;

    // Same status and message as a bad password, so the response does not
    // reveal which emails are registered.
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Incorrect email or password");
}

#[tokio::test]
async fn test_token_form_grant() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("oauth");
    app.register_and_login(&email, "Password123").await;

    let response = app
        .request_form(
            "/api/auth/token",
            &[("username", email.as_str()), ("password", "Password123")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body.get("access_token").is_some());
    assert_eq!(response.body["token_type"], "bearer");
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("me");
    let token = app.register_and_login(&email, "Password123").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], email.as_str());
}

#[tokio::test]
async fn test_me_without_token() {
    let Some(app) = TestApp::spawn().await else { return };

    let (status, headers, _) = app.request_raw("GET", "/api/auth/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        headers
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let Some(app) = TestApp::spawn().await else { return };

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-real-token"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_inactive_account_is_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("inactive");
    let token = app.register_and_login(&email, "Password123").await;

    sqlx::query("UPDATE users SET status = 'inactive' WHERE email = $1")
        .bind(&email)
        .execute(&app.db_pool)
        .await
        .expect("Failed to deactivate user");

    // Existing tokens stop working, with a Forbidden rather than the
    // Unauthorized a missing token gets.
    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Inactive user account");

    // Fresh logins are refused outright.
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": email,
                "password": "Password123",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Account is not active");
}

#[tokio::test]
async fn test_logout_is_advisory() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("logout");
    let token = app.register_and_login(&email, "Password123").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Successfully logged out");

    // Tokens are stateless; the gate still accepts it until expiry.
    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_rotates_credentials() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("rotate");
    let token = app.register_and_login(&email, "Password123").await;

    let response = app
        .request(
            "POST",
            "/api/users/me/change-password",
            Some(serde_json::json!({
                "current_password": "Password123",
                "new_password": "Password456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "Password changed successfully");

    // Old password no longer works, new one does.
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({"email": email, "password": "Password123"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    app.login(&email, "Password456").await;
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = helpers::unique_email("wrongcur");
    let token = app.register_and_login(&email, "Password123").await;

    let response = app
        .request(
            "POST",
            "/api/users/me/change-password",
            Some(serde_json::json!({
                "current_password": "Password999",
                "new_password": "Password456",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Current password is incorrect");
}
