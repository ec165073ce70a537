mod common;

use axum::http::{Method, StatusCode};
use common::{login_admin, send, test_app};
use serde_json::json;

#[tokio::test]
async fn login_returns_session_and_sanitized_user() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "password" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["expiresIn"], 30 * 60);
    assert!(!body["token"].as_str().unwrap().is_empty());

    let user = &body["user"];
    assert_eq!(user["email"], "admin@example.com");
    assert_eq!(user["role"], "admin");
    assert_eq!(user["permissions"].as_array().unwrap().len(), 13);
    assert!(user["lastLogin"].is_string());
    // The hash never crosses the wire.
    assert!(user.get("passwordHash").is_none());
}

#[tokio::test]
async fn remember_me_extends_session_expiry() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({
            "email": "admin@example.com",
            "password": "password",
            "rememberMe": true
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expiresIn"], 14 * 24 * 60 * 60);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let (app, _) = test_app().await;

    for (email, password) in [
        ("admin@example.com", "wrong-password"),
        ("nobody@example.com", "password"),
    ] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn malformed_login_input_is_unprocessable() {
    let (app, _) = test_app().await;

    // Empty email
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "email is required");

    // Malformed email
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn registration_creates_account_without_session() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "jane@example.com",
            "password": "Str0ngPass",
            "confirmPassword": "Str0ngPass",
            "firstName": "Jane",
            "lastName": "Doe"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["userId"].is_string());
    // No token in the response: the caller signs in explicitly.
    assert!(body.get("token").is_none());

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "Str0ngPass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user");
    assert_eq!(body["user"]["permissions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn registration_input_errors_map_to_their_statuses() {
    let (app, _) = test_app().await;

    // Password mismatch is a domain validation error.
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "a@example.com",
            "password": "Str0ngPass",
            "confirmPassword": "Different1",
            "firstName": "A",
            "lastName": "B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The passwords do not match");

    // Weak password is a format error.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "a@example.com",
            "password": "weakpass",
            "confirmPassword": "weakpass",
            "firstName": "A",
            "lastName": "B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Missing name fields.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "a@example.com",
            "password": "Str0ngPass",
            "confirmPassword": "Str0ngPass",
            "firstName": "",
            "lastName": "B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Duplicate email.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": "admin@example.com",
            "password": "Str0ngPass",
            "confirmPassword": "Str0ngPass",
            "firstName": "A",
            "lastName": "B"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let (app, _) = test_app().await;
    let token = login_admin(&app).await;

    let (status, _) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    // The revoked token no longer opens anything.
    let (status, _) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _) = test_app().await;

    for uri in ["/users/me", "/navigation", "/api-keys", "/audit-events"] {
        let (status, _) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _) = send(&app, Method::GET, "/users/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_me_returns_the_current_user() {
    let (app, _) = test_app().await;
    let token = login_admin(&app).await;

    let (status, body) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "admin@example.com");
    assert_eq!(body["firstName"], "Admin");
    assert!(body["isActive"].as_bool().unwrap());
}

#[tokio::test]
async fn password_reset_round_trip_over_http() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/reset-password",
        None,
        Some(json!({ "email": "admin@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reset_token = body["resetToken"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/update-password",
        None,
        Some(json!({
            "token": reset_token.clone(),
            "password": "Fresh1Password",
            "confirmPassword": "Fresh1Password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@example.com", "password": "Fresh1Password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The consumed token cannot reset the password a second time.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/update-password",
        None,
        Some(json!({
            "token": reset_token,
            "password": "Second2Password",
            "confirmPassword": "Second2Password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reset_for_unknown_email_reveals_nothing() {
    let (app, _) = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/reset-password",
        None,
        Some(json!({ "email": "nobody@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("resetToken").is_none());
}

#[tokio::test]
async fn update_password_error_mapping() {
    let (app, _) = test_app().await;

    // Mismatch wins over everything else.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/update-password",
        None,
        Some(json!({
            "token": "whatever",
            "password": "Fresh1Password",
            "confirmPassword": "Other1Password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A garbage token is unauthorized.
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/update-password",
        None,
        Some(json!({
            "token": "garbage",
            "password": "Fresh1Password",
            "confirmPassword": "Fresh1Password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A session token is not a reset token.
    let token = login_admin(&app).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/update-password",
        None,
        Some(json!({
            "token": token,
            "password": "Fresh1Password",
            "confirmPassword": "Fresh1Password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
