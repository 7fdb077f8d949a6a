mod common;

use axum::http::StatusCode;
use common::{TestApp, ADMIN_EMAIL, PASSWORD};
use serial_test::serial;

// ─── Login ───────────────────────────────────────────────────────────────────

#[serial]
#[tokio::test]
async fn login_returns_token_with_primary_role() {
    let app = TestApp::new().await;
    app.register_user("alice@test.com", PASSWORD, PASSWORD)
        .await
        .assert_status(StatusCode::OK);

    let resp = app.login_user("alice@test.com", PASSWORD).await;
    resp.assert_status(StatusCode::OK);

    let json: serde_json::Value = resp.json();
    assert_eq!(json["user"]["email"], "alice@test.com");
    assert_eq!(json["user"]["roles"], serde_json::json!(["USER"]));
    assert!(json["user"].get("password").is_none());

    let claims = app
        .state
        .jwt
        .verify_token(json["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, "alice@test.com");
    assert_eq!(claims.role, "USER");
}

#[serial]
#[tokio::test]
async fn admin_token_carries_admin_role() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let claims = app.state.jwt.verify_token(&token).unwrap();
    assert_eq!(claims.sub, ADMIN_EMAIL);
    assert_eq!(claims.role, "ADMIN");
}

#[serial]
#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new().await;
    app.register_user("bob@test.com", PASSWORD, PASSWORD)
        .await
        .assert_status(StatusCode::OK);

    let wrong_pw = app.login_user("bob@test.com", "not-the-one").await;
    wrong_pw.assert_status(StatusCode::FORBIDDEN);

    let unknown = app.login_user("ghost@test.com", PASSWORD).await;
    unknown.assert_status(StatusCode::FORBIDDEN);

    assert_eq!(wrong_pw.text(), unknown.text());
    assert_eq!(wrong_pw.message(), "Incorrect password or email");
}

// ─── Bearer tokens ───────────────────────────────────────────────────────────

#[serial]
#[tokio::test]
async fn profile_requires_token() {
    let app = TestApp::new().await;

    app.get("/api/v1/users/me", None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.get("/api/v1/users/me", Some("garbage"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = app.user_token("carol@test.com").await;
    let resp = app.get("/api/v1/users/me", Some(&token)).await;
    resp.assert_status(StatusCode::OK);
    let json: serde_json::Value = resp.json();
    assert_eq!(json["email"], "carol@test.com");
    assert_eq!(json["first_name"], "Test");
    assert_eq!(json["provider"], "LOCAL");
}

#[serial]
#[tokio::test]
async fn update_password_for_current_user() {
    let app = TestApp::new().await;
    let token = app.user_token("dave@test.com").await;

    let resp = app
        .send(
            "PUT",
            "/api/v1/auth/edit/password",
            Some(&token),
            Some(serde_json::json!({ "password": "newpass1", "password2": "other1" })),
        )
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), "Passwords do not match.");

    let resp = app
        .send(
            "PUT",
            "/api/v1/auth/edit/password",
            Some(&token),
            Some(serde_json::json!({ "password": "newpass1", "password2": "newpass1" })),
        )
        .await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(resp.message(), "Password successfully changed!");

    app.login_user("dave@test.com", PASSWORD)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.login_user("dave@test.com", "newpass1")
        .await
        .assert_status(StatusCode::OK);
}

#[serial]
#[tokio::test]
async fn admin_routes_reject_plain_users() {
    let app = TestApp::new().await;
    let token = app.user_token("eve@test.com").await;

    app.get("/api/v1/admin/orders", Some(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    app.get("/api/v1/admin/orders", None)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ─── Rate limiting ───────────────────────────────────────────────────────────

#[serial]
#[tokio::test]
async fn login_is_rate_limited_per_client() {
    let mut config = common::test_config();
    config.auth_rate_limit_per_minute = 2;
    let app = TestApp::with_config(config).await;

    for _ in 0..2 {
        app.login_user("nobody@test.com", PASSWORD)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    let resp = app.login_user("nobody@test.com", PASSWORD).await;
    resp.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers.get("retry-after").is_some());

    // Routes outside the credential group are not limited.
    app.get("/health", None).await.assert_status(StatusCode::OK);
}
