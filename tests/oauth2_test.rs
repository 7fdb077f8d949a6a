mod common;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use common::TestApp;
use entity::user;
use perfume_store::auth::oauth2::{AuthProvider, OAuth2UserInfo};
use perfume_store::services::auth::process_oauth2_login;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use serial_test::serial;

// ─── Fake provider ───────────────────────────────────────────────────────────

async fn google_userinfo(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer good-token") => Ok(Json(json!({
            "sub": "g-123",
            "email": "oauth@test.com",
            "given_name": "Olga",
            "family_name": "Auth",
        }))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Serves a userinfo endpoint on a random port and returns its URL.
async fn spawn_provider() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Router::new().route("/userinfo", get(google_userinfo));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/userinfo")
}

async fn app_with_provider() -> TestApp {
    let mut config = common::test_config();
    config.oauth2.google_userinfo_url = spawn_provider().await;
    TestApp::with_config(config).await
}

// ─── HTTP flow ───────────────────────────────────────────────────────────────

#[serial]
#[tokio::test]
async fn oauth2_login_provisions_user() {
    let app = app_with_provider().await;

    let resp = app
        .post(
            "/api/v1/auth/oauth2/google",
            None,
            json!({ "access_token": "good-token" }),
        )
        .await;
    resp.assert_status(StatusCode::OK);

    let json: Value = resp.json();
    assert_eq!(json["user"]["email"], "oauth@test.com");
    assert_eq!(json["user"]["provider"], "GOOGLE");
    assert_eq!(json["user"]["first_name"], "Olga");

    let claims = app
        .state
        .jwt
        .verify_token(json["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.role, "USER");

    // Second login reuses the account.
    app.post(
        "/api/v1/auth/oauth2/google",
        None,
        json!({ "access_token": "good-token" }),
    )
    .await
    .assert_status(StatusCode::OK);
    let count = user::Entity::find()
        .filter(user::Column::Email.eq("oauth@test.com"))
        .count(&app.state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[serial]
#[tokio::test]
async fn oauth2_login_rejects_bad_token_and_provider() {
    let app = app_with_provider().await;

    app.post(
        "/api/v1/auth/oauth2/google",
        None,
        json!({ "access_token": "stolen" }),
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    let resp = app
        .post(
            "/api/v1/auth/oauth2/myspace",
            None,
            json!({ "access_token": "good-token" }),
        )
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    app.post(
        "/api/v1/auth/oauth2/local",
        None,
        json!({ "access_token": "good-token" }),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

// ─── Service level ───────────────────────────────────────────────────────────

#[serial]
#[tokio::test]
async fn existing_account_is_updated_not_duplicated() {
    let app = TestApp::new().await;
    app.register_user("linked@test.com", common::PASSWORD, common::PASSWORD)
        .await
        .assert_status(StatusCode::OK);

    let info = OAuth2UserInfo {
        id: "42".to_string(),
        email: "linked@test.com".to_string(),
        first_name: Some("Linus".to_string()),
        last_name: Some("Hub".to_string()),
    };
    let result = process_oauth2_login(
        &app.state.db,
        &app.state.jwt,
        AuthProvider::Github,
        &info,
    )
    .await
    .unwrap();

    assert_eq!(result.user.provider, "GITHUB");
    assert_eq!(result.user.first_name.as_deref(), Some("Linus"));
    assert_eq!(result.user.last_name.as_deref(), Some("Hub"));
    // Local password survives the profile sync.
    assert!(result.user.password.is_some());
    app.login_user("linked@test.com", common::PASSWORD)
        .await
        .assert_status(StatusCode::OK);
}
