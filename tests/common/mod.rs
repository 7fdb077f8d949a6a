#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use perfume_store::config::{Config, LogFormat, OAuth2Config};
use perfume_store::routes::create_router;
use perfume_store::AppState;
use sea_orm::Database;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const PASSWORD: &str = "password1";

// ─── TestResponse ────────────────────────────────────────────────────────────

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    body_bytes: Vec<u8>,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes).to_string()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body_bytes).unwrap_or_else(|e| {
            panic!(
                "Failed to deserialize response as {}: {e}\nBody: {}",
                std::any::type_name::<T>(),
                self.text()
            )
        })
    }

    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status, expected,
            "Expected status {expected}, got {}. Body: {}",
            self.status,
            self.text()
        );
    }

    pub fn message(&self) -> String {
        let json: Value = self.json();
        json["message"].as_str().unwrap_or_default().to_string()
    }
}

// ─── TestApp ─────────────────────────────────────────────────────────────────

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: "test-secret-for-perfume-store".to_string(),
        jwt_issuer: "perfume-store-test".to_string(),
        jwt_expiry_secs: 3600,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cors_allowed_origins: "http://localhost:3000".to_string(),
        hostname: "localhost:3000".to_string(),
        auth_rate_limit_per_minute: 1000,
        log_format: LogFormat::Pretty,
        oauth2: OAuth2Config::default(),
    }
}

pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = Database::connect(&config.database_url)
            .await
            .expect("Failed to connect to in-memory SQLite");

        migration::Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(db, config);
        let router = create_router(state.clone());

        Self { router, state }
    }

    pub async fn request(&self, req: Request<Body>) -> TestResponse {
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot failed");

        let status = resp.status();
        let headers = resp.headers().clone();
        let body_bytes = resp
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body_bytes,
        }
    }

    /// Sends `body` as JSON, with a Bearer token when one is given.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(req).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send("POST", uri, token, Some(body)).await
    }

    // ── Auth helpers ─────────────────────────────────────────────────────

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        password2: &str,
    ) -> TestResponse {
        self.post(
            "/api/v1/registration",
            None,
            serde_json::json!({
                "email": email,
                "password": password,
                "password2": password2,
                "first_name": "Test",
                "last_name": "User",
            }),
        )
        .await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/api/v1/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Registers `email` with the default password and returns its token.
    pub async fn user_token(&self, email: &str) -> String {
        self.register_user(email, PASSWORD, PASSWORD)
            .await
            .assert_status(StatusCode::OK);
        let resp = self.login_user(email, PASSWORD).await;
        resp.assert_status(StatusCode::OK);
        let json: Value = resp.json();
        json["token"].as_str().unwrap().to_string()
    }

    /// Seeds the admin account and starter catalog, returns an admin token.
    pub async fn admin_token(&self) -> String {
        perfume_store::seed::bootstrap(&self.state.db, ADMIN_EMAIL, Some(PASSWORD))
            .await
            .expect("seed failed");
        let resp = self.login_user(ADMIN_EMAIL, PASSWORD).await;
        resp.assert_status(StatusCode::OK);
        let json: Value = resp.json();
        json["token"].as_str().unwrap().to_string()
    }

    // ── Catalog helpers ──────────────────────────────────────────────────

    pub async fn create_perfume(
        &self,
        admin_token: &str,
        title: &str,
        perfumer: &str,
        price: i32,
    ) -> i32 {
        let resp = self
            .post(
                "/api/v1/admin/perfumes",
                Some(admin_token),
                serde_json::json!({
                    "perfume_title": title,
                    "perfumer": perfumer,
                    "year": 2020,
                    "country": "France",
                    "perfume_gender": "unisex",
                    "price": price,
                    "volume": "50",
                    "perfume_type": "Eau de Parfum",
                }),
            )
            .await;
        resp.assert_status(StatusCode::OK);
        let json: Value = resp.json();
        json["id"].as_i64().unwrap() as i32
    }

    pub async fn place_order(&self, token: &str, perfumes: Value) -> TestResponse {
        self.post(
            "/api/v1/orders",
            Some(token),
            serde_json::json!({
                "first_name": "Jane",
                "last_name": "Doe",
                "city": "Paris",
                "address": "1 Rue de Rivoli",
                "phone_number": "+33100000000",
                "post_index": "75001",
                "perfumes_id": perfumes,
            }),
        )
        .await
    }
}
