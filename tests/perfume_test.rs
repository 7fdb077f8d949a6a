mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::Value;
use serial_test::serial;

fn titles(json: &Value) -> Vec<String> {
    let items = json.get("items").unwrap_or(json);
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["perfume_title"].as_str().unwrap().to_string())
        .collect()
}

#[serial]
#[tokio::test]
async fn catalog_is_public_and_paginated() {
    let app = TestApp::new().await;
    app.admin_token().await;

    let resp = app.get("/api/v1/perfumes?per_page=3", None).await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(resp.headers["page-total-count"], "4");
    let json: Value = resp.json();
    assert_eq!(json["items"].as_array().unwrap().len(), 3);

    let id = json["items"][0]["id"].as_i64().unwrap();
    let resp = app.get(&format!("/api/v1/perfumes/{id}"), None).await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(resp.json::<Value>()["perfume_title"], "Aventus");

    app.get("/api/v1/perfumes/9999", None)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[serial]
#[tokio::test]
async fn search_by_filter() {
    let app = TestApp::new().await;
    app.admin_token().await;

    let resp = app
        .post(
            "/api/v1/perfumes/search",
            None,
            serde_json::json!({ "genders": ["female"], "sort_by_price": true }),
        )
        .await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(titles(&resp.json()), vec!["Black Opium", "Chanel No 5"]);

    let resp = app
        .post(
            "/api/v1/perfumes/search",
            None,
            serde_json::json!({ "prices": [320, 100], "perfumers": ["Creed", "Hermes"] }),
        )
        .await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(titles(&resp.json()), vec!["Aventus", "Terre d'Hermes"]);

    // No criteria returns the whole catalog.
    let resp = app
        .post("/api/v1/perfumes/search", None, serde_json::json!({}))
        .await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(resp.json::<Value>()["total"], 4);
}

#[serial]
#[tokio::test]
async fn search_by_gender_and_perfumer() {
    let app = TestApp::new().await;
    app.admin_token().await;

    let resp = app
        .post(
            "/api/v1/perfumes/search/gender",
            None,
            serde_json::json!({ "perfume_gender": "male" }),
        )
        .await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(titles(&resp.json()), vec!["Aventus", "Terre d'Hermes"]);

    let resp = app
        .post(
            "/api/v1/perfumes/search/perfumer",
            None,
            serde_json::json!({ "perfumer": "Chanel" }),
        )
        .await;
    resp.assert_status(StatusCode::OK);
    assert_eq!(titles(&resp.json()), vec!["Chanel No 5"]);

    app.post(
        "/api/v1/perfumes/search/perfumer",
        None,
        serde_json::json!({}),
    )
    .await
    .assert_status(StatusCode::BAD_REQUEST);
}

#[serial]
#[tokio::test]
async fn admin_adds_perfume() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let user = app.user_token("shopper@test.com").await;

    let body = serde_json::json!({
        "perfume_title": "Gamma",
        "perfumer": "Maison G",
        "perfume_gender": "unisex",
        "price": 80,
    });

    app.post("/api/v1/admin/perfumes", Some(&user), body.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let resp = app.post("/api/v1/admin/perfumes", Some(&admin), body).await;
    resp.assert_status(StatusCode::OK);
    let json: Value = resp.json();
    assert_eq!(json["perfume_title"], "Gamma");
    assert_eq!(json["price"], 80);
    assert!(json["year"].is_null());

    let resp = app
        .post(
            "/api/v1/admin/perfumes",
            Some(&admin),
            serde_json::json!({
                "perfume_title": "Free",
                "perfumer": "Maison G",
                "perfume_gender": "unisex",
                "price": 0,
            }),
        )
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert!(resp.json::<Value>()["fields"]["price"].is_string());
}

#[serial]
#[tokio::test]
async fn oversized_page_is_rejected() {
    let app = TestApp::new().await;
    app.admin_token().await;

    let resp = app
        .get(
            "/api/v1/perfumes?page=18446744073709551615&per_page=100",
            None,
        )
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert!(resp.json::<Value>()["fields"]["page"].is_string());

    app.get("/api/v1/perfumes?page=1000000&per_page=100", None)
        .await
        .assert_status(StatusCode::OK);
}
