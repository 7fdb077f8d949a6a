use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::extract::AppJson;
use super::mapper::{MessageResponse, OrderResponse, Paged, PerfumeResponse};
use crate::auth::middleware::AdminAuth;
use crate::db::queries::PageRequest;
use crate::error::AppError;
use crate::graphql::{self, GraphQLRequest, Scope};
use crate::services::orders as order_service;
use crate::services::perfumes::{self as perfume_service, NewPerfume};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PerfumeRequest {
    pub perfume_title: String,
    pub perfumer: String,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub perfume_gender: String,
    pub fragrance_top_notes: Option<String>,
    pub fragrance_middle_notes: Option<String>,
    pub fragrance_base_notes: Option<String>,
    pub price: i32,
    pub volume: Option<String>,
    pub perfume_type: Option<String>,
}

impl From<PerfumeRequest> for NewPerfume {
    fn from(req: PerfumeRequest) -> Self {
        NewPerfume {
            perfume_title: req.perfume_title,
            perfumer: req.perfumer,
            year: req.year,
            country: req.country,
            perfume_gender: req.perfume_gender,
            fragrance_top_notes: req.fragrance_top_notes,
            fragrance_middle_notes: req.fragrance_middle_notes,
            fragrance_base_notes: req.fragrance_base_notes,
            price: req.price,
            volume: req.volume,
            perfume_type: req.perfume_type,
        }
    }
}

pub async fn get_all_orders(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Paged<OrderResponse>, AppError> {
    let orders = order_service::get_all_orders(&state.db, page).await?;
    Ok(Paged::from_page(orders))
}

pub async fn get_user_orders_by_email(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(page): Query<PageRequest>,
) -> Result<Paged<OrderResponse>, AppError> {
    let orders = order_service::get_user_orders(&state.db, &email, page).await?;
    Ok(Paged::from_page(orders))
}

pub async fn delete_order(
    admin: AdminAuth,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = order_service::delete_order(&state.db, order_id).await?;
    tracing::info!(order_id, admin = %admin.email, "order removed by admin");
    Ok(Json(message.into()))
}

pub async fn graphql_orders(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppJson(req): AppJson<GraphQLRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(graphql::execute(&state.db, &Scope::Admin, &req).await?))
}

pub async fn add_perfume(
    _admin: AdminAuth,
    State(state): State<AppState>,
    AppJson(req): AppJson<PerfumeRequest>,
) -> Result<Json<PerfumeResponse>, AppError> {
    let perfume = perfume_service::add_perfume(&state.db, req.into()).await?;
    Ok(Json(perfume.into()))
}
