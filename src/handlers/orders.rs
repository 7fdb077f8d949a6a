use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::extract::AppJson;
use super::mapper::{OrderItemResponse, OrderResponse, Paged};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::queries::PageRequest;
use crate::error::AppError;
use crate::graphql::{self, GraphQLRequest, Scope};
use crate::services::orders::{self as order_service, OrderDetails};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub address: String,
    pub phone_number: String,
    pub post_index: String,
    /// Perfume id to quantity.
    pub perfumes_id: HashMap<i32, i32>,
}

impl OrderRequest {
    fn into_parts(self) -> Result<(OrderDetails, BTreeMap<i32, i32>), AppError> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("city", &self.city),
            ("address", &self.address),
            ("phone_number", &self.phone_number),
            ("post_index", &self.post_index),
        ];
        let missing: BTreeMap<String, String> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(k, _)| (k.to_string(), "Fill in the input field".to_string()))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::InputField(missing));
        }

        let details = OrderDetails {
            first_name: self.first_name,
            last_name: self.last_name,
            city: self.city,
            address: self.address,
            phone_number: self.phone_number,
            post_index: self.post_index,
        };
        Ok((details, self.perfumes_id.into_iter().collect()))
    }
}

/// Owners see their own orders; admins see everything. Others get a 404 so
/// order ids cannot be probed.
async fn visible_order(
    state: &AppState,
    user: &AuthenticatedUser,
    order_id: i32,
) -> Result<entity::order::Model, AppError> {
    let order = order_service::get_order_by_id(&state.db, order_id).await?;
    if order.email != user.email && !user.is_admin() {
        return Err(AppError::OrderNotFound);
    }
    Ok(order)
}

pub async fn get_user_orders(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Paged<OrderResponse>, AppError> {
    let orders = order_service::get_user_orders(&state.db, &user.email, page).await?;
    Ok(Paged::from_page(orders))
}

pub async fn get_order_by_id(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = visible_order(&state, &user, order_id).await?;
    Ok(Json(order.into()))
}

pub async fn get_order_items(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Json<Vec<OrderItemResponse>>, AppError> {
    let order = visible_order(&state, &user, order_id).await?;
    let items = order_service::get_order_items_by_order_id(&state.db, order.id).await?;
    Ok(Json(items.into_iter().map(OrderItemResponse::from).collect()))
}

pub async fn post_order(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<OrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let (details, perfumes) = req.into_parts()?;
    let order = order_service::post_order(&state.db, &user.email, details, &perfumes).await?;
    Ok(Json(order.into()))
}

pub async fn graphql_user_orders(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<GraphQLRequest>,
) -> Result<Json<Value>, AppError> {
    let scope = if user.is_admin() {
        Scope::Admin
    } else {
        Scope::User(user.email)
    };
    Ok(Json(graphql::execute(&state.db, &scope, &req).await?))
}
