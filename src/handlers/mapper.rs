//! DTOs exposed over HTTP and their conversions from service models.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::{order, perfume, user};
use serde::Serialize;

use crate::auth::roles::decode_roles;
use crate::db::queries::Page;
use crate::error::AppError;
use crate::services::auth::LoginResult;
use crate::services::orders::{OrderItemView, OrderWithItems};

pub const PAGE_TOTAL_COUNT: &str = "page-total-count";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl From<&str> for MessageResponse {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub post_index: Option<String>,
    pub provider: String,
    pub roles: Vec<String>,
    pub active: bool,
}

impl TryFrom<user::Model> for UserResponse {
    type Error = AppError;

    fn try_from(u: user::Model) -> Result<Self, AppError> {
        let roles = decode_roles(&u.roles)?
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        Ok(Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            city: u.city,
            address: u.address,
            phone_number: u.phone_number,
            post_index: u.post_index,
            provider: u.provider,
            roles,
            active: u.active,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    pub token: String,
    pub user: UserResponse,
}

impl TryFrom<LoginResult> for AuthenticationResponse {
    type Error = AppError;

    fn try_from(result: LoginResult) -> Result<Self, AppError> {
        Ok(Self {
            token: result.token,
            user: result.user.try_into()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PerfumeResponse {
    pub id: i32,
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

impl From<perfume::Model> for PerfumeResponse {
    fn from(p: perfume::Model) -> Self {
        Self {
            id: p.id,
            perfume_title: p.perfume_title,
            perfumer: p.perfumer,
            year: p.year,
            country: p.country,
            perfume_gender: p.perfume_gender,
            fragrance_top_notes: p.fragrance_top_notes,
            fragrance_middle_notes: p.fragrance_middle_notes,
            fragrance_base_notes: p.fragrance_base_notes,
            price: p.price,
            volume: p.volume,
            perfume_type: p.perfume_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i32,
    pub perfume_id: i32,
    pub quantity: i32,
    pub amount: i64,
    pub perfume: Option<PerfumeResponse>,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(view: OrderItemView) -> Self {
        Self {
            id: view.item.id,
            perfume_id: view.item.perfume_id,
            quantity: view.item.quantity,
            amount: view.item.amount,
            perfume: view.perfume.map(PerfumeResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub address: String,
    pub phone_number: String,
    pub post_index: String,
    pub total_price: i64,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_items: Option<Vec<OrderItemResponse>>,
}

impl From<order::Model> for OrderResponse {
    fn from(o: order::Model) -> Self {
        Self {
            id: o.id,
            email: o.email,
            first_name: o.first_name,
            last_name: o.last_name,
            city: o.city,
            address: o.address,
            phone_number: o.phone_number,
            post_index: o.post_index,
            total_price: o.total_price,
            status: o.status,
            created_at: o.created_at.to_string(),
            order_items: None,
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(o: OrderWithItems) -> Self {
        let items = o.items.into_iter().map(OrderItemResponse::from).collect();
        Self {
            order_items: Some(items),
            ..OrderResponse::from(o.order)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Page body plus the `page-total-count` header the storefront reads.
pub struct Paged<T>(pub PageResponse<T>);

impl<T> Paged<T> {
    pub fn from_page<M>(page: Page<M>) -> Self
    where
        T: From<M>,
    {
        let page = page.map(T::from);
        Paged(PageResponse {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        })
    }
}

impl<T: Serialize> IntoResponse for Paged<T> {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(PAGE_TOTAL_COUNT),
            HeaderValue::from(self.0.total),
        );
        (headers, Json(self.0)).into_response()
    }
}
