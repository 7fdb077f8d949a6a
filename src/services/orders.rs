use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use entity::{order, order_item, perfume};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

use crate::db::queries::{self, Page, PageRequest};
use crate::error::AppError;

pub const STATUS_NEW: &str = "NEW";
pub const ORDER_DELETED: &str = "Order deleted successfully";

/// Contact and shipping details supplied at checkout.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub address: String,
    pub phone_number: String,
    pub post_index: String,
}

#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub item: order_item::Model,
    pub perfume: Option<perfume::Model>,
}

#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: order::Model,
    pub items: Vec<OrderItemView>,
}

pub async fn get_order_by_id(db: &DatabaseConnection, id: i32) -> Result<order::Model, AppError> {
    queries::orders::find_by_id(db, id)
        .await?
        .ok_or(AppError::OrderNotFound)
}

pub async fn get_order_items_by_order_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Vec<OrderItemView>, AppError> {
    let order = get_order_by_id(db, id).await?;
    let items = queries::orders::items_with_perfumes(db, order.id).await?;
    Ok(items
        .into_iter()
        .map(|(item, perfume)| OrderItemView { item, perfume })
        .collect())
}

pub async fn get_all_orders(
    db: &DatabaseConnection,
    page: PageRequest,
) -> Result<Page<order::Model>, AppError> {
    queries::orders::list_paginated(db, page).await
}

pub async fn get_user_orders(
    db: &DatabaseConnection,
    email: &str,
    page: PageRequest,
) -> Result<Page<order::Model>, AppError> {
    queries::orders::list_by_email_paginated(db, email, page).await
}

/// Checks out an order for `email`. `perfumes` maps perfume id to quantity;
/// each item's amount is priced from the catalog at this moment.
pub async fn post_order(
    db: &DatabaseConnection,
    email: &str,
    details: OrderDetails,
    perfumes: &BTreeMap<i32, i32>,
) -> Result<OrderWithItems, AppError> {
    if perfumes.is_empty() {
        return Err(AppError::field("perfumes_id", "Order must contain at least one perfume"));
    }
    if let Some((id, qty)) = perfumes.iter().find(|(_, qty)| **qty <= 0) {
        return Err(AppError::field(
            "perfumes_id",
            &format!("Quantity for perfume {id} must be positive, got {qty}"),
        ));
    }

    let txn = db.begin().await?;

    let catalog: HashMap<i32, perfume::Model> =
        queries::perfumes::find_by_ids(&txn, perfumes.keys().copied().collect())
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

    let mut priced = Vec::with_capacity(perfumes.len());
    for (id, qty) in perfumes {
        let perfume = catalog.get(id).ok_or(AppError::PerfumeNotFound)?;
        let amount = i64::from(perfume.price) * i64::from(*qty);
        priced.push((perfume.clone(), *qty, amount));
    }
    let total_price: i64 = priced.iter().map(|(_, _, amount)| amount).sum();

    let order = queries::orders::insert(
        &txn,
        order::ActiveModel {
            email: Set(email.to_string()),
            first_name: Set(details.first_name),
            last_name: Set(details.last_name),
            city: Set(details.city),
            address: Set(details.address),
            phone_number: Set(details.phone_number),
            post_index: Set(details.post_index),
            total_price: Set(total_price),
            status: Set(STATUS_NEW.to_string()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        },
    )
    .await?;

    let mut items = Vec::with_capacity(priced.len());
    for (perfume, quantity, amount) in priced {
        let item = queries::orders::insert_item(
            &txn,
            order_item::ActiveModel {
                order_id: Set(order.id),
                perfume_id: Set(perfume.id),
                quantity: Set(quantity),
                amount: Set(amount),
                ..Default::default()
            },
        )
        .await?;
        items.push(OrderItemView {
            item,
            perfume: Some(perfume),
        });
    }

    txn.commit().await?;

    // Order confirmation mail is not wired up.
    tracing::info!(order_id = order.id, email, total_price, "order placed");
    Ok(OrderWithItems { order, items })
}

pub async fn delete_order(db: &DatabaseConnection, id: i32) -> Result<&'static str, AppError> {
    let order = get_order_by_id(db, id).await?;

    let txn = db.begin().await?;
    queries::orders::delete(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(order_id = id, "order deleted");
    Ok(ORDER_DELETED)
}

/// Every order with its items, for the GraphQL `orders` field.
pub async fn all_orders_query(db: &DatabaseConnection) -> Result<Vec<OrderWithItems>, AppError> {
    let orders = queries::orders::list_all(db).await?;
    attach_items(db, orders).await
}

/// One user's orders with their items, for the GraphQL `ordersByEmail` field.
pub async fn user_orders_by_email_query(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Vec<OrderWithItems>, AppError> {
    let orders = queries::orders::list_by_email(db, email).await?;
    attach_items(db, orders).await
}

async fn attach_items(
    db: &DatabaseConnection,
    orders: Vec<order::Model>,
) -> Result<Vec<OrderWithItems>, AppError> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let ids = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<i32, Vec<OrderItemView>> = HashMap::new();
    for (item, perfume) in queries::orders::items_for_orders(db, ids).await? {
        by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderItemView { item, perfume });
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}
