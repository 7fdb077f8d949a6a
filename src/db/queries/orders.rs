use entity::{order, order_item, perfume};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use super::{Page, PageRequest};
use crate::error::AppError;

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<order::Model>, AppError> {
    Ok(order::Entity::find_by_id(id).one(db).await?)
}

/// Items of one order joined with the perfume they reference.
pub async fn items_with_perfumes<C: ConnectionTrait>(
    db: &C,
    order_id: i32,
) -> Result<Vec<(order_item::Model, Option<perfume::Model>)>, AppError> {
    Ok(order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .order_by_asc(order_item::Column::Id)
        .find_also_related(perfume::Entity)
        .all(db)
        .await?)
}

/// Items for a batch of orders, each joined with its perfume.
pub async fn items_for_orders<C: ConnectionTrait>(
    db: &C,
    order_ids: Vec<i32>,
) -> Result<Vec<(order_item::Model, Option<perfume::Model>)>, AppError> {
    Ok(order_item::Entity::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_item::Column::Id)
        .find_also_related(perfume::Entity)
        .all(db)
        .await?)
}

pub async fn list_paginated<C: ConnectionTrait>(
    db: &C,
    page: PageRequest,
) -> Result<Page<order::Model>, AppError> {
    let paginator = order::Entity::find()
        .order_by_asc(order::Column::Id)
        .paginate(db, page.per_page());
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page_index()?).await?;

    Ok(Page {
        items,
        total,
        page: page.page(),
        per_page: page.per_page(),
    })
}

pub async fn list_by_email_paginated<C: ConnectionTrait>(
    db: &C,
    email: &str,
    page: PageRequest,
) -> Result<Page<order::Model>, AppError> {
    let paginator = order::Entity::find()
        .filter(order::Column::Email.eq(email))
        .order_by_asc(order::Column::Id)
        .paginate(db, page.per_page());
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page_index()?).await?;

    Ok(Page {
        items,
        total,
        page: page.page(),
        per_page: page.per_page(),
    })
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<order::Model>, AppError> {
    Ok(order::Entity::find()
        .order_by_asc(order::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Vec<order::Model>, AppError> {
    Ok(order::Entity::find()
        .filter(order::Column::Email.eq(email))
        .order_by_asc(order::Column::Id)
        .all(db)
        .await?)
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    model: order::ActiveModel,
) -> Result<order::Model, AppError> {
    Ok(model.insert(db).await?)
}

pub async fn insert_item<C: ConnectionTrait>(
    db: &C,
    model: order_item::ActiveModel,
) -> Result<order_item::Model, AppError> {
    Ok(model.insert(db).await?)
}

/// Deletes the order and its items.
pub async fn delete<C: ConnectionTrait>(db: &C, order: order::Model) -> Result<(), AppError> {
    order_item::Entity::delete_many()
        .filter(order_item::Column::OrderId.eq(order.id))
        .exec(db)
        .await?;
    order.delete(db).await?;
    Ok(())
}
