use entity::perfume;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};

use super::{Page, PageRequest};
use crate::error::AppError;

/// Catalog filter. Empty lists leave that dimension unfiltered.
#[derive(Debug, Clone, Default)]
pub struct PerfumeFilter {
    pub perfumers: Vec<String>,
    pub genders: Vec<String>,
    pub price_range: Option<(i32, i32)>,
    pub sort_by_price: bool,
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<perfume::Model>, AppError> {
    Ok(perfume::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> Result<Vec<perfume::Model>, AppError> {
    Ok(perfume::Entity::find()
        .filter(perfume::Column::Id.is_in(ids))
        .all(db)
        .await?)
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    model: perfume::ActiveModel,
) -> Result<perfume::Model, AppError> {
    Ok(model.insert(db).await?)
}

pub async fn list_paginated<C: ConnectionTrait>(
    db: &C,
    page: PageRequest,
) -> Result<Page<perfume::Model>, AppError> {
    paginate(
        db,
        perfume::Entity::find().order_by_asc(perfume::Column::Id),
        page,
    )
    .await
}

pub async fn find_by_filter<C: ConnectionTrait>(
    db: &C,
    filter: &PerfumeFilter,
    page: PageRequest,
) -> Result<Page<perfume::Model>, AppError> {
    let mut condition = Condition::all();
    if !filter.perfumers.is_empty() {
        condition = condition.add(perfume::Column::Perfumer.is_in(filter.perfumers.clone()));
    }
    if !filter.genders.is_empty() {
        condition = condition.add(perfume::Column::PerfumeGender.is_in(filter.genders.clone()));
    }
    if let Some((min, max)) = filter.price_range {
        condition = condition.add(perfume::Column::Price.between(min, max));
    }

    let find = perfume::Entity::find().filter(condition);
    let find = if filter.sort_by_price {
        find.order_by_asc(perfume::Column::Price)
            .order_by_asc(perfume::Column::Id)
    } else {
        find.order_by_asc(perfume::Column::Id)
    };

    paginate(db, find, page).await
}

pub async fn find_by_perfumer<C: ConnectionTrait>(
    db: &C,
    perfumer: &str,
) -> Result<Vec<perfume::Model>, AppError> {
    Ok(perfume::Entity::find()
        .filter(perfume::Column::Perfumer.eq(perfumer))
        .order_by_desc(perfume::Column::Price)
        .all(db)
        .await?)
}

pub async fn find_by_gender<C: ConnectionTrait>(
    db: &C,
    gender: &str,
) -> Result<Vec<perfume::Model>, AppError> {
    Ok(perfume::Entity::find()
        .filter(perfume::Column::PerfumeGender.eq(gender))
        .order_by_desc(perfume::Column::Price)
        .all(db)
        .await?)
}

async fn paginate<C: ConnectionTrait>(
    db: &C,
    find: Select<perfume::Entity>,
    page: PageRequest,
) -> Result<Page<perfume::Model>, AppError> {
    let paginator = find.paginate(db, page.per_page());
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page_index()?).await?;

    Ok(Page {
        items,
        total,
        page: page.page(),
        per_page: page.per_page(),
    })
}
