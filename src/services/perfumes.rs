use chrono::Utc;
use entity::perfume;
use sea_orm::{DatabaseConnection, Set};

use crate::db::queries::{self, perfumes::PerfumeFilter, Page, PageRequest};
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct NewPerfume {
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

pub async fn get_perfume_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<perfume::Model, AppError> {
    queries::perfumes::find_by_id(db, id)
        .await?
        .ok_or(AppError::PerfumeNotFound)
}

pub async fn get_all_perfumes(
    db: &DatabaseConnection,
    page: PageRequest,
) -> Result<Page<perfume::Model>, AppError> {
    queries::perfumes::list_paginated(db, page).await
}

pub async fn find_by_filter(
    db: &DatabaseConnection,
    filter: &PerfumeFilter,
    page: PageRequest,
) -> Result<Page<perfume::Model>, AppError> {
    queries::perfumes::find_by_filter(db, filter, page).await
}

pub async fn find_by_perfumer(
    db: &DatabaseConnection,
    perfumer: &str,
) -> Result<Vec<perfume::Model>, AppError> {
    queries::perfumes::find_by_perfumer(db, perfumer).await
}

pub async fn find_by_gender(
    db: &DatabaseConnection,
    gender: &str,
) -> Result<Vec<perfume::Model>, AppError> {
    queries::perfumes::find_by_gender(db, gender).await
}

pub async fn add_perfume(
    db: &DatabaseConnection,
    new: NewPerfume,
) -> Result<perfume::Model, AppError> {
    if new.price <= 0 {
        return Err(AppError::field("price", "Price must be positive"));
    }
    if new.perfume_title.trim().is_empty() {
        return Err(AppError::field("perfume_title", "Fill in the input field"));
    }

    let model = perfume::ActiveModel {
        perfume_title: Set(new.perfume_title),
        perfumer: Set(new.perfumer),
        year: Set(new.year),
        country: Set(new.country),
        perfume_gender: Set(new.perfume_gender),
        fragrance_top_notes: Set(new.fragrance_top_notes),
        fragrance_middle_notes: Set(new.fragrance_middle_notes),
        fragrance_base_notes: Set(new.fragrance_base_notes),
        price: Set(new.price),
        volume: Set(new.volume),
        perfume_type: Set(new.perfume_type),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let perfume = queries::perfumes::insert(db, model).await?;

    tracing::info!(perfume_id = perfume.id, title = %perfume.perfume_title, "perfume added");
    Ok(perfume)
}
