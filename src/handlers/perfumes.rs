use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::extract::AppJson;
use super::mapper::{Paged, PerfumeResponse};
use crate::db::queries::{perfumes::PerfumeFilter, PageRequest};
use crate::error::AppError;
use crate::services::perfumes as perfume_service;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PerfumeSearchRequest {
    #[serde(default)]
    pub perfumers: Vec<String>,
    #[serde(default)]
    pub genders: Vec<String>,
    /// `[min, max]`; any other length disables the price filter.
    #[serde(default)]
    pub prices: Vec<i32>,
    #[serde(default)]
    pub sort_by_price: bool,
    pub perfumer: Option<String>,
    pub perfume_gender: Option<String>,
}

impl From<&PerfumeSearchRequest> for PerfumeFilter {
    fn from(req: &PerfumeSearchRequest) -> Self {
        let price_range = match req.prices.as_slice() {
            [a, b] => Some((*a.min(b), *a.max(b))),
            _ => None,
        };
        PerfumeFilter {
            perfumers: req.perfumers.clone(),
            genders: req.genders.clone(),
            price_range,
            sort_by_price: req.sort_by_price,
        }
    }
}

pub async fn get_all_perfumes(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Paged<PerfumeResponse>, AppError> {
    let perfumes = perfume_service::get_all_perfumes(&state.db, page).await?;
    Ok(Paged::from_page(perfumes))
}

pub async fn get_perfume_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PerfumeResponse>, AppError> {
    let perfume = perfume_service::get_perfume_by_id(&state.db, id).await?;
    Ok(Json(perfume.into()))
}

pub async fn find_by_filter(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
    AppJson(req): AppJson<PerfumeSearchRequest>,
) -> Result<Paged<PerfumeResponse>, AppError> {
    let filter = PerfumeFilter::from(&req);
    let perfumes = perfume_service::find_by_filter(&state.db, &filter, page).await?;
    Ok(Paged::from_page(perfumes))
}

pub async fn find_by_gender(
    State(state): State<AppState>,
    AppJson(req): AppJson<PerfumeSearchRequest>,
) -> Result<Json<Vec<PerfumeResponse>>, AppError> {
    let gender = req
        .perfume_gender
        .ok_or_else(|| AppError::field("perfume_gender", "Fill in the input field"))?;
    let perfumes = perfume_service::find_by_gender(&state.db, &gender).await?;
    Ok(Json(perfumes.into_iter().map(PerfumeResponse::from).collect()))
}

pub async fn find_by_perfumer(
    State(state): State<AppState>,
    AppJson(req): AppJson<PerfumeSearchRequest>,
) -> Result<Json<Vec<PerfumeResponse>>, AppError> {
    let perfumer = req
        .perfumer
        .ok_or_else(|| AppError::field("perfumer", "Fill in the input field"))?;
    let perfumes = perfume_service::find_by_perfumer(&state.db, &perfumer).await?;
    Ok(Json(perfumes.into_iter().map(PerfumeResponse::from).collect()))
}
