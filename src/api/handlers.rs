//! API request handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;

use super::types::*;
use crate::adapters::CsvStore;
use crate::core::{Recommender, RecordService};
use crate::domain::{
    Charity, CharityId, Rating, RatingFilter, RecommendOptions, ScoredSupplier, Supplier,
};
use crate::utils::error::RecommenderError;

/// Shared application state
pub struct AppState {
    pub recommender: Recommender<CsvStore>,
    pub records: RecordService<CsvStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: CsvStore, options: RecommendOptions) -> Self {
        Self {
            recommender: Recommender::new(store.clone(), options),
            records: RecordService::new(store),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, RecommenderError>;
type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), RecommenderError>;

pub async fn root(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatusData>> {
    Json(ApiResponse::success(StatusData {
        message: "Recommendation API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    }))
}

// ============================================
// Recommendations
// ============================================

pub async fn recommend(
    State(state): State<Arc<AppState>>,
    path: Result<Path<CharityId>, PathRejection>,
    query: Result<Query<RecommendQuery>, QueryRejection>,
) -> ApiResult<Vec<ScoredSupplier>> {
    let Path(charity_id) = path?;
    let Query(query) = query?;
    let suppliers = state
        .recommender
        .recommend(charity_id, query.max_distance_km, query.top_n)
        .await?;
    Ok(Json(ApiResponse::success(suppliers)))
}

// ============================================
// Listings
// ============================================

pub async fn list_charities(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Charity>> {
    let charities = state.records.list_charities().await?;
    Ok(Json(ApiResponse::success(charities)))
}

pub async fn list_suppliers(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Supplier>> {
    let suppliers = state.records.list_suppliers().await?;
    Ok(Json(ApiResponse::success(suppliers)))
}

pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<RatingFilter>, QueryRejection>,
) -> ApiResult<Vec<Rating>> {
    let Query(filter) = filter?;
    let ratings = state.records.list_ratings(filter).await?;
    Ok(Json(ApiResponse::success(ratings)))
}

// ============================================
// Record creation
// ============================================

pub async fn create_charity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Charity>, JsonRejection>,
) -> CreatedResult<Charity> {
    let Json(charity) = payload?;
    let created = state.records.create_charity(charity).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn create_supplier(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Supplier>, JsonRejection>,
) -> CreatedResult<Supplier> {
    let Json(supplier) = payload?;
    let created = state.records.create_supplier(supplier).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Rating>, JsonRejection>,
) -> CreatedResult<Rating> {
    let Json(rating) = payload?;
    let created = state.records.create_rating(rating).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}
