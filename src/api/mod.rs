pub mod error;
pub mod params;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::params::{filter_criteria, page_request, RawQuery};
use crate::domain::entities::query::{FilterCriteria, Pagination};
use crate::domain::entities::record::SalesRecord;
use crate::domain::entities::summary::{FilterOptions, Summary};
use crate::usecase::ports::repo::RecordSource;
use crate::usecase::services::aggregation_service::AggregationService;
use crate::usecase::services::listing_service::ListingService;

#[derive(Clone)]
pub struct AppState {
    listing: ListingService,
    aggregation: AggregationService,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self {
            listing: ListingService::new(Arc::clone(&source)),
            aggregation: AggregationService::new(source),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<SalesRecord>,
    pub pagination: Pagination,
    pub filters: FilterCriteria,
}

pub fn build_router(state: AppState) -> Router {
    let data = Router::new()
        .route("/data", get(list_records))
        .route("/data/filters", get(filter_options))
        .route("/data/summary", get(summary));

    Router::new().nest("/api", data).with_state(state)
}

async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RawQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let criteria = filter_criteria(&query);
    let request = page_request(&query);

    let response = tokio::task::spawn_blocking(move || {
        state
            .listing
            .list(&criteria, &request)
            .map(|page| ListResponse {
                data: page.records,
                pagination: page.pagination,
                filters: criteria,
            })
    })
    .await??;

    Ok(Json(response))
}

async fn filter_options(State(state): State<AppState>) -> Result<Json<FilterOptions>, ApiError> {
    let options = tokio::task::spawn_blocking(move || state.listing.filter_options()).await??;
    Ok(Json(options))
}

async fn summary(
    State(state): State<AppState>,
    Query(query): Query<RawQuery>,
) -> Result<Json<Summary>, ApiError> {
    let criteria = filter_criteria(&query);
    let summary =
        tokio::task::spawn_blocking(move || state.aggregation.summarize(&criteria)).await??;
    Ok(Json(summary))
}
