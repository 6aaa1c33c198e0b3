use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::usecase::ports::repo::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Every failure surfaces as a bare 500; details only go to the log.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("request failed: {self}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
    }
}
