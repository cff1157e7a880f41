use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::warn;

use crate::core::{TabchatError, UploadRejection};

use super::types::ErrorResponse;

/// Any pipeline failure, reported in the body rather than the status line.
#[derive(Debug)]
pub struct ApiError(pub TabchatError);

impl From<TabchatError> for ApiError {
    fn from(err: TabchatError) -> Self {
        ApiError(err)
    }
}

impl From<UploadRejection> for ApiError {
    fn from(err: UploadRejection) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error:% = self.0; "request failed");
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}
