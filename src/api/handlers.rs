use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::CONTENT_LENGTH};
use log::info;

use crate::core::{TabchatError, UploadRejection};
use crate::delegate::Answer;
use crate::service::{MAX_UPLOAD_BYTES, TabchatService, check_size, validate_upload};

use super::error::ApiError;
use super::types::{QuestionRequest, UploadResponse};

const FILE_FIELD: &str = "file";

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// POST /upload
///
/// Multipart form with a `file` part. Filename and declared size are checked
/// before the part is read; the parsed table replaces the cached one.
pub async fn upload(
    State(service): State<Arc<TabchatService>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|_| UploadRejection::MissingFile)?;
    let declared = declared_length(&headers);

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // Parts without a filename are plain form values, not files.
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let kind = validate_upload(&filename, declared.unwrap_or(0))?;
        let bytes = field.bytes().await.map_err(multipart_error)?;
        if declared.is_none() {
            check_size(bytes.len() as u64)?;
        }

        info!(filename = filename.as_str(), kind:? = kind; "upload accepted");
        service.ingest(&filename, kind, bytes).await?;
        return Ok(Json(UploadResponse {
            success: "Arquivo importado",
        }));
    }

    Err(UploadRejection::MissingFile.into())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return UploadRejection::TooLarge {
            size: MAX_UPLOAD_BYTES + 1,
            limit_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
        }
        .into();
    }
    TabchatError::RequestError(err.body_text()).into()
}

/// POST /question
///
/// JSON body `{"question": ...}`. The delegate's answer is returned as-is.
pub async fn question(
    State(service): State<Arc<TabchatService>>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {
    let Json(request) = payload.map_err(|e| TabchatError::RequestError(e.body_text()))?;
    let answer = service.ask(&request.question).await?;
    Ok(Json(answer))
}
