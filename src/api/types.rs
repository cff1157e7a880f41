use serde::{Deserialize, Serialize};

/// Request body for the question endpoint.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: &'static str,
}

/// Error body. Every failure renders as this, with status 200.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
