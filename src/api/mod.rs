mod error;
mod handlers;
mod types;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::routing::post;
use log::info;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::core::TabchatError;
use crate::service::{MAX_UPLOAD_BYTES, TabchatService};

pub use error::ApiError;
pub use types::{ErrorResponse, QuestionRequest, UploadResponse};

pub struct TabchatApi {
    service: Arc<TabchatService>,
}

impl TabchatApi {
    pub fn new(service: TabchatService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/upload", post(handlers::upload))
            .route("/question", post(handlers::question))
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES as usize))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(|request: &Request<Body>, _: &Span| {
                        info!(
                            method:% = request.method(),
                            path = request.uri().path();
                            "request received"
                        );
                    })
                    .on_response(|response: &Response<Body>, latency: Duration, _: &Span| {
                        info!(
                            status = response.status().as_u16(),
                            latency_ms = latency.as_millis() as u64;
                            "request finished"
                        );
                    }),
            )
            .with_state(self.service.clone())
    }

    pub async fn serve(self, addr: &str) -> Result<(), TabchatError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| TabchatError::IoError(format!("binding to {addr}: {e}")))?;
        info!(addr = addr; "listening");
        axum::serve(listener, self.router())
            .await
            .map_err(|e| TabchatError::IoError(format!("serving: {e}")))?;
        Ok(())
    }
}
