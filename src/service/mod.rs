mod validate;

use std::sync::Arc;

use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use log::{info, warn};

use crate::cache::UploadCache;
use crate::core::TabchatError;
use crate::delegate::{Answer, QueryDelegate};
use crate::table::{FileKind, load_upload};

pub use validate::{MAX_UPLOAD_BYTES, check_size, validate_upload};

/// Sequences the upload and question pipelines over an injected cache and delegate.
pub struct TabchatService {
    cache: UploadCache,
    delegate: Arc<dyn QueryDelegate>,
}

impl TabchatService {
    pub fn new(cache: UploadCache, delegate: Arc<dyn QueryDelegate>) -> Self {
        Self { cache, delegate }
    }

    pub fn cache(&self) -> &UploadCache {
        &self.cache
    }

    /// Validate, parse and cache an upload in one go.
    pub async fn upload(
        &self,
        filename: &str,
        content_length: u64,
        bytes: Bytes,
    ) -> Result<RecordBatch, TabchatError> {
        let kind = validate_upload(filename, content_length)?;
        self.ingest(filename, kind, bytes).await
    }

    /// Parse an already validated upload and overwrite the cache slot with it.
    pub async fn ingest(
        &self,
        filename: &str,
        kind: FileKind,
        bytes: Bytes,
    ) -> Result<RecordBatch, TabchatError> {
        let size = bytes.len();
        let table = tokio::task::spawn_blocking(move || load_upload(kind, &bytes))
            .await
            .map_err(|e| TabchatError::IoError(format!("parser task failed: {e}")))?
            .inspect_err(|e| warn!(filename = filename, error:% = e; "upload failed to parse"))?;

        self.cache.put(&table).await?;
        info!(
            filename = filename,
            size = size,
            rows = table.num_rows(),
            columns = table.num_columns();
            "table cached"
        );
        Ok(table)
    }

    /// Hand the cached table and the question to the delegate.
    ///
    /// The delegate is never called when nothing has been uploaded.
    pub async fn ask(&self, question: &str) -> Result<Answer, TabchatError> {
        let table = self.cache.get().await?.ok_or(TabchatError::CacheMiss)?;
        self.delegate
            .answer(&table, question)
            .await
            .inspect_err(|e| warn!(error:% = e; "delegate failed"))
    }
}
