//! The natural-language engine that answers questions about a table.

mod openai;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde_json::Value;

use crate::core::TabchatError;

pub use openai::OpenAiDelegate;

/// Whatever the engine answered: a number, some text, or structured rows.
/// Forwarded to the client untouched.
pub type Answer = Value;

#[async_trait]
pub trait QueryDelegate: Send + Sync {
    async fn answer(&self, table: &RecordBatch, question: &str) -> Result<Answer, TabchatError>;
}
