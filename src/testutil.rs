//! Test doubles for the query delegate.
//!
//! This module is only available in tests or when the `testutil` feature is enabled.

use std::sync::Mutex;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;

use crate::core::TabchatError;
use crate::delegate::{Answer, QueryDelegate};

/// Returns a fixed answer and remembers every table and question it saw.
pub struct RecordingDelegate {
    answer: Answer,
    calls: Mutex<Vec<(RecordBatch, String)>>,
}

impl RecordingDelegate {
    pub fn new(answer: Answer) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(RecordBatch, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryDelegate for RecordingDelegate {
    async fn answer(&self, table: &RecordBatch, question: &str) -> Result<Answer, TabchatError> {
        self.calls
            .lock()
            .unwrap()
            .push((table.clone(), question.to_string()));
        Ok(self.answer.clone())
    }
}

/// Fails every call with the same message, like an exhausted API quota.
pub struct FailingDelegate {
    message: String,
}

impl FailingDelegate {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl QueryDelegate for FailingDelegate {
    async fn answer(&self, _table: &RecordBatch, _question: &str) -> Result<Answer, TabchatError> {
        Err(TabchatError::DelegateError(self.message.clone()))
    }
}

/// Build a `multipart/form-data` body with a single file part.
///
/// Returns the content type (with boundary) and the body bytes.
pub fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "tabchat-test-boundary";
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Deterministic delimited text: an id, a label, a float score with every
/// tenth cell missing, and a boolean flag.
pub fn generate_csv(num_rows: usize, delimiter: u8) -> Vec<u8> {
    let d = delimiter as char;
    let mut out = format!("id{d}label{d}score{d}flag\n");
    for i in 0..num_rows {
        let score = if i % 10 == 0 {
            String::new()
        } else {
            format!("{:.2}", i as f64 / 7.0)
        };
        out.push_str(&format!("{i}{d}item_{i}{d}{score}{d}{}\n", i % 2 == 0));
    }
    out.into_bytes()
}
