use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conf::DelegateConfig;
use crate::core::TabchatError;
use crate::table::to_records;

use super::{Answer, QueryDelegate};

const SYSTEM_PROMPT: &str = "You are a data analyst. You receive a table as a JSON array of \
rows and a question about it. Compute the answer from the rows. Reply with a single JSON \
value and nothing else: a number, a string, or an array of row objects when the answer is \
itself a table.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completions client for OpenAI and compatible endpoints.
pub struct OpenAiDelegate {
    client: reqwest::Client,
    config: DelegateConfig,
}

impl OpenAiDelegate {
    pub fn new(config: DelegateConfig) -> Result<Self, TabchatError> {
        if config.api_key.trim().is_empty() {
            return Err(TabchatError::ConfigParsingError(
                "delegate.api_key is not set (or OPENAI_API_KEY)".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn build_request<'a>(
        &'a self,
        table: &RecordBatch,
        question: &str,
    ) -> Result<ChatRequest<'a>, TabchatError> {
        let rows = serde_json::to_string(&to_records(table)?)
            .map_err(|e| TabchatError::DelegateError(format!("rendering table: {e}")))?;
        let columns: Vec<String> = table
            .schema()
            .fields()
            .iter()
            .map(|f| format!("{} ({})", f.name(), f.data_type()))
            .collect();

        Ok(ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Columns: {}\nRows: {}\n\nQuestion: {}",
                        columns.join(", "),
                        rows,
                        question
                    ),
                },
            ],
            temperature: 0.0,
        })
    }
}

#[async_trait]
impl QueryDelegate for OpenAiDelegate {
    async fn answer(&self, table: &RecordBatch, question: &str) -> Result<Answer, TabchatError> {
        let request = self.build_request(table, question)?;
        info!(model = self.config.model.as_str(), rows = table.num_rows(); "asking delegate");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(); "delegate call failed");
            return Err(TabchatError::DelegateError(format!(
                "API error ({status}): {text}"
            )));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| TabchatError::DelegateError("response has no content".to_string()))?;

        Ok(parse_reply(&content))
    }
}

/// Read the model's reply as JSON, unwrapping a Markdown code fence if present.
/// Replies that are not JSON are forwarded as a string.
pub(crate) fn parse_reply(content: &str) -> Answer {
    let trimmed = content.trim();
    let inner = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
        .map(|body| body.strip_prefix("json").unwrap_or(body).trim())
        .unwrap_or(trimmed);

    serde_json::from_str(inner).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
