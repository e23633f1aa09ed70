//! OpenRouter question supplier implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use adaptest_core::model::{Question, RawQuestion};
use adaptest_core::traits::{QuestionSupplier, SupplyRequest, SupplyResponse};

use crate::error::SupplierError;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api";
const DEFAULT_TIMEOUT_SECS: u64 = 90;
const GENERATION_TEMPERATURE: f64 = 0.7;
/// Source material is truncated to this many characters per request.
const MAX_SOURCE_CHARS: usize = 6000;

/// OpenRouter-compatible chat-completions supplier.
///
/// Generates the main and buffer subsets with one request each, so a
/// truncated response only loses half the delivery.
pub struct OpenRouterSupplier {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterSupplier {
    pub fn new(api_key: &str, base_url: Option<String>, model: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.to_string(),
            client,
        }
    }

    /// Generate one subset of questions within a difficulty band.
    async fn generate_batch(
        &self,
        source_text: &str,
        count: usize,
        band: (f64, f64),
    ) -> Result<Vec<Question>, SupplierError> {
        let body = ChatRequest {
            model: self.model.clone(),
            temperature: GENERATION_TEMPERATURE,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: batch_prompt(source_text, count, band),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SupplierError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    SupplierError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(SupplierError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(SupplierError::AuthenticationFailed(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(SupplierError::ApiError {
                status,
                message: body,
            });
        }

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            SupplierError::MalformedPayload(format!("failed to parse response envelope: {e}"))
        })?;

        let content = api_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        let batch: QuestionBatch = serde_json::from_str(content.trim())
            .map_err(|e| SupplierError::MalformedPayload(format!("invalid question JSON: {e}")))?;

        // Records that violate the question invariants are dropped rather
        // than failing the whole batch; intake enforces the minimum count.
        let questions: Vec<Question> = batch
            .questions
            .into_iter()
            .filter_map(|raw| match Question::try_from(raw) {
                Ok(q) => Some(q),
                Err(e) => {
                    tracing::warn!("dropping invalid generated question: {e}");
                    None
                }
            })
            .collect();

        Ok(questions)
    }
}

fn batch_prompt(source_text: &str, count: usize, (lo, hi): (f64, f64)) -> String {
    format!(
        r#"Generate exactly {count} multiple-choice questions from this study material.

Material:
{source}

Requirements:
- exactly {count} questions
- difficulty values between {lo} and {hi}
- return ONLY a JSON object, no markdown fences or commentary

JSON schema:
{{"questions": [{{"prompt": "Question text", "options": {{"A": "...", "B": "...", "C": "...", "D": "..."}}, "answer": "A", "difficulty": 0.5, "explanation": "Brief explanation", "topic": "Topic name"}}]}}"#,
        source = truncate_chars(source_text, MAX_SOURCE_CHARS),
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// The question payload a generation model is asked to emit.
#[derive(Deserialize)]
struct QuestionBatch {
    questions: Vec<RawQuestion>,
}

#[async_trait]
impl QuestionSupplier for OpenRouterSupplier {
    fn name(&self) -> &str {
        "openrouter"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn supply(&self, request: &SupplyRequest) -> anyhow::Result<SupplyResponse> {
        let main = self
            .generate_batch(
                &request.source_text,
                request.main_count,
                request.main_difficulty,
            )
            .await?;
        let buffer = self
            .generate_batch(
                &request.source_text,
                request.buffer_count,
                request.buffer_difficulty,
            )
            .await?;

        tracing::info!(
            main = main.len(),
            buffer = buffer.len(),
            "supplier delivered questions"
        );

        Ok(SupplyResponse { main, buffer })
    }
}
