//! OpenAI Gateway for LLM interactions.
//!
//! This module provides a gateway for OpenAI's chat-completions API, covering the
//! one-shot call (with token usage) and the server-sent-events streaming call.

use crate::error::{CoachError, Result};
use crate::llm::gateway::{CompletionConfig, LlmGateway, StreamDelta};
use crate::llm::models::{LlmGatewayResponse, LlmMessage, TokenUsage};
use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use serde_json::Value;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for connecting to OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("OPENAI_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: None,
        }
    }
}

/// Gateway for OpenAI LLM service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Self {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to build configured HTTP client, using defaults");
            Client::default()
        });

        Self { client, config }
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    fn request_body(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
        stream: bool,
    ) -> Result<Value> {
        let mut body = serde_json::json!({
            "model": model,
            "messages": serde_json::to_value(messages)?,
        });

        if stream {
            body["stream"] = Value::Bool(true);
        }
        if let Some(temperature) = config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        Ok(body)
    }

    async fn post_chat(&self, body: &Value) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CoachError::GatewayError(format!(
                "OpenAI API error: {} - {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

/// One decoded server-sent-events line from a streaming completion.
#[derive(Debug, PartialEq, Eq)]
enum SseLine {
    Delta(StreamDelta),
    /// The provider reported an error inside the event stream.
    Failed(String),
    Done,
    Ignored,
}

/// Splits a byte stream into lines.
///
/// Lines are cut on raw bytes before decoding, so a multi-byte character split
/// across network chunks is reassembled intact.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(line_end) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=line_end).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever followed the last newline.
    fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

fn parse_sse_line(line: &str) -> SseLine {
    let Some(data) = line.trim().strip_prefix("data:") else {
        return SseLine::Ignored;
    };
    let data = data.trim();

    if data == "[DONE]" {
        return SseLine::Done;
    }

    match serde_json::from_str::<Value>(data) {
        Ok(json) if json.get("error").is_some_and(|e| !e.is_null()) => {
            let error = &json["error"];
            let message = error["message"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| error.to_string());
            SseLine::Failed(message)
        }
        Ok(json) => match json["choices"].as_array().and_then(|c| c.first()) {
            Some(choice) => SseLine::Delta(choice["delta"]["content"].as_str().map(String::from)),
            None => SseLine::Ignored,
        },
        Err(e) => {
            warn!("Failed to parse streaming chunk: {}", e);
            SseLine::Ignored
        }
    }
}

fn parse_usage(body: &Value) -> TokenUsage {
    TokenUsage {
        prompt_tokens: body["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
        completion_tokens: body["usage"]["completion_tokens"].as_u64().unwrap_or(0),
    }
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to OpenAI for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let body = self.request_body(model, messages, config, false)?;
        let response = self.post_chat(&body).await?;
        let response_body: Value = response.json().await?;

        if response_body["choices"].as_array().map_or(true, |c| c.is_empty()) {
            return Err(CoachError::ApiError("No choices in response".to_string()));
        }

        let content = response_body["choices"][0]["message"]["content"].as_str().map(String::from);
        let usage = parse_usage(&response_body);
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Completion usage"
        );

        Ok(LlmGatewayResponse { content, usage })
    }

    fn complete_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [LlmMessage],
        config: &'a CompletionConfig,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamDelta>> + Send + 'a>> {
        Box::pin(async_stream::stream! {
            info!("Starting OpenAI streaming completion");
            debug!("Model: {}, Message count: {}", model, messages.len());

            let body = match self.request_body(model, messages, config, true) {
                Ok(body) => body,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let response = match self.post_chat(&body).await {
                Ok(r) => r,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut stream = response.bytes_stream();
            let mut lines = LineBuffer::default();

            while let Some(chunk_result) = stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(e.into());
                        return;
                    }
                };

                for line in lines.push(&bytes) {
                    match parse_sse_line(&line) {
                        SseLine::Delta(delta) => yield Ok(delta),
                        SseLine::Failed(message) => {
                            warn!(error = %message, "OpenAI reported an error mid-stream");
                            yield Err(CoachError::ApiError(message));
                            return;
                        }
                        SseLine::Done => {
                            debug!("OpenAI stream signalled completion");
                            return;
                        }
                        SseLine::Ignored => {}
                    }
                }
            }

            match parse_sse_line(&lines.finish()) {
                SseLine::Delta(delta) => yield Ok(delta),
                SseLine::Failed(message) => yield Err(CoachError::ApiError(message)),
                SseLine::Done | SseLine::Ignored => {}
            }
        })
    }
}
