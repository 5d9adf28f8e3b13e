//! Session-facing LLM client.
//!
//! Wraps a gateway so that no provider failure escapes: errors are written to the
//! notice channel, one-shot calls fall back to an empty result with zero tokens, and
//! streams simply end.

use crate::llm::gateway::{CompletionConfig, LlmGateway, StreamDelta};
use crate::llm::models::{LlmMessage, TokenUsage};
use crate::notice::{NoticeRegion, Notices};
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tracing::{error, info};

/// Result of a non-streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: Option<String>,
    pub usage: TokenUsage,
}

pub struct LlmClient {
    model: String,
    gateway: Arc<dyn LlmGateway>,
    config: CompletionConfig,
}

impl LlmClient {
    pub fn new(model: impl Into<String>, gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
            config: CompletionConfig::default(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One-shot completion. Returns `(None, 0, 0)` on any failure after reporting it.
    pub async fn complete(&self, messages: &[LlmMessage], notices: &mut Notices) -> Completion {
        match self.gateway.complete(&self.model, messages, &self.config).await {
            Ok(response) => Completion {
                text: response.content,
                usage: response.usage,
            },
            Err(e) => {
                error!(model = %self.model, error = %e, "Completion failed");
                notices.error(NoticeRegion::Main, format!("Error: {}", e));
                Completion::default()
            }
        }
    }

    /// Streamed completion.
    ///
    /// Deltas pass through unchanged, empty ones included. The first failure is
    /// reported and terminates the stream.
    pub fn stream_complete<'a>(
        &'a self,
        messages: &'a [LlmMessage],
        notices: &'a mut Notices,
    ) -> Pin<Box<dyn Stream<Item = StreamDelta> + Send + 'a>> {
        Box::pin(async_stream::stream! {
            info!(model = %self.model, messages = messages.len(), "Streaming response");
            let mut inner = self.gateway.complete_stream(&self.model, messages, &self.config);

            while let Some(result) = inner.next().await {
                match result {
                    Ok(delta) => yield delta,
                    Err(e) => {
                        error!(model = %self.model, error = %e, "Streaming failed");
                        notices.error(NoticeRegion::Main, format!("Error: {}", e));
                        return;
                    }
                }
            }
        })
    }
}
