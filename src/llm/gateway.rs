use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

/// Configuration for LLM completion
#[derive(Debug, Clone, Default)]
pub struct CompletionConfig {
    /// Sampling temperature; `None` leaves the provider default in place.
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

/// One incremental piece of a streamed completion.
///
/// `None` mirrors a provider delta that carried no text (role announcements,
/// finish markers); consumers skip those when assembling the reply.
pub type StreamDelta = Option<String>;

/// Abstract interface for LLM providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete an LLM request with a single text response and its token usage
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse>;

    /// Stream an LLM request as incremental text deltas, in arrival order
    fn complete_stream<'a>(
        &'a self,
        model: &'a str,
        messages: &'a [LlmMessage],
        config: &'a CompletionConfig,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamDelta>> + Send + 'a>>;
}
