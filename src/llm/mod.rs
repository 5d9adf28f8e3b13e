pub mod client;
pub mod gateway;
pub mod gateways;
pub mod models;

pub use client::{Completion, LlmClient};
pub use gateway::{CompletionConfig, LlmGateway, StreamDelta};
pub use models::{LlmGatewayResponse, LlmMessage, MessageRole, TokenUsage};
