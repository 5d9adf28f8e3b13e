pub mod app;
pub mod config;
pub mod error;
pub mod llm;
pub mod notice;
pub mod session;
pub mod store;
pub mod study;
pub mod web;

pub use error::{CoachError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::app::{update, view, App, Command, Event, View};
    pub use crate::config::Config;
    pub use crate::error::{CoachError, Result};
    pub use crate::llm::gateways::OpenAIGateway;
    pub use crate::llm::{LlmClient, LlmGateway, LlmMessage, MessageRole};
    pub use crate::store::{ConversationRecord, ConversationStore};
    pub use crate::study::{Domain, StudyMode, StudySelection};
}
