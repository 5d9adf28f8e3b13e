//! Application model.
//!
//! [`App`] is the single explicit state object for a study session. Browser
//! interactions become [`Event`]s applied by [`update`]; [`view`] projects the model
//! into what the page renders. When `update` reports [`Command::RequestResponse`],
//! the shell drives [`App::respond`] to stream the assistant's reply.

pub mod update;
pub mod view;

pub use update::{update, Command, Event};
pub use view::{view, View};

use crate::llm::client::LlmClient;
use crate::notice::Notices;
use crate::session::exchange::{self, ExchangeEvent, ExchangeOutcome, ExchangePhase};
use crate::session::state::SessionState;
use crate::store::{ConversationRecord, DEFAULT_SAVE_NAME};
use crate::study::prompts::StudySelection;

/// Conversations decoded from the most recent upload.
#[derive(Debug, Clone, Default)]
pub struct UploadedConversations {
    pub records: Vec<ConversationRecord>,
    pub selected: usize,
}

#[derive(Debug, Clone)]
pub struct App {
    pub session: SessionState,
    pub selection: StudySelection,
    pub save_name: String,
    /// `None` until a file has been uploaded.
    pub upload: Option<UploadedConversations>,
    pub dark_mode: bool,
    pub show_playground: bool,
    pub playground_code: String,
    pub notices: Notices,
    pub phase: ExchangePhase,
}

impl App {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            session: SessionState::new(user_name),
            selection: StudySelection::default(),
            save_name: DEFAULT_SAVE_NAME.to_string(),
            upload: None,
            dark_mode: true,
            show_playground: false,
            playground_code: String::new(),
            notices: Notices::new(),
            phase: ExchangePhase::Idle,
        }
    }

    /// Stream the owed assistant reply, if any, into the session.
    pub async fn respond<F>(&mut self, client: &LlmClient, mut observe: F) -> Option<ExchangeOutcome>
    where
        F: FnMut(ExchangeEvent) + Send,
    {
        let phase = &mut self.phase;
        let outcome = exchange::respond(
            client,
            &mut self.session,
            &self.selection,
            &mut self.notices,
            |event| {
                if let ExchangeEvent::Phase(p) = event {
                    *phase = p;
                }
                observe(event);
            },
        )
        .await;

        // A settled exchange leaves the transcript ending in an assistant reply,
        // which is the idle condition for the next interaction.
        self.phase = ExchangePhase::Idle;
        outcome
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(crate::session::state::DEFAULT_USER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::testing::MockGateway;
    use crate::llm::models::{LlmMessage, TokenUsage};
    use crate::study::catalog::{Domain, StudyMode};
    use std::sync::Arc;

    #[test]
    fn test_new_app_defaults() {
        let app = App::default();

        assert_eq!(app.session.user_name, "Student");
        assert_eq!(app.selection.mode, StudyMode::QuickQuiz);
        assert_eq!(app.selection.domain, Domain::SecureArchitectures);
        assert_eq!(app.save_name, "aws_cert_prep_conversation.json");
        assert!(app.dark_mode);
        assert!(!app.show_playground);
        assert!(app.upload.is_none());
        assert_eq!(app.phase, ExchangePhase::Idle);
    }

    #[tokio::test]
    async fn test_respond_tracks_phases_and_returns_to_idle() {
        let gateway = MockGateway::new(
            vec![Some("Use KMS.".to_string())],
            Some(TokenUsage {
                prompt_tokens: 50,
                completion_tokens: 5,
            }),
        );
        let client = LlmClient::new("gpt-3.5-turbo", Arc::new(gateway));
        let mut app = App::default();
        app.session.push(LlmMessage::user("Student: how do I encrypt EBS?"));

        let mut phases = Vec::new();
        let outcome = app
            .respond(&client, |event| {
                if let ExchangeEvent::Phase(p) = event {
                    phases.push(p);
                }
            })
            .await
            .unwrap();

        assert_eq!(outcome.reply, "Use KMS.");
        assert_eq!(
            phases,
            vec![
                ExchangePhase::AwaitingResponse,
                ExchangePhase::Streaming,
                ExchangePhase::Settled
            ]
        );
        assert_eq!(app.phase, ExchangePhase::Idle);
        assert_eq!(app.session.token_count.total(), 55);
    }
}
