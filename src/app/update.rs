use crate::app::{App, UploadedConversations};
use crate::llm::models::LlmMessage;
use crate::notice::NoticeRegion;
use crate::store::ConversationStore;
use crate::study::catalog::{is_known_service, Domain, StudyMode};
use crate::study::prompts::{action_prompt, chat_prompt};
use crate::session::exchange::ExchangePhase;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// A user interaction on the page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SetUserName { name: String },
    SelectMode { mode: StudyMode },
    SelectDomain { domain: Domain },
    SelectService { service: String },
    /// Free-text question from the chat box.
    SubmitChat { text: String },
    /// The current mode's generate button.
    GenerateAction,
    ClearHistory,
    SetSaveName { name: String },
    SaveConversation,
    UploadConversations { bytes: Option<Vec<u8>> },
    SelectConversation { index: usize },
    LoadSelectedConversation,
    SetDarkMode { enabled: bool },
    SetPlayground { visible: bool },
    SetPlaygroundCode { code: String },
}

/// Follow-up work the shell must perform after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    None,
    /// The transcript ends in a non-assistant message; stream a reply.
    RequestResponse,
}

/// Apply one interaction to the model.
///
/// Notices from the previous interaction are dropped first. Failures never escape:
/// they become notices in the page region the interaction came from.
pub fn update(app: &mut App, event: Event, store: &ConversationStore) -> Command {
    app.notices.clear();
    debug!(?event, "Applying event");

    match event {
        Event::SetUserName { name } => {
            app.session.user_name = name;
        }
        Event::SelectMode { mode } => {
            app.selection.mode = mode;
        }
        Event::SelectDomain { domain } => {
            app.selection.domain = domain;
        }
        Event::SelectService { service } => {
            if is_known_service(&service) {
                app.selection.service = service;
            } else {
                warn!(%service, "Ignoring unknown service selection");
                app.notices
                    .warning(NoticeRegion::Main, format!("Unknown AWS service: {}", service));
            }
        }
        Event::SubmitChat { text } => {
            if !app.selection.mode.accepts_chat_input() {
                app.notices.warning(
                    NoticeRegion::Main,
                    format!("{} mode uses its generate button instead of chat.", app.selection.mode),
                );
            } else if !text.is_empty() {
                let content = chat_prompt(&app.session.user_name, &text);
                app.session.push(LlmMessage::user(content));
            }
        }
        Event::GenerateAction => match action_prompt(app.selection.mode, app.selection.domain) {
            Some(prompt) => app.session.push(LlmMessage::user(prompt)),
            None => app.notices.warning(
                NoticeRegion::Main,
                format!("{} mode has no generate action.", app.selection.mode),
            ),
        },
        Event::ClearHistory => {
            app.session.clear_history();
            app.notices.info(NoticeRegion::Main, "Chat history cleared.");
            info!("Chat history cleared");
        }
        Event::SetSaveName { name } => {
            app.save_name = name;
        }
        Event::SaveConversation => save(app, store),
        Event::UploadConversations { bytes } => upload(app, bytes),
        Event::SelectConversation { index } => select_conversation(app, index),
        Event::LoadSelectedConversation => load_selected(app),
        Event::SetDarkMode { enabled } => {
            app.dark_mode = enabled;
        }
        Event::SetPlayground { visible } => {
            app.show_playground = visible;
        }
        Event::SetPlaygroundCode { code } => {
            app.playground_code = code;
        }
    }

    if app.session.needs_response() {
        app.phase = ExchangePhase::AwaitingResponse;
        Command::RequestResponse
    } else {
        app.phase = ExchangePhase::Idle;
        Command::None
    }
}

fn save(app: &mut App, store: &ConversationStore) {
    match store.save(app.session.messages(), &app.save_name) {
        Ok(path) => app.notices.success(
            NoticeRegion::Sidebar,
            format!("Conversation saved to {}", path.display()),
        ),
        Err(e) => app
            .notices
            .error(NoticeRegion::Sidebar, format!("Error saving conversation: {}", e)),
    }
}

fn upload(app: &mut App, bytes: Option<Vec<u8>>) {
    let records = ConversationStore::load(bytes.as_deref(), &mut app.notices);

    if bytes.is_none() {
        app.upload = None;
        return;
    }

    if records.is_empty() {
        app.notices
            .error(NoticeRegion::Sidebar, "No valid conversations found in the uploaded file.");
    } else {
        app.notices.success(
            NoticeRegion::Sidebar,
            format!("Loaded {} conversations from the uploaded file", records.len()),
        );
    }
    app.upload = Some(UploadedConversations {
        records,
        selected: 0,
    });
}

fn select_conversation(app: &mut App, index: usize) {
    match app.upload.as_mut() {
        Some(upload) if index < upload.records.len() => upload.selected = index,
        Some(_) => app.notices.error(
            NoticeRegion::Sidebar,
            format!("Error loading conversations: no conversation at index {}", index),
        ),
        None => app.notices.warning(NoticeRegion::Sidebar, "No file was uploaded."),
    }
}

fn load_selected(app: &mut App) {
    let Some(upload) = app.upload.as_ref() else {
        app.notices.warning(NoticeRegion::Sidebar, "No file was uploaded.");
        return;
    };

    match upload.records.get(upload.selected) {
        Some(record) => {
            info!(timestamp = %record.timestamp, messages = record.messages.len(), "Loading conversation");
            app.session.replace_messages(record.messages.clone());
            app.notices.success(NoticeRegion::Sidebar, "Conversation loaded successfully!");
        }
        None => app.notices.error(
            NoticeRegion::Sidebar,
            "Error loading conversations: no conversation is selected",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::models::MessageRole;
    use crate::notice::NoticeLevel;
    use crate::store::ConversationRecord;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConversationStore) {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path().join("conversations"));
        (dir, store)
    }

    fn apply(app: &mut App, event: Event) -> Command {
        let (_dir, store) = store();
        update(app, event, &store)
    }

    fn upload_bytes(records: &[ConversationRecord]) -> Vec<u8> {
        serde_json::to_vec(records).unwrap()
    }

    #[test]
    fn test_event_deserialization() {
        let event: Event =
            serde_json::from_str(r#"{"type":"select_domain","domain":"Design Cost-Optimized Architectures"}"#)
                .unwrap();
        assert_eq!(
            event,
            Event::SelectDomain {
                domain: Domain::CostOptimizedArchitectures
            }
        );

        let event: Event = serde_json::from_str(r#"{"type":"generate_action"}"#).unwrap();
        assert_eq!(event, Event::GenerateAction);

        assert!(serde_json::from_str::<Event>(r#"{"type":"select_mode","mode":"Nap"}"#).is_err());
    }

    #[test]
    fn test_generate_action_requests_response() {
        let mut app = App::default();
        app.selection.domain = Domain::HighPerformingArchitectures;

        let command = apply(&mut app, Event::GenerateAction);

        assert_eq!(command, Command::RequestResponse);
        assert_eq!(app.phase, ExchangePhase::AwaitingResponse);
        let last = app.session.messages().last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert!(last.content.starts_with("Generate a multiple-choice question"));
        assert!(last.content.contains("Design High-Performing Architectures"));
    }

    #[test]
    fn test_chat_is_prefixed_with_user_name() {
        let mut app = App::default();
        apply(&mut app, Event::SetUserName { name: "Ada".to_string() });
        apply(&mut app, Event::SelectMode { mode: StudyMode::ConceptExplanation });

        let command = apply(&mut app, Event::SubmitChat { text: "What is a VPC endpoint?".to_string() });

        assert_eq!(command, Command::RequestResponse);
        assert_eq!(app.session.messages()[0].content, "Ada: What is a VPC endpoint?");
    }

    #[test]
    fn test_empty_chat_is_ignored() {
        let mut app = App::default();
        apply(&mut app, Event::SelectMode { mode: StudyMode::ServiceDeepDive });

        let command = apply(&mut app, Event::SubmitChat { text: String::new() });

        assert_eq!(command, Command::None);
        assert!(app.session.messages().is_empty());
    }

    #[test]
    fn test_chat_rejected_in_button_modes() {
        let mut app = App::default();

        let command = apply(&mut app, Event::SubmitChat { text: "hello".to_string() });

        assert_eq!(command, Command::None);
        assert!(app.session.messages().is_empty());
        assert_eq!(app.notices.items()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_generate_in_chat_mode_warns() {
        let mut app = App::default();
        apply(&mut app, Event::SelectMode { mode: StudyMode::ConceptExplanation });

        assert_eq!(apply(&mut app, Event::GenerateAction), Command::None);
        assert!(app.session.messages().is_empty());
        assert!(!app.notices.is_empty());
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        let mut app = App::default();
        let before = app.selection.service.clone();

        apply(&mut app, Event::SelectService { service: "Amazon Lightsail".to_string() });
        assert_eq!(app.selection.service, before);

        apply(&mut app, Event::SelectService { service: "Amazon SQS".to_string() });
        assert_eq!(app.selection.service, "Amazon SQS");
        assert!(app.notices.is_empty());
    }

    #[test]
    fn test_pending_user_message_keeps_requesting() {
        let mut app = App::default();
        apply(&mut app, Event::GenerateAction);

        // Any later interaction re-requests while the reply is still owed.
        assert_eq!(apply(&mut app, Event::SetDarkMode { enabled: false }), Command::RequestResponse);
        assert!(!app.dark_mode);
    }

    #[test]
    fn test_clear_history() {
        let mut app = App::default();
        app.session.push(LlmMessage::user("q"));
        app.session.push(LlmMessage::assistant("a"));
        app.session.token_count.prompt = 10;
        app.session.record_exchange(Domain::SecureArchitectures);

        assert_eq!(apply(&mut app, Event::ClearHistory), Command::None);

        assert!(app.session.messages().is_empty());
        assert_eq!(app.session.token_count.total(), 0);
        assert_eq!(app.session.progress(Domain::SecureArchitectures), 5);
        assert_eq!(app.notices.items()[0].level, NoticeLevel::Info);
        assert_eq!(app.notices.items()[0].region, NoticeRegion::Main);
        assert_eq!(app.notices.items()[0].text, "Chat history cleared.");
    }

    #[test]
    fn test_save_conversation_writes_file() {
        let (_dir, store) = store();
        let mut app = App::default();
        app.session.push(LlmMessage::user("q"));
        app.session.push(LlmMessage::assistant("a"));
        update(&mut app, Event::SetSaveName { name: "mine.json".to_string() }, &store);

        update(&mut app, Event::SaveConversation, &store);

        let notice = &app.notices.items()[0];
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.text.starts_with("Conversation saved to "));
        assert!(notice.text.ends_with("mine.json"));
        assert!(store.dir().join("mine.json").exists());
    }

    #[test]
    fn test_save_with_invalid_name_reports_error() {
        let (_dir, store) = store();
        let mut app = App::default();
        update(&mut app, Event::SetSaveName { name: String::new() }, &store);

        update(&mut app, Event::SaveConversation, &store);

        assert!(app.notices.has_errors());
    }

    #[test]
    fn test_upload_select_and_load() {
        let mut app = App::default();
        let records = vec![
            ConversationRecord {
                timestamp: "2024-05-01T10:00:00.000000".to_string(),
                messages: vec![LlmMessage::user("old q"), LlmMessage::assistant("old a")],
            },
            ConversationRecord {
                timestamp: "2024-05-02T10:00:00.000000".to_string(),
                messages: vec![LlmMessage::user("new q"), LlmMessage::assistant("new a")],
            },
        ];

        apply(&mut app, Event::UploadConversations { bytes: Some(upload_bytes(&records)) });
        assert_eq!(app.notices.items()[0].text, "Loaded 2 conversations from the uploaded file");

        apply(&mut app, Event::SelectConversation { index: 1 });
        let command = apply(&mut app, Event::LoadSelectedConversation);

        assert_eq!(command, Command::None);
        assert_eq!(app.session.messages(), records[1].messages.as_slice());
        assert_eq!(app.notices.items()[0].text, "Conversation loaded successfully!");
    }

    #[test]
    fn test_loading_conversation_ending_in_user_requests_response() {
        let mut app = App::default();
        let records = vec![ConversationRecord {
            timestamp: "2024-05-01T10:00:00.000000".to_string(),
            messages: vec![LlmMessage::user("unanswered")],
        }];

        apply(&mut app, Event::UploadConversations { bytes: Some(upload_bytes(&records)) });
        assert_eq!(apply(&mut app, Event::LoadSelectedConversation), Command::RequestResponse);
    }

    #[test]
    fn test_upload_garbage_reports_both_errors() {
        let mut app = App::default();

        apply(&mut app, Event::UploadConversations { bytes: Some(b"<html>".to_vec()) });

        let texts: Vec<&str> = app.notices.items().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts.len(), 2);
        assert!(texts[0].starts_with("Error decoding the uploaded file"));
        assert_eq!(texts[1], "No valid conversations found in the uploaded file.");
        assert!(app.upload.as_ref().unwrap().records.is_empty());
    }

    #[test]
    fn test_upload_none_warns_and_clears() {
        let mut app = App::default();
        app.upload = Some(UploadedConversations::default());

        apply(&mut app, Event::UploadConversations { bytes: None });

        assert!(app.upload.is_none());
        assert_eq!(app.notices.items()[0].text, "No file was uploaded.");
    }

    #[test]
    fn test_select_out_of_range() {
        let mut app = App::default();
        app.upload = Some(UploadedConversations::default());

        apply(&mut app, Event::SelectConversation { index: 3 });

        assert!(app.notices.has_errors());
        assert!(app.notices.items()[0].text.starts_with("Error loading conversations"));
    }

    #[test]
    fn test_load_without_upload_warns() {
        let mut app = App::default();
        apply(&mut app, Event::LoadSelectedConversation);
        assert_eq!(app.notices.items()[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_playground_events() {
        let mut app = App::default();
        apply(&mut app, Event::SetPlayground { visible: true });
        apply(&mut app, Event::SetPlaygroundCode { code: "import boto3".to_string() });

        assert!(app.show_playground);
        assert_eq!(app.playground_code, "import boto3");
    }
}
