use crate::app::App;
use crate::llm::models::MessageRole;
use crate::notice::Notice;
use crate::session::exchange::ExchangePhase;
use crate::study::catalog::{Domain, StudyMode, AWS_SERVICES, EXAM_NAME};
use crate::study::prompts::chat_placeholder;
use serde::Serialize;

pub const STUDY_TIPS: [&str; 3] = [
    "Review regularly",
    "Practice with real-world scenarios",
    "Use AWS documentation",
];

pub const ACHIEVEMENT_TEXT: &str = "You've made significant progress!";

#[derive(Debug, Clone, Serialize)]
pub struct DomainOption {
    pub name: &'static str,
    pub weight: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressBar {
    pub domain: &'static str,
    pub value: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressChart {
    pub title: &'static str,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub bars: Vec<ProgressBar>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TokenUsageView {
    pub prompt: u64,
    pub completion: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadView {
    pub timestamps: Vec<String>,
    pub selected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaygroundView {
    pub visible: bool,
    pub code: String,
}

/// Everything the page renders, derived from the model alone.
#[derive(Debug, Clone, Serialize)]
pub struct View {
    pub title: String,
    pub user_name: String,
    pub modes: Vec<&'static str>,
    pub mode: StudyMode,
    pub domains: Vec<DomainOption>,
    pub domain: Domain,
    pub domain_weight: String,
    /// Present only in service deep-dive mode.
    pub services: Option<Vec<&'static str>>,
    pub service: String,
    pub action_button: Option<&'static str>,
    pub chat_placeholder: Option<String>,
    pub transcript: Vec<TranscriptEntry>,
    pub phase: ExchangePhase,
    pub progress: ProgressChart,
    pub study_tips: Vec<&'static str>,
    pub achievement: Option<&'static str>,
    pub token_usage: TokenUsageView,
    pub save_name: String,
    pub upload: Option<UploadView>,
    pub dark_mode: bool,
    pub playground: PlaygroundView,
    pub notices: Vec<Notice>,
}

pub fn view(app: &App) -> View {
    let selection = &app.selection;
    let session = &app.session;
    let mode = selection.mode;

    View {
        title: format!("{} Prep Assistant", EXAM_NAME),
        user_name: session.user_name.clone(),
        modes: StudyMode::ALL.iter().map(|m| m.label()).collect(),
        mode,
        domains: Domain::ALL
            .iter()
            .map(|d| DomainOption {
                name: d.name(),
                weight: d.weight(),
            })
            .collect(),
        domain: selection.domain,
        domain_weight: format!("Domain weight: {}%", selection.domain.weight()),
        services: mode.uses_service().then(|| AWS_SERVICES.to_vec()),
        service: selection.service.clone(),
        action_button: mode.action_label(),
        chat_placeholder: mode.accepts_chat_input().then(|| chat_placeholder(selection.domain)),
        transcript: session
            .messages()
            .iter()
            .map(|m| TranscriptEntry {
                role: m.role,
                content: m.content.clone(),
            })
            .collect(),
        phase: app.phase,
        progress: ProgressChart {
            title: "Domain Progress",
            x_title: "Domains",
            y_title: "Progress (%)",
            bars: session
                .progress_by_domain()
                .into_iter()
                .map(|(domain, value)| ProgressBar {
                    domain: domain.name(),
                    value,
                })
                .collect(),
        },
        study_tips: STUDY_TIPS.to_vec(),
        achievement: session.has_significant_progress().then_some(ACHIEVEMENT_TEXT),
        token_usage: TokenUsageView {
            prompt: session.token_count.prompt,
            completion: session.token_count.completion,
            total: session.token_count.total(),
        },
        save_name: app.save_name.clone(),
        upload: app.upload.as_ref().map(|u| UploadView {
            timestamps: u.records.iter().map(|r| r.timestamp.clone()).collect(),
            selected: u.selected,
        }),
        dark_mode: app.dark_mode,
        playground: PlaygroundView {
            visible: app.show_playground,
            code: app.playground_code.clone(),
        },
        notices: app.notices.items().to_vec(),
    }
}
