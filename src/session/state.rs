use crate::llm::models::{LlmMessage, MessageRole, TokenUsage};
use crate::study::catalog::Domain;
use std::collections::BTreeMap;

/// Progress points awarded per completed exchange.
pub const PROGRESS_STEP: u8 = 5;
pub const PROGRESS_MAX: u8 = 100;

pub const DEFAULT_USER_NAME: &str = "Student";

/// Cumulative token counts for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCount {
    pub prompt: u64,
    pub completion: u64,
}

impl TokenCount {
    pub fn total(&self) -> u64 {
        self.prompt + self.completion
    }

    pub fn add(&mut self, usage: TokenUsage) {
        self.prompt += usage.prompt_tokens;
        self.completion += usage.completion_tokens;
    }
}

/// Process-local record of one study session.
#[derive(Debug, Clone)]
pub struct SessionState {
    messages: Vec<LlmMessage>,
    pub token_count: TokenCount,
    pub user_name: String,
    progress: BTreeMap<Domain, u8>,
}

impl SessionState {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            token_count: TokenCount::default(),
            user_name: user_name.into(),
            progress: Domain::ALL.iter().map(|d| (*d, 0)).collect(),
        }
    }

    pub fn messages(&self) -> &[LlmMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: LlmMessage) {
        self.messages.push(message);
    }

    /// Swap in a transcript loaded from disk.
    pub fn replace_messages(&mut self, messages: Vec<LlmMessage>) {
        self.messages = messages;
    }

    /// A response is owed whenever the transcript ends in a non-assistant entry.
    pub fn needs_response(&self) -> bool {
        self.messages.last().is_some_and(|m| m.role != MessageRole::Assistant)
    }

    /// Empty the transcript and token counters; progress and name survive.
    pub fn clear_history(&mut self) {
        self.messages.clear();
        self.token_count = TokenCount::default();
    }

    pub fn progress(&self, domain: Domain) -> u8 {
        self.progress.get(&domain).copied().unwrap_or(0)
    }

    /// Progress per domain in exam-guide order.
    pub fn progress_by_domain(&self) -> Vec<(Domain, u8)> {
        Domain::ALL.iter().map(|d| (*d, self.progress(*d))).collect()
    }

    pub fn record_exchange(&mut self, domain: Domain) -> u8 {
        let value = self.progress.entry(domain).or_insert(0);
        *value = value.saturating_add(PROGRESS_STEP).min(PROGRESS_MAX);
        *value
    }

    pub fn total_progress(&self) -> u32 {
        self.progress.values().map(|v| *v as u32).sum()
    }

    pub fn has_significant_progress(&self) -> bool {
        self.total_progress() >= PROGRESS_MAX as u32
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_USER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let state = SessionState::default();

        assert!(state.messages().is_empty());
        assert_eq!(state.user_name, "Student");
        assert_eq!(state.token_count.total(), 0);
        assert!(Domain::ALL.iter().all(|d| state.progress(*d) == 0));
        assert!(!state.needs_response());
    }

    #[test]
    fn test_needs_response_follows_last_role() {
        let mut state = SessionState::default();

        state.push(LlmMessage::user("Student: hi"));
        assert!(state.needs_response());

        state.push(LlmMessage::assistant("hello"));
        assert!(!state.needs_response());

        state.push(LlmMessage::user("again"));
        state.push(LlmMessage::user("and again"));
        assert!(state.needs_response());
    }

    #[test]
    fn test_progress_clamps_at_one_hundred() {
        let mut state = SessionState::default();
        let domain = Domain::HighPerformingArchitectures;

        for _ in 0..21 {
            state.record_exchange(domain);
        }

        assert_eq!(state.progress(domain), 100);
        assert_eq!(state.progress(Domain::SecureArchitectures), 0);
    }

    #[test]
    fn test_progress_steps_by_five() {
        let mut state = SessionState::default();
        assert_eq!(state.record_exchange(Domain::SecureArchitectures), 5);
        assert_eq!(state.record_exchange(Domain::SecureArchitectures), 10);
        assert_eq!(state.total_progress(), 10);
    }

    #[test]
    fn test_significant_progress_across_domains() {
        let mut state = SessionState::default();
        for _ in 0..10 {
            state.record_exchange(Domain::SecureArchitectures);
        }
        for _ in 0..9 {
            state.record_exchange(Domain::ResilientArchitectures);
        }
        assert!(!state.has_significant_progress());

        state.record_exchange(Domain::CostOptimizedArchitectures);
        assert!(state.has_significant_progress());
    }

    #[test]
    fn test_clear_history_keeps_progress_and_name() {
        let mut state = SessionState::new("Ada");
        state.push(LlmMessage::user("Ada: hi"));
        state.token_count.add(TokenUsage {
            prompt_tokens: 10,
            completion_tokens: 4,
        });
        state.record_exchange(Domain::SecureArchitectures);

        state.clear_history();

        assert!(state.messages().is_empty());
        assert_eq!(state.token_count, TokenCount::default());
        assert_eq!(state.progress(Domain::SecureArchitectures), 5);
        assert_eq!(state.user_name, "Ada");
    }

    #[test]
    fn test_progress_by_domain_order() {
        let state = SessionState::default();
        let domains: Vec<Domain> = state.progress_by_domain().into_iter().map(|(d, _)| d).collect();
        assert_eq!(domains, Domain::ALL.to_vec());
    }
}
