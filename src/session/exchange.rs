//! The streamed-response exchange.
//!
//! An exchange moves through `Idle -> AwaitingResponse -> Streaming -> Settled`.
//! It only starts when the transcript ends in a non-assistant message; it settles by
//! committing the assembled reply, refreshing token usage with a second, non-streamed
//! call over the same history, and crediting progress to the selected domain.

use crate::llm::client::LlmClient;
use crate::llm::gateway::StreamDelta;
use crate::llm::models::{LlmMessage, TokenUsage};
use crate::notice::Notices;
use crate::session::state::SessionState;
use crate::study::prompts::{system_instructions, StudySelection};
use futures::stream::StreamExt;
use serde::Serialize;
use tracing::{debug, info};

/// Transient marker appended to the placeholder while deltas are arriving.
pub const CURSOR: char = '▌';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangePhase {
    Idle,
    AwaitingResponse,
    Streaming,
    Settled,
}

/// Progress notifications emitted while an exchange runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEvent {
    Phase(ExchangePhase),
    /// Current placeholder text, cursor included while streaming.
    Partial(String),
}

/// Concatenates stream deltas in arrival order.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    text: String,
    chunks: usize,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta; returns false when it carried no text.
    pub fn push(&mut self, delta: StreamDelta) -> bool {
        match delta {
            Some(content) if !content.is_empty() => {
                self.text.push_str(&content);
                self.chunks += 1;
                true
            }
            _ => false,
        }
    }

    pub fn placeholder(&self) -> String {
        let mut rendered = self.text.clone();
        rendered.push(CURSOR);
        rendered
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn finish(self) -> String {
        self.text
    }
}

/// What a settled exchange changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    pub reply: String,
    pub usage: TokenUsage,
    pub progress: u8,
}

/// The instruction message followed by the whole transcript.
pub fn outbound_messages(session: &SessionState, selection: &StudySelection) -> Vec<LlmMessage> {
    let mut messages = Vec::with_capacity(session.messages().len() + 1);
    messages.push(LlmMessage::system(system_instructions(&session.user_name, selection)));
    messages.extend_from_slice(session.messages());
    messages
}

/// Run one exchange if the transcript is waiting on the assistant.
///
/// Returns `None` (and stays idle) when no response is owed. Failures are reported
/// through `notices`; a failed stream still commits whatever text arrived, possibly
/// an empty reply.
pub async fn respond<F>(
    client: &LlmClient,
    session: &mut SessionState,
    selection: &StudySelection,
    notices: &mut Notices,
    mut observe: F,
) -> Option<ExchangeOutcome>
where
    F: FnMut(ExchangeEvent) + Send,
{
    if !session.needs_response() {
        observe(ExchangeEvent::Phase(ExchangePhase::Idle));
        return None;
    }

    observe(ExchangeEvent::Phase(ExchangePhase::AwaitingResponse));
    let outbound = outbound_messages(session, selection);
    let mut assembler = StreamAssembler::new();

    {
        let mut stream = client.stream_complete(&outbound, notices);
        observe(ExchangeEvent::Phase(ExchangePhase::Streaming));

        while let Some(delta) = stream.next().await {
            if assembler.push(delta) {
                observe(ExchangeEvent::Partial(assembler.placeholder()));
            }
        }
    }

    debug!(chunks = assembler.chunks(), "Stream finished");
    observe(ExchangeEvent::Partial(assembler.text().to_string()));

    let reply = assembler.finish();
    session.push(LlmMessage::assistant(reply.clone()));

    // The streaming transport does not report usage, so the same history (reply
    // included) is sent once more without streaming to obtain token counts.
    let counted = client.complete(&outbound_messages(session, selection), notices).await;
    session.token_count.add(counted.usage);

    let progress = session.record_exchange(selection.domain);
    info!(
        model = client.model(),
        domain = %selection.domain,
        progress,
        reply_len = reply.len(),
        prompt_tokens = counted.usage.prompt_tokens,
        completion_tokens = counted.usage.completion_tokens,
        "Exchange settled"
    );
    observe(ExchangeEvent::Phase(ExchangePhase::Settled));

    Some(ExchangeOutcome {
        reply,
        usage: counted.usage,
        progress,
    })
}
