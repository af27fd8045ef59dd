use crate::config::ProxyConfig;
use crate::io_struct::{ChatRequest, ChatResponse, Message};
use crate::upstream::UpstreamClient;
use std::future::Future;

pub const HISTORY_DELIMITER: &str = "\n---\n";
pub const ELLIPSIS: &str = "...";

const SUMMARIZE_INSTRUCTION: &str = "Summarize the core of the following conversation in one \
    sentence of no more than 100 characters. Keep key facts and numbers.";

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("summarization upstream returned status {0}")]
    Status(u16),

    #[error("failed to decode summarization response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("summarization response has no choices")]
    EmptyChoices,
}

/// Produces a short synopsis of the oldest part of a conversation.
pub trait Summarize {
    fn summarize_early(
        &self,
        messages: &[Message],
    ) -> impl Future<Output = Result<String, SummarizeError>> + Send;
}

/// Number of leading messages that go into the summary: a third, at least one.
pub fn early_history_len(total: usize) -> usize {
    (total / 3).max(1)
}

/// Cut `text` to its first `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

pub fn joint_text(messages: &[Message], max_chars: usize) -> String {
    let joint = messages
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join(HISTORY_DELIMITER);
    truncate_chars(&joint, max_chars)
}

/// Summarizer backed by a single chat-completion call to the upstream.
#[derive(Debug, Clone)]
pub struct Summarizer {
    upstream: UpstreamClient,
    model: String,
    input_max_chars: usize,
    output_max_chars: usize,
}

impl Summarizer {
    pub fn new(upstream: UpstreamClient, config: &ProxyConfig) -> Self {
        Summarizer {
            upstream,
            model: config.summarize_model.clone(),
            input_max_chars: config.summary_input_max_chars,
            output_max_chars: config.summary_max_chars,
        }
    }

    pub fn build_request(&self, messages: &[Message]) -> ChatRequest {
        let n = early_history_len(messages.len()).min(messages.len());
        let joint = joint_text(&messages[..n], self.input_max_chars);
        ChatRequest::new(
            self.model.clone(),
            vec![Message::system(SUMMARIZE_INSTRUCTION), Message::user(joint)],
        )
    }

    fn finish(&self, raw: &str) -> String {
        truncate_chars(raw.trim(), self.output_max_chars)
    }
}

impl Summarize for Summarizer {
    async fn summarize_early(&self, messages: &[Message]) -> Result<String, SummarizeError> {
        let request = self.build_request(messages);
        log::debug!(
            "Summarizing {} of {} messages with {}",
            early_history_len(messages.len()).min(messages.len()),
            messages.len(),
            self.model
        );

        let resp = self.upstream.send(&request).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SummarizeError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&body).map_err(SummarizeError::Decode)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(SummarizeError::EmptyChoices)?;
        Ok(self.finish(&choice.message.content))
    }
}
