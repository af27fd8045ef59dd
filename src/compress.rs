use crate::io_struct::Message;
use crate::summarizer::Summarize;

/// Prefix of the synthetic system message that carries the summary.
pub const SUMMARY_MARKER: &str = "[history summary] ";

/// When to compress a conversation and how much of it to keep verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionPolicy {
    pub min_msgs_to_summarize: usize,
    pub max_recent_msgs: usize,
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        CompressionPolicy {
            min_msgs_to_summarize: 11,
            max_recent_msgs: 10,
        }
    }
}

impl CompressionPolicy {
    pub fn should_compress(&self, len: usize) -> bool {
        len > self.min_msgs_to_summarize
    }

    /// Summary message followed by the most recent `max_recent_msgs` messages.
    ///
    /// The tail is taken from the full sequence independently of which
    /// messages were summarized, so the two may overlap.
    pub fn assemble(&self, messages: &[Message], summary: &str) -> Vec<Message> {
        let start = messages.len().saturating_sub(self.max_recent_msgs);
        let mut compressed = Vec::with_capacity(1 + messages.len() - start);
        compressed.push(Message::system(format!("{}{}", SUMMARY_MARKER, summary)));
        compressed.extend_from_slice(&messages[start..]);
        compressed
    }

    /// Replace early history with a summary when the conversation is over the
    /// threshold.
    ///
    /// Sequences at or below the threshold are returned untouched without
    /// calling the summarizer, which makes the operation idempotent: its output
    /// is never longer than `max_recent_msgs + 1`. A failed summarization
    /// leaves the messages as they were.
    pub async fn compress_if_needed<S: Summarize>(
        &self,
        messages: Vec<Message>,
        summarizer: &S,
    ) -> Vec<Message> {
        if !self.should_compress(messages.len()) {
            return messages;
        }

        match summarizer.summarize_early(&messages).await {
            Ok(summary) => {
                let compressed = self.assemble(&messages, &summary);
                log::info!(
                    "Compressed conversation from {} to {} messages",
                    messages.len(),
                    compressed.len()
                );
                compressed
            }
            Err(e) => {
                log::warn!(
                    "Summarization failed, forwarding {} original messages: {}",
                    messages.len(),
                    e
                );
                messages
            }
        }
    }
}
