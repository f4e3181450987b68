//! Conversation state for the chat pages.
//!
//! The transcript is append-only: entries are only ever pushed to the end and
//! never edited or removed, so insertion order is display order. Both chat
//! page variants drive the same state through [`Conversation::begin_send`] and
//! [`Conversation::finish_send`].

use crate::dispatch::{self, DispatchOutcome};

/// Greeting seeded into every fresh conversation.
pub const GREETING: &str = "Hello! I'm your AI assistant for exploring ocean data. \
     Please upload a NetCDF file first, then ask me a question about it.";

/// One transcript entry, either side of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Unique within the conversation: epoch milliseconds plus a sequence
    /// suffix, so two sends inside the same millisecond stay distinct.
    pub id: String,
    pub content: String,
    pub is_user: bool,
    /// Wall-clock label captured when the entry was created.
    pub timestamp: String,
    /// When set, `content` is a complete HTML document to render verbatim
    /// instead of markdown text.
    pub is_html: bool,
}

#[derive(Debug, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
    loading: bool,
    seq: u64,
}

impl Conversation {
    /// Start a conversation already holding the assistant greeting.
    pub fn seeded(now_ms: f64, timestamp: String) -> Self {
        let mut conversation = Self::default();
        let id = conversation.next_id(now_ms);
        conversation.messages.push(Message {
            id,
            content: GREETING.to_string(),
            is_user: false,
            timestamp,
            is_html: false,
        });
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while a dispatched request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record the user's side of a send and enter the loading state.
    ///
    /// Only one request may be in flight per conversation; a send attempted
    /// while one is outstanding is rejected and must not reach the network.
    /// Returns whether the send was accepted.
    pub fn begin_send(&mut self, content: String, now_ms: f64, timestamp: String) -> bool {
        if self.loading {
            return false;
        }
        let id = self.next_id(now_ms);
        self.messages.push(Message {
            id,
            content,
            is_user: true,
            timestamp,
            is_html: false,
        });
        self.loading = true;
        true
    }

    /// Record the outcome of the outstanding request and leave the loading
    /// state. Failures become an apology message in the transcript.
    pub fn finish_send(
        &mut self,
        outcome: Result<DispatchOutcome, String>,
        now_ms: f64,
        timestamp: String,
    ) {
        let id = self.next_id(now_ms);
        let (content, is_html) = match outcome {
            Ok(DispatchOutcome::Text(text)) => (text, false),
            Ok(DispatchOutcome::Html(document)) => (document, true),
            Err(description) => (dispatch::apology(&description), false),
        };
        self.messages.push(Message {
            id,
            content,
            is_user: false,
            timestamp,
            is_html,
        });
        self.loading = false;
    }

    fn next_id(&mut self, now_ms: f64) -> String {
        let id = format!("{}-{}", now_ms as u64, self.seq);
        self.seq += 1;
        id
    }
}
