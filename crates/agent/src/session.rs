//! Local conversation state for one research session.

use newsdesk_core::{
    classify_update, compose_submission, ActivityRecord, ActivityTimelines, ChatMessage,
    SearchBudget,
};

use crate::protocol::{ResearchRequest, StreamEvent};

/// Optimistic local buffer for a research conversation.
///
/// Owns the message list, the loading flag, the error text, any pending
/// background context, and the activity timelines. Every applied stream
/// event is followed by a synthesized settle notification into the
/// accumulator, which keeps the archive transition independent of how the
/// surrounding surface re-renders.
#[derive(Debug, Default)]
pub struct ResearchSession {
    messages: Vec<ChatMessage>,
    timelines: ActivityTimelines,
    is_loading: bool,
    error: Option<String>,
    background_context: Option<String>,
}

impl ResearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stash widget-forwarded context for the next submission.
    pub fn set_background_context(&mut self, context: impl Into<String>) {
        self.background_context = Some(context.into());
    }

    pub fn background_context(&self) -> Option<&str> {
        self.background_context.as_deref()
    }

    /// Begin a new exchange.
    ///
    /// Composes the submission text (consuming any pending background
    /// context), appends the user's message, resets the live timeline and
    /// raises the loading flag. Returns the payload to hand to the
    /// transport.
    pub fn submit(&mut self, input: &str, effort: &str, reasoning_model: &str) -> ResearchRequest {
        let context = self.background_context.take();
        let text = compose_submission(context.as_deref(), input);

        self.messages.push(ChatMessage::human(text));
        self.timelines.on_submit();
        self.is_loading = true;
        self.error = None;

        ResearchRequest::new(
            self.messages.clone(),
            SearchBudget::from_effort(effort),
            reasoning_model,
        )
    }

    /// Apply one stream notification, then settle.
    pub fn apply(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Update(update) => {
                if let Some(summary) = classify_update(&update) {
                    self.timelines.on_event(summary);
                }
            }
            StreamEvent::Message(message) => self.upsert_message(message),
            StreamEvent::Done => self.is_loading = false,
            StreamEvent::Error(message) => {
                self.error = Some(message);
                self.is_loading = false;
            }
        }
        self.timelines
            .on_stream_settled(&self.messages, self.is_loading);
    }

    /// Streamed messages grow in place: a frame sharing an existing id
    /// replaces that entry, anything else appends.
    fn upsert_message(&mut self, message: ChatMessage) {
        if let Some(id) = message.id.as_deref() {
            if let Some(existing) = self
                .messages
                .iter_mut()
                .find(|m| m.id.as_deref() == Some(id))
            {
                *existing = message;
                return;
            }
        }
        self.messages.push(message);
    }

    /// Stop semantics: the surrounding surface tears the subscription down
    /// and starts over, discarding all live state. Nothing is persisted.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Trace of the exchange currently in flight.
    pub fn activity(&self) -> &[ActivityRecord] {
        self.timelines.live()
    }

    /// Frozen trace for a completed exchange.
    pub fn archived_activity(&self, message_id: &str) -> Option<&[ActivityRecord]> {
        self.timelines.archived(message_id)
    }
}
