//! Live and archived research traces for one chat session.

use std::collections::HashMap;

use crate::activity::{ActivityRecord, PhaseSummary};
use crate::message::{ChatMessage, Role};

/// Accumulates the activity trace of the in-flight exchange and freezes it
/// into a per-message archive once the exchange completes.
///
/// State lives for the session only; nothing here is persisted. All three
/// pieces of state are explicit fields so the transitions stay auditable:
/// the live trace, the archive keyed by completed assistant-message id, and
/// the latch that gates the archive transition.
#[derive(Debug, Default, Clone)]
pub struct ActivityTimelines {
    live: Vec<ActivityRecord>,
    history: HashMap<String, Vec<ActivityRecord>>,
    finalize_pending: bool,
}

impl ActivityTimelines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new exchange: drop the live trace and the latch.
    ///
    /// Invoked at the start of every user submission, including ones with a
    /// background-context preamble.
    pub fn on_submit(&mut self) {
        self.live.clear();
        self.finalize_pending = false;
    }

    /// Record one classified update in arrival order, latching on the
    /// terminal phase. No deduplication, no size bound.
    pub fn on_event(&mut self, summary: PhaseSummary) {
        if summary.phase.is_terminal() {
            self.finalize_pending = true;
        }
        self.live.push(summary.record);
    }

    /// Settle notification, synthesized by the caller whenever the message
    /// list or loading flag changes.
    ///
    /// Archives the live trace under the last message's identity when the
    /// terminal phase was observed, the stream is idle, and that message is
    /// assistant-authored with an id. Any failed guard makes this a no-op,
    /// and the cleared latch makes re-invocation after an archive a no-op.
    pub fn on_stream_settled(&mut self, messages: &[ChatMessage], is_loading: bool) {
        if !self.finalize_pending || is_loading {
            return;
        }
        let Some(last) = messages.last() else {
            return;
        };
        if last.role != Role::Ai {
            return;
        }
        let Some(id) = last.id.clone() else {
            return;
        };

        // Moving the vec freezes the trace: later live appends cannot
        // retroactively alter the archived copy.
        self.history.insert(id, std::mem::take(&mut self.live));
        self.finalize_pending = false;
    }

    /// Trace of the exchange currently in flight.
    pub fn live(&self) -> &[ActivityRecord] {
        &self.live
    }

    /// Frozen trace for a completed exchange, if one was archived.
    pub fn archived(&self, message_id: &str) -> Option<&[ActivityRecord]> {
        self.history.get(message_id).map(Vec::as_slice)
    }

    /// Whether the terminal phase has been observed for the current exchange.
    pub fn is_finalize_pending(&self) -> bool {
        self.finalize_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::classify_update;
    use serde_json::json;

    fn summary(value: serde_json::Value) -> PhaseSummary {
        classify_update(&value).unwrap()
    }

    fn ai_message(id: &str) -> ChatMessage {
        ChatMessage {
            id: Some(id.to_string()),
            role: Role::Ai,
            content: "answer".to_string(),
        }
    }

    #[test]
    fn records_arrive_in_order() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "generate_query": { "query_list": ["q"] } })));
        timelines.on_event(summary(json!({ "reflection": {} })));
        let titles: Vec<&str> = timelines.live().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Generating Search Queries", "Reflection"]);
        assert!(!timelines.is_finalize_pending());
    }

    #[test]
    fn archives_after_finalize_and_settle() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_submit();
        timelines.on_event(summary(json!({ "generate_query": { "query_list": ["q"] } })));
        timelines.on_event(summary(json!({ "finalize_answer": {} })));
        assert!(timelines.is_finalize_pending());

        let live_before: Vec<ActivityRecord> = timelines.live().to_vec();
        let messages = vec![ChatMessage::human("question"), ai_message("m1")];
        timelines.on_stream_settled(&messages, false);

        assert_eq!(timelines.archived("m1").unwrap(), live_before.as_slice());
        assert!(timelines.live().is_empty());
        assert!(!timelines.is_finalize_pending());
    }

    #[test]
    fn settle_is_idempotent_after_archive() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "finalize_answer": {} })));
        let messages = vec![ai_message("m1")];
        timelines.on_stream_settled(&messages, false);
        let archived: Vec<ActivityRecord> = timelines.archived("m1").unwrap().to_vec();

        // Second settle: latch is clear, nothing changes.
        timelines.on_event(summary(json!({ "reflection": {} })));
        timelines.on_stream_settled(&messages, false);
        assert_eq!(timelines.archived("m1").unwrap(), archived.as_slice());
        assert_eq!(timelines.live().len(), 1);
    }

    #[test]
    fn no_archive_while_loading() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "finalize_answer": {} })));
        timelines.on_stream_settled(&[ai_message("m1")], true);
        assert!(timelines.archived("m1").is_none());
        assert!(timelines.is_finalize_pending());
    }

    #[test]
    fn no_archive_without_messages_or_identity() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "finalize_answer": {} })));

        timelines.on_stream_settled(&[], false);
        assert!(timelines.is_finalize_pending());

        let anonymous = ChatMessage {
            id: None,
            role: Role::Ai,
            content: "answer".to_string(),
        };
        timelines.on_stream_settled(&[anonymous], false);
        assert!(timelines.is_finalize_pending());
    }

    #[test]
    fn no_archive_when_last_message_is_human() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "finalize_answer": {} })));
        timelines.on_stream_settled(&[ChatMessage::human("follow-up")], false);
        assert!(timelines.is_finalize_pending());
        assert_eq!(timelines.live().len(), 1);
    }

    #[test]
    fn no_archive_without_finalize_event() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "reflection": {} })));
        timelines.on_stream_settled(&[ai_message("m1")], false);
        assert!(timelines.archived("m1").is_none());
    }

    #[test]
    fn submit_resets_live_and_latch() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "finalize_answer": {} })));
        timelines.on_submit();
        assert!(timelines.live().is_empty());
        assert!(!timelines.is_finalize_pending());
    }

    #[test]
    fn archive_survives_next_exchange() {
        let mut timelines = ActivityTimelines::new();
        timelines.on_event(summary(json!({ "finalize_answer": {} })));
        timelines.on_stream_settled(&[ai_message("m1")], false);

        timelines.on_submit();
        timelines.on_event(summary(json!({ "generate_query": { "query_list": ["next"] } })));

        let archived = timelines.archived("m1").unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].title, "Finalizing Answer");
    }
}
