//! Wire types for the research runtime's subscribe/submit/cancel contract.
//!
//! Frames travel as JSON text, tagged by a `type` field. The runtime itself
//! is an external collaborator; this module only fixes the shapes both
//! sides exchange.

use newsdesk_core::{ChatMessage, SearchBudget};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Submission payload sent to the research runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResearchRequest {
    pub messages: Vec<ChatMessage>,
    pub initial_search_query_count: u32,
    pub max_research_loops: u32,
    pub reasoning_model: String,
}

impl ResearchRequest {
    pub fn new(messages: Vec<ChatMessage>, budget: SearchBudget, reasoning_model: &str) -> Self {
        Self {
            messages,
            initial_search_query_count: budget.initial_search_query_count,
            max_research_loops: budget.max_research_loops,
            reasoning_model: reasoning_model.to_string(),
        }
    }
}

/// One notification delivered by a research stream subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental progress update from a research phase.
    Update(Value),
    /// The message list grew, or an in-flight message was replaced.
    Message(ChatMessage),
    /// The run finished; the loading flag drops.
    Done,
    /// Stream-level failure, terminal for the run.
    Error(String),
}

impl StreamEvent {
    /// Decode one wire frame. Unknown or malformed frames map to `None`.
    pub fn decode(frame: &str) -> Option<StreamEvent> {
        let value: Value = serde_json::from_str(frame).ok()?;
        match value.get("type")?.as_str()? {
            "update" => value.get("payload").cloned().map(StreamEvent::Update),
            "message" => {
                let payload = value.get("payload")?.clone();
                serde_json::from_value(payload).ok().map(StreamEvent::Message)
            }
            "done" => Some(StreamEvent::Done),
            "error" => Some(StreamEvent::Error(
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("stream error")
                    .to_string(),
            )),
            _ => None,
        }
    }
}

/// Frame carrying a new submission.
pub fn submit_frame(request: &ResearchRequest) -> serde_json::Result<String> {
    serde_json::to_string(&serde_json::json!({
        "type": "submit",
        "payload": request,
    }))
}

/// Frame asking the runtime to abandon the in-flight run.
pub fn cancel_frame() -> String {
    r#"{"type":"cancel"}"#.to_string()
}
