//! Classification of incremental research-stream updates.
//!
//! The remote runtime reports progress as JSON objects keyed by the phase
//! that produced them. Each recognized phase maps to one short, displayable
//! [`ActivityRecord`]; anything else is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One observed phase of a single research exchange. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRecord {
    pub title: String,
    pub data: String,
}

/// The research stages the stream reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResearchPhase {
    GenerateQuery,
    WebResearch,
    Reflection,
    Finalize,
}

impl ResearchPhase {
    /// All phases, in classification order. A frame carrying more than one
    /// phase key is classified by the first match.
    pub const ALL: [ResearchPhase; 4] = [
        ResearchPhase::GenerateQuery,
        ResearchPhase::WebResearch,
        ResearchPhase::Reflection,
        ResearchPhase::Finalize,
    ];

    /// Key naming this phase inside a stream update.
    pub fn key(&self) -> &'static str {
        match self {
            Self::GenerateQuery => "generate_query",
            Self::WebResearch => "web_research",
            Self::Reflection => "reflection",
            Self::Finalize => "finalize_answer",
        }
    }

    /// Display title shown in the activity timeline.
    pub fn title(&self) -> &'static str {
        match self {
            Self::GenerateQuery => "Generating Search Queries",
            Self::WebResearch => "Web Research",
            Self::Reflection => "Reflection",
            Self::Finalize => "Finalizing Answer",
        }
    }

    /// The terminal phase of an exchange.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalize)
    }
}

/// A classified update: the phase it belongs to plus the record to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSummary {
    pub phase: ResearchPhase,
    pub record: ActivityRecord,
}

/// Classify one incremental update from the research stream.
///
/// Returns `None` for updates carrying none of the recognized phase keys.
/// Malformed payload fields degrade to empty/zero values.
pub fn classify_update(update: &Value) -> Option<PhaseSummary> {
    for phase in ResearchPhase::ALL {
        let Some(payload) = update.get(phase.key()) else {
            continue;
        };
        let data = match phase {
            ResearchPhase::GenerateQuery => joined_queries(payload),
            ResearchPhase::WebResearch => source_summary(payload),
            ResearchPhase::Reflection => "Analysing Web Research Results".to_string(),
            ResearchPhase::Finalize => "Composing and presenting the final answer.".to_string(),
        };
        return Some(PhaseSummary {
            phase,
            record: ActivityRecord {
                title: phase.title().to_string(),
                data,
            },
        });
    }
    None
}

fn joined_queries(payload: &Value) -> String {
    payload
        .get("query_list")
        .and_then(|v| v.as_array())
        .map(|list| {
            list.iter()
                .filter_map(|q| q.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn source_summary(payload: &Value) -> String {
    static EMPTY: Vec<Value> = Vec::new();
    let sources = payload
        .get("sources_gathered")
        .and_then(|v| v.as_array())
        .unwrap_or(&EMPTY);

    // Up to three distinct non-empty labels, insertion order.
    let mut labels: Vec<&str> = Vec::new();
    for source in sources {
        let Some(label) = source.get("label").and_then(|v| v.as_str()) else {
            continue;
        };
        if label.is_empty() || labels.contains(&label) {
            continue;
        }
        labels.push(label);
        if labels.len() == 3 {
            break;
        }
    }

    let related = if labels.is_empty() {
        "N/A".to_string()
    } else {
        labels.join(", ")
    };
    format!("Gathered {} sources. Related to: {}.", sources.len(), related)
}
