//! Submission composition: background-context preambles and effort budgets.

use serde::{Deserialize, Serialize};

/// Prepend forwarded widget context to the user's input, when present.
pub fn compose_submission(background: Option<&str>, input: &str) -> String {
    match background {
        Some(context) => format!("Background Context:\n{context}\n\nUser Query:\n{input}"),
        None => input.to_string(),
    }
}

/// Effort selector for a research run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl EffortLevel {
    pub fn parse(selector: &str) -> Option<Self> {
        match selector {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search budget sent with a submission.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchBudget {
    pub initial_search_query_count: u32,
    pub max_research_loops: u32,
}

impl SearchBudget {
    /// Map an effort selector to a budget. Unrecognized selectors get a
    /// zero budget.
    pub fn from_effort(selector: &str) -> Self {
        match EffortLevel::parse(selector) {
            Some(EffortLevel::Low) => Self {
                initial_search_query_count: 1,
                max_research_loops: 1,
            },
            Some(EffortLevel::Medium) => Self {
                initial_search_query_count: 3,
                max_research_loops: 3,
            },
            Some(EffortLevel::High) => Self {
                initial_search_query_count: 5,
                max_research_loops: 10,
            },
            None => Self::default(),
        }
    }
}
