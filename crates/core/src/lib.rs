pub mod activity;
pub mod compose;
pub mod message;
pub mod timeline;

pub use activity::{classify_update, ActivityRecord, PhaseSummary, ResearchPhase};
pub use compose::{compose_submission, EffortLevel, SearchBudget};
pub use message::{ChatMessage, Role};
pub use timeline::ActivityTimelines;
