pub mod client;
pub mod protocol;
pub mod session;

pub use client::{AgentClient, RunHandle};
pub use protocol::{ResearchRequest, StreamEvent};
pub use session::ResearchSession;
