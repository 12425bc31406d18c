mod client;
mod context;

pub use client::NewsApiClient;
pub use context::heatmap_context;
