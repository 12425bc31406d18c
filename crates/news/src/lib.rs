pub mod heatmap;
pub mod service;

pub use heatmap::HeatmapService;
pub use service::{ApiUsage, NewsError, NewsService};
