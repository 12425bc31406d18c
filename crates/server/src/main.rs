mod error;
mod routes;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use newsdesk_news::{HeatmapService, NewsService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub news: Arc<NewsService>,
    pub heatmap: HeatmapService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsdesk_server=info,tower_http=info".into()),
        )
        .init();

    let api_key = std::env::var("MARKETAUX_API_KEY")
        .ok()
        .filter(|s| !s.is_empty());

    let state = AppState {
        news: Arc::new(NewsService::new(api_key)),
        heatmap: HeatmapService::new(),
    };

    let api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/news/heatmap", get(routes::news::heatmap))
        .route("/news/articles", get(routes::news::articles))
        .route("/news/sectors", get(routes::news::sectors));

    let app = Router::new()
        .route("/", get(routes::health::root))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let port = std::env::var("NEWSDESK_PORT").unwrap_or_else(|_| "8001".into());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("news analysis API listening on port {port}");
    axum::serve(listener, app).await?;

    Ok(())
}
