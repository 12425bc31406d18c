use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use newsdesk_api::{ArticlesResponse, NewsHeatmapResponse, SectorsResponse};
use newsdesk_news::NewsError;

use crate::error::ApiErr;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    /// Comma-separated sector filter.
    pub sectors: Option<String>,
    #[serde(default = "default_heatmap_limit")]
    pub limit: usize,
}

fn default_heatmap_limit() -> usize {
    50
}

#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    #[serde(default = "default_articles_limit")]
    pub limit: usize,
}

fn default_articles_limit() -> usize {
    20
}

/// GET /api/news/heatmap — sector heatmap over the latest articles.
pub async fn heatmap(
    State(state): State<AppState>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Json<NewsHeatmapResponse>, ApiErr> {
    tracing::info!("fetching news heatmap with limit={}", query.limit);

    let sector_filter: Option<Vec<String>> = query.sectors.as_deref().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    let articles = state
        .news
        .get_news(query.limit, false)
        .await
        .map_err(service_error)?;
    if articles.is_empty() {
        return Err(ApiErr::not_found("no news data available"));
    }

    let report = state.heatmap.generate(&articles, sector_filter.as_deref());

    Ok(Json(NewsHeatmapResponse {
        success: true,
        total_articles: articles.len(),
        sectors_analyzed: report.sectors.clone(),
        last_updated: state.news.last_updated().await,
        heatmap_data: report,
    }))
}

/// GET /api/news/articles — raw article listing.
pub async fn articles(
    State(state): State<AppState>,
    Query(query): Query<ArticlesQuery>,
) -> Result<Json<ArticlesResponse>, ApiErr> {
    let articles = state
        .news
        .get_news(query.limit, false)
        .await
        .map_err(service_error)?;
    Ok(Json(ArticlesResponse {
        count: articles.len(),
        articles,
    }))
}

/// GET /api/news/sectors — sectors available for analysis.
pub async fn sectors(State(state): State<AppState>) -> Json<SectorsResponse> {
    Json(SectorsResponse {
        sectors: state.heatmap.available_sectors(),
    })
}

fn service_error(err: NewsError) -> ApiErr {
    tracing::error!("news service error: {err}");
    ApiErr::internal(format!("error fetching news: {err}"))
}
