//! News fetching from the MarketAux API with caching and quota accounting.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use newsdesk_api::{EntityMention, NewsArticle, Sentiment};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://api.marketaux.com/v1";
const CACHE_TTL_SECS: i64 = 3600;
const MAX_QUERIES_PER_DAY: u32 = 100;
/// MarketAux caps a single request at 100 articles.
const PROVIDER_MAX_LIMIT: usize = 100;
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news provider API key not configured")]
    MissingApiKey,
    #[error("daily API limit reached ({0} queries)")]
    QuotaExhausted(u32),
    #[error("API request failed: {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid response format from news provider")]
    InvalidResponse,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Quota/cache introspection for operators.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiUsage {
    pub daily_queries_used: u32,
    pub daily_queries_limit: u32,
    pub queries_remaining: u32,
    pub last_cache_update: Option<DateTime<Utc>>,
    pub cache_valid: bool,
}

struct NewsCache {
    articles: Vec<NewsArticle>,
    fetched_at: DateTime<Utc>,
}

struct ServiceState {
    cache: Option<NewsCache>,
    daily_query_count: u32,
    last_query_reset: NaiveDate,
}

/// Fetches and caches financial news, respecting the provider's rate limits.
///
/// One upstream query per cache window; a stale cache is still served when a
/// refresh fails.
pub struct NewsService {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    state: Mutex<ServiceState>,
}

impl NewsService {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("MARKETAUX_API_KEY not set; news fetches will fail");
        }
        Self {
            http: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            state: Mutex::new(ServiceState {
                cache: None,
                daily_query_count: 0,
                last_query_reset: Utc::now().date_naive(),
            }),
        }
    }

    /// Point the service at a different provider endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Get news articles, serving from cache while it is fresh.
    pub async fn get_news(&self, limit: usize, force_refresh: bool) -> Result<Vec<NewsArticle>, NewsError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        reset_quota_if_new_day(&mut state, now.date_naive());

        if !force_refresh {
            if let Some(cache) = &state.cache {
                if cache_is_valid(cache.fetched_at, now) {
                    info!("serving news from cache");
                    return Ok(truncated(&cache.articles, limit));
                }
            }
        }

        match self.fetch_from_provider(&mut state, limit).await {
            Ok(articles) => {
                state.cache = Some(NewsCache {
                    articles: articles.clone(),
                    fetched_at: now,
                });
                info!("fetched {} news articles", articles.len());
                Ok(truncated(&articles, limit))
            }
            Err(err) => {
                if let Some(cache) = &state.cache {
                    warn!("news refresh failed, serving expired cache: {err}");
                    return Ok(truncated(&cache.articles, limit));
                }
                Err(err)
            }
        }
    }

    /// Timestamp of the last successful fetch.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.cache.as_ref().map(|c| c.fetched_at)
    }

    /// Quota and cache status.
    pub async fn usage(&self) -> ApiUsage {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        reset_quota_if_new_day(&mut state, now.date_naive());
        ApiUsage {
            daily_queries_used: state.daily_query_count,
            daily_queries_limit: MAX_QUERIES_PER_DAY,
            queries_remaining: MAX_QUERIES_PER_DAY.saturating_sub(state.daily_query_count),
            last_cache_update: state.cache.as_ref().map(|c| c.fetched_at),
            cache_valid: state
                .cache
                .as_ref()
                .is_some_and(|c| cache_is_valid(c.fetched_at, now)),
        }
    }

    async fn fetch_from_provider(
        &self,
        state: &mut ServiceState,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, NewsError> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::MissingApiKey)?;
        if state.daily_query_count >= MAX_QUERIES_PER_DAY {
            return Err(NewsError::QuotaExhausted(MAX_QUERIES_PER_DAY));
        }

        let url = format!("{}/news/all", self.base_url);
        let limit = limit.min(PROVIDER_MAX_LIMIT).to_string();
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("api_token", api_key),
                ("language", "en"),
                ("limit", limit.as_str()),
                ("exchanges", "NYSE,NASDAQ"),
                ("filter_entities", "true"),
                ("sentiment", "true"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!("news provider error: {status} - {body}");
            return Err(NewsError::Status(status));
        }

        let body: Value = resp.json().await?;
        let raw = body
            .get("data")
            .and_then(|v| v.as_array())
            .ok_or(NewsError::InvalidResponse)?;

        state.daily_query_count += 1;
        info!(
            "news provider call ok, daily count: {}",
            state.daily_query_count
        );

        Ok(raw.iter().map(parse_article).collect())
    }
}

fn cache_is_valid(fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - fetched_at < TimeDelta::seconds(CACHE_TTL_SECS)
}

fn reset_quota_if_new_day(state: &mut ServiceState, today: NaiveDate) {
    if today > state.last_query_reset {
        state.daily_query_count = 0;
        state.last_query_reset = today;
    }
}

fn truncated(articles: &[NewsArticle], limit: usize) -> Vec<NewsArticle> {
    articles.iter().take(limit).cloned().collect()
}

fn str_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Parse one raw provider article, degrading missing fields to defaults.
pub fn parse_article(raw: &Value) -> NewsArticle {
    let title = str_field(raw, "title");
    let id = raw
        .get("uuid")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| title_hash_id(&title));

    let sentiment = raw
        .get("sentiment")
        .and_then(|v| v.as_str())
        .and_then(Sentiment::parse);

    let entities = raw
        .get("entities")
        .and_then(|v| v.as_array())
        .map(|list| {
            list.iter()
                .map(|e| EntityMention {
                    name: str_field(e, "name"),
                    entity_type: str_field(e, "type"),
                    confidence: e.get("confidence").and_then(|v| v.as_f64()).unwrap_or(0.0),
                })
                .collect()
        })
        .unwrap_or_default();

    NewsArticle {
        id,
        title,
        description: str_field(raw, "description"),
        url: str_field(raw, "url"),
        published_at: str_field(raw, "published_at"),
        source: str_field(raw, "source"),
        sentiment,
        relevance_score: raw.get("relevance_score").and_then(|v| v.as_f64()),
        entities,
    }
}

fn title_hash_id(title: &str) -> String {
    let mut hasher = DefaultHasher::new();
    title.hash(&mut hasher);
    hasher.finish().to_string()
}
