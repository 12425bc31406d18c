//! Shared API types for the newsdesk news/analytics service.
//!
//! This crate is the single source of truth for request/response shapes
//! exchanged between the server, the typed client, and the CLI widgets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Shared Enums ────────────────────────────────────────────────────────────

/// Sentiment attached to a news article by the upstream provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Parse a provider sentiment string; anything unrecognized is dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Articles ────────────────────────────────────────────────────────────────

/// Named entity mentioned by an article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityMention {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub confidence: f64,
}

/// One financial news article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub entities: Vec<EntityMention>,
}

// ─── Heatmap ─────────────────────────────────────────────────────────────────

/// Per-sector aggregate derived from classified articles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorActivity {
    pub sector: String,
    pub count: usize,
    /// Average sentiment, -1 to 1.
    pub sentiment_score: f64,
    /// Share of all articles, 0 to 1.
    pub volume_score: f64,
    /// Average provider relevance, 0 to 1.
    pub relevance_score: f64,
    /// Average classification confidence, 0 to 1.
    pub confidence: f64,
    /// IDs of the articles classified into this sector.
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Visualization weight, 0 to 1.
    pub color_intensity: f64,
}

/// Headline facts extracted from a heatmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapSummary {
    pub most_active_sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_positive_sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_negative_sector: Option<String>,
    pub total_sectors: usize,
    pub average_sentiment: f64,
}

/// Full heatmap: per-sector rows sorted by volume plus the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeatmapReport {
    pub sectors: Vec<String>,
    pub heatmap_data: Vec<SectorActivity>,
    pub total_articles: usize,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<HeatmapSummary>,
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// GET /api/news/heatmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsHeatmapResponse {
    pub success: bool,
    pub heatmap_data: HeatmapReport,
    pub total_articles: usize,
    pub sectors_analyzed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// GET /api/news/articles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlesResponse {
    pub articles: Vec<NewsArticle>,
    pub count: usize,
}

/// GET /api/news/sectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorsResponse {
    pub sectors: Vec<String>,
}

/// GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_parse_is_case_insensitive() {
        assert_eq!(Sentiment::parse("Positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::parse("NEUTRAL"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::parse("bullish"), None);
    }

    #[test]
    fn article_roundtrip_omits_missing_options() {
        let article = NewsArticle {
            id: "a1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            url: "https://example.com".to_string(),
            published_at: "2026-01-01T00:00:00Z".to_string(),
            source: "example.com".to_string(),
            sentiment: None,
            relevance_score: None,
            entities: Vec::new(),
        };
        let json = serde_json::to_string(&article).unwrap();
        assert!(!json.contains("sentiment"));
        assert!(!json.contains("relevance_score"));
        let parsed: NewsArticle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, article);
    }

    #[test]
    fn entity_type_serializes_as_type() {
        let entity = EntityMention {
            name: "ACME".to_string(),
            entity_type: "equity".to_string(),
            confidence: 0.9,
        };
        let json = serde_json::to_string(&entity).unwrap();
        assert!(json.contains("\"type\":\"equity\""));
    }
}
