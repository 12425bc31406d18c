//! Sector classification and heatmap generation over news articles.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Utc;
use newsdesk_api::{HeatmapReport, HeatmapSummary, NewsArticle, SectorActivity, Sentiment};
use regex::Regex;
use tracing::info;

/// Keyword table driving sector classification.
const SECTOR_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Technology",
        &[
            "tech", "software", "ai", "artificial intelligence", "machine learning", "cloud",
            "cybersecurity", "semiconductor", "chip", "digital", "platform", "app", "mobile",
            "internet", "social media", "blockchain", "crypto", "bitcoin", "ethereum", "web3",
            "metaverse", "vr", "ar", "iot",
        ],
    ),
    (
        "Healthcare",
        &[
            "healthcare", "medical", "pharmaceutical", "biotech", "drug", "treatment", "therapy",
            "vaccine", "hospital", "clinic", "diagnostic", "device", "fda", "clinical trial",
            "patient", "doctor", "insurance", "medicare", "medicaid", "telemedicine",
            "digital health",
        ],
    ),
    (
        "Finance",
        &[
            "bank", "financial", "investment", "trading", "stock", "market", "fund", "etf",
            "bond", "credit", "loan", "mortgage", "insurance", "payment", "fintech",
            "cryptocurrency", "blockchain", "digital currency", "crypto", "bitcoin", "ethereum",
            "defi", "nft",
        ],
    ),
    (
        "Energy",
        &[
            "energy", "oil", "gas", "renewable", "solar", "wind", "nuclear", "electric",
            "utility", "petroleum", "refinery", "drilling", "exploration", "green energy",
            "clean energy", "carbon", "emission", "climate", "environmental", "battery", "ev",
            "electric vehicle",
        ],
    ),
    (
        "Consumer",
        &[
            "retail", "consumer", "e-commerce", "amazon", "walmart", "target", "shopping",
            "brand", "product", "fashion", "apparel", "food", "beverage", "restaurant", "hotel",
            "travel", "entertainment", "media", "streaming", "netflix", "disney", "gaming",
        ],
    ),
    (
        "Industrial",
        &[
            "industrial", "manufacturing", "automotive", "aerospace", "defense", "construction",
            "materials", "steel", "aluminum", "chemical", "machinery", "equipment", "logistics",
            "supply chain", "transportation", "shipping", "railroad", "airline",
        ],
    ),
    (
        "Real Estate",
        &[
            "real estate", "property", "housing", "commercial", "residential", "reit",
            "mortgage", "construction", "development", "leasing", "rental", "apartment",
            "office", "retail space",
        ],
    ),
    (
        "Communications",
        &[
            "telecom", "communication", "wireless", "5g", "internet", "broadband", "cable",
            "satellite", "network", "infrastructure", "at&t", "verizon", "t-mobile", "sprint",
        ],
    ),
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "this", "that", "these",
    "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

const TITLE_MATCH_BONUS: f64 = 2.0;
const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;
const TOP_KEYWORDS: usize = 10;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("keyword regex"));

fn sentiment_weight(sentiment: Sentiment) -> f64 {
    match sentiment {
        Sentiment::Positive => 1.0,
        Sentiment::Neutral => 0.0,
        Sentiment::Negative => -1.0,
    }
}

/// Derives per-sector activity heatmaps from classified articles.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeatmapService;

impl HeatmapService {
    pub fn new() -> Self {
        Self
    }

    /// Classify one article into a sector with a normalized confidence.
    ///
    /// Keyword occurrences score 1.0 each, with a bonus for title matches;
    /// articles matching nothing fall into "Other".
    pub fn classify_article(&self, article: &NewsArticle) -> (String, f64) {
        let text = format!("{} {}", article.title, article.description).to_lowercase();
        let title = article.title.to_lowercase();

        let mut best: (&str, f64) = ("Other", 0.0);
        let mut total = 0.0;
        for (sector, keywords) in SECTOR_KEYWORDS {
            let mut score = 0.0;
            for keyword in *keywords {
                let count = text.matches(keyword).count();
                if count > 0 {
                    score += count as f64;
                    if title.contains(keyword) {
                        score += TITLE_MATCH_BONUS;
                    }
                }
            }
            total += score;
            if score > best.1 {
                best = (sector, score);
            }
        }

        if best.1 <= 0.0 {
            return ("Other".to_string(), 0.0);
        }
        let confidence = (best.1 / total).min(1.0);
        (best.0.to_string(), confidence)
    }

    /// Generate the heatmap, optionally restricted to the given sectors.
    pub fn generate(&self, articles: &[NewsArticle], sectors: Option<&[String]>) -> HeatmapReport {
        info!("generating heatmap for {} articles", articles.len());

        let mut by_sector: Vec<(String, Vec<&NewsArticle>, Vec<f64>)> = Vec::new();
        for article in articles {
            let (sector, confidence) = self.classify_article(article);
            if let Some(wanted) = sectors {
                if !wanted.contains(&sector) {
                    continue;
                }
            }
            match by_sector.iter_mut().find(|(name, _, _)| *name == sector) {
                Some((_, list, confidences)) => {
                    list.push(article);
                    confidences.push(confidence);
                }
                None => by_sector.push((sector, vec![article], vec![confidence])),
            }
        }

        let total_articles = articles.len();
        let mut rows: Vec<SectorActivity> = by_sector
            .into_iter()
            .map(|(sector, list, confidences)| {
                let sentiment = sentiment_score(&list);
                let volume = volume_score(list.len(), total_articles);
                let relevance = relevance_score(&list);
                let avg_confidence = confidences.iter().sum::<f64>() / confidences.len() as f64;
                SectorActivity {
                    keywords: extract_keywords(&list),
                    articles: list.iter().map(|a| a.id.clone()).collect(),
                    count: list.len(),
                    sentiment_score: round3(sentiment),
                    volume_score: round3(volume),
                    relevance_score: round3(relevance),
                    confidence: round3(avg_confidence),
                    color_intensity: color_intensity(sentiment, volume, relevance),
                    sector,
                }
            })
            .collect();

        // Most active sectors first.
        rows.sort_by(|a, b| {
            b.volume_score
                .partial_cmp(&a.volume_score)
                .unwrap_or(Ordering::Equal)
        });

        HeatmapReport {
            sectors: rows.iter().map(|r| r.sector.clone()).collect(),
            summary: summarize(&rows),
            heatmap_data: rows,
            total_articles,
            generated_at: Utc::now(),
        }
    }

    /// Sector names available for classification.
    pub fn available_sectors(&self) -> Vec<String> {
        SECTOR_KEYWORDS
            .iter()
            .map(|(sector, _)| sector.to_string())
            .collect()
    }
}

/// Average sentiment over articles that carry one, -1 to 1.
fn sentiment_score(articles: &[&NewsArticle]) -> f64 {
    let weights: Vec<f64> = articles
        .iter()
        .filter_map(|a| a.sentiment.map(sentiment_weight))
        .collect();
    if weights.is_empty() {
        return 0.0;
    }
    weights.iter().sum::<f64>() / weights.len() as f64
}

/// Share of all articles, 0 to 1.
fn volume_score(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64).min(1.0)
}

/// Average provider relevance over articles that carry one, 0 to 1.
fn relevance_score(articles: &[&NewsArticle]) -> f64 {
    let scores: Vec<f64> = articles.iter().filter_map(|a| a.relevance_score).collect();
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Visualization weight: volume 40%, relevance 30%, sentiment magnitude 30%.
fn color_intensity(sentiment: f64, volume: f64, relevance: f64) -> f64 {
    (volume * 0.4 + relevance * 0.3 + sentiment.abs() * 0.3).min(1.0)
}

/// Top keywords across a sector's articles, stop-word filtered.
fn extract_keywords(articles: &[&NewsArticle]) -> Vec<String> {
    let text = articles
        .iter()
        .map(|a| format!("{} {}", a.title, a.description))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (order, m) in WORD_RE.find_iter(&text).enumerate() {
        let word = m.as_str();
        if STOP_WORDS.contains(&word) {
            continue;
        }
        let entry = counts.entry(word).or_insert((0, order));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    // By count, first occurrence breaking ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

fn summarize(rows: &[SectorActivity]) -> Option<HeatmapSummary> {
    if rows.is_empty() {
        return None;
    }

    let most_active = rows
        .iter()
        .max_by(|a, b| {
            a.volume_score
                .partial_cmp(&b.volume_score)
                .unwrap_or(Ordering::Equal)
        })?
        .sector
        .clone();

    let most_positive = rows
        .iter()
        .filter(|r| r.sentiment_score > POSITIVE_THRESHOLD)
        .max_by(|a, b| {
            a.sentiment_score
                .partial_cmp(&b.sentiment_score)
                .unwrap_or(Ordering::Equal)
        })
        .map(|r| r.sector.clone());

    let most_negative = rows
        .iter()
        .filter(|r| r.sentiment_score < NEGATIVE_THRESHOLD)
        .min_by(|a, b| {
            a.sentiment_score
                .partial_cmp(&b.sentiment_score)
                .unwrap_or(Ordering::Equal)
        })
        .map(|r| r.sector.clone());

    let average_sentiment =
        rows.iter().map(|r| r.sentiment_score).sum::<f64>() / rows.len() as f64;

    Some(HeatmapSummary {
        most_active_sector: most_active,
        most_positive_sector: most_positive,
        most_negative_sector: most_negative,
        total_sectors: rows.len(),
        average_sentiment,
    })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, title: &str, description: &str) -> NewsArticle {
        NewsArticle {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            url: String::new(),
            published_at: String::new(),
            source: String::new(),
            sentiment: None,
            relevance_score: None,
            entities: Vec::new(),
        }
    }

    fn with_sentiment(mut a: NewsArticle, sentiment: Sentiment) -> NewsArticle {
        a.sentiment = Some(sentiment);
        a
    }

    #[test]
    fn classifies_by_keywords_with_title_bonus() {
        let service = HeatmapService::new();
        let (sector, confidence) =
            service.classify_article(&article("1", "Chip stocks rally on AI demand", "semiconductor supply improves"));
        assert_eq!(sector, "Technology");
        assert!(confidence > 0.0 && confidence <= 1.0);
    }

    #[test]
    fn unmatched_article_goes_to_other() {
        let service = HeatmapService::new();
        let (sector, confidence) = service.classify_article(&article("1", "Quiet day", "nothing notable"));
        assert_eq!(sector, "Other");
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn sentiment_ignores_unlabeled_articles() {
        let a = with_sentiment(article("1", "", ""), Sentiment::Positive);
        let b = with_sentiment(article("2", "", ""), Sentiment::Negative);
        let c = article("3", "", "");
        let refs: Vec<&NewsArticle> = vec![&a, &b, &c];
        assert_eq!(sentiment_score(&refs), 0.0);

        let refs: Vec<&NewsArticle> = vec![&a, &c];
        assert_eq!(sentiment_score(&refs), 1.0);
    }

    #[test]
    fn volume_and_intensity_math() {
        assert_eq!(volume_score(5, 10), 0.5);
        assert_eq!(volume_score(0, 0), 0.0);
        assert_eq!(color_intensity(-1.0, 1.0, 1.0), 1.0);
        assert!((color_intensity(0.5, 0.5, 0.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn keywords_filter_stop_words_and_rank_by_count() {
        let a = article("1", "battery battery battery", "the solar and solar grid");
        let refs: Vec<&NewsArticle> = vec![&a];
        let keywords = extract_keywords(&refs);
        assert_eq!(keywords[0], "battery");
        assert_eq!(keywords[1], "solar");
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"and".to_string()));
    }

    #[test]
    fn generates_sorted_report_with_summary() {
        let service = HeatmapService::new();
        let articles = vec![
            with_sentiment(article("1", "bank earnings strong", "loan growth"), Sentiment::Positive),
            with_sentiment(article("2", "bank credit outlook", "mortgage demand"), Sentiment::Positive),
            with_sentiment(article("3", "oil prices slide", "gas glut persists"), Sentiment::Negative),
        ];
        let report = service.generate(&articles, None);

        assert_eq!(report.total_articles, 3);
        assert_eq!(report.sectors.first().map(String::as_str), Some("Finance"));
        let summary = report.summary.unwrap();
        assert_eq!(summary.most_active_sector, "Finance");
        assert_eq!(summary.most_positive_sector.as_deref(), Some("Finance"));
        assert_eq!(summary.most_negative_sector.as_deref(), Some("Energy"));
        assert_eq!(summary.total_sectors, 2);
    }

    #[test]
    fn sector_filter_restricts_rows() {
        let service = HeatmapService::new();
        let articles = vec![
            article("1", "bank earnings strong", ""),
            article("2", "oil prices slide", ""),
        ];
        let wanted = vec!["Energy".to_string()];
        let report = service.generate(&articles, Some(&wanted));
        assert_eq!(report.sectors, vec!["Energy".to_string()]);
        assert_eq!(report.heatmap_data.len(), 1);
        // Volume is still measured against all articles.
        assert_eq!(report.total_articles, 2);
    }

    #[test]
    fn empty_input_yields_empty_report() {
        let service = HeatmapService::new();
        let report = service.generate(&[], None);
        assert!(report.heatmap_data.is_empty());
        assert!(report.summary.is_none());
    }

    #[test]
    fn exposes_available_sectors() {
        let sectors = HeatmapService::new().available_sectors();
        assert_eq!(sectors.len(), 8);
        assert!(sectors.contains(&"Real Estate".to_string()));
    }
}
