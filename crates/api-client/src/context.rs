use newsdesk_api::NewsHeatmapResponse;

/// Render a heatmap response into the freeform text a widget forwards to
/// the research copilot as background context.
pub fn heatmap_context(resp: &NewsHeatmapResponse) -> String {
    let report = &resp.heatmap_data;
    let mut lines = vec![format!(
        "Market sector heatmap ({} articles analyzed):",
        report.total_articles
    )];

    for row in &report.heatmap_data {
        let keywords = if row.keywords.is_empty() {
            String::new()
        } else {
            format!(", keywords: {}", row.keywords.join(", "))
        };
        lines.push(format!(
            "- {}: {} articles, sentiment {:+.2}, volume {:.2}{}",
            row.sector, row.count, row.sentiment_score, row.volume_score, keywords
        ));
    }

    if let Some(summary) = &report.summary {
        let mut facts = vec![format!("Most active sector: {}", summary.most_active_sector)];
        if let Some(sector) = &summary.most_positive_sector {
            facts.push(format!("most positive: {sector}"));
        }
        if let Some(sector) = &summary.most_negative_sector {
            facts.push(format!("most negative: {sector}"));
        }
        facts.push(format!(
            "average sentiment {:+.2}",
            summary.average_sentiment
        ));
        lines.push(format!("{}.", facts.join("; ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use newsdesk_api::{HeatmapReport, HeatmapSummary, SectorActivity};

    fn sample() -> NewsHeatmapResponse {
        NewsHeatmapResponse {
            success: true,
            heatmap_data: HeatmapReport {
                sectors: vec!["Technology".to_string()],
                heatmap_data: vec![SectorActivity {
                    sector: "Technology".to_string(),
                    count: 12,
                    sentiment_score: 0.45,
                    volume_score: 0.26,
                    relevance_score: 0.5,
                    confidence: 0.7,
                    articles: vec!["a1".to_string()],
                    keywords: vec!["ai".to_string(), "chip".to_string()],
                    color_intensity: 0.4,
                }],
                total_articles: 47,
                generated_at: Utc::now(),
                summary: Some(HeatmapSummary {
                    most_active_sector: "Technology".to_string(),
                    most_positive_sector: Some("Technology".to_string()),
                    most_negative_sector: None,
                    total_sectors: 1,
                    average_sentiment: 0.45,
                }),
            },
            total_articles: 47,
            sectors_analyzed: vec!["Technology".to_string()],
            last_updated: None,
        }
    }

    #[test]
    fn renders_rows_and_summary() {
        let text = heatmap_context(&sample());
        assert!(text.starts_with("Market sector heatmap (47 articles analyzed):"));
        assert!(text.contains("- Technology: 12 articles, sentiment +0.45, volume 0.26, keywords: ai, chip"));
        assert!(text.contains("Most active sector: Technology"));
        assert!(text.contains("most positive: Technology"));
        assert!(!text.contains("most negative:"));
    }
}
