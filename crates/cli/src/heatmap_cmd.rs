use anyhow::{Context, Result};
use newsdesk_api_client::NewsApiClient;

pub async fn run_heatmap(api_url: &str, sectors: Option<&str>, limit: usize) -> Result<()> {
    let client = NewsApiClient::new(api_url)?;
    let resp = client
        .heatmap(sectors, limit)
        .await
        .context("fetching sector heatmap (is the news server running?)")?;

    let report = &resp.heatmap_data;
    println!("Sector heatmap over {} articles:", report.total_articles);
    println!(
        "  {:<16} {:>5} {:>10} {:>8} {:>10}",
        "sector", "count", "sentiment", "volume", "intensity"
    );
    for row in &report.heatmap_data {
        println!(
            "  {:<16} {:>5} {:>+10.3} {:>8.3} {:>10.3}",
            row.sector, row.count, row.sentiment_score, row.volume_score, row.color_intensity
        );
        if !row.keywords.is_empty() {
            println!("    keywords: {}", row.keywords.join(", "));
        }
    }

    if let Some(summary) = &report.summary {
        println!();
        println!("Most active: {}", summary.most_active_sector);
        if let Some(sector) = &summary.most_positive_sector {
            println!("Most positive: {sector}");
        }
        if let Some(sector) = &summary.most_negative_sector {
            println!("Most negative: {sector}");
        }
        println!("Average sentiment: {:+.3}", summary.average_sentiment);
    }

    Ok(())
}
