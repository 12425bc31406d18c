use anyhow::{Context, Result};
use newsdesk_api_client::NewsApiClient;

pub async fn run_news(api_url: &str, limit: usize) -> Result<()> {
    let client = NewsApiClient::new(api_url)?;
    let resp = client
        .articles(limit)
        .await
        .context("fetching headlines (is the news server running?)")?;

    if resp.articles.is_empty() {
        println!("No articles available.");
        return Ok(());
    }

    println!("Latest headlines ({}):", resp.count);
    for article in &resp.articles {
        let sentiment = article
            .sentiment
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        println!("  {}{} — {}", article.title, sentiment, article.source);
    }

    Ok(())
}
