use std::time::Duration;

use anyhow::{bail, Result};

use newsdesk_api::{ArticlesResponse, HealthResponse, NewsHeatmapResponse, SectorsResponse};

/// Deadline applied to every widget fetch.
const WIDGET_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed HTTP client for the newsdesk news/analytics API.
///
/// One instance per widget; failures stay isolated to the caller, which
/// decides whether to offer a manual retry. There is no automatic retry.
pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl NewsApiClient {
    /// Create a new client with the default widget timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(WIDGET_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/health")).send().await?;
        parse_response(resp).await
    }

    /// Fetch the sector heatmap, optionally restricted to a comma-separated
    /// sector list.
    pub async fn heatmap(
        &self,
        sectors: Option<&str>,
        limit: usize,
    ) -> Result<NewsHeatmapResponse> {
        let mut req = self
            .client
            .get(self.url("/news/heatmap"))
            .query(&[("limit", limit.to_string())]);
        if let Some(sectors) = sectors {
            req = req.query(&[("sectors", sectors)]);
        }
        let resp = req.send().await?;
        parse_response(resp).await
    }

    pub async fn articles(&self, limit: usize) -> Result<ArticlesResponse> {
        let resp = self
            .client
            .get(self.url("/news/articles"))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        parse_response(resp).await
    }

    pub async fn sectors(&self) -> Result<SectorsResponse> {
        let resp = self.client.get(self.url("/news/sectors")).send().await?;
        parse_response(resp).await
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("{status}: {body}");
    }
    Ok(resp.json().await?)
}
