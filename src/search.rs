use crate::models::SearchResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Opaque external web-search capability consumed by the researcher.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_web(&self, query: &str) -> Result<Vec<SearchResult>>;
}

const MAX_RESULTS: usize = 5;

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

#[derive(Debug, Deserialize)]
struct SearxResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Search client for a SearXNG-style JSON endpoint.
pub struct HttpSearchProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSearchProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search_web(&self, query: &str) -> Result<Vec<SearchResult>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .context("search request failed")?
            .error_for_status()
            .context("search endpoint returned an error")?;

        let parsed: SearxResponse = response
            .json()
            .await
            .context("failed to decode search response")?;

        Ok(parsed
            .results
            .into_iter()
            .take(MAX_RESULTS)
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                snippet: r.content,
            })
            .collect())
    }
}

/// No-op provider used when no search endpoint is configured or
/// `--no-search` is set. The researcher treats empty results as
/// "no market context available", not as a failure.
pub struct DisabledSearchProvider;

#[async_trait]
impl SearchProvider for DisabledSearchProvider {
    async fn search_web(&self, _query: &str) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }
}
