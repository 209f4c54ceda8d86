use crate::agents::Agent;
use crate::crawler::Crawler;
use crate::models::{AgentConfig, AgentResult, AgentRole, CrewContext};
use crate::search::SearchProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Crawls the audit target and gathers supplementary market context.
///
/// The only agent that produces crawl data; the crew copies its `raw`
/// payload into the shared context for the rest of the pipeline.
pub struct ResearchAgent {
    config: AgentConfig,
    crawler: Crawler,
    search: Arc<dyn SearchProvider>,
}

impl ResearchAgent {
    pub fn new(crawler: Crawler, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            config: AgentConfig {
                name: "Remi".to_string(),
                role: AgentRole::Researcher,
                goal: "Collect the raw signals of the target site and its market".to_string(),
                backstory: "A meticulous web researcher who reads pages the way a first-time \
                            visitor would"
                    .to_string(),
            },
            crawler,
            search,
        }
    }

    /// Search query derived from what the page says about itself.
    fn build_search_query(title: Option<&str>, url: &str) -> String {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default();

        match title {
            Some(title) if !title.is_empty() => format!("{} {}", title, host),
            _ => host,
        }
    }
}

#[async_trait]
impl Agent for ResearchAgent {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn work(&self, ctx: &CrewContext) -> Result<AgentResult> {
        let crawl = self.crawler.crawl(&ctx.url).await?;

        let query = Self::build_search_query(crawl.title.as_deref(), &ctx.url);
        let search_hits = match self.search.search_web(&query).await {
            Ok(hits) => hits,
            Err(e) => {
                // Market context is nice-to-have; the crawl is not.
                tracing::warn!(query = %query, error = %e, "web search failed, continuing without it");
                Vec::new()
            }
        };

        let mut insights = vec![
            format!("Page has {} heading(s)", crawl.headings.len()),
            format!("Page has {} image(s)", crawl.images.len()),
            format!("Found {} related search result(s)", search_hits.len()),
        ];
        if let Some(title) = &crawl.title {
            insights.push(format!("Page title: \"{}\"", title));
        }

        let mut recommendations = Vec::new();
        if crawl.meta_description.is_none() {
            recommendations.push(
                "Add a meta description so search engines can present the page properly"
                    .to_string(),
            );
        }

        let raw = serde_json::json!({
            "crawl": crawl,
            "search_results": search_hits,
        });

        Ok(AgentResult {
            agent_name: self.config.name.clone(),
            role: AgentRole::Researcher,
            insights,
            score: None,
            recommendations,
            raw: Some(raw),
        })
    }
}
