use crate::agents::Agent;
use crate::models::{AgentConfig, AgentResult, AgentRole, CrewContext};
use anyhow::{Result, bail};
use async_trait::async_trait;

/// Pure heuristic SEO scorer. Deterministic over the crawl data; no
/// network, no model calls.
pub struct SeoSpecialistAgent {
    config: AgentConfig,
}

impl Default for SeoSpecialistAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl SeoSpecialistAgent {
    pub fn new() -> Self {
        Self {
            config: AgentConfig {
                name: "Selma".to_string(),
                role: AgentRole::SeoSpecialist,
                goal: "Score how well the page is set up for search engines".to_string(),
                backstory: "An SEO consultant who has audited hundreds of small-business sites"
                    .to_string(),
            },
        }
    }
}

#[async_trait]
impl Agent for SeoSpecialistAgent {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn work(&self, ctx: &CrewContext) -> Result<AgentResult> {
        let crawl = match &ctx.crawl_data {
            Some(crawl) => crawl,
            None => bail!("SEO analysis requires crawl data; did the researcher run first?"),
        };

        let mut score: i32 = 100;
        let mut insights = Vec::new();
        let mut recommendations = Vec::new();

        let h1_count = crawl.h1_count();
        if h1_count == 0 {
            score -= 20;
            insights.push("No H1 heading found".to_string());
            recommendations
                .push("Add a single H1 heading describing the main offer".to_string());
        } else if h1_count > 1 {
            score -= 10;
            insights.push(format!("Multiple H1 headings found ({})", h1_count));
            recommendations.push("Keep exactly one H1 and demote the others to H2".to_string());
        } else {
            insights.push("Exactly one H1 heading, as recommended".to_string());
        }

        match &crawl.meta_description {
            None => {
                score -= 20;
                insights.push("Missing meta description".to_string());
                recommendations.push(
                    "Write a 50-160 character meta description to control the search snippet"
                        .to_string(),
                );
            }
            Some(desc) if desc.len() < 50 => {
                score -= 5;
                insights.push(format!("Meta description is short ({} chars)", desc.len()));
                recommendations
                    .push("Expand the meta description to at least 50 characters".to_string());
            }
            Some(_) => {}
        }

        let missing_alt = crawl.images.iter().filter(|img| img.alt.is_none()).count();
        if missing_alt > 0 {
            score -= 2 * missing_alt as i32;
            insights.push(format!("{} image(s) missing alt text", missing_alt));
            recommendations
                .push("Add descriptive alt text to every meaningful image".to_string());
        }

        if crawl.links.len() < 3 {
            score -= 10;
            insights.push(format!("Very few links on the page ({})", crawl.links.len()));
            recommendations.push(
                "Add internal links to key pages (services, contact, about)".to_string(),
            );
        }

        let score = score.max(0) as u8;

        Ok(AgentResult {
            agent_name: self.config.name.clone(),
            role: AgentRole::SeoSpecialist,
            insights,
            score: Some(score),
            recommendations,
            raw: None,
        })
    }
}
