use crate::agents::Agent;
use crate::models::{AgentConfig, AgentResult, AgentRole, CrewContext};
use anyhow::{Result, bail};
use async_trait::async_trait;

const MAX_HELPFUL_CTAS: usize = 5;
const CLUTTERED_LINK_COUNT: usize = 50;
const LONG_PARAGRAPH_CHARS: usize = 300;

/// Pure heuristic UX scorer over the crawl data.
pub struct UxAnalystAgent {
    config: AgentConfig,
}

impl Default for UxAnalystAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl UxAnalystAgent {
    pub fn new() -> Self {
        Self {
            config: AgentConfig {
                name: "Ulysse".to_string(),
                role: AgentRole::UxAnalyst,
                goal: "Judge whether a first-time visitor can act on the page".to_string(),
                backstory: "A UX analyst focused on conversion paths for local businesses"
                    .to_string(),
            },
        }
    }
}

/// Contact affordance heuristics: mailto/tel links or anything that
/// looks like a contact page.
fn has_contact_affordance(crawl: &crate::models::CrawlResult) -> bool {
    crawl.links.iter().any(|link| {
        let href = link.href.to_lowercase();
        let text = link.text.to_lowercase();
        href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.contains("contact")
            || text.contains("contact")
    })
}

#[async_trait]
impl Agent for UxAnalystAgent {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn work(&self, ctx: &CrewContext) -> Result<AgentResult> {
        let crawl = match &ctx.crawl_data {
            Some(crawl) => crawl,
            None => bail!("UX analysis requires crawl data; did the researcher run first?"),
        };

        let mut score: i32 = 100;
        let mut insights = Vec::new();
        let mut recommendations = Vec::new();

        if crawl.ctas.is_empty() {
            score -= 30;
            insights.push("No call-to-action found on the page".to_string());
            recommendations.push(
                "Add a prominent call-to-action (book, call, order) above the fold".to_string(),
            );
        } else {
            insights.push(format!("{} call-to-action element(s) found", crawl.ctas.len()));
            if crawl.ctas.len() > MAX_HELPFUL_CTAS {
                score -= 5;
                insights.push("Many competing CTAs may confuse visitors".to_string());
                recommendations
                    .push("Reduce to one primary CTA and a few secondary ones".to_string());
            }
        }

        if !has_contact_affordance(crawl) {
            score -= 10;
            insights.push("No obvious way to contact the business".to_string());
            recommendations
                .push("Add a visible contact link, phone number or email".to_string());
        }

        if crawl.links.len() > CLUTTERED_LINK_COUNT {
            score -= 5;
            insights.push(format!(
                "Navigation looks cluttered ({} links)",
                crawl.links.len()
            ));
            recommendations.push("Trim the navigation to the pages visitors need".to_string());
        }

        if crawl
            .paragraphs
            .iter()
            .any(|p| p.chars().count() > LONG_PARAGRAPH_CHARS)
        {
            score -= 10;
            insights.push("Some paragraphs are very long".to_string());
            recommendations
                .push("Break long paragraphs into short, scannable blocks".to_string());
        }

        let score = score.max(0) as u8;

        Ok(AgentResult {
            agent_name: self.config.name.clone(),
            role: AgentRole::UxAnalyst,
            insights,
            score: Some(score),
            recommendations,
            raw: None,
        })
    }
}
