pub mod copywriter;
pub mod researcher;
pub mod seo;
pub mod ux;

pub use copywriter::CopywriterAgent;
pub use researcher::ResearchAgent;
pub use seo::SeoSpecialistAgent;
pub use ux::UxAnalystAgent;

use crate::models::{AgentConfig, AgentResult, CrewContext};
use anyhow::Result;
use async_trait::async_trait;

/// A single-responsibility analyzer producing insights, an optional
/// score and recommendations from the shared audit context.
///
/// `work` may fail (missing crawl data, missing credentials); the crew
/// orchestrator is responsible for catching and degrading.
#[async_trait]
pub trait Agent: Send + Sync {
    fn config(&self) -> &AgentConfig;

    async fn work(&self, ctx: &CrewContext) -> Result<AgentResult>;
}

/// Renders the role-flavored system prompt shared by LLM-backed agents.
pub fn system_prompt(config: &AgentConfig) -> String {
    format!(
        "You are {name}, a {role}.\nGoal: {goal}\nBackground: {backstory}\n\
         Answer concisely and stay within your specialty.",
        name = config.name,
        role = config.role,
        goal = config.goal,
        backstory = config.backstory,
    )
}
