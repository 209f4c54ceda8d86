use crate::agents::Agent;
use crate::models::{AgentResult, AgentRole, CrawlResult, CrewContext};

/// Sequential orchestrator running a fixed agent pipeline against one
/// audit target.
///
/// Ordering is a correctness requirement, not an optimization: the
/// researcher must run first because it produces the crawl data the
/// other agents read from the shared context. Do not parallelize.
pub struct Crew {
    agents: Vec<Box<dyn Agent>>,
    context: CrewContext,
}

impl Crew {
    pub fn new(agents: Vec<Box<dyn Agent>>, url: &str) -> Self {
        Self {
            agents,
            context: CrewContext::new(url),
        }
    }

    /// Runs every agent exactly once, in order, and returns the full
    /// history. An agent failure is recorded as a degraded result and
    /// never aborts the remaining agents.
    pub async fn kickoff(&mut self) -> Vec<AgentResult> {
        for agent in &self.agents {
            let config = agent.config();
            tracing::info!(agent = %config.name, role = %config.role, "running agent");

            let result = match agent.work(&self.context).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(agent = %config.name, error = %e, "agent failed");
                    AgentResult {
                        agent_name: config.name.clone(),
                        role: config.role,
                        insights: vec![format!("Error: {}", e)],
                        score: None,
                        recommendations: Vec::new(),
                        raw: None,
                    }
                }
            };

            // The researcher's payload carries the crawl data every
            // later agent depends on.
            if result.role == AgentRole::Researcher {
                if let Some(raw) = &result.raw {
                    match raw
                        .get("crawl")
                        .cloned()
                        .map(serde_json::from_value::<CrawlResult>)
                    {
                        Some(Ok(crawl)) => self.context.crawl_data = Some(crawl),
                        Some(Err(e)) => {
                            tracing::error!(error = %e, "researcher payload had malformed crawl data")
                        }
                        None => {}
                    }
                }
            }

            self.context.history.push(result);
        }

        self.context.history.clone()
    }

    pub fn context(&self) -> &CrewContext {
        &self.context
    }
}
