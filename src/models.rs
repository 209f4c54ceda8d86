use serde::{Deserialize, Serialize};

/// A single h1-h3 heading extracted from a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    pub alt: Option<String>,
    pub src: String,
}

/// Structured extraction of a fetched page's key signals.
///
/// Immutable once produced; one instance per crawl invocation. The
/// `summary` field is the newline-joined text handed to LLM-backed
/// agents as context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub links: Vec<PageLink>,
    pub ctas: Vec<String>,
    pub images: Vec<PageImage>,
    pub summary: String,
}

impl CrawlResult {
    pub fn h1_count(&self) -> usize {
        self.headings.iter().filter(|h| h.level == 1).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Researcher,
    SeoSpecialist,
    Copywriter,
    UxAnalyst,
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentRole::Researcher => "researcher",
            AgentRole::SeoSpecialist => "seo_specialist",
            AgentRole::Copywriter => "copywriter",
            AgentRole::UxAnalyst => "ux_analyst",
        };
        write!(f, "{}", s)
    }
}

/// Output of a single agent run. Never mutated after the agent
/// returns; appended to `CrewContext::history` by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_name: String,
    pub role: AgentRole,
    pub insights: Vec<String>,
    /// 0-100, domain-specific. The researcher reports no score.
    pub score: Option<u8>,
    pub recommendations: Vec<String>,
    /// Agent-specific payload; for the researcher this embeds the
    /// crawl data the rest of the crew depends on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Shared mutable state threaded through one audit run.
///
/// Created by the crew, mutated by each agent strictly in sequence,
/// discarded after kickoff returns. `crawl_data` is populated from the
/// researcher's result; later agents assume it is present.
#[derive(Debug, Clone)]
pub struct CrewContext {
    pub url: String,
    /// Token/time ceiling. Informational for now.
    pub budget: Option<u32>,
    pub crawl_data: Option<CrawlResult>,
    pub history: Vec<AgentResult>,
}

impl CrewContext {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            budget: None,
            crawl_data: None,
            history: Vec::new(),
        }
    }
}

/// Static persona descriptor, one per agent role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub role: AgentRole,
    pub goal: String,
    pub backstory: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Consolidated output of a full audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub url: String,
    pub results: Vec<AgentResult>,
    /// Average over agents that produced a score.
    pub overall_score: Option<u8>,
    pub gamification: crate::gamification::GamificationScore,
    pub timestamp: String,
}
