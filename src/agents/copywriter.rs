use crate::agents::{Agent, system_prompt};
use crate::llm::{ChatModel, extract_json_object};
use crate::models::{AgentConfig, AgentResult, AgentRole, CrewContext};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

/// Neutral midpoint used when the model call or JSON parse fails.
const FALLBACK_SCORE: u8 = 50;

/// LLM-backed copy reviewer. Judges clarity, tone and persuasiveness
/// of the crawled page summary.
///
/// Degrades rather than fails: any model or parse error yields a
/// neutral score with an explicit insight, so a flaky provider never
/// sinks the audit. The crew's catch-and-degrade remains the second
/// line of defense.
pub struct CopywriterAgent {
    config: AgentConfig,
    model: Option<Arc<dyn ChatModel>>,
    reply_language: String,
}

impl CopywriterAgent {
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self {
            config: AgentConfig {
                name: "Camille".to_string(),
                role: AgentRole::Copywriter,
                goal: "Rate the clarity, tone and persuasiveness of the page copy".to_string(),
                backstory: "A bilingual copywriter who rewrites websites for conversion"
                    .to_string(),
            },
            model,
            reply_language: "fr".to_string(),
        }
    }

    /// Language the model is asked to write its insights in (fr or en).
    pub fn reply_language(mut self, language: impl Into<String>) -> Self {
        self.reply_language = language.into();
        self
    }

    fn user_prompt(&self, summary: &str) -> String {
        let language_name = match self.reply_language.as_str() {
            "en" => "English",
            _ => "French",
        };
        format!(
            "Here is the extracted content of a business web page:\n\n{}\n\n\
             Rate the copy for clarity, tone and persuasiveness.\n\
             Write insights and recommendations in {}.\n\
             Reply with a single JSON object only, in the form:\n\
             {{\"score\": <0-100>, \"insights\": [\"...\"], \"recommendations\": [\"...\"]}}",
            summary, language_name
        )
    }

    fn degraded(&self, reason: &str) -> AgentResult {
        AgentResult {
            agent_name: self.config.name.clone(),
            role: AgentRole::Copywriter,
            insights: vec![format!("Copy analysis unavailable: {}", reason)],
            score: Some(FALLBACK_SCORE),
            recommendations: Vec::new(),
            raw: None,
        }
    }

    fn parse_model_reply(&self, reply: &str) -> AgentResult {
        let value = match extract_json_object(reply) {
            Some(v) => v,
            None => return self.degraded("failed to parse model output as JSON"),
        };

        let score = value
            .get("score")
            .and_then(|s| s.as_u64())
            .map(|s| s.min(100) as u8)
            .unwrap_or(FALLBACK_SCORE);

        let string_list = |key: &str| -> Vec<String> {
            value
                .get(key)
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|i| i.as_str().map(|s| s.to_string()))
                        .collect()
                })
                .unwrap_or_default()
        };

        AgentResult {
            agent_name: self.config.name.clone(),
            role: AgentRole::Copywriter,
            insights: string_list("insights"),
            score: Some(score),
            recommendations: string_list("recommendations"),
            raw: None,
        }
    }
}

#[async_trait]
impl Agent for CopywriterAgent {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn work(&self, ctx: &CrewContext) -> Result<AgentResult> {
        let crawl = match &ctx.crawl_data {
            Some(crawl) => crawl,
            None => bail!("copy analysis requires crawl data; did the researcher run first?"),
        };

        let model = match &self.model {
            Some(model) => model,
            None => return Ok(self.degraded("no language model configured")),
        };

        let reply = match model
            .chat(&system_prompt(&self.config), &self.user_prompt(&crawl.summary))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "copywriter model call failed");
                return Ok(self.degraded("model call failed"));
            }
        };

        Ok(self.parse_model_reply(&reply))
    }
}
