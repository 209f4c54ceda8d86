use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single free-form chat completion. Agents that need a model depend
/// on this trait so tests can swap in a canned implementation.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, system_prompt: &str, user_message: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct LlmClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Build from the `LLM_API_KEY` environment variable.
    pub fn from_env(base_url: &str, model: &str) -> Result<Self> {
        let api_key =
            std::env::var("LLM_API_KEY").context("LLM_API_KEY environment variable not set")?;
        Ok(Self::new(api_key, base_url, model))
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn chat(&self, system_prompt: &str, user_message: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_message.to_string(),
                },
            ],
            temperature: 0.3,
        };

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("LLM request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "LLM endpoint returned an error");
            return Err(anyhow!("LLM endpoint returned HTTP {}", status));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("failed to decode LLM response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| anyhow!("LLM response contained no completion"))
    }
}

// Models often wrap JSON in prose or code fences; grab the outermost
// object rather than trusting the whole body.
static JSON_OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("JSON object regex should be valid"));

/// Extracts the first JSON object embedded in free-form model output.
///
/// Compatibility shim for providers without a structured-output mode;
/// returns None when nothing in the text parses as a JSON object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let candidate = JSON_OBJECT_RE.find(text)?.as_str();
    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        if value.is_object() {
            return Some(value);
        }
    }

    // A greedy match over multiple objects is not valid JSON; retry on
    // progressively shorter prefixes ending at a closing brace.
    let mut end = candidate.len();
    while let Some(pos) = candidate[..end].rfind('}') {
        if pos == candidate.len() - 1 {
            if pos == 0 {
                break;
            }
            end = pos;
            continue;
        }
        if let Ok(value) = serde_json::from_str::<Value>(&candidate[..=pos]) {
            if value.is_object() {
                return Some(value);
            }
        }
        if pos == 0 {
            break;
        }
        end = pos;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_json() {
        let value = extract_json_object(r#"{"score": 72, "insights": []}"#).unwrap();
        assert_eq!(value["score"], 72);
    }

    #[test]
    fn extracts_json_wrapped_in_prose() {
        let text = "Here is my analysis:\n```json\n{\"score\": 55}\n```\nHope this helps!";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["score"], 55);
    }

    #[test]
    fn returns_none_for_plain_prose() {
        assert!(extract_json_object("no json here at all").is_none());
    }

    #[test]
    fn recovers_first_object_when_two_are_present() {
        let text = r#"{"score": 10} and also {"score": 20}"#;
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["score"], 10);
    }
}
