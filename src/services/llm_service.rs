//! Narrative Service
//!
//! Asks an OpenAI-compatible chat completion endpoint (Groq by default) for a
//! trip overview and per-day themes/tips. The model is told to answer with
//! JSON only; when it does not, the caller keeps the structured plan as is.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::itinerary::Narrative;

const SYSTEM_PROMPT: &str = "You are an expert travel assistant that enriches structured travel \
itineraries. ALWAYS answer with valid JSON only, using exactly this structure: \
{\"overview\": \"General trip overview\", \"days\": {\"day_1\": {\"theme\": \"Day theme\", \
\"tips\": [\"Tip 1\", \"Tip 2\"]}}}. Do not include any text outside the JSON.";

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> ServiceResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct GroqClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(
        http_client: reqwest::Client,
        api_url: &str,
        api_key: Option<String>,
        model: &str,
    ) -> ServiceResult<Self> {
        let api_key = api_key.ok_or_else(|| ServiceError::Config("GROQ_API_KEY".to_string()))?;
        Ok(Self {
            http_client,
            api_url: api_url.to_string(),
            api_key,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl NarrativeProvider for GroqClient {
    async fn complete(&self, prompt: &str) -> ServiceResult<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.7,
            max_tokens: 2000,
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream {
                service: "llm",
                status: response.status().as_u16(),
            });
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ServiceError::Other("LLM returned no choices".to_string()))
    }
}

fn json_block() -> &'static Regex {
    static JSON_BLOCK: OnceLock<Regex> = OnceLock::new();
    JSON_BLOCK.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("valid JSON block pattern"))
}

/// Pull the outermost `{...}` block out of a model answer and parse it
pub fn parse_narrative(text: &str) -> Option<Narrative> {
    let block = json_block().find(text)?;
    match serde_json::from_str::<Narrative>(block.as_str()) {
        Ok(narrative) if !narrative.overview.is_empty() || !narrative.days.is_empty() => {
            Some(narrative)
        }
        Ok(_) => None,
        Err(e) => {
            log::warn!("Error parsing narrative JSON: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_narrative_with_surrounding_prose() {
        let text = "Sure! Here you go:\n```json\n{\"overview\": \"Four days of temples\", \
                    \"days\": {\"day_1\": {\"theme\": \"Old town\", \"tips\": [\"Start early\"]}}}\n```";
        let narrative = parse_narrative(text).unwrap();
        assert_eq!(narrative.overview, "Four days of temples");
        assert_eq!(narrative.days["day_1"].theme, "Old town");
        assert_eq!(narrative.days["day_1"].tips, vec!["Start early".to_string()]);
    }

    #[test]
    fn test_parse_narrative_rejects_prose_and_bad_json() {
        assert!(parse_narrative("Day 1: visit the museum. Day 2: relax.").is_none());
        assert!(parse_narrative("{ not json at all }").is_none());
        assert!(parse_narrative("{}").is_none());
    }

    #[test]
    fn test_client_requires_key() {
        let client = GroqClient::new(reqwest::Client::new(), "http://localhost", None, "m");
        assert!(client.is_err());
    }
}
