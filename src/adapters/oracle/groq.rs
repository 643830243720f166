//! Groq classification oracle adapter
//!
//! Implements the ClassificationOracle port against Groq's OpenAI-compatible
//! chat completions API. Domain batches and title batches run on different
//! models, both with deterministic sampling and JSON-object responses.

use crate::adapters::oracle::prompts;
use crate::error::{PipelineError, Result};
use crate::ports::oracle::{
    CandidateAssignment, ClassificationOracle, DomainBatchRequest, DomainBatchResponse,
    TitleBatchRequest, TitleBatchResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Model judging domain batches
const DEFAULT_BATCH_MODEL: &str = "openai/gpt-oss-120b";

/// Model judging title-only requests
const DEFAULT_TITLE_MODEL: &str = "moonshotai/kimi-k2-instruct-0905";

/// Groq oracle configuration
#[derive(Debug, Clone)]
pub struct GroqOracleConfig {
    pub api_key: String,
    pub batch_model: String,
    pub title_model: String,
}

impl GroqOracleConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            batch_model: DEFAULT_BATCH_MODEL.to_string(),
            title_model: DEFAULT_TITLE_MODEL.to_string(),
        }
    }

    /// Read the API key from `GROQ_API_KEY`
    pub fn from_env() -> Self {
        Self::new(std::env::var("GROQ_API_KEY").unwrap_or_default())
    }
}

/// Groq oracle implementation
#[derive(Debug)]
pub struct GroqOracle {
    client: Client,
    config: GroqOracleConfig,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    top_p: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl GroqOracle {
    /// Create a new Groq oracle; fails when no API key is configured
    pub fn new(config: GroqOracleConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PipelineError::Config("GROQ_API_KEY is not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GroqOracleConfig::from_env())
    }

    /// Run one deterministic JSON-mode chat completion
    async fn complete(&self, model: &str, instructions: &str, prompt: &str) -> Result<String> {
        let request_body = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: instructions.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.0,
            top_p: 1.0,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        log::info!("Calling Groq chat completion with model: {}", model);

        let response = self
            .client
            .post(format!("{}/chat/completions", GROQ_API_BASE))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::Oracle(format!(
                "chat completion failed with {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(PipelineError::OracleResponse(
                "no completion choices returned".to_string(),
            ));
        };

        log::debug!(
            "Groq completion returned {} characters",
            choice.message.content.len()
        );
        Ok(choice.message.content)
    }
}

/// Parse a batch answer, accepting both the wrapped shape
/// (`{"seed_domain": ..., "assignments": [...]}`) and the flat shape
/// (`{"assignments": [...]}`)
fn parse_batch_content(seed_domain: &str, content: &str) -> Result<DomainBatchResponse> {
    let value: serde_json::Value = serde_json::from_str(content)?;

    if value.get("seed_domain").is_some() {
        let response: DomainBatchResponse = serde_json::from_value(value)?;
        return Ok(response);
    }

    let Some(assignments) = value.get("assignments") else {
        return Err(PipelineError::OracleResponse(format!(
            "batch response for {} carries no assignments",
            seed_domain
        )));
    };
    let assignments: Vec<CandidateAssignment> = serde_json::from_value(assignments.clone())?;
    Ok(DomainBatchResponse {
        seed_domain: seed_domain.to_string(),
        assignments,
        batch_reasoning: None,
    })
}

fn parse_title_content(content: &str) -> Result<TitleBatchResponse> {
    let response: TitleBatchResponse = serde_json::from_str(content)?;
    Ok(response)
}

#[async_trait]
impl ClassificationOracle for GroqOracle {
    async fn classify_domain_batch(
        &self,
        request: &DomainBatchRequest,
    ) -> Result<DomainBatchResponse> {
        let prompt = prompts::domain_batch_prompt(request);
        log::info!(
            "Groq batch seed={} meetings={} prompt_chars={}",
            request.seed_domain,
            request.meetings.len(),
            prompt.len()
        );

        let content = self
            .complete(&self.config.batch_model, prompts::BATCH_INSTRUCTIONS, &prompt)
            .await?;
        let response = parse_batch_content(&request.seed_domain, &content)?;

        log::info!(
            "Groq batch seed={} parsed {} assignments",
            request.seed_domain,
            response.assignments.len()
        );
        Ok(response)
    }

    async fn classify_titles(&self, request: &TitleBatchRequest) -> Result<TitleBatchResponse> {
        let prompt = prompts::title_prompt(request);
        log::info!(
            "Groq title batch meetings={} target={:?}",
            request.meetings.len(),
            request.target_client
        );

        let content = self
            .complete(&self.config.title_model, prompts::TITLE_INSTRUCTIONS, &prompt)
            .await?;
        let response = parse_title_content(&content)?;

        log::info!(
            "Groq title batch parsed {} assignments",
            response.assignments.len()
        );
        Ok(response)
    }

    fn provider_name(&self) -> &str {
        "groq"
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_creation() {
        let oracle = GroqOracle::new(GroqOracleConfig::new("test_api_key")).unwrap();
        assert_eq!(oracle.provider_name(), "groq");
        assert!(oracle.is_configured());
        assert_eq!(oracle.config.batch_model, "openai/gpt-oss-120b");
        assert_eq!(oracle.config.title_model, "moonshotai/kimi-k2-instruct-0905");
    }

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        let err = GroqOracle::new(GroqOracleConfig::new("")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_parse_wrapped_batch_shape() {
        let content = r#"{
            "seed_domain": "everme.ai",
            "assignments": [
                {"meeting_id": "m1", "client_domain": "everme.ai", "confidence": 0.9, "reasoning": "title"}
            ],
            "batch_reasoning": "single client"
        }"#;
        let response = parse_batch_content("everme.ai", content).unwrap();
        assert_eq!(response.seed_domain, "everme.ai");
        assert_eq!(response.assignments.len(), 1);
        assert_eq!(
            response.assignments[0].client_domain.as_deref(),
            Some("everme.ai")
        );
        assert_eq!(response.batch_reasoning.as_deref(), Some("single client"));
    }

    #[test]
    fn test_parse_flat_batch_shape_injects_seed() {
        let content = r#"{"assignments": [{"meeting_id": "m1", "client_domain": null, "reasoning": "ambiguous"}]}"#;
        let response = parse_batch_content("alpha.io", content).unwrap();
        assert_eq!(response.seed_domain, "alpha.io");
        assert_eq!(response.assignments.len(), 1);
        assert!(response.assignments[0].client_domain.is_none());
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let content = r#"{"assignments": [{"meeting_id": "m1"}]}"#;
        let response = parse_batch_content("alpha.io", content).unwrap();
        assert!(response.assignments[0].client_domain.is_none());
        assert!(response.assignments[0].confidence.is_none());
        assert_eq!(response.assignments[0].reasoning, "");
    }

    #[test]
    fn test_parse_rejects_shapes_without_assignments() {
        let err = parse_batch_content("alpha.io", r#"{"metadata": {}}"#).unwrap_err();
        assert!(matches!(err, PipelineError::OracleResponse(_)));
    }

    #[test]
    fn test_parse_rejects_non_json_content() {
        let err = parse_batch_content("alpha.io", "not json at all").unwrap_err();
        assert!(matches!(err, PipelineError::Serialization(_)));
    }

    #[test]
    fn test_parse_title_content() {
        let content = r#"{
            "assignments": [
                {"meeting_id": "m1", "client_name": "Croffle Guys", "confidence": 0.6, "reasoning": "brand in title"}
            ]
        }"#;
        let response = parse_title_content(content).unwrap();
        assert_eq!(response.assignments.len(), 1);
        assert_eq!(
            response.assignments[0].client_name.as_deref(),
            Some("Croffle Guys")
        );
        assert!(response.assignments[0].client_domain.is_none());
    }
}
