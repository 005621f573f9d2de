//! Chat-completions analysis client
//!
//! Talks to an OpenAI-compatible `/chat/completions` endpoint and asks for a
//! JSON object in the [`AnalysisResult`] shape (or a scenario list). The model
//! reply is parsed strictly; anything that does not deserialize is a
//! [`AnalyzerError::Parse`], which the orchestrators treat like any other
//! failure.
//!
//! # Error mapping
//! - HTTP 429, or an `insufficient_quota` error code in any response →
//!   [`AnalyzerError::QuotaExhausted`]
//! - Other non-2xx → [`AnalyzerError::Api`]
//! - Transport failure → [`AnalyzerError::Network`]

use crate::scenarios::{Scenario, ScenarioRequest};
use crate::types::{AnalysisResult, AnalyzerError, ScenarioGenerator, TextAnalyzer};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use reverie_common::config::AnalysisSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ANALYSIS_SYSTEM_PROMPT: &str = "You analyze personal journal entries. Reply with a single JSON object with keys: suggestedTags (at most 8 short strings), analysis (2-3 supportive sentences ending with one practical suggestion), emotions (lowercase labels), topics (lowercase labels), cognitiveDistortions (names such as \"Overgeneralization\", may be empty), sentiment (object with integer positive, negative, neutral summing to 100). No other text.";

const SCENARIO_SYSTEM_PROMPT: &str = "You write CBT practice exercises. Reply with a single JSON object {\"scenarios\": [...]} holding exactly 3 scenarios. Each scenario has situation, thought, options (exactly 4 objects with text and isCorrect, exactly one correct) and explanation. No other text.";

/// Low temperature keeps replies close to the requested shape
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
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
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ScenarioEnvelope {
    scenarios: Vec<Scenario>,
}

/// External analysis service over HTTP
pub struct HttpAnalysisClient {
    http_client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl HttpAnalysisClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalyzerError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalyzerError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Client for the `[analysis]` section, or `None` when it is not online
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Option<Self>, AnalyzerError> {
        if !settings.is_online() {
            return Ok(None);
        }
        let (Some(endpoint), Some(api_key)) = (&settings.endpoint, &settings.api_key) else {
            return Ok(None);
        };
        Self::new(
            endpoint.trim(),
            api_key.trim(),
            settings.model.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
        .map(Some)
    }

    /// One chat round-trip; returns the assistant message text
    async fn complete(&self, system: &str, user: String) -> Result<String, AnalyzerError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Sending chat completion request");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        if let Some(error) = classify_failure(status, &body) {
            return Err(error);
        }

        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AnalyzerError::Parse(format!("Invalid chat response: {}", e)))?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AnalyzerError::InvalidResponse("response has no choices".to_string()))
    }
}

#[async_trait]
impl TextAnalyzer for HttpAnalysisClient {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    async fn analyze(&self, title: &str, content: &str) -> Result<AnalysisResult, AnalyzerError> {
        let reply = self
            .complete(
                ANALYSIS_SYSTEM_PROMPT,
                format!("Title: {}\n\nEntry:\n{}", title, content),
            )
            .await?;
        parse_analysis(&reply)
    }
}

#[async_trait]
impl ScenarioGenerator for HttpAnalysisClient {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    async fn generate(&self, request: &ScenarioRequest) -> Result<Vec<Scenario>, AnalyzerError> {
        let mut prompt = format!("Automatic thought: {}\n", request.thought);
        if !request.distortions.is_empty() {
            prompt.push_str(&format!("Distortions: {}\n", request.distortions.join(", ")));
        }
        if let Some(emotion) = &request.emotion {
            prompt.push_str(&format!("Emotion: {}\n", emotion));
        }
        if let Some(instructions) = &request.instructions {
            prompt.push_str(&format!("Instructions: {}\n", instructions));
        }

        let reply = self.complete(SCENARIO_SYSTEM_PROMPT, prompt).await?;
        let envelope: ScenarioEnvelope = serde_json::from_str(strip_code_fence(&reply))
            .map_err(|e| AnalyzerError::Parse(format!("Invalid scenario JSON: {}", e)))?;
        Ok(envelope.scenarios)
    }
}

/// Map a non-successful response to an error; `None` for success
fn classify_failure(status: StatusCode, body: &str) -> Option<AnalyzerError> {
    let error_code = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("code"))
                .and_then(|c| c.as_str())
                .map(str::to_string)
        });

    if status == StatusCode::TOO_MANY_REQUESTS || error_code.as_deref() == Some("insufficient_quota")
    {
        return Some(AnalyzerError::QuotaExhausted(format!(
            "status {}: {}",
            status.as_u16(),
            error_code.unwrap_or_else(|| "rate limited".to_string())
        )));
    }

    if !status.is_success() {
        return Some(AnalyzerError::Api(format!("status {}: {}", status.as_u16(), body)));
    }

    None
}

/// Parse the model's reply into an analysis result
fn parse_analysis(reply: &str) -> Result<AnalysisResult, AnalyzerError> {
    serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| AnalyzerError::Parse(format!("Invalid analysis JSON: {}", e)))
}

/// Models sometimes wrap JSON in a markdown code fence
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "suggestedTags": ["work", "stress"],
        "analysis": "A demanding day.",
        "emotions": ["stressed"],
        "topics": ["work"],
        "cognitiveDistortions": [],
        "sentiment": {"positive": 10, "negative": 60, "neutral": 30}
    }"#;

    #[test]
    fn test_parse_analysis() {
        let result = parse_analysis(SAMPLE).unwrap();
        assert_eq!(result.suggested_tags, vec!["work", "stress"]);
        assert_eq!(result.sentiment.negative, 60);
    }

    #[test]
    fn test_parse_analysis_in_code_fence() {
        let fenced = format!("```json\n{}\n```", SAMPLE);
        assert!(parse_analysis(&fenced).is_ok());
    }

    #[test]
    fn test_missing_distortions_default_to_empty() {
        let reply = r#"{"suggestedTags":[],"analysis":"","emotions":[],"topics":[],"sentiment":{"positive":0,"negative":0,"neutral":100}}"#;
        let result = parse_analysis(reply).unwrap();
        assert!(result.cognitive_distortions.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_analysis("sorry, I can't"), Err(AnalyzerError::Parse(_))));
    }

    #[test]
    fn test_classify_quota() {
        let body = r#"{"error":{"message":"You exceeded your quota","code":"insufficient_quota"}}"#;
        assert!(classify_failure(StatusCode::TOO_MANY_REQUESTS, "")
            .unwrap()
            .is_quota_exhausted());
        assert!(classify_failure(StatusCode::FORBIDDEN, body)
            .unwrap()
            .is_quota_exhausted());
    }

    #[test]
    fn test_classify_other_failures() {
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            Some(AnalyzerError::Api(_))
        ));
        assert!(classify_failure(StatusCode::OK, "{}").is_none());
    }

    #[test]
    fn test_from_settings_offline() {
        let settings = AnalysisSettings::default();
        assert!(HttpAnalysisClient::from_settings(&settings).unwrap().is_none());
    }

    #[test]
    fn test_from_settings_online() {
        let settings = AnalysisSettings {
            endpoint: Some("http://localhost:9/v1/chat/completions".to_string()),
            api_key: Some("sk-test".to_string()),
            ..AnalysisSettings::default()
        };
        assert!(HttpAnalysisClient::from_settings(&settings).unwrap().is_some());
    }
}
