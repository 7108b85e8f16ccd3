// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini generative-language API client.
//!
//! Sends a single prompt in JSON mode and returns the generated text of the
//! first candidate. Interpreting that text is the caller's job.

use crate::config::Config;
use crate::services::schedule::ScheduleError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GeminiClient {
    /// Create a client from application configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.gemini_base_url.clone(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
            timeout: Duration::from_secs(config.generation_timeout_secs),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send `prompt` and return the model's text, requesting JSON output.
    pub async fn generate_json(&self, prompt: &str) -> Result<String, ScheduleError> {
        let api_key = self.api_key.as_deref().ok_or(ScheduleError::MissingApiKey)?;

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        tracing::debug!(model = %self.model, "Sending generation request");

        let response = self
            .http
            .post(self.generate_url())
            .header(API_KEY_HEADER, api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ScheduleError::Timeout
                } else {
                    ScheduleError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ScheduleError::Request(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GenerateResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .map_or(text, |e| e.message);
            tracing::warn!(status = status.as_u16(), "Gemini API error");
            return Err(ScheduleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| ScheduleError::Malformed(format!("Invalid response envelope: {}", e)))?;

        extract_text(parsed)
    }
}

/// Pull the first candidate's first text part out of the envelope.
fn extract_text(response: GenerateResponse) -> Result<String, ScheduleError> {
    if let Some(error) = response.error {
        return Err(ScheduleError::Api {
            status: 200,
            message: error.message,
        });
    }

    response
        .candidates
        .into_iter()
        .flatten()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .filter(|t| !t.trim().is_empty())
        .ok_or(ScheduleError::EmptyResponse)
}

// ─── Wire Types ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_extract_text() {
        let response = envelope(
            r#"{"candidates":[{"content":{"parts":[{"text":"[]"}],"role":"model"}}]}"#,
        );
        assert_eq!(extract_text(response).unwrap(), "[]");
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        assert_eq!(
            extract_text(envelope(r#"{"candidates":[]}"#)),
            Err(ScheduleError::EmptyResponse)
        );
        assert_eq!(
            extract_text(envelope(r#"{}"#)),
            Err(ScheduleError::EmptyResponse)
        );
        assert_eq!(
            extract_text(envelope(r#"{"candidates":[{"content":{"parts":[]}}]}"#)),
            Err(ScheduleError::EmptyResponse)
        );
    }

    #[test]
    fn test_extract_text_error_envelope() {
        let err = extract_text(envelope(r#"{"error":{"message":"quota"}}"#)).unwrap_err();
        assert!(matches!(err, ScheduleError::Api { message, .. } if message == "quota"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_fast() {
        let config = Config {
            gemini_api_key: None,
            ..Config::default()
        };
        let client = GeminiClient::new(&config);
        assert_eq!(
            client.generate_json("prompt").await,
            Err(ScheduleError::MissingApiKey)
        );
    }

    #[test]
    fn test_generate_url() {
        let config = Config {
            gemini_base_url: "http://localhost:1234/v1beta".to_string(),
            ..Config::default()
        };
        assert_eq!(
            GeminiClient::new(&config).generate_url(),
            "http://localhost:1234/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
