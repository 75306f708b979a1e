//! Gemini generateContent client.

use crate::error::ApiError;
use crate::provider::{GenerationOptions, GenerationSettings, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// HTTP client for a Gemini-style `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from settings; fails when no API key can be found.
    pub fn from_settings(settings: &GenerationSettings) -> Result<Self, ApiError> {
        settings.validate()?;
        let api_key = settings.resolve_api_key().ok_or_else(|| {
            ApiError::ConfigError(format!(
                "No API key configured (set generation.api_key or {})",
                super::API_KEY_ENV
            ))
        })?;
        Ok(Self::new(settings.endpoint.clone(), api_key))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn request_body<'a>(prompt: &'a str, options: &GenerationOptions) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            max_output_tokens: options.max_output_tokens,
        },
    }
}

/// Message for a non-success response body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| "API request failed".to_string())
}

/// Text of the first part of the first candidate.
fn first_candidate_text(body: &str) -> Result<String, ApiError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        ApiError::GenerationRequestFailure(format!("Failed to parse response: {}", e))
    })?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| {
            ApiError::GenerationRequestFailure("Response contained no candidate text".to_string())
        })
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ApiError> {
        debug!(
            endpoint = %self.endpoint,
            prompt_len = prompt.len(),
            "Sending generation request"
        );
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt, options))
            .send()
            .await
            .map_err(|e| ApiError::GenerationRequestFailure(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ApiError::GenerationRequestFailure(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            return Err(ApiError::GenerationRequestFailure(format!(
                "{} ({})",
                error_message(&body),
                status.as_u16()
            )));
        }
        first_candidate_text(&body)
    }
}
