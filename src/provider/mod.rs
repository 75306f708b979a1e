//! Text-generation provider boundary.
//!
//! The core only builds prompts and reads back generated text; the HTTP
//! details live in the client implementations.

pub mod gemini;
pub mod readme;

pub use gemini::GeminiClient;
pub use readme::ReadmeService;

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default generateContent endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Sampling parameters sent with each generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

/// Provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; falls back to `GEMINI_API_KEY` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub options: GenerationOptions,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            options: GenerationOptions::default(),
        }
    }
}

impl GenerationSettings {
    /// Configured key, else the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ApiError::ConfigError(format!(
                "Invalid generation endpoint: {}",
                self.endpoint
            )));
        }
        let options = &self.options;
        if !(0.0..=2.0).contains(&options.temperature) {
            return Err(ApiError::ConfigError(format!(
                "temperature must be within 0.0..=2.0, got {}",
                options.temperature
            )));
        }
        if !(0.0..=1.0).contains(&options.top_p) {
            return Err(ApiError::ConfigError(format!(
                "top_p must be within 0.0..=1.0, got {}",
                options.top_p
            )));
        }
        if options.top_k == 0 || options.max_output_tokens == 0 {
            return Err(ApiError::ConfigError(
                "top_k and max_output_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generates text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String, ApiError>;
}
