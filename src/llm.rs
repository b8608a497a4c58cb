//! Text-generation client
//!
//! Thin wrapper around the Claude messages API. The planner and body double
//! modules treat this as an opaque "prompt in, text out" call; everything
//! here is transport plumbing.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Generator settings, created once at startup and handed to the client.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl GeneratorConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      base_url: DEFAULT_API_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
    }
  }

  /// Load configuration from the environment (and `.env` if present).
  ///
  /// `ANTHROPIC_API_KEY` is required; `FOCUSFIT_API_BASE_URL` and
  /// `FOCUSFIT_MODEL` override the defaults.
  pub fn from_env() -> Result<Self, GeneratorError> {
    dotenvy::dotenv().ok();

    let api_key =
      std::env::var("ANTHROPIC_API_KEY").map_err(|_| GeneratorError::MissingApiKey)?;

    let mut config = Self::new(api_key);
    if let Ok(url) = std::env::var("FOCUSFIT_API_BASE_URL") {
      config.base_url = url;
    }
    if let Ok(model) = std::env::var("FOCUSFIT_MODEL") {
      config.model = model;
    }
    Ok(config)
  }
}

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum GeneratorError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Wire Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ApiRequest {
  model: String,
  max_tokens: u32,
  system: String,
  messages: Vec<ApiMessage>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
  role: String,
  content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
  content: Vec<ContentBlock>,
  usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
  #[serde(rename = "type")]
  content_type: String,
  text: Option<String>,
}

/// Token usage reported by the API
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
  pub input_tokens: u32,
  pub output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Generator Client
/// ---------------------------------------------------------------------------

pub struct GeneratorClient {
  client: Client,
  config: GeneratorConfig,
}

impl GeneratorClient {
  pub fn new(config: GeneratorConfig) -> Self {
    Self {
      client: Client::new(),
      config,
    }
  }

  pub fn from_env() -> Result<Self, GeneratorError> {
    Ok(Self::new(GeneratorConfig::from_env()?))
  }

  pub fn config(&self) -> &GeneratorConfig {
    &self.config
  }

  /// Send a system prompt and user message, returning the first text block
  pub async fn complete(
    &self,
    system_prompt: &str,
    user_message: &str,
    max_tokens: u32,
  ) -> Result<(String, Usage), GeneratorError> {
    let request = ApiRequest {
      model: self.config.model.clone(),
      max_tokens,
      system: system_prompt.to_string(),
      messages: vec![ApiMessage {
        role: "user".to_string(),
        content: user_message.to_string(),
      }],
    };

    let response = self
      .client
      .post(&self.config.base_url)
      .header("x-api-key", &self.config.api_key)
      .header("anthropic-version", API_VERSION)
      .header("content-type", "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| GeneratorError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| GeneratorError::Request(e.to_string()))?;

    if !status.is_success() {
      // Try to parse error response
      if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&body) {
        return Err(GeneratorError::Api(error_resp.error.message));
      }
      return Err(GeneratorError::Api(format!("HTTP {}: {}", status, body)));
    }

    let api_response: ApiResponse =
      serde_json::from_str(&body).map_err(|e| GeneratorError::Parse(e.to_string()))?;

    // Extract text from the first text content block
    let text = api_response
      .content
      .iter()
      .find(|c| c.content_type == "text")
      .and_then(|c| c.text.clone())
      .ok_or_else(|| GeneratorError::Parse("No text content in response".to_string()))?;

    Ok((text, api_response.usage))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
