//! Z.AI inference backend implementation.
//!
//! Z.AI exposes an OpenAI-compatible chat completions API; this backend
//! speaks that dialect with bearer-token authentication.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use grind_core::{defaults, Error, GenerationBackend, Result};

/// Configuration for the Z.AI backend.
#[derive(Debug, Clone)]
pub struct ZaiConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for bearer authentication.
    pub api_key: String,
    /// Model to use for generation.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ZaiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_ZAI_BASE_URL.to_string(),
            api_key: String::new(),
            model: defaults::DEFAULT_ZAI_MODEL.to_string(),
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
        }
    }
}

/// Z.AI generation backend.
#[derive(Debug)]
pub struct ZaiBackend {
    client: Client,
    config: ZaiConfig,
}

impl ZaiBackend {
    /// Create a new Z.AI backend with the given configuration.
    pub fn new(config: ZaiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(format!(
                "{} is not configured",
                defaults::ENV_ZAI_API_KEY
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Z.AI backend: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = ZaiConfig {
            base_url: std::env::var(defaults::ENV_ZAI_BASE_URL)
                .unwrap_or_else(|_| defaults::DEFAULT_ZAI_BASE_URL.to_string()),
            api_key: std::env::var(defaults::ENV_ZAI_API_KEY).unwrap_or_default(),
            model: std::env::var(defaults::ENV_ZAI_MODEL)
                .unwrap_or_else(|_| defaults::DEFAULT_ZAI_MODEL.to_string()),
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ZaiConfig {
        &self.config
    }

    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    async fn generate_internal(
        &self,
        system: &str,
        prompt: &str,
        json_output: bool,
    ) -> Result<String> {
        let start = Instant::now();

        let mut messages = Vec::new();

        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }

        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            response_format: json_output.then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: ApiErrorResponse = response.json().await.unwrap_or(ApiErrorResponse {
                error: ApiErrorDetail {
                    message: "Unknown error".to_string(),
                },
            });
            return Err(Error::Inference(format!(
                "Z.AI returned {}: {}",
                status, body.error.message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = content.len(),
            duration_ms = elapsed,
            "Generation complete"
        );
        if elapsed > 30000 {
            warn!(
                duration_ms = elapsed,
                prompt_len = prompt.len(),
                slow = true,
                "Slow generation operation"
            );
        }
        Ok(content)
    }
}

/// Request body for the chat completions endpoint.
#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    /// Set to `json_object` for guaranteed valid JSON output.
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(default)]
    stream: bool,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response format constraint for chat completions.
#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Response from the chat completions endpoint.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Single chat completion choice.
#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Error envelope returned on non-2xx responses.
#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl GenerationBackend for ZaiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "zai", op = "generate", model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_internal(system, prompt, false).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "zai", op = "generate_json", model = %self.config.model, prompt_len = prompt.len()))]
    async fn generate_json_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_internal(system, prompt, true).await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("Z.AI health check passed");
                    Ok(true)
                } else {
                    warn!("Z.AI health check failed: {}", resp.status());
                    Ok(false)
                }
            }
            Err(e) => {
                warn!("Z.AI health check error: {}", e);
                Ok(false)
            }
        }
    }
}
