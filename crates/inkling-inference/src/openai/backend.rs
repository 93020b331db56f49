//! OpenAI-compatible backend implementation.
//!
//! Talks to any endpoint that implements the OpenAI REST surface:
//! `/embeddings`, `/chat/completions`, `/images/generations` and
//! `/models`. One backend instance serves all four inference roles
//! (embedding, generation, vision, image synthesis) so the engine can
//! hold a single `Arc` and hand it to every service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use inkling_core::defaults::{
    EMBED_DIMENSION, EMBED_MODEL, EMBED_TIMEOUT_SECS, GENERATE_TIMEOUT_SECS, GEN_MODEL,
    IMAGE_MODEL, IMAGE_QUALITY, IMAGE_SIZE, IMAGE_TIMEOUT_SECS, SLOW_EMBED_MS, SLOW_GENERATE_MS,
    SLOW_IMAGE_MS, VISION_MODEL,
};
use inkling_core::{
    ChatTurn, EmbeddingBackend, Error, GeneratedImage, GenerationBackend, InferenceBackend, Result,
};

use crate::images::ImageBackend;
use crate::vision::VisionBackend;

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentPart, EmbeddingRequest,
    EmbeddingResponse, ImageGenerationRequest, ImageGenerationResponse, OpenAIError,
    OpenAIErrorResponse, ResponseFormat,
};

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Prompt used when a vision caller does not supply one.
pub const DEFAULT_VISION_PROMPT: &str = "Describe this image";

/// The images endpoint returns PNG payloads when asked for base64.
const GENERATED_IMAGE_MIME: &str = "image/png";

/// Configuration for the OpenAI backend.
///
/// Deserializes from the `[inference.openai]` table of the config file;
/// any missing field takes its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAIConfig {
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    /// API key, sent as a bearer token when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model for embeddings.
    pub embed_model: String,
    /// Embedding vector dimension.
    pub embed_dimension: usize,
    /// Model for text generation.
    pub gen_model: String,
    /// Model for image description.
    pub vision_model: String,
    /// Model for image synthesis.
    pub image_model: String,
    /// Rendered image size, e.g. "1792x1024".
    pub image_size: String,
    /// Rendered image quality, e.g. "standard".
    pub image_quality: String,
    /// Sampling temperature for chat requests. `None` uses the server default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Per-request timeout for embedding calls, in seconds.
    pub embed_timeout_secs: u64,
    /// Per-request timeout for generation and vision calls, in seconds.
    pub generate_timeout_secs: u64,
    /// Per-request timeout for image synthesis calls, in seconds.
    pub image_timeout_secs: u64,
    /// Skip TLS certificate verification (for self-signed endpoints).
    pub skip_tls_verify: bool,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            embed_model: EMBED_MODEL.to_string(),
            embed_dimension: EMBED_DIMENSION,
            gen_model: GEN_MODEL.to_string(),
            vision_model: VISION_MODEL.to_string(),
            image_model: IMAGE_MODEL.to_string(),
            image_size: IMAGE_SIZE.to_string(),
            image_quality: IMAGE_QUALITY.to_string(),
            temperature: None,
            embed_timeout_secs: EMBED_TIMEOUT_SECS,
            generate_timeout_secs: GENERATE_TIMEOUT_SECS,
            image_timeout_secs: IMAGE_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

impl OpenAIConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `OPENAI_BASE_URL`, `OPENAI_API_KEY`, `OPENAI_EMBED_MODEL`,
    /// `OPENAI_EMBED_DIM`, `OPENAI_GEN_MODEL`, `OPENAI_VISION_MODEL`,
    /// `OPENAI_IMAGE_MODEL` and `OPENAI_SKIP_TLS_VERIFY`, falling back
    /// to defaults for any that are unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            embed_model: std::env::var("OPENAI_EMBED_MODEL").unwrap_or(defaults.embed_model),
            embed_dimension: std::env::var("OPENAI_EMBED_DIM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.embed_dimension),
            gen_model: std::env::var("OPENAI_GEN_MODEL").unwrap_or(defaults.gen_model),
            vision_model: std::env::var("OPENAI_VISION_MODEL").unwrap_or(defaults.vision_model),
            image_model: std::env::var("OPENAI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            skip_tls_verify: std::env::var("OPENAI_SKIP_TLS_VERIFY")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            ..defaults
        }
    }
}

/// OpenAI-compatible inference backend.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new backend with the given configuration.
    ///
    /// The client carries no global timeout; each request sets its own
    /// deadline by operation class so a slow image render cannot starve
    /// an embedding call of its shorter budget.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if config.skip_tls_verify {
            warn!(
                subsystem = "inference",
                component = "openai",
                "TLS certificate verification disabled"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            base_url = %config.base_url,
            embed_model = %config.embed_model,
            gen_model = %config.gen_model,
            vision_model = %config.vision_model,
            image_model = %config.image_model,
            "OpenAI backend initialized"
        );

        Ok(Self { client, config })
    }

    /// Create a backend with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(OpenAIConfig::default())
    }

    /// Create a backend from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a POST request with auth headers.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);
        if let Some(key) = &self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        req.header("Content-Type", "application/json")
    }

    /// Build a GET request with auth headers.
    fn build_get_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.get(&url);
        if let Some(key) = &self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        req
    }

    /// Map a transport failure onto the error taxonomy.
    fn transport_error(op: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("{} request timed out: {}", op, e))
        } else {
            Error::Upstream(format!("{} request failed: {}", op, e))
        }
    }

    /// Read the structured error body from a non-success response.
    async fn upstream_error(op: &str, response: reqwest::Response) -> Error {
        let status = response.status();
        let body: OpenAIErrorResponse = response.json().await.unwrap_or(OpenAIErrorResponse {
            error: OpenAIError {
                message: "Unknown error".to_string(),
                error_type: "unknown".to_string(),
                code: None,
            },
        });
        Error::Upstream(format!(
            "OpenAI {} returned {}: {}",
            op, status, body.error.message
        ))
    }

    /// POST a chat completion and return the first choice's text.
    async fn chat_internal(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        json_mode: bool,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature: self.config.temperature,
            max_tokens: None,
            response_format: if json_mode {
                Some(ResponseFormat::json_object())
            } else {
                None
            },
            stream: false,
        };

        let response = self
            .build_request("/chat/completions")
            .timeout(Duration::from_secs(self.config.generate_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error("chat completion", e))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error("chat completion", response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("failed to parse chat response: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("chat response contained no choices".to_string()))?;

        Ok(choice.message.content.into_text())
    }
}

#[async_trait]
impl EmbeddingBackend for OpenAIBackend {
    #[instrument(skip(self, texts), fields(
        subsystem = "inference",
        component = "openai",
        op = "embed_texts",
        model = %self.config.embed_model,
        input_count = texts.len()
    ))]
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let start = Instant::now();

        let request = EmbeddingRequest {
            model: self.config.embed_model.clone(),
            input: texts.to_vec(),
            encoding_format: Some("float".to_string()),
        };

        let response = self
            .build_request("/embeddings")
            .timeout(Duration::from_secs(self.config.embed_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error("embedding", e))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error("embedding", response).await);
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("failed to parse embedding response: {}", e)))?;

        // The API may return vectors out of order; index is authoritative.
        let mut data = body.data;
        data.sort_by_key(|d| d.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();

        if vectors.len() != texts.len() {
            return Err(Error::Upstream(format!(
                "embedding response contained {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            result_count = vectors.len(),
            duration_ms = elapsed,
            "Embedding generation complete"
        );
        if elapsed > SLOW_EMBED_MS {
            warn!(
                duration_ms = elapsed,
                input_count = texts.len(),
                slow = true,
                "Slow embedding operation"
            );
        }

        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.config.embed_dimension
    }

    fn model_name(&self) -> &str {
        &self.config.embed_model
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_chat(None, &[], prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.generate_chat(Some(system), &[], prompt).await
    }

    #[instrument(skip(self, system, history, input), fields(
        subsystem = "inference",
        component = "openai",
        op = "generate_chat",
        model = %self.config.gen_model,
        history_len = history.len(),
        prompt_len = input.len()
    ))]
    async fn generate_chat(
        &self,
        system: Option<&str>,
        history: &[ChatTurn],
        input: &str,
    ) -> Result<String> {
        let start = Instant::now();

        let messages = build_messages(system, history, input);
        let text = self
            .chat_internal(&self.config.gen_model, messages, false)
            .await?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = text.len(),
            duration_ms = elapsed,
            "Chat generation complete"
        );
        if elapsed > SLOW_GENERATE_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = input.len(),
                slow = true,
                "Slow generation operation"
            );
        }

        Ok(text)
    }

    #[instrument(skip(self, system, history, input), fields(
        subsystem = "inference",
        component = "openai",
        op = "generate_chat_json",
        model = %self.config.gen_model,
        history_len = history.len(),
        prompt_len = input.len()
    ))]
    async fn generate_chat_json(
        &self,
        system: Option<&str>,
        history: &[ChatTurn],
        input: &str,
    ) -> Result<String> {
        let start = Instant::now();

        let messages = build_messages(system, history, input);
        let text = self
            .chat_internal(&self.config.gen_model, messages, true)
            .await?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = text.len(),
            duration_ms = elapsed,
            "JSON chat generation complete"
        );
        if elapsed > SLOW_GENERATE_MS {
            warn!(
                duration_ms = elapsed,
                prompt_len = input.len(),
                slow = true,
                "Slow generation operation"
            );
        }

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[async_trait]
impl InferenceBackend for OpenAIBackend {
    async fn health_check(&self) -> Result<bool> {
        let response = self
            .build_get_request("/models")
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "openai",
                    error_msg = %e,
                    "Health check failed"
                );
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl VisionBackend for OpenAIBackend {
    #[instrument(skip(self, image_data, prompt), fields(
        subsystem = "inference",
        component = "openai",
        op = "describe_image",
        model = %self.config.vision_model,
        image_bytes = image_data.len()
    ))]
    async fn describe_image(
        &self,
        image_data: &[u8],
        mime_type: &str,
        prompt: Option<&str>,
    ) -> Result<String> {
        let start = Instant::now();

        let encoded = base64::engine::general_purpose::STANDARD.encode(image_data);
        let message = ChatMessage::parts(
            "user",
            vec![
                ContentPart::text(prompt.unwrap_or(DEFAULT_VISION_PROMPT)),
                ContentPart::image_url(data_url(mime_type, &encoded)),
            ],
        );

        let text = self
            .chat_internal(&self.config.vision_model, vec![message], false)
            .await?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            response_len = text.len(),
            duration_ms = elapsed,
            "Image description complete"
        );
        if elapsed > SLOW_GENERATE_MS {
            warn!(
                duration_ms = elapsed,
                image_bytes = image_data.len(),
                slow = true,
                "Slow vision operation"
            );
        }

        Ok(text)
    }

    async fn health_check(&self) -> Result<bool> {
        InferenceBackend::health_check(self).await
    }

    fn model_name(&self) -> &str {
        &self.config.vision_model
    }
}

#[async_trait]
impl ImageBackend for OpenAIBackend {
    #[instrument(skip(self, prompt), fields(
        subsystem = "inference",
        component = "openai",
        op = "generate_images",
        model = %self.config.image_model,
        image_count = count,
        prompt_len = prompt.len()
    ))]
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<GeneratedImage>> {
        let start = Instant::now();

        let request = ImageGenerationRequest {
            model: self.config.image_model.clone(),
            prompt: prompt.to_string(),
            n: count as u32,
            size: self.config.image_size.clone(),
            quality: self.config.image_quality.clone(),
            response_format: "b64_json".to_string(),
        };

        let response = self
            .build_request("/images/generations")
            .timeout(Duration::from_secs(self.config.image_timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error("image generation", e))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error("image generation", response).await);
        }

        let body: ImageGenerationResponse = response.json().await.map_err(|e| {
            Error::Upstream(format!("failed to parse image generation response: {}", e))
        })?;

        if body.data.is_empty() {
            return Err(Error::Upstream(
                "image generation response contained no images".to_string(),
            ));
        }

        let mut images = Vec::with_capacity(body.data.len());
        for item in body.data {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&item.b64_json)
                .map_err(|e| {
                    Error::Upstream(format!("image payload was not valid base64: {}", e))
                })?;
            images.push(GeneratedImage {
                bytes,
                mime_type: GENERATED_IMAGE_MIME.to_string(),
            });
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            result_count = images.len(),
            duration_ms = elapsed,
            "Image generation complete"
        );
        if elapsed > SLOW_IMAGE_MS {
            warn!(
                duration_ms = elapsed,
                image_count = count,
                slow = true,
                "Slow image generation operation"
            );
        }

        Ok(images)
    }

    fn model_name(&self) -> &str {
        &self.config.image_model
    }
}

/// Assemble chat messages from an optional system prompt, prior turns,
/// and the current user input.
fn build_messages(system: Option<&str>, history: &[ChatTurn], input: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if let Some(system) = system {
        if !system.is_empty() {
            messages.push(ChatMessage::text("system", system));
        }
    }
    for turn in history {
        messages.push(ChatMessage::text(turn.role.as_str(), &turn.content));
    }
    messages.push(ChatMessage::text("user", input));
    messages
}

/// Format an inline image as a data URL.
fn data_url(mime_type: &str, base64_content: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkling_core::ChatRole;

    #[test]
    fn test_default_config() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert!(config.api_key.is_none());
        assert_eq!(config.embed_model, EMBED_MODEL);
        assert_eq!(config.embed_dimension, EMBED_DIMENSION);
        assert_eq!(config.gen_model, GEN_MODEL);
        assert_eq!(config.vision_model, VISION_MODEL);
        assert_eq!(config.image_model, IMAGE_MODEL);
        assert!(config.temperature.is_none());
        assert!(!config.skip_tls_verify);
    }

    #[test]
    fn test_custom_config() {
        let config = OpenAIConfig {
            base_url: "https://api.example.com/v1".to_string(),
            api_key: Some("sk-test".to_string()),
            gen_model: "gpt-4o".to_string(),
            temperature: Some(0.3),
            ..Default::default()
        };
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.api_key, Some("sk-test".to_string()));
        assert_eq!(config.gen_model, "gpt-4o");
        assert_eq!(config.temperature, Some(0.3));
        // Untouched fields keep defaults.
        assert_eq!(config.embed_model, EMBED_MODEL);
    }

    #[test]
    fn test_backend_creation() {
        let backend = OpenAIBackend::with_defaults().unwrap();
        assert_eq!(EmbeddingBackend::model_name(&backend), EMBED_MODEL);
        assert_eq!(GenerationBackend::model_name(&backend), GEN_MODEL);
        assert_eq!(VisionBackend::model_name(&backend), VISION_MODEL);
        assert_eq!(ImageBackend::model_name(&backend), IMAGE_MODEL);
        assert_eq!(backend.dimension(), EMBED_DIMENSION);
    }

    #[test]
    fn test_backend_with_custom_models() {
        let backend = OpenAIBackend::new(OpenAIConfig {
            embed_model: "text-embedding-3-small".to_string(),
            embed_dimension: 1536,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            EmbeddingBackend::model_name(&backend),
            "text-embedding-3-small"
        );
        assert_eq!(backend.dimension(), 1536);
    }

    #[test]
    fn test_build_messages_full() {
        let history = vec![
            ChatTurn::user("first question"),
            ChatTurn::assistant("first answer"),
        ];
        let messages = build_messages(Some("be helpful"), &history, "second question");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].role, "user");
    }

    #[test]
    fn test_build_messages_no_system() {
        let messages = build_messages(None, &[], "hello");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");

        // An empty system prompt is also omitted.
        let messages = build_messages(Some(""), &[], "hello");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_data_url_format() {
        let url = data_url("image/png", "aGVsbG8=");
        assert_eq!(url, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_chat_turn_roles_map_to_wire_strings() {
        assert_eq!(ChatRole::User.as_str(), "user");
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }
}
