//! Mock inference backend for deterministic testing.
//!
//! Provides a mock implementation of the inference traits that generates
//! deterministic embeddings and responses for testing purposes. Enable the
//! `mock` feature to use it from another crate's tests.
//!
//! ## Usage
//!
//! ```rust
//! use inkling_inference::mock::MockInferenceBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockInferenceBackend::new()
//!         .with_dimension(384)
//!         .with_fixed_response("Test response");
//!
//!     let embedding = backend.embed("test text").await.unwrap();
//!     assert_eq!(embedding.len(), 384);
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use inkling_core::{
    ChatTurn, EmbeddingBackend, Error, GeneratedImage, GenerationBackend, InferenceBackend, Result,
};

use crate::images::ImageBackend;
use crate::vision::VisionBackend;

/// Mock inference backend for testing.
#[derive(Clone)]
pub struct MockInferenceBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
    response_queue: Arc<Mutex<VecDeque<String>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    fixed_responses: HashMap<String, String>,
    embedding_overrides: HashMap<String, Vec<f32>>,
    default_response: String,
    latency_ms: u64,
    failure_rate: f64,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub timestamp: std::time::Instant,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: 384,
            fixed_responses: HashMap::new(),
            embedding_overrides: HashMap::new(),
            default_response: "Mock response".to_string(),
            latency_ms: 0,
            failure_rate: 0.0,
        }
    }
}

impl MockInferenceBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
            response_queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Set a fixed response for generation requests.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response mapping for a specific input.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(input.into(), output.into());
        self
    }

    /// Queue a response; queued responses are consumed in order before
    /// mappings or the fixed response apply. Lets a test script distinct
    /// replies across successive generation calls.
    pub fn with_queued_response(self, response: impl Into<String>) -> Self {
        self.response_queue
            .lock()
            .unwrap()
            .push_back(response.into());
        self
    }

    /// Pin the exact vector returned when embedding a specific text.
    /// Unpinned texts fall back to the deterministic char-hash vector.
    pub fn with_embedding_override(
        mut self,
        text: impl Into<String>,
        vector: Vec<f32>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .embedding_overrides
            .insert(text.into(), vector);
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Get the number of calls logged for an operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Get number of embed calls.
    pub fn embed_call_count(&self) -> usize {
        self.call_count("embed")
    }

    /// Get number of generation calls, across all generation operations.
    pub fn generate_call_count(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation.starts_with("generate"))
            .count()
    }

    fn log_call(&self, operation: &str, input: &str) {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
            timestamp: std::time::Instant::now(),
        });
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        if self.config.failure_rate > 0.0 {
            rand::thread_rng().gen::<f64>() < self.config.failure_rate
        } else {
            false
        }
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    /// Generate embedding for text (deterministic based on text content).
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.log_call("embed", text);
        self.simulate_latency().await;

        if self.should_fail() {
            return Err(simulated_failure());
        }

        if let Some(vector) = self.config.embedding_overrides.get(text) {
            return Ok(vector.clone());
        }

        Ok(MockEmbeddingGenerator::generate(
            text,
            self.config.dimension,
        ))
    }

    /// Batch embed multiple texts.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::new();
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Generate text response.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_internal("generate", prompt).await
    }

    async fn generate_internal(&self, operation: &str, input: &str) -> Result<String> {
        self.log_call(operation, input);
        self.simulate_latency().await;

        if self.should_fail() {
            return Err(simulated_failure());
        }

        // Queued responses win, then exact-input mappings, then the default.
        if let Some(response) = self.response_queue.lock().unwrap().pop_front() {
            return Ok(response);
        }

        if let Some(response) = self.config.fixed_responses.get(input) {
            return Ok(response.clone());
        }

        Ok(self.config.default_response.clone())
    }
}

impl Default for MockInferenceBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn simulated_failure() -> Error {
    Error::Upstream("Simulated failure for testing".to_string())
}

#[async_trait]
impl EmbeddingBackend for MockInferenceBackend {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts).await
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

#[async_trait]
impl GenerationBackend for MockInferenceBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_internal("generate", prompt).await
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.generate_internal("generate", prompt).await
    }

    async fn generate_chat(
        &self,
        _system: Option<&str>,
        _history: &[ChatTurn],
        input: &str,
    ) -> Result<String> {
        self.generate_internal("generate_chat", input).await
    }

    async fn generate_chat_json(
        &self,
        _system: Option<&str>,
        _history: &[ChatTurn],
        input: &str,
    ) -> Result<String> {
        self.generate_internal("generate_chat_json", input).await
    }

    fn model_name(&self) -> &str {
        "mock-generate"
    }
}

#[async_trait]
impl InferenceBackend for MockInferenceBackend {
    async fn health_check(&self) -> Result<bool> {
        Ok(!self.should_fail())
    }
}

#[async_trait]
impl VisionBackend for MockInferenceBackend {
    async fn describe_image(
        &self,
        _image_data: &[u8],
        _mime_type: &str,
        prompt: Option<&str>,
    ) -> Result<String> {
        self.generate_internal("describe_image", prompt.unwrap_or("Describe this image"))
            .await
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.should_fail())
    }

    fn model_name(&self) -> &str {
        "mock-vision"
    }
}

#[async_trait]
impl ImageBackend for MockInferenceBackend {
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<GeneratedImage>> {
        self.log_call("generate_images", prompt);
        self.simulate_latency().await;

        if self.should_fail() {
            return Err(simulated_failure());
        }

        let images = (0..count)
            .map(|i| {
                let mut bytes = vec![0x89, b'P', b'N', b'G'];
                bytes.extend_from_slice(&(i as u32).to_be_bytes());
                GeneratedImage {
                    bytes,
                    mime_type: "image/png".to_string(),
                }
            })
            .collect();
        Ok(images)
    }

    fn model_name(&self) -> &str {
        "mock-image"
    }
}

/// Mock embedding generator with deterministic output.
pub struct MockEmbeddingGenerator;

impl MockEmbeddingGenerator {
    /// Generate a deterministic embedding from text.
    ///
    /// Uses character-based hashing for reproducibility. The same text
    /// will always produce the same embedding.
    pub fn generate(text: &str, dimension: usize) -> Vec<f32> {
        let mut vec = vec![0.0; dimension];

        // Use character codes to generate deterministic values
        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % dimension;
            vec[idx] += 0.1;
        }

        // Normalize to unit vector
        Self::normalize(&mut vec);
        vec
    }

    /// Generate embedding from seed (for random-like but deterministic vectors).
    pub fn generate_with_seed(seed: u64, dimension: usize) -> Vec<f32> {
        let mut vec = vec![0.0; dimension];
        let mut state = seed;

        // Simple LCG for deterministic pseudo-random values
        for item in vec.iter_mut() {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            *item = ((state % 1000) as f32) / 1000.0 - 0.5;
        }

        Self::normalize(&mut vec);
        vec
    }

    /// Generate embeddings with controlled similarity.
    ///
    /// Creates two embeddings with specified cosine similarity (0.0 to 1.0).
    pub fn generate_similar_pair(
        base_text: &str,
        dimension: usize,
        similarity: f64,
    ) -> (Vec<f32>, Vec<f32>) {
        let base = Self::generate(base_text, dimension);
        let mut similar = Self::generate_with_seed(12345, dimension);

        // Interpolate between base and random vector to achieve target similarity
        let alpha = similarity as f32;
        for i in 0..dimension {
            similar[i] = alpha * base[i] + (1.0 - alpha) * similar[i];
        }

        Self::normalize(&mut similar);
        (base, similar)
    }

    fn normalize(vec: &mut [f32]) {
        let magnitude: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vec.iter_mut().for_each(|x| *x /= magnitude);
        }
    }

    /// Calculate cosine similarity between two vectors.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a > 0.0 && mag_b > 0.0 {
            dot / (mag_a * mag_b)
        } else {
            0.0
        }
    }
}
