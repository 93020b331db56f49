//! Core traits for inkling abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ChatTurn;

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for generating text embeddings.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Generate embeddings for the given texts.
    ///
    /// Returns a vector of embedding vectors, one per input text,
    /// in input order.
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_texts(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            crate::Error::Upstream("embedding backend returned no vector".to_string())
        })
    }

    /// Get the expected dimension of embedding vectors.
    fn dimension(&self) -> usize;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate text with optional system context and prior conversation turns.
    async fn generate_chat(
        &self,
        system: Option<&str>,
        history: &[ChatTurn],
        input: &str,
    ) -> Result<String>;

    /// Like [`generate_chat`](Self::generate_chat), but the backend is asked
    /// to produce a single JSON object.
    async fn generate_chat_json(
        &self,
        system: Option<&str>,
        history: &[ChatTurn],
        input: &str,
    ) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Combined inference backend supporting both embedding and generation.
#[async_trait]
pub trait InferenceBackend: EmbeddingBackend + GenerationBackend {
    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Minimal in-file backend used to pin down trait-object ergonomics.
    struct FixedBackend {
        dimension: usize,
    }

    #[async_trait]
    impl EmbeddingBackend for FixedBackend {
        async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.5; self.dimension]).collect())
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[async_trait]
    impl GenerationBackend for FixedBackend {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }

        async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }

        async fn generate_chat(
            &self,
            _system: Option<&str>,
            history: &[ChatTurn],
            input: &str,
        ) -> Result<String> {
            Ok(format!("turns={} input={}", history.len(), input))
        }

        async fn generate_chat_json(
            &self,
            _system: Option<&str>,
            _history: &[ChatTurn],
            _input: &str,
        ) -> Result<String> {
            Ok(r#"{"ok": true}"#.to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_embed_text_delegates_to_batch() {
        let backend = FixedBackend { dimension: 4 };
        let vector = backend.embed_text("hello").await.unwrap();
        assert_eq!(vector.len(), 4);
        assert_eq!(vector[0], 0.5);
    }

    #[tokio::test]
    async fn test_embedding_backend_as_trait_object() {
        let backend: Arc<dyn EmbeddingBackend> = Arc::new(FixedBackend { dimension: 3 });
        let vectors = backend
            .embed_texts(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(backend.dimension(), 3);
        assert_eq!(backend.model_name(), "fixed");
    }

    #[tokio::test]
    async fn test_generation_backend_chat_receives_history() {
        let backend: Arc<dyn GenerationBackend> = Arc::new(FixedBackend { dimension: 1 });
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let output = backend
            .generate_chat(Some("sys"), &history, "next")
            .await
            .unwrap();
        assert_eq!(output, "turns=2 input=next");
    }

    #[tokio::test]
    async fn test_generate_chat_json_returns_json() {
        let backend = FixedBackend { dimension: 1 };
        let output = backend
            .generate_chat_json(None, &[], "go")
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["ok"], true);
    }
}
