//! # inkling-inference
//!
//! Model-provider backends for inkling.
//!
//! This crate provides:
//! - OpenAI-compatible backend implementing the embedding and generation traits
//! - Vision backend trait for image description
//! - Image backend trait for illustration synthesis
//! - Prompt builders and strict response parsers for the journaling flows
//! - Configuration loading from TOML files or environment variables
//!
//! # Feature Flags
//!
//! - `mock`: Expose the deterministic mock backend to downstream tests
//!
//! # Example
//!
//! ```rust,no_run
//! use inkling_inference::OpenAIBackend;
//! use inkling_core::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::with_defaults().unwrap();
//!     let texts = vec!["Hello".to_string()];
//!     let embeddings = backend.embed_texts(&texts).await.unwrap();
//! }
//! ```

pub mod config;
pub mod images;
pub mod openai;
pub mod prompts;
pub mod vision;

// Mock inference backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use inkling_core::*;

pub use config::{ConfigError, ConfigResult, InferenceConfig};
pub use images::ImageBackend;
pub use openai::{OpenAIBackend, OpenAIConfig, DEFAULT_OPENAI_URL};
pub use prompts::{
    ask_user_message, coach_system_prompt, elaborate_user_message, illustrable_paragraph_prompt,
    numbered_paragraphs, parse_paragraph_number, parse_suggestion, parse_visual_essence,
    IMAGE_DESCRIPTION_PROMPT, LISTENER_SYSTEM_PROMPT, VISUAL_ESSENCE_SYSTEM_PROMPT,
};
pub use vision::VisionBackend;
