//! Image generation backend trait.

use async_trait::async_trait;
use inkling_core::{GeneratedImage, Result};

/// Backend for generating images from text prompts.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Generate `count` images for the prompt, decoded to raw bytes.
    async fn generate(&self, prompt: &str, count: usize) -> Result<Vec<GeneratedImage>>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
