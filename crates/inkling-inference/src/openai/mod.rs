//! OpenAI-compatible API backend.
//!
//! Works with the hosted OpenAI API and any server that speaks the same
//! protocol (LiteLLM, vLLM, OpenRouter, llama.cpp server). A single
//! [`OpenAIBackend`] implements embedding, chat generation, image
//! description and image synthesis.

mod backend;
mod types;

pub use backend::{OpenAIBackend, OpenAIConfig, DEFAULT_OPENAI_URL, DEFAULT_VISION_PROMPT};
pub use types::*;
