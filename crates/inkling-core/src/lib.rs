//! # inkling-core
//!
//! Core types, traits, and abstractions for the inkling library.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other inkling crates depend on.

pub mod defaults;
pub mod error;
pub mod labels;
pub mod logging;
pub mod models;
pub mod retry;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use labels::{LabelCatalog, LabelSpec, CONTEXT_TAGS, EMOTION_LABELS};
pub use models::*;
pub use retry::retry_idempotent;
pub use traits::*;
