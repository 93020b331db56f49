//! # inkling-engine
//!
//! The journaling engine: emotion classification, illustration placement,
//! and elaboration sessions.
//!
//! This crate provides:
//! - Embedding-similarity classification of entries against a fixed
//!   label catalog (one emotion, 1-3 ranked context tags)
//! - Composite document construction folding title, video context, and
//!   image descriptions into one deterministic classification input
//! - A deterministic placement resolver for illustration slots
//! - Session-scoped elaboration with non-repetition of highlights
//! - The illustration pipeline from paragraph selection to stored images
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use inkling_engine::{ElaborationService, ElaborationTask, SessionStore};
//! use inkling_inference::OpenAIBackend;
//!
//! let backend = Arc::new(OpenAIBackend::with_defaults()?);
//! let service = ElaborationService::new(backend, Arc::new(SessionStore::new()));
//!
//! let reply = service
//!     .handle(
//!         "session-1",
//!         ElaborationTask::Elaborate {
//!             journal_text: "Walked to the harbor.\n\nThe fog lifted at noon.".to_string(),
//!         },
//!     )
//!     .await?;
//! ```

pub mod classifier;
pub mod document;
pub mod elaboration;
pub mod illustration;
pub mod placement;
pub mod score;
pub mod session;
pub mod vision;

// Re-export core types
pub use inkling_core::*;

// Re-export the engine surface
pub use classifier::{EmotionClassifier, LabelEntry, LabelStore};
pub use document::{compose_document, split_paragraphs};
pub use elaboration::ElaborationService;
pub use illustration::{assemble_prompt, IllustrationService};
pub use placement::{resolve, NO_SLOT};
pub use score::cosine_similarity;
pub use session::{Session, SessionStore};
pub use vision::ImageDescriber;
