//! Centralized default constants for the inkling system.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// EMBEDDING
// =============================================================================

/// Default embedding model name.
pub const EMBED_MODEL: &str = "text-embedding-3-large";

/// Default embedding vector dimension for text-embedding-3-large.
pub const EMBED_DIMENSION: usize = 3072;

// =============================================================================
// GENERATION
// =============================================================================

/// Default chat/generation model name.
pub const GEN_MODEL: &str = "gpt-4o-mini";

/// Default vision model name (image description).
pub const VISION_MODEL: &str = "gpt-4o-mini";

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// A tag qualifies for the result only at or above this fraction of the
/// rank-1 tag's similarity.
pub const TAG_THRESHOLD_RATIO: f32 = 0.80;

/// Maximum number of tags returned beyond the rank-1 tag.
pub const MAX_EXTRA_TAGS: usize = 2;

// =============================================================================
// ILLUSTRATION
// =============================================================================

/// Default image generation model name.
pub const IMAGE_MODEL: &str = "dall-e-3";

/// Default generated image size (wide, suits journal layouts).
pub const IMAGE_SIZE: &str = "1792x1024";

/// Default generated image quality tier.
pub const IMAGE_QUALITY: &str = "standard";

/// Default number of images per illustration request.
pub const IMAGE_COUNT: usize = 1;

/// Default illustration style when the caller states no preference.
pub const ILLUSTRATION_STYLE: &str = "digital painting";

// =============================================================================
// TIMEOUTS
// =============================================================================

/// Per-request timeout for embedding calls, in seconds.
pub const EMBED_TIMEOUT_SECS: u64 = 30;

/// Per-request timeout for chat/vision generation calls, in seconds.
pub const GENERATE_TIMEOUT_SECS: u64 = 60;

/// Per-request timeout for image generation calls, in seconds.
pub const IMAGE_TIMEOUT_SECS: u64 = 120;

/// Per-request timeout for object storage calls, in seconds.
pub const STORAGE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SLOW OPERATION THRESHOLDS
// =============================================================================

/// Embedding calls slower than this are logged with `slow = true`.
pub const SLOW_EMBED_MS: u64 = 5_000;

/// Generation calls slower than this are logged with `slow = true`.
pub const SLOW_GENERATE_MS: u64 = 30_000;

/// Image generation calls slower than this are logged with `slow = true`.
pub const SLOW_IMAGE_MS: u64 = 60_000;

// =============================================================================
// SESSIONS
// =============================================================================

/// Maximum number of live elaboration sessions kept in the store.
/// Exceeding this evicts the least-recently-active idle sessions.
pub const SESSION_CAPACITY: usize = 1_024;

// =============================================================================
// RETRY
// =============================================================================

/// Maximum attempts for idempotent provider calls (first try included).
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay between retry attempts, in milliseconds. Doubles
/// per attempt.
pub const RETRY_BASE_DELAY_MS: u64 = 250;

// =============================================================================
// STORAGE
// =============================================================================

/// Public object storage host; URLs on any other host are rejected.
pub const STORAGE_HOST: &str = "storage.googleapis.com";

/// Default storage API endpoint.
pub const STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Fallback file extension for stored images.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";
