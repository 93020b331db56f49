//! Structured logging schema and field name constants for inkling.
//!
//! All crates use these constants for consistent structured logging fields.
//! This ensures log aggregation tools (Loki, Elasticsearch) can query by
//! standardized field names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (scores, paragraphs) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → provider sub-calls.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "engine", "inference", "storage"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "classifier", "elaboration", "illustration", "openai"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "classify", "embed_texts", "generate", "handle_task"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Elaboration session identifier.
pub const SESSION_ID: &str = "session_id";

/// Journal owner identifier (storage paths).
pub const USER_ID: &str = "user_id";

/// Journal entry identifier (storage paths).
pub const JOURNAL_ID: &str = "journal_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of input texts sent to an embedding model.
pub const INPUT_COUNT: &str = "input_count";

/// Byte length of a prompt or response.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Number of paragraphs in a journal text.
pub const PARAGRAPH_COUNT: &str = "paragraph_count";

/// Number of images generated or described.
pub const IMAGE_COUNT: &str = "image_count";

/// Number of prior interactions replayed as context.
pub const HISTORY_LEN: &str = "history_len";

/// Number of highlights excluded from suggestion.
pub const EXCLUDED_COUNT: &str = "excluded_count";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

/// Retry attempt number (1-based) for idempotent provider calls.
pub const ATTEMPT: &str = "attempt";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
