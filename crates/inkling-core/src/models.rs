//! Core data models for inkling.
//!
//! These types are shared across all inkling crates and represent
//! the core domain entities.

use serde::{Deserialize, Serialize};

// =============================================================================
// ENTRY TYPES
// =============================================================================

/// A journal entry as submitted for classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryData {
    pub title: String,
    pub text: String,
}

/// An image attached to a journal entry, pinned after a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// Base64-encoded image bytes.
    pub content: String,
    /// Image format, e.g. `png` or `jpeg`.
    pub format: String,
    /// 0-based index of the paragraph this image follows.
    pub position_after_paragraph: usize,
}

/// Optional media-derived context accompanying an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_emotion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageAttachment>,
}

/// A full classification request: the entry itself plus whatever media
/// context the client captured alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub entry_data: EntryData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_context: Option<MediaContext>,
}

/// A vision-model description of one attached image, anchored after a
/// 0-based paragraph index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescription {
    pub position: usize,
    pub description: String,
}

// =============================================================================
// CLASSIFICATION TYPES
// =============================================================================

/// The single best emotion label for a composite document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub emotion: String,
    pub similarity: f32,
}

/// One ranked context tag for a composite document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagScore {
    pub tag: String,
    pub similarity: f32,
}

/// Full classification result: one emotion plus 1-3 ranked tags.
///
/// `tags` is empty only when no tag labels are loaded. The first tag is
/// always the global maximum and every tag scores at least 80% of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub emotion: EmotionScore,
    pub tags: Vec<TagScore>,
}

// =============================================================================
// COACHING TYPES
// =============================================================================

/// Coaching strategy behind an elaboration suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingStrategy {
    /// Draw out concrete sights, sounds, and textures.
    SensoryDeepening,
    /// Name and sit with the feeling itself.
    EmotionalExploration,
    /// Connect an event to what led to it or followed from it.
    CauseAndEffect,
    /// Re-see the moment through another vantage point.
    PerspectiveShift,
}

impl CoachingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SensoryDeepening => "sensory_deepening",
            Self::EmotionalExploration => "emotional_exploration",
            Self::CauseAndEffect => "cause_and_effect",
            Self::PerspectiveShift => "perspective_shift",
        }
    }
}

impl std::fmt::Display for CoachingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CoachingStrategy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sensory_deepening" => Ok(Self::SensoryDeepening),
            "emotional_exploration" => Ok(Self::EmotionalExploration),
            "cause_and_effect" => Ok(Self::CauseAndEffect),
            "perspective_shift" => Ok(Self::PerspectiveShift),
            _ => Err(format!("Invalid coaching strategy: {}", s)),
        }
    }
}

/// A concrete elaboration proposal anchored to one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// 1-based index of the paragraph the suggestion targets.
    pub paragraph_index: usize,
    pub strategy: CoachingStrategy,
    /// The open-ended question posed to the writer.
    pub suggestion_text: String,
    /// Exact contiguous quote from the target paragraph.
    pub highlight_text: String,
}

/// Outcome of one elaboration round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Suggestion {
    /// Nothing left worth elaborating; the entry stands on its own.
    #[serde(rename = "complete")]
    Completion,
    /// A new suggestion for a paragraph not yet covered.
    #[serde(rename = "suggestion")]
    Proposal(Proposal),
}

/// One completed exchange in an elaboration session. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Interaction {
    Elaborate {
        journal_text: String,
        suggestion: Suggestion,
    },
    Ask {
        journal_text: String,
        prompt: String,
        response: String,
    },
}

#[derive(Serialize)]
struct ElaborateUserTurn<'a> {
    task: &'static str,
    journal_text: &'a str,
}

#[derive(Serialize)]
struct AskUserTurn<'a> {
    task: &'static str,
    journal_text: &'a str,
    prompt: &'a str,
}

#[derive(Serialize)]
struct ProposalAssistantTurn<'a> {
    strategy_used: &'static str,
    suggestion_text: &'a str,
    highlight_text: &'a str,
}

#[derive(Serialize)]
struct CompletionAssistantTurn {
    status: &'static str,
}

#[derive(Serialize)]
struct AskAssistantTurn<'a> {
    assistant_response: &'a str,
}

impl Interaction {
    /// Renders this interaction as the (user, assistant) turn pair sent to
    /// generation backends as conversational history. Content is
    /// pretty-printed JSON with stable field order.
    pub fn to_chat_turns(&self) -> [ChatTurn; 2] {
        match self {
            Interaction::Elaborate {
                journal_text,
                suggestion,
            } => {
                let user = pretty_json(&ElaborateUserTurn {
                    task: "elaborate",
                    journal_text,
                });
                let assistant = match suggestion {
                    Suggestion::Completion => {
                        pretty_json(&CompletionAssistantTurn { status: "complete" })
                    }
                    Suggestion::Proposal(p) => pretty_json(&ProposalAssistantTurn {
                        strategy_used: p.strategy.as_str(),
                        suggestion_text: &p.suggestion_text,
                        highlight_text: &p.highlight_text,
                    }),
                };
                [ChatTurn::user(user), ChatTurn::assistant(assistant)]
            }
            Interaction::Ask {
                journal_text,
                prompt,
                response,
            } => {
                let user = pretty_json(&AskUserTurn {
                    task: "ask",
                    journal_text,
                    prompt,
                });
                let assistant = pretty_json(&AskAssistantTurn {
                    assistant_response: response,
                });
                [ChatTurn::user(user), ChatTurn::assistant(assistant)]
            }
        }
    }
}

fn pretty_json<T: Serialize>(value: &T) -> String {
    // Field order comes from the struct definitions above; rendering a
    // history turn cannot fail for these shapes.
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// A unit of work dispatched to an elaboration session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum ElaborationTask {
    Elaborate {
        journal_text: String,
    },
    Ask {
        journal_text: String,
        prompt: String,
    },
}

/// What an elaboration task produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElaborationReply {
    Suggestion(Suggestion),
    Response(String),
}

// =============================================================================
// CHAT TYPES
// =============================================================================

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One turn of conversational context handed to a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// ILLUSTRATION TYPES
// =============================================================================

/// One generated image, decoded to raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Result of the illustration pipeline for one journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Illustration {
    pub images: Vec<GeneratedImage>,
    /// The exact prompt sent to the image backend.
    pub prompt: String,
    /// 1-based paragraph index the images should follow.
    pub position_after_paragraph: usize,
}

/// An illustration persisted to object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIllustration {
    /// Public URL of each uploaded image, in generation order.
    pub image_urls: Vec<String>,
    /// The exact prompt sent to the image backend.
    pub prompt: String,
    /// 1-based paragraph index the images should follow.
    pub position_after_paragraph: usize,
}
