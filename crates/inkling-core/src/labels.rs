//! The fixed label catalog for emotion classification and context tagging.
//!
//! Classification works by comparing a journal's embedding against the
//! embedding of each label *description* below. The descriptions are the
//! actual classification surface; the labels are what callers see. Both
//! collections are ordered, and that enumeration order is load-bearing:
//! argmax ties resolve to the earliest label.

/// One catalog entry: a stable label plus the description that gets embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSpec {
    pub label: &'static str,
    pub description: &'static str,
}

/// Emotion categories, in fixed enumeration order.
pub const EMOTION_LABELS: &[LabelSpec] = &[
    // Positive emotions
    LabelSpec {
        label: "a feeling of joy and happiness",
        description: "This text expresses a strong positive emotion like joy, happiness, delight, elation, or triumph. It often relates to moments of success, fun, connection with loved ones, or pure, vibrant contentment.",
    },
    LabelSpec {
        label: "a moment of peacefulness and calm",
        description: "This describes a state of peacefulness, calm, serenity, relaxation, or deep contentment. It reflects a low-energy, positive state, free from stress, turmoil, or anxiety.",
    },
    LabelSpec {
        label: "an experience of gratitude and appreciation",
        description: "This entry expresses feelings of gratitude, appreciation, or thankfulness. The author is actively acknowledging the good things in their life, whether it's people, experiences, or simple pleasures.",
    },
    LabelSpec {
        label: "a feeling of excitement and anticipation",
        description: "This text conveys a high-energy, positive feeling of excitement, anticipation, or hopefulness. It is often associated with looking forward to a future event, a new opportunity, or a positive outcome.",
    },
    // Negative emotions
    LabelSpec {
        label: "a sense of sadness and grief",
        description: "This entry describes feelings of sadness, grief, disappointment, hurt, or loneliness. It is often associated with loss, failure, bad news, or a difficult emotional experience.",
    },
    LabelSpec {
        label: "an expression of anger and frustration",
        description: "This text conveys feelings of anger, frustration, irritation, annoyance, or being upset. This emotion is often a reaction to a perceived injustice, an obstacle, a conflict, or a violation of personal boundaries.",
    },
    LabelSpec {
        label: "a feeling of anxiety and fear",
        description: "This entry expresses feelings of anxiety, fear, worry, stress, nervousness, or being overwhelmed. It is often related to uncertainty about the future, a perceived threat, or high-pressure situations.",
    },
    // Complex/reflective emotions
    LabelSpec {
        label: "a memory filled with nostalgia",
        description: "This text has a nostalgic or bittersweet tone, reflecting on the past. It often mixes feelings of warmth and happiness for a memory with a sense of longing or sadness for a time that is now gone.",
    },
    LabelSpec {
        label: "a story of personal growth and resilience",
        description: "This is a narrative of personal growth, resilience, learning, or overcoming a challenge. The text describes a process of development or finding strength through adversity, rather than just a single, static emotion.",
    },
];

/// Context tags, in fixed enumeration order.
pub const CONTEXT_TAGS: &[LabelSpec] = &[
    LabelSpec {
        label: "Family",
        description: "This text describes feelings or events related to family members and relatives.",
    },
    LabelSpec {
        label: "Romance & Love",
        description: "This entry is about a romantic partner, dating, love life, or feelings of deep affection.",
    },
    LabelSpec {
        label: "Friendship & Social",
        description: "This text discusses friends, social events, community, or a sense of belonging.",
    },
    LabelSpec {
        label: "Work & Career",
        description: "This entry is about a job, career, professional life, or academic studies.",
    },
    LabelSpec {
        label: "Personal Growth",
        description: "This text is about self-improvement, personal insights, learning new skills, or self-development.",
    },
    LabelSpec {
        label: "Health & Wellness",
        description: "This entry describes experiences related to physical health, fitness, diet, sleep, or the body.",
    },
    LabelSpec {
        label: "Hobbies & Creativity",
        description: "This entry is about hobbies, passions, creative pursuits, art, music, or leisure time.",
    },
    LabelSpec {
        label: "Finances & Money",
        description: "This text discusses money, finances, budgeting, or material possessions.",
    },
    LabelSpec {
        label: "Spirituality & Meaning",
        description: "This entry reflects on spirituality, personal beliefs, religion, or a search for meaning and purpose.",
    },
    LabelSpec {
        label: "Travel & Adventure",
        description: "This text is about traveling, exploring new places, adventures, or new experiences.",
    },
    LabelSpec {
        label: "Milestones & Events",
        description: "This entry describes a major life event, a special occasion, a celebration, or a significant milestone.",
    },
    LabelSpec {
        label: "Challenges & Obstacles",
        description: "This text is about dealing with a challenge, a problem, a failure, or a difficult situation.",
    },
    LabelSpec {
        label: "Achievements & Success",
        description: "This entry celebrates a success, a personal accomplishment, a win, or good news.",
    },
    LabelSpec {
        label: "Daily Life & Routines",
        description: "This text describes everyday life, daily routines, chores, or simple, mundane moments.",
    },
    LabelSpec {
        label: "Reflections & Plans",
        description: "This entry is about reflecting on the past, nostalgia, memories, or making plans for the future.",
    },
];

/// An ordered pair of label collections to classify against.
///
/// The default catalog is the built-in one above; tests construct smaller
/// catalogs to pin down scoring behavior with fixture vectors.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    emotions: Vec<(String, String)>,
    tags: Vec<(String, String)>,
}

impl LabelCatalog {
    /// Builds a catalog from explicit `(label, description)` pairs.
    pub fn new(emotions: Vec<(String, String)>, tags: Vec<(String, String)>) -> Self {
        Self { emotions, tags }
    }

    /// Emotion labels in enumeration order.
    pub fn emotions(&self) -> &[(String, String)] {
        &self.emotions
    }

    /// Context tags in enumeration order.
    pub fn tags(&self) -> &[(String, String)] {
        &self.tags
    }
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self {
            emotions: EMOTION_LABELS
                .iter()
                .map(|spec| (spec.label.to_string(), spec.description.to_string()))
                .collect(),
            tags: CONTEXT_TAGS
                .iter()
                .map(|spec| (spec.label.to_string(), spec.description.to_string()))
                .collect(),
        }
    }
}
