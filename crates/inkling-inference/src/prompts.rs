//! Prompt construction and response parsing for the journaling flows.
//!
//! Every prompt the engine sends is assembled here as a free function, so
//! the exact wording is testable without a live backend and the services
//! stay thin. The parsers are strict: a response that does not match the
//! documented shape is an upstream error, never a silent default.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use inkling_core::{Error, Result, Suggestion};

// ─── Elaboration coaching ───

const COACH_ROLE: &str = "You are an expert 'Elaboration Coach' for a journaling app. \
Your goal is to help users enrich their writing by asking a single, gentle, open-ended \
question about a specific, un-discussed paragraph.";

const COACH_INSTRUCTIONS: &str = r#"YOUR TASK:
1. Read the user's journal entry provided in the message below. The entry is divided into paragraphs.
2. Identify the single best new paragraph for elaboration. Look for paragraphs with emotional depth, unanswered questions, or strong sensory potential.
3. Determine the 1-based index number of your chosen paragraph (e.g., the first paragraph is 1, the second is 2).
4. From that chosen paragraph, extract a short, specific phrase (ideally 3-6 words) that your question directly relates to. This phrase MUST be an exact quote from the original text.
5. Choose the coaching strategy that best fits your question: 'sensory_deepening', 'emotional_exploration', 'cause_and_effect' or 'perspective_shift'.
6. Formulate a supportive, open-ended question that encourages the user to add more detail.

CRITICAL RULE FOR FOLLOW-UPS:
If the chosen paragraph already contains a phrase that answers a potential question, DO NOT ask that question. Instead, acknowledge the user's statement and ask a deeper, second-level question.

EXAMPLE OF GOOD BEHAVIOR:
User's text: "...That simple drawing evokes a deep sense of peace, a feeling of being completely present..."
Your highlighted text: "deep sense of peace"
BAD question: "What emotions does that drawing evoke?" (The user already said "peace".)
GOOD question: "What is it about that feeling of peace that feels so important to you now?" (This builds on the user's statement.)

Respond with ONLY a JSON object, no other text. To make a suggestion:
{"status": "suggestion", "paragraph_index": <number>, "strategy": "<strategy>", "suggestion_text": "<your question>", "highlight_text": "<exact quote>"}
If every paragraph has already been discussed and nothing new remains:
{"status": "complete"}"#;

/// System prompt for the elaboration coach.
///
/// Exclusions are keyed by highlight phrase rather than paragraph number,
/// so a suggestion stays excluded even after the author edits the entry
/// and the paragraphs renumber.
pub fn coach_system_prompt(excluded_highlights: &BTreeSet<String>) -> String {
    let exclusion_instruction = if excluded_highlights.is_empty() {
        "This is the first suggestion for this journal.".to_string()
    } else {
        let quoted: Vec<String> = excluded_highlights
            .iter()
            .map(|h| format!("\"{}\"", h))
            .collect();
        format!(
            "IMPORTANT: You have already provided suggestions for the passages quoted here: {}. \
             You MUST NOT highlight any of these passages again. \
             Choose a paragraph you have not commented on.",
            quoted.join(", ")
        )
    };
    format!("{}\n\n{}\n\n{}", COACH_ROLE, exclusion_instruction, COACH_INSTRUCTIONS)
}

/// User message carrying the journal entry to the coach.
pub fn elaborate_user_message(journal_text: &str) -> String {
    format!("Here is my journal entry:\n\n{}", journal_text)
}

#[derive(Serialize)]
struct AskPayload<'a> {
    task: &'static str,
    journal_text: &'a str,
    prompt: &'a str,
}

/// User message for the listener, in the same JSON shape its history
/// record uses so the model sees one consistent format across turns.
pub fn ask_user_message(journal_text: &str, prompt: &str) -> String {
    let payload = AskPayload {
        task: "ask",
        journal_text,
        prompt,
    };
    // Serialization of three string fields cannot fail.
    serde_json::to_string_pretty(&payload).unwrap_or_default()
}

/// System prompt for the conversational listener.
pub const LISTENER_SYSTEM_PROMPT: &str = r#"You are "Echo," a compassionate and insightful journaling assistant. Your ONLY goal is to ask ONE gentle, open-ended follow-up question or provide a single, short, validating concluding remark.
RULES:
- DO NOT offer advice.
- DO NOT share opinions.
- DO NOT use toxic positivity (e.g., "look on the bright side").
- Use the provided full session history for context.
- If it feels like the user is finished sharing, provide a simple, validating closing statement like "Thank you for sharing that with me." or "That sounds like a lot to hold. I appreciate you trusting me with it."
- Respond with the text of your reply only. Do not wrap it in JSON or markup."#;

// ─── Illustration ───

/// System prompt asking the model to pick the most visually descriptive
/// paragraph. The reply must be a bare 1-based number.
pub fn illustrable_paragraph_prompt(paragraph_count: usize) -> String {
    format!(
        "You are an expert in visual storytelling. Your task is to analyze the following \
         journal entry, which is split into numbered paragraphs.\n\
         Identify the single paragraph that is the most visually descriptive and suitable \
         for creating an illustration.\n\
         Consider paragraphs with concrete nouns, actions, and sensory details.\n\n\
         Your response must be ONLY the number of the chosen paragraph (e.g., '2'). \
         Do not include any other text, punctuation, or explanation.\n\
         There are {} paragraphs in total.",
        paragraph_count
    )
}

/// Render paragraphs with 1-based `Paragraph {i}:` headers for the
/// illustrable-paragraph call.
pub fn numbered_paragraphs(paragraphs: &[&str]) -> String {
    let mut out = String::new();
    for (i, p) in paragraphs.iter().enumerate() {
        out.push_str(&format!("Paragraph {}:\n{}\n\n", i + 1, p));
    }
    out
}

/// System prompt for extracting safe visual elements from a paragraph.
pub const VISUAL_ESSENCE_SYSTEM_PROMPT: &str = r#"You are an expert in extracting visual details from text for an art generation model.
From the given paragraph, identify the key visual elements (subjects, objects, setting, actions).

IMPORTANT SAFETY RULE: Your primary goal is to interpret the text in a way that is safe for an AI image generator.
- DO NOT extract any elements that depict or imply self-harm, violence, gore, explicit adult content, or hate symbols.
- If the text contains sensitive themes, rephrase them into abstract or symbolic representations. For example, instead of "a bloody knife," extract "a crimson object casting a long shadow." Instead of a violent act, describe the emotional aftermath, like "a sense of turmoil represented by stormy clouds."
- Focus on creating a visually rich and emotionally resonant scene that is artistic and G-rated.

Respond with ONLY a JSON object of the form {"visual_elements": ["...", "..."]}. Each element must be a concise descriptive phrase.
Example output: {"visual_elements": ["a person sitting on a park bench", "autumn leaves falling", "a red scarf", "a distant city skyline"]}"#;

// ─── Image description ───

/// Instruction for describing an attached journal image.
pub const IMAGE_DESCRIPTION_PROMPT: &str = "You are an expert at analyzing images for a \
personal journal. Describe the emotional mood, key subjects, and any significant actions \
or context in the image. Be descriptive but concise.";

// ─── Parsers ───

/// Parse the coach's JSON reply into a [`Suggestion`].
///
/// Strict on shape: an unknown strategy, a missing field, a 0 paragraph
/// index or an empty highlight is an upstream error. `{"status":
/// "complete"}` carries no payload fields.
pub fn parse_suggestion(raw: &str) -> Result<Suggestion> {
    let suggestion: Suggestion = serde_json::from_str(raw.trim()).map_err(|e| {
        Error::Upstream(format!(
            "coach response did not match the suggestion schema: {}",
            e
        ))
    })?;

    if let Suggestion::Proposal(proposal) = &suggestion {
        if proposal.paragraph_index == 0 {
            return Err(Error::Upstream(
                "coach returned paragraph index 0; indices are 1-based".to_string(),
            ));
        }
        if proposal.highlight_text.trim().is_empty() {
            return Err(Error::Upstream(
                "coach returned an empty highlight".to_string(),
            ));
        }
    }

    Ok(suggestion)
}

/// Parse a bare paragraph number and range-check it against the count.
/// Returns the 1-based number.
pub fn parse_paragraph_number(raw: &str, paragraph_count: usize) -> Result<usize> {
    let number: usize = raw.trim().parse().map_err(|_| {
        Error::Upstream(format!(
            "model did not return a paragraph number: {:?}",
            raw
        ))
    })?;
    if number < 1 || number > paragraph_count {
        return Err(Error::Upstream(format!(
            "paragraph number {} out of range 1..={}",
            number, paragraph_count
        )));
    }
    Ok(number)
}

#[derive(Deserialize)]
struct VisualEssence {
    visual_elements: Vec<String>,
}

/// Parse the `{"visual_elements": [...]}` reply. An empty list is an
/// upstream error; there is nothing to illustrate from it.
pub fn parse_visual_essence(raw: &str) -> Result<Vec<String>> {
    let essence: VisualEssence = serde_json::from_str(raw.trim()).map_err(|e| {
        Error::Upstream(format!(
            "visual essence response did not match the expected schema: {}",
            e
        ))
    })?;
    if essence.visual_elements.is_empty() {
        return Err(Error::Upstream(
            "visual essence response contained no elements".to_string(),
        ));
    }
    Ok(essence.visual_elements)
}
