//! Composite document construction for classification.
//!
//! The classifier never sees the raw entry; it sees a single composite
//! document that folds the title, any video-derived emotional context,
//! and vision descriptions of attached images into the entry text. The
//! rendering is deterministic so the same inputs always embed the same
//! string.

use inkling_core::{EntryData, ImageDescription};

/// Paragraphs of a journal entry: split on blank lines, trimmed, with
/// empty fragments dropped. Elaboration and illustration both index
/// into this list, so the split must stay identical between them.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Render the composite document for one entry.
///
/// Layout, line by line:
/// 1. `Title: {title}`
/// 2. when `video_emotion` is present, two context lines carrying the
///    detected emotion and its confidence score
/// 3. the entry text paragraph by paragraph, each image description
///    interleaved as `[Image Description: {text}]` directly after the
///    paragraph whose 0-based index equals its position
///
/// Descriptions are placed in ascending position order, ties in input
/// order; positions past the last paragraph are appended at the end.
pub fn compose_document(
    entry: &EntryData,
    video_emotion: Option<&str>,
    video_confidence: Option<f64>,
    image_descriptions: &[ImageDescription],
) -> String {
    let mut parts: Vec<String> = vec![format!("Title: {}", entry.title)];

    if let Some(emotion) = video_emotion {
        parts.push(format!("Context from video: The emotion was {}.", emotion));
        parts.push(format!(
            "AI Confidence score from the video: {}",
            video_confidence.unwrap_or_default()
        ));
    }

    let mut ordered: Vec<&ImageDescription> = image_descriptions.iter().collect();
    // Stable sort: equal positions keep their input order.
    ordered.sort_by_key(|d| d.position);

    let mut next = 0;
    for (i, paragraph) in entry.text.split("\n\n").enumerate() {
        parts.push(paragraph.to_string());
        while next < ordered.len() && ordered[next].position == i {
            parts.push(format!("[Image Description: {}]", ordered[next].description));
            next += 1;
        }
    }
    for description in &ordered[next..] {
        parts.push(format!("[Image Description: {}]", description.description));
    }

    parts.join("\n")
}
