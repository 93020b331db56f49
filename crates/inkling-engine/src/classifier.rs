//! Embedding-similarity classification of journal entries.
//!
//! No model is ever asked "which emotion is this"; instead the label
//! *descriptions* are embedded once at startup and every entry is scored
//! against those vectors with cosine similarity. The label catalog's
//! enumeration order is load-bearing: argmax ties resolve to the earliest
//! label, so classification is deterministic for identical inputs.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use inkling_core::defaults::{MAX_EXTRA_TAGS, TAG_THRESHOLD_RATIO};
use inkling_core::{
    retry_idempotent, Classification, ClassificationRequest, EmbeddingBackend, EmotionScore, Error,
    LabelCatalog, Result, TagScore,
};
use inkling_inference::VisionBackend;

use crate::document::compose_document;
use crate::score::cosine_similarity;
use crate::vision::ImageDescriber;

/// One bootstrapped label: what callers see, what was embedded, and the
/// vector everything is scored against.
#[derive(Debug, Clone)]
pub struct LabelEntry {
    pub label: String,
    pub description: String,
    pub vector: Vec<f32>,
}

/// Embedded label vectors for one catalog, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    emotions: Vec<LabelEntry>,
    tags: Vec<LabelEntry>,
}

impl LabelStore {
    pub fn new(emotions: Vec<LabelEntry>, tags: Vec<LabelEntry>) -> Self {
        Self { emotions, tags }
    }

    pub fn emotions(&self) -> &[LabelEntry] {
        &self.emotions
    }

    pub fn tags(&self) -> &[LabelEntry] {
        &self.tags
    }

    /// Argmax over emotion labels. Ties go to the earlier label because
    /// only a strictly greater similarity displaces the current best.
    fn best_emotion(&self, vector: &[f32]) -> Option<EmotionScore> {
        let mut best: Option<EmotionScore> = None;
        for entry in &self.emotions {
            let similarity = cosine_similarity(vector, &entry.vector);
            let displaces = match &best {
                None => true,
                Some(current) => similarity > current.similarity,
            };
            if displaces {
                best = Some(EmotionScore {
                    emotion: entry.label.clone(),
                    similarity,
                });
            }
        }
        best
    }

    /// Every tag scored and sorted by similarity descending. The sort is
    /// stable, so equal scores keep enumeration order.
    fn ranked_tags(&self, vector: &[f32]) -> Vec<TagScore> {
        let mut ranked: Vec<TagScore> = self
            .tags
            .iter()
            .map(|entry| TagScore {
                tag: entry.label.clone(),
                similarity: cosine_similarity(vector, &entry.vector),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }
}

/// Keep the rank-1 tag plus at most [`MAX_EXTRA_TAGS`] more, each scoring
/// at least [`TAG_THRESHOLD_RATIO`] of the rank-1 similarity. `ranked`
/// must already be sorted descending.
fn select_top_tags(ranked: Vec<TagScore>) -> Vec<TagScore> {
    let mut iter = ranked.into_iter();
    let Some(top) = iter.next() else {
        return Vec::new();
    };
    let threshold = top.similarity * TAG_THRESHOLD_RATIO;
    let mut selected = vec![top];
    selected.extend(
        iter.take_while(|tag| tag.similarity >= threshold)
            .take(MAX_EXTRA_TAGS),
    );
    selected
}

/// Classifies composite documents against the embedded label catalog.
pub struct EmotionClassifier {
    embedder: Arc<dyn EmbeddingBackend>,
    describer: ImageDescriber,
    store: LabelStore,
}

impl EmotionClassifier {
    /// Bootstrap the label store by embedding every catalog description
    /// in one batched call, then split the vectors back by position.
    ///
    /// The embedding call is idempotent and retried on transient provider
    /// failures; a persistent failure is fatal so the classifier never
    /// serves with a partial store.
    pub async fn initialize(
        embedder: Arc<dyn EmbeddingBackend>,
        vision: Arc<dyn VisionBackend>,
        catalog: &LabelCatalog,
    ) -> Result<Self> {
        if catalog.emotions().is_empty() {
            return Err(Error::Config(
                "label catalog has no emotion labels".to_string(),
            ));
        }

        let mut texts: Vec<String> =
            Vec::with_capacity(catalog.emotions().len() + catalog.tags().len());
        texts.extend(
            catalog
                .emotions()
                .iter()
                .map(|(_, description)| description.clone()),
        );
        texts.extend(
            catalog
                .tags()
                .iter()
                .map(|(_, description)| description.clone()),
        );

        let vectors = retry_idempotent("label_bootstrap", || embedder.embed_texts(&texts)).await?;
        if vectors.len() != texts.len() {
            return Err(Error::Upstream(format!(
                "label bootstrap returned {} vectors for {} descriptions",
                vectors.len(),
                texts.len()
            )));
        }

        let (emotion_vectors, tag_vectors) = vectors.split_at(catalog.emotions().len());
        let emotions = catalog
            .emotions()
            .iter()
            .zip(emotion_vectors)
            .map(|((label, description), vector)| LabelEntry {
                label: label.clone(),
                description: description.clone(),
                vector: vector.clone(),
            })
            .collect();
        let tags = catalog
            .tags()
            .iter()
            .zip(tag_vectors)
            .map(|((label, description), vector)| LabelEntry {
                label: label.clone(),
                description: description.clone(),
                vector: vector.clone(),
            })
            .collect();

        let store = LabelStore::new(emotions, tags);
        info!(
            subsystem = "engine",
            component = "classifier",
            emotions = store.emotions().len(),
            tags = store.tags().len(),
            model = embedder.model_name(),
            "Label store ready"
        );

        Ok(Self::with_store(embedder, vision, store))
    }

    /// Build a classifier over an already-embedded label store.
    pub fn with_store(
        embedder: Arc<dyn EmbeddingBackend>,
        vision: Arc<dyn VisionBackend>,
        store: LabelStore,
    ) -> Self {
        Self {
            embedder,
            describer: ImageDescriber::new(vision),
            store,
        }
    }

    /// The label store backing this classifier.
    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    /// Classify a composite document: one emotion plus 1-3 ranked tags.
    #[instrument(skip(self, document), fields(
        subsystem = "engine",
        component = "classifier",
        op = "classify",
        doc_len = document.len()
    ))]
    pub async fn classify(&self, document: &str) -> Result<Classification> {
        let vector = self.embedder.embed_text(document).await?;

        let emotion = self
            .store
            .best_emotion(&vector)
            .ok_or_else(|| Error::Upstream("emotion label store is empty".to_string()))?;
        let tags = select_top_tags(self.store.ranked_tags(&vector));

        debug!(
            emotion = %emotion.emotion,
            similarity = emotion.similarity,
            tag_count = tags.len(),
            "Classification complete"
        );

        Ok(Classification { emotion, tags })
    }

    /// Classify a full request: describe attached images, compose the
    /// composite document, then classify it.
    #[instrument(skip(self, request), fields(
        subsystem = "engine",
        component = "classifier",
        op = "classify_entry",
        image_count = request
            .media_context
            .as_ref()
            .map(|m| m.images.len())
            .unwrap_or(0)
    ))]
    pub async fn classify_entry(&self, request: &ClassificationRequest) -> Result<Classification> {
        let media = request.media_context.as_ref();
        let images = media.map(|m| m.images.as_slice()).unwrap_or(&[]);

        let descriptions = self.describer.describe_images(images).await?;
        let document = compose_document(
            &request.entry_data,
            media.and_then(|m| m.video_emotion.as_deref()),
            media.and_then(|m| m.video_confidence),
            &descriptions,
        );

        self.classify(&document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, vector: Vec<f32>) -> LabelEntry {
        LabelEntry {
            label: label.to_string(),
            description: format!("{} description", label),
            vector,
        }
    }

    /// Unit vector whose cosine against `[1, 0]` is exactly `sim`.
    fn at_similarity(sim: f32) -> Vec<f32> {
        vec![sim, (1.0 - sim * sim).sqrt()]
    }

    #[test]
    fn test_best_emotion_picks_highest_similarity() {
        let store = LabelStore::new(
            vec![
                entry("sad", vec![0.0, 1.0]),
                entry("joy", vec![1.0, 0.0]),
            ],
            vec![],
        );
        let best = store.best_emotion(&[1.0, 0.1]).unwrap();
        assert_eq!(best.emotion, "joy");
        assert!(best.similarity > 0.9);
    }

    #[test]
    fn test_best_emotion_tie_resolves_to_earlier_label() {
        let store = LabelStore::new(
            vec![
                entry("first", vec![1.0, 0.0]),
                entry("second", vec![1.0, 0.0]),
            ],
            vec![],
        );
        let best = store.best_emotion(&[1.0, 0.0]).unwrap();
        assert_eq!(best.emotion, "first");
    }

    #[test]
    fn test_best_emotion_empty_store_is_none() {
        let store = LabelStore::new(vec![], vec![]);
        assert!(store.best_emotion(&[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_ranked_tags_sorted_descending() {
        let store = LabelStore::new(
            vec![],
            vec![
                entry("low", at_similarity(0.2)),
                entry("high", at_similarity(0.9)),
                entry("mid", at_similarity(0.5)),
            ],
        );
        let ranked = store.ranked_tags(&[1.0, 0.0]);
        let names: Vec<&str> = ranked.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ranked_tags_equal_scores_keep_catalog_order() {
        let store = LabelStore::new(
            vec![],
            vec![
                entry("alpha", vec![1.0, 0.0]),
                entry("beta", vec![1.0, 0.0]),
            ],
        );
        let ranked = store.ranked_tags(&[1.0, 0.0]);
        assert_eq!(ranked[0].tag, "alpha");
        assert_eq!(ranked[1].tag, "beta");
    }

    #[test]
    fn test_select_top_tags_applies_relative_threshold() {
        // Threshold is 0.81 * 0.8 = 0.648: keeps 0.65, drops both 0.50s.
        let ranked = vec![
            TagScore { tag: "a".to_string(), similarity: 0.81 },
            TagScore { tag: "b".to_string(), similarity: 0.65 },
            TagScore { tag: "c".to_string(), similarity: 0.50 },
            TagScore { tag: "d".to_string(), similarity: 0.50 },
        ];
        let selected = select_top_tags(ranked);
        let names: Vec<&str> = selected.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_select_top_tags_caps_at_three() {
        let ranked = vec![
            TagScore { tag: "a".to_string(), similarity: 0.9 },
            TagScore { tag: "b".to_string(), similarity: 0.89 },
            TagScore { tag: "c".to_string(), similarity: 0.88 },
            TagScore { tag: "d".to_string(), similarity: 0.87 },
        ];
        let selected = select_top_tags(ranked);
        assert_eq!(selected.len(), 3);
        assert_eq!(selected[2].tag, "c");
    }

    #[test]
    fn test_select_top_tags_rank_one_always_kept() {
        // Even a weak rank-1 tag survives; the threshold is relative.
        let ranked = vec![TagScore { tag: "only".to_string(), similarity: 0.05 }];
        let selected = select_top_tags(ranked);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].tag, "only");
    }

    #[test]
    fn test_select_top_tags_empty_input() {
        assert!(select_top_tags(vec![]).is_empty());
    }

    #[test]
    fn test_tag_scenario_from_scored_store() {
        let store = LabelStore::new(
            vec![entry("joy", vec![1.0, 0.0])],
            vec![
                entry("Family", at_similarity(0.81)),
                entry("Travel & Adventure", at_similarity(0.65)),
                entry("Work & Career", at_similarity(0.50)),
                entry("Finances & Money", at_similarity(0.50)),
            ],
        );
        let tags = select_top_tags(store.ranked_tags(&[1.0, 0.0]));
        let names: Vec<&str> = tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["Family", "Travel & Adventure"]);
    }
}
