//! Illustration pipeline: pick a paragraph, distill its visual essence,
//! render images, and persist them to object storage.
//!
//! The pipeline is staged so every model output is parsed and validated
//! before the next (and more expensive) stage runs. Only the image
//! rendering call is retried; it is idempotent and by far the most
//! failure-prone stage.

use std::sync::Arc;

use tracing::{debug, instrument};

use inkling_core::{
    retry_idempotent, Error, GeneratedImage, GenerationBackend, Illustration, Result,
    StoredIllustration,
};
use inkling_inference::prompts::{
    illustrable_paragraph_prompt, numbered_paragraphs, parse_paragraph_number,
    parse_visual_essence, VISUAL_ESSENCE_SYSTEM_PROMPT,
};
use inkling_inference::ImageBackend;
use inkling_storage::{extension_for_mime, hashed_filename, illustration_blob_path, ObjectStore};

use crate::document::split_paragraphs;

/// Final prompt handed to the image backend.
///
/// The wording is fixed; only the style and the extracted elements vary,
/// so the same essence always renders from the same prompt.
pub fn assemble_prompt(visual_essence: &[String], style: &str) -> String {
    format!(
        "Create a digital illustration in a '{}' style. The scene must feature: {}. \
         Focus on a clear composition that tells a story. The overall tone should be \
         artistic and evocative.",
        style,
        visual_essence.join(", ")
    )
}

/// Generates and stores illustrations for journal entries.
pub struct IllustrationService {
    generator: Arc<dyn GenerationBackend>,
    images: Arc<dyn ImageBackend>,
    store: Arc<dyn ObjectStore>,
}

impl IllustrationService {
    pub fn new(
        generator: Arc<dyn GenerationBackend>,
        images: Arc<dyn ImageBackend>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            generator,
            images,
            store,
        }
    }

    /// Ask the model which paragraph is the most visually descriptive.
    ///
    /// Returns the paragraph text and its 1-based number. The reply must
    /// be a bare number within range; anything else is an upstream error.
    pub async fn identify_illustrable_paragraph(
        &self,
        journal_text: &str,
    ) -> Result<(String, usize)> {
        let paragraphs = split_paragraphs(journal_text);
        if paragraphs.is_empty() {
            return Err(Error::Validation(
                "journal text is empty or has no usable paragraphs".to_string(),
            ));
        }

        let system = illustrable_paragraph_prompt(paragraphs.len());
        let body = numbered_paragraphs(&paragraphs);
        let raw = self.generator.generate_with_system(&system, &body).await?;
        let number = parse_paragraph_number(&raw, paragraphs.len())?;

        debug!(
            subsystem = "engine",
            component = "illustration",
            paragraph_count = paragraphs.len(),
            chosen = number,
            "illustration: paragraph identified"
        );

        Ok((paragraphs[number - 1].to_string(), number))
    }

    /// Distill a paragraph into image-safe visual elements.
    pub async fn extract_visual_essence(&self, paragraph: &str) -> Result<Vec<String>> {
        let raw = self
            .generator
            .generate_chat_json(Some(VISUAL_ESSENCE_SYSTEM_PROMPT), &[], paragraph)
            .await?;
        parse_visual_essence(&raw)
    }

    /// Run the full pipeline up to rendered image bytes.
    #[instrument(skip(self, journal_text), fields(
        subsystem = "engine",
        component = "illustration",
        op = "illustrate",
        style = %style,
        image_count = count
    ))]
    pub async fn illustrate(
        &self,
        journal_text: &str,
        style: &str,
        count: usize,
    ) -> Result<Illustration> {
        let (paragraph, position) = self.identify_illustrable_paragraph(journal_text).await?;
        let essence = self.extract_visual_essence(&paragraph).await?;
        let prompt = assemble_prompt(&essence, style);

        let images =
            retry_idempotent("generate_illustration", || self.images.generate(&prompt, count))
                .await?;

        debug!(
            position,
            rendered = images.len(),
            prompt_len = prompt.len(),
            "illustration: images rendered"
        );

        Ok(Illustration {
            images,
            prompt,
            position_after_paragraph: position,
        })
    }

    /// Upload rendered images under the owner's journal, returning one
    /// public URL per image in input order.
    #[instrument(skip(self, images), fields(
        subsystem = "engine",
        component = "illustration",
        op = "upload",
        user_id = %user_id,
        journal_id = %journal_id,
        image_count = images.len()
    ))]
    pub async fn upload_illustrations(
        &self,
        user_id: &str,
        journal_id: &str,
        images: &[GeneratedImage],
    ) -> Result<Vec<String>> {
        let mut urls = Vec::with_capacity(images.len());
        for image in images {
            let filename = hashed_filename(extension_for_mime(&image.mime_type));
            let path = illustration_blob_path(user_id, journal_id, &filename);
            let url = self.store.put(&image.bytes, &path, &image.mime_type).await?;
            urls.push(url);
        }
        Ok(urls)
    }

    /// Full pipeline including persistence: illustrate, then upload.
    pub async fn illustrate_and_store(
        &self,
        user_id: &str,
        journal_id: &str,
        journal_text: &str,
        style: &str,
        count: usize,
    ) -> Result<StoredIllustration> {
        let illustration = self.illustrate(journal_text, style, count).await?;
        let image_urls = self
            .upload_illustrations(user_id, journal_id, &illustration.images)
            .await?;
        Ok(StoredIllustration {
            image_urls,
            prompt: illustration.prompt,
            position_after_paragraph: illustration.position_after_paragraph,
        })
    }
}
