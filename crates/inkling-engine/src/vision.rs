//! Image description step for attached journal media.
//!
//! Turns each attached image into an [`ImageDescription`] through a
//! pluggable [`VisionBackend`]. Payloads are decoded and validated up
//! front so a bad attachment is rejected before the first provider call.

use std::sync::Arc;

use base64::Engine;
use futures::future::try_join_all;
use tracing::debug;

use inkling_core::{Error, ImageAttachment, ImageDescription, Result};
use inkling_inference::prompts::IMAGE_DESCRIPTION_PROMPT;
use inkling_inference::VisionBackend;
use inkling_storage::mime_for_extension;

/// Describes attached images with a vision model.
pub struct ImageDescriber {
    backend: Arc<dyn VisionBackend>,
}

impl ImageDescriber {
    /// Create a new describer with a specific backend.
    pub fn new(backend: Arc<dyn VisionBackend>) -> Self {
        Self { backend }
    }

    /// Describe every attachment, preserving input order.
    ///
    /// Each description carries the attachment's paragraph position so
    /// document composition can interleave it. All payloads are decoded
    /// before any backend call; a payload that is not valid base64 or is
    /// empty fails the whole batch with a validation error.
    pub async fn describe_images(
        &self,
        images: &[ImageAttachment],
    ) -> Result<Vec<ImageDescription>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let mut decoded: Vec<(usize, Vec<u8>, &'static str)> = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&image.content)
                .map_err(|e| {
                    Error::Validation(format!(
                        "attached image {} is not valid base64: {}",
                        index, e
                    ))
                })?;
            if bytes.is_empty() {
                return Err(Error::Validation(format!(
                    "attached image {} is empty",
                    index
                )));
            }
            decoded.push((
                image.position_after_paragraph,
                bytes,
                mime_for_extension(&image.format),
            ));
        }

        debug!(
            subsystem = "engine",
            count = decoded.len(),
            model = self.backend.model_name(),
            "vision: describing attached images"
        );

        let calls = decoded.iter().map(|(position, bytes, mime_type)| {
            let position = *position;
            async move {
                let description = self
                    .backend
                    .describe_image(bytes, mime_type, Some(IMAGE_DESCRIPTION_PROMPT))
                    .await?;
                Ok::<ImageDescription, Error>(ImageDescription {
                    position,
                    description,
                })
            }
        });

        try_join_all(calls).await
    }
}
