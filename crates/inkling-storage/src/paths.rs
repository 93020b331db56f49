//! Blob path and filename helpers for media uploads.

use inkling_core::defaults::DEFAULT_IMAGE_EXTENSION;
use uuid::Uuid;

/// Generate a collision-resistant filename for an uploaded object.
///
/// The extension is lowercased with any leading dot stripped; an empty
/// extension falls back to `png`.
pub fn hashed_filename(extension: &str) -> String {
    let ext = extension.trim().trim_start_matches('.').to_lowercase();
    let ext = if ext.is_empty() {
        DEFAULT_IMAGE_EXTENSION
    } else {
        ext.as_str()
    };
    format!("{}.{}", Uuid::new_v4().simple(), ext)
}

/// Blob path for an illustration belonging to a user's journal.
pub fn illustration_blob_path(user_id: &str, journal_id: &str, filename: &str) -> String {
    format!(
        "uploads/videos/{}/{}/illustrations/image_uploads/{}",
        user_id, journal_id, filename
    )
}

/// MIME type for an image file extension. Unknown extensions fall back
/// to `image/jpeg`.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.trim().trim_start_matches('.').to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// File extension for an image MIME type. Unknown types fall back to `png`.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.trim().to_lowercase().as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "png",
    }
}
