//! # inkling-storage
//!
//! Object storage for generated journal media.
//!
//! This crate provides:
//! - [`ObjectStore`] trait abstracting over storage providers
//! - [`HttpObjectStore`] talking the GCS JSON/media API over HTTP
//! - Blob path and filename helpers for illustration uploads
//!
//! Uploaded objects are addressed by their public URL
//! (`https://{host}/{bucket}/{path}`); downloads parse and validate that
//! URL before any network call.

pub mod object_store;
pub mod paths;

pub use object_store::{HttpObjectStore, ObjectStore, StorageConfig};
pub use paths::{extension_for_mime, hashed_filename, illustration_blob_path, mime_for_extension};
