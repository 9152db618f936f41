//! S3 storage client for uploaded videos.
//!
//! This crate provides:
//! - Presigned PUT URLs for direct browser uploads
//! - Object download, existence checks and deletion
//! - Upload key generation

pub mod client;
pub mod config;
pub mod error;
pub mod keys;

pub use client::{DownloadedObject, S3Client, PRESIGNED_UPLOAD_EXPIRY};
pub use config::S3Config;
pub use error::{StorageError, StorageResult};
pub use keys::{new_upload_key, sanitize_file_name, upload_key, UPLOAD_KEY_PREFIX};
