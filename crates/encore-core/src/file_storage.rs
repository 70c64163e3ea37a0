//! File storage abstraction layer.
//!
//! Uploaded cover images go through the [`FileStorage`] trait so the
//! handlers never touch the filesystem directly. [`LocalFileStorage`] writes
//! into a directory that the HTTP server also exposes under
//! `/public/uploads`.
//!
//! # Example
//!
//! ```ignore
//! use encore_core::file_storage::{FileStorage, LocalFileStorage};
//! use std::path::PathBuf;
//!
//! let storage = LocalFileStorage::new(
//!     PathBuf::from("./public/uploads"),
//!     "http://localhost:8080/public/uploads".to_string(),
//! );
//!
//! let key = storage.generate_key("image/png")?;
//! storage.save(&key, &bytes).await?;
//! let url = storage.get_url(&key)?;
//! ```

use std::path::PathBuf;
use std::pin::Pin;

use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// Abstract trait for file storage backends.
pub trait FileStorage: Send + Sync {
    /// Save file content under `key` and return the key.
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String>;

    /// Delete a file by key. Missing files are not an error.
    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;

    /// Public URL for a stored key.
    fn get_url(&self, key: &str) -> Result<String, StorageError>;

    /// Inverse of [`get_url`](FileStorage::get_url). `None` for URLs this
    /// backend did not produce.
    fn key_from_url(&self, url: &str) -> Option<String>;

    /// Build a fresh storage key for an upload of the given MIME type,
    /// rejecting types that are not accepted.
    fn generate_key(&self, content_type: &str) -> Result<String, StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {max_bytes} bytes")]
    InvalidFileSize { max_bytes: usize },

    #[error("MIME type '{received}' not allowed. Allowed types: {}", .allowed.join(", "))]
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Local filesystem-based file storage.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
    /// Public URL prefix, e.g. "http://localhost:8080/public/uploads"
    base_url: String,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, 5 * 1024 * 1024)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
            ],
        }
    }

    /// Reject empty keys, path traversal and characters outside `[A-Za-z0-9-_./]`.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\')
        {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    fn extension_for(content_type: &str) -> &'static str {
        match content_type {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

impl FileStorage for LocalFileStorage {
    fn save<'a>(&'a self, key: &'a str, content: &'a [u8]) -> StorageFuture<'a, String> {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            tracing::debug!(key = %key, bytes = content.len(), "file stored");
            Ok(key.to_string())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn get_url(&self, key: &str) -> Result<String, StorageError> {
        Self::validate_key(key)?;
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        let key = url
            .strip_prefix(self.base_url.trim_end_matches('/'))?
            .strip_prefix('/')?;
        Self::validate_key(key).ok()?;
        Some(key.to_string())
    }

    fn generate_key(&self, content_type: &str) -> Result<String, StorageError> {
        if !self.allowed_mime_types.iter().any(|m| m == content_type) {
            return Err(StorageError::InvalidMimeType {
                received: content_type.to_string(),
                allowed: self.allowed_mime_types.clone(),
            });
        }

        Ok(format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            Self::extension_for(content_type)
        ))
    }
}
