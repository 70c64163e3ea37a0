//! Cover image upload configuration.
//!
//! Uploaded files are written to `upload_dir` and published at
//! `{base_url}/public/uploads/{filename}`.

use std::env;
use std::path::PathBuf;

/// Path under which uploaded files are served.
pub const UPLOADS_ROUTE: &str = "/public/uploads";

#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Public base URL of this server, e.g. "http://localhost:8080"
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            upload_dir: PathBuf::from("public/uploads"),
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("BASE_URL").unwrap_or(defaults.base_url),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_file_size: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_file_size),
        }
    }

    /// URL prefix for stored files.
    pub fn public_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), UPLOADS_ROUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        let config = UploadConfig {
            base_url: "https://encore.example/".to_string(),
            ..UploadConfig::default()
        };
        assert_eq!(config.public_url(), "https://encore.example/public/uploads");
    }

    #[test]
    fn test_default_public_url() {
        assert_eq!(
            UploadConfig::default().public_url(),
            "http://localhost:8080/public/uploads"
        );
    }
}
