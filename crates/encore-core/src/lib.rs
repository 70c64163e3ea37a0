//! # Encore Core
//!
//! Core types, errors, and utilities for the Encore API.
//!
//! - [`errors`]: Application error kinds with HTTP response conversion
//! - [`file_storage`]: Upload storage abstraction and local filesystem backend
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use encore_core::errors::AppError;
//! use encore_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//! let hash = hash_password("secure_password", 10)?;
//! ```

pub mod errors;
pub mod file_storage;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use file_storage::{FileStorage, LocalFileStorage, StorageError};
pub use password::{hash_password, verify_password};
