//! # Encore Config
//!
//! Configuration types for the Encore API, loaded once at startup from
//! environment variables and passed around inside the application state.
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`password`]: bcrypt cost factor
//! - [`upload`]: cover image storage location and public base URL
//! - [`cors`]: allowed browser origins
//! - [`server`]: bind address
//!
//! # Example
//!
//! ```ignore
//! use encore_config::{JwtConfig, UploadConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let upload_config = UploadConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod password;
pub mod server;
pub mod upload;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;
pub use upload::{UPLOADS_ROUTE, UploadConfig};
