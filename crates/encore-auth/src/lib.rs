//! # Encore Auth
//!
//! Bearer token support for the Encore API:
//!
//! - [`claims`]: the access token payload
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, encode_claims, verify_token};
