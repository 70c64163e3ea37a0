//! # Encore Models
//!
//! Domain models and DTOs for the Encore API.
//!
//! - [`ids`]: the [`UserId`] newtype
//! - [`users`]: the user entity, roles and profile update policy
//! - [`auth`]: registration and login payloads
//!
//! # Example
//!
//! ```ignore
//! use encore_models::{UpdateActor, UpdateProfileDto, User};
//!
//! let dto = UpdateProfileDto { name: Some("Ada".into()), ..Default::default() };
//! user.apply_update(&dto.normalized(), UpdateActor::Owner);
//! ```

pub mod auth;
pub mod ids;
pub mod users;

pub use auth::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use ids::UserId;
pub use users::{
    NewUser, ProfileResponse, TeacherData, TeacherDataPatch, UpdateActor, UpdateProfileDto, User,
    UserRole, UserType,
};
