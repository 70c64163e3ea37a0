//! Account DTOs: registration, login and plain message responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{TeacherData, User, UserRole};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[validate(email)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 6))]
    #[schema(example = "password123")]
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Defaults to `student`; `admin` cannot be self-assigned
    pub role: Option<UserRole>,
    pub teacher_data: Option<TeacherData>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Returned by both registration and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
