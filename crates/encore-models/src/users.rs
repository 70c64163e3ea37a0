//! User domain models and DTOs.
//!
//! [`User`] is the public projection of an account: the password hash lives
//! only in the persistence layer and never appears here. Partial updates are
//! expressed as an [`UpdateProfileDto`] and applied with
//! [`User::apply_update`], which enforces the field policy for self-service
//! and admin edits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// Account role. Fixed at creation; no update path changes it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    #[default]
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TeacherData {
    #[serde(default)]
    #[schema(example = json!(["piano", "violin"]))]
    pub instruments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserType {
    pub role: UserRole,
    /// Only meaningful when `role` is `teacher`
    pub teacher_data: Option<TeacherData>,
}

impl UserType {
    /// Builds the role block for a new account, dropping teacher data for
    /// non-teachers.
    pub fn new(role: UserRole, teacher_data: Option<TeacherData>) -> Self {
        let teacher_data = match role {
            UserRole::Teacher => Some(teacher_data.unwrap_or_default()),
            _ => None,
        };
        Self { role, teacher_data }
    }
}

/// A user account, secret excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Public URL of the uploaded cover image
    pub cover_image: Option<String>,
    pub user_type: UserType,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Data required to insert an account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
}

/// Who is performing a profile update. Decides which fields may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateActor {
    /// The account holder editing their own profile
    Owner,
    /// An administrator editing another account
    Admin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct TeacherDataPatch {
    /// Replaces the instrument list wholesale when present
    pub instruments: Option<Vec<String>>,
}

/// Partial profile update. Absent or empty fields leave the stored value
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[validate(email)]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// Ignored on admin updates
    #[validate(length(min = 6))]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub teacher_data: Option<TeacherDataPatch>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl UpdateProfileDto {
    /// Maps empty strings to `None` so that they coalesce like absent fields.
    pub fn normalized(self) -> Self {
        Self {
            name: non_empty(self.name),
            email: non_empty(self.email),
            password: non_empty(self.password),
            phone: non_empty(self.phone),
            address: non_empty(self.address),
            teacher_data: self.teacher_data,
        }
    }
}

impl User {
    pub fn role(&self) -> UserRole {
        self.user_type.role
    }

    /// Applies the non-secret fields of `dto`.
    ///
    /// Owners who are admins keep their phone and address; admin edits
    /// always apply them. Instruments change only for teachers and only when
    /// `teacher_data` was sent. The password and cover image are handled by
    /// the caller.
    pub fn apply_update(&mut self, dto: &UpdateProfileDto, actor: UpdateActor) {
        if let Some(name) = &dto.name {
            self.name = name.clone();
        }
        if let Some(email) = &dto.email {
            self.email = email.clone();
        }

        let contact_editable = match actor {
            UpdateActor::Owner => self.role() != UserRole::Admin,
            UpdateActor::Admin => true,
        };
        if contact_editable {
            if let Some(phone) = &dto.phone {
                self.phone = Some(phone.clone());
            }
            if let Some(address) = &dto.address {
                self.address = Some(address.clone());
            }
        }

        if self.role() == UserRole::Teacher
            && let Some(patch) = &dto.teacher_data
        {
            let data = self
                .user_type
                .teacher_data
                .get_or_insert_with(TeacherData::default);
            if let Some(instruments) = &patch.instruments {
                data.instruments = instruments.clone();
            }
        }
    }
}

/// Fields returned after a profile update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub cover_image: Option<String>,
    pub role: UserRole,
    pub teacher_data: Option<TeacherData>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            cover_image: user.cover_image,
            role: user.user_type.role,
            teacher_data: user.user_type.teacher_data,
        }
    }
}
