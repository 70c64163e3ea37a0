use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use encore_models::{
    AuthResponse, LoginRequest, MessageResponse, ProfileResponse, RegisterRequest, TeacherData,
    TeacherDataPatch, UpdateProfileDto, User, UserRole, UserType,
};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::admin_update_user,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserType,
            TeacherData,
            TeacherDataPatch,
            UpdateProfileDto,
            ProfileResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and logout"),
        (name = "Users", description = "Profile and user directory endpoints"),
    ),
    info(
        title = "Encore API",
        version = "0.1.0",
        description = "User accounts for a music lesson school"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/users/profile"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/users/profile/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/users/{id}"));
    }
}
