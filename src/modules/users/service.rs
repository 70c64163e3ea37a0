use anyhow::anyhow;
use tracing::instrument;
use validator::Validate;

use encore_core::{AppError, hash_password};
use encore_models::{ProfileResponse, UpdateActor, User, UserId};

use crate::modules::users::form::ProfileForm;
use crate::state::AppState;
use crate::validator::validation_error;

pub struct UserService;

fn user_not_found() -> AppError {
    AppError::not_found(anyhow!("User not found"))
}

impl UserService {
    /// Parses a path segment into a [`UserId`].
    pub fn parse_user_id(raw: &str) -> Result<UserId, AppError> {
        raw.parse()
            .map_err(|_| AppError::bad_request(anyhow!("Invalid user id '{}'", raw)))
    }

    #[instrument(skip(state))]
    pub async fn get_user(state: &AppState, id: UserId) -> Result<User, AppError> {
        state
            .users
            .find_by_id(id)
            .await
            .map_err(AppError::bad_request)?
            .ok_or_else(user_not_found)
    }

    #[instrument(skip(state))]
    pub async fn get_users(state: &AppState) -> Result<Vec<User>, AppError> {
        state.users.find_all().await.map_err(AppError::bad_request)
    }

    #[instrument(skip(state))]
    pub async fn delete_user(state: &AppState, id: UserId) -> Result<(), AppError> {
        // existence is checked first so a missing id reports 404
        Self::get_user(state, id).await?;

        if !state.users.delete(id).await.map_err(AppError::bad_request)? {
            return Err(user_not_found());
        }

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Applies a profile update for `target`.
    ///
    /// Owners may change their password; admin edits never do. The cover
    /// image is stored before the record is saved and removed again if the
    /// save fails. A replaced cover is deleted once the save succeeds.
    #[instrument(skip(state, form), fields(has_cover_image = form.cover_image.is_some()))]
    pub async fn update_profile(
        state: &AppState,
        target: UserId,
        actor: UpdateActor,
        form: ProfileForm,
    ) -> Result<ProfileResponse, AppError> {
        let mut dto = form.dto.normalized();
        if actor == UpdateActor::Admin {
            dto.password = None;
        }
        dto.validate().map_err(|errors| validation_error(&errors))?;

        let mut user = Self::get_user(state, target).await?;
        let previous_cover = user.cover_image.clone();
        user.apply_update(&dto, actor);

        let password_hash = match &dto.password {
            Some(password) => Some(hash_password(password, state.password_config.cost)?),
            None => None,
        };

        let stored_key = match &form.cover_image {
            Some(file) => {
                let key = state.storage.generate_key(&file.content_type)?;
                state.storage.save(&key, &file.bytes).await?;
                user.cover_image = Some(state.storage.get_url(&key)?);
                Some(key)
            }
            None => None,
        };

        let saved = match state.users.save(&user, password_hash.as_deref()).await {
            Ok(Some(saved)) => saved,
            result => {
                if let Some(key) = &stored_key
                    && let Err(e) = state.storage.delete(key).await
                {
                    tracing::warn!(error = %e, key = %key, "failed to remove orphaned upload");
                }
                return Err(match result {
                    Err(e) => AppError::bad_request(e),
                    _ => user_not_found(),
                });
            }
        };

        if stored_key.is_some()
            && let Some(old_key) = previous_cover
                .as_deref()
                .and_then(|url| state.storage.key_from_url(url))
            && let Err(e) = state.storage.delete(&old_key).await
        {
            tracing::warn!(error = %e, key = %old_key, "failed to remove replaced cover image");
        }

        tracing::info!(user_id = %saved.id, ?actor, "profile updated");
        Ok(ProfileResponse::from(saved))
    }
}
