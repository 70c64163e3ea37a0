use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use encore_core::AppError;

/// Flattens field errors into one readable sentence, e.g.
/// `"email is invalid, password is invalid"`.
pub(crate) fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

pub(crate) fn validation_error(errors: &ValidationErrors) -> AppError {
    AppError::bad_request(anyhow!("{}", format_errors(errors)))
}

/// Maps a JSON extraction failure to a client error with a short message.
pub(crate) fn json_rejection(rejection: JsonRejection) -> AppError {
    let body = rejection.body_text();

    if let Some(field) = body
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
    {
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request(anyhow!("Missing 'Content-Type: application/json' header"))
        }
        _ if body.contains("invalid type") => {
            AppError::bad_request(anyhow!("Invalid field type in request"))
        }
        _ => AppError::bad_request(anyhow!("Invalid request body")),
    }
}

/// JSON body extractor that runs `validator` rules before the handler sees
/// the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate().map_err(|errors| validation_error(&errors))?;

        Ok(ValidatedJson(value))
    }
}
