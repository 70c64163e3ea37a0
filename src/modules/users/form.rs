//! Profile update payload extraction.
//!
//! `PUT /profile` and `PUT /profile/{id}` accept either a JSON body or
//! `multipart/form-data`. In multipart requests the optional file lives in
//! the `cover_image` field, `teacher_data` is a JSON-encoded text field, and
//! instruments may also be sent as repeated `instruments` text fields. A
//! request without a body is an update that changes nothing.

use anyhow::anyhow;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};

use encore_core::AppError;
use encore_models::{TeacherDataPatch, UpdateProfileDto};

use crate::validator::json_rejection;

pub const COVER_IMAGE_FIELD: &str = "cover_image";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub dto: UpdateProfileDto,
    pub cover_image: Option<UploadedFile>,
}

fn content_type(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
}

fn is_multipart(req: &Request) -> bool {
    content_type(req).is_some_and(|value| value.starts_with("multipart/form-data"))
}

fn is_json(req: &Request) -> bool {
    content_type(req).is_some_and(|value| {
        let mime = value.split(';').next().unwrap_or_default().trim();
        mime == "application/json" || mime.ends_with("+json")
    })
}

impl ProfileForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ProfileForm::default();
        let mut instruments: Option<Vec<String>> = None;

        while let Some(field) = multipart.next_field().await.map_err(AppError::bad_request)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == COVER_IMAGE_FIELD {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(AppError::bad_request)?;
                if !bytes.is_empty() {
                    form.cover_image = Some(UploadedFile {
                        content_type,
                        bytes,
                    });
                }
                continue;
            }

            let text = field.text().await.map_err(AppError::bad_request)?;
            let dto = &mut form.dto;
            match name.as_str() {
                "name" => dto.name = Some(text),
                "email" => dto.email = Some(text),
                "password" => dto.password = Some(text),
                "phone" => dto.phone = Some(text),
                "address" => dto.address = Some(text),
                "teacher_data" => {
                    let patch: TeacherDataPatch = serde_json::from_str(&text)
                        .map_err(|e| AppError::bad_request(anyhow!("Invalid teacher_data: {}", e)))?;
                    dto.teacher_data = Some(patch);
                }
                "instruments" | "instruments[]" => {
                    instruments.get_or_insert_with(Vec::new).push(text);
                }
                other => tracing::debug!(field = %other, "ignoring unknown form field"),
            }
        }

        if let Some(list) = instruments {
            form.dto
                .teacher_data
                .get_or_insert_with(TeacherDataPatch::default)
                .instruments = Some(list);
        }

        Ok(form)
    }
}

impl<S> FromRequest<S> for ProfileForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(&req) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))?;
            return Self::from_multipart(multipart).await;
        }

        let json = is_json(&req);
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!(rejection.body_text())))?;

        // every field is optional, so no body at all is an empty update
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        if !json {
            return Err(AppError::bad_request(anyhow!(
                "Missing 'Content-Type: application/json' header"
            )));
        }

        let Json(dto) = Json::<UpdateProfileDto>::from_bytes(&body).map_err(json_rejection)?;

        Ok(Self {
            dto,
            cover_image: None,
        })
    }
}
