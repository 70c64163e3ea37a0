use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use encore::router::init_router;
use encore::state::AppState;
use encore_auth::create_access_token;
use encore_config::{CorsConfig, JwtConfig, PasswordConfig, UploadConfig};
use encore_core::hash_password;
use encore_db::InMemoryUserRepository;
use encore_models::{NewUser, TeacherData, User, UserRole, UserType};

pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

#[allow(dead_code)]
pub struct TestUser {
    pub user: User,
    pub token: String,
}

#[allow(dead_code)]
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 3600,
    }
}

#[allow(dead_code)]
pub fn setup_test_app() -> TestApp {
    let upload_dir = std::env::temp_dir().join(format!("encore-uploads-{}", Uuid::new_v4()));

    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        test_jwt_config(),
        // bcrypt's minimum cost keeps the suite fast
        PasswordConfig { cost: 4 },
        UploadConfig {
            upload_dir: upload_dir.clone(),
            ..UploadConfig::default()
        },
        CorsConfig::parse("http://localhost:5173"),
    );

    TestApp {
        router: init_router(state.clone()),
        state,
        upload_dir,
    }
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts a user straight into the store and issues a token for it.
#[allow(dead_code)]
pub async fn create_test_user(
    app: &TestApp,
    role: UserRole,
    phone: Option<&str>,
    instruments: &[&str],
) -> TestUser {
    let teacher_data = TeacherData {
        instruments: instruments.iter().map(|s| s.to_string()).collect(),
    };

    let user = app
        .state
        .users
        .insert(NewUser {
            name: "Test User".to_string(),
            email: generate_unique_email(),
            password_hash: hash_password(TEST_PASSWORD, 4).unwrap(),
            phone: phone.map(str::to_string),
            address: Some("1 Conservatory Way".to_string()),
            user_type: UserType::new(role, Some(teacher_data)),
        })
        .await
        .unwrap();

    let token = create_access_token(user.id.into_inner(), &test_jwt_config()).unwrap();

    TestUser { user, token }
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[allow(dead_code)]
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, body)
}

/// One part of a hand-built multipart body.
#[allow(dead_code)]
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

#[allow(dead_code)]
pub fn multipart_request(method: &str, uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    let boundary = "encore-test-boundary";
    let mut body: Vec<u8> = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}
