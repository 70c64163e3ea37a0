//! # Encore API
//!
//! User accounts for a music lesson school, served over HTTP with Axum.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── cli.rs          # Admin bootstrap used by the encore-cli binary
//! ├── middleware/     # Token verification, identity loading, role gates
//! ├── modules/
//! │   ├── auth/       # register, login, logout
//! │   └── users/      # profile, directory listing, delete, admin update
//! ├── router.rs       # Route table and layer stack
//! └── state.rs        # Shared AppState
//! ```
//!
//! Each feature module follows the same structure:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: business logic
//! - `router.rs`: Axum router configuration
//!
//! ## Request Pipeline
//!
//! ```text
//! request → authenticate (token → user) → require_admin? → handler
//! ```
//!
//! Each stage fails with an [`encore_core::AppError`] whose kind decides the
//! HTTP status. Roles are `admin`, `teacher` and `student`; admins are
//! created with `encore-cli create-admin`.

pub mod cli;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

pub use router::init_router;
pub use state::{AppState, init_app_state};
