//! Tubely API Library
//!
//! HTTP handlers, upload services and application setup.

mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
