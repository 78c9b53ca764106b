//! Tubely Core Library
//!
//! Shared configuration, error taxonomy, and domain models used by every
//! other crate in the workspace.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
