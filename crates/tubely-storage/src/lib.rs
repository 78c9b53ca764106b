//! Tubely Storage Library
//!
//! Durable storage for finished videos. The [`Storage`] trait is implemented
//! by [`ObjectStorage`] (any `object_store` backend, S3 in production) and by
//! [`LocalStorage`] for development.
//!
//! # Storage key format
//!
//! Video keys are partitioned by aspect class: `{portrait|landscape|other}/{name}.mp4`.
//! Keys must not be empty, contain `..`, or start with `/`. Key generation and
//! validation live in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::video_key;
pub use local::LocalStorage;
pub use object::ObjectStorage;
pub use traits::{Storage, StorageError, StorageResult};
