//! Authentication and per-video authorization for uploads.

pub mod authorizer;
pub mod jwt;

pub use authorizer::{Authorized, UploadAuthorizer};
pub use jwt::{bearer_token, make_jwt, validate_jwt, Claims};
