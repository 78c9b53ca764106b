//! Application-wide constants.

/// JWT issuer for access tokens.
pub const JWT_ISSUER: &str = "tubely-access";

/// Multipart field carrying a video upload.
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying a thumbnail upload.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Number of random bytes behind every generated file name (hex encoded).
pub const RANDOM_NAME_BYTES: usize = 32;

/// Extra room on top of the largest upload limit for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
