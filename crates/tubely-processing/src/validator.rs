//! Media-type validation for uploaded parts.
//!
//! The declared content type of a multipart part is checked before any of its
//! bytes are written. A successful check yields the file extension to stage
//! the upload under.

use crate::error::{ProcessingError, ProcessingResult};

const INCORRECT_MEDIA_TYPE: &str = "Incorrect media type";

/// Which declared media types an upload accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeRule {
    /// Any `image/<subtype>`; the subtype becomes the extension.
    AnyImage,
    /// Exactly this media type (e.g. `video/mp4`).
    Exact(String),
}

/// Lowercase the essence of a media type and drop any parameters.
///
/// `"Image/PNG; charset=binary"` becomes `"image/png"`.
pub fn normalize_media_type(declared: &str) -> String {
    declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_safe_subtype(subtype: &str) -> bool {
    !subtype.is_empty()
        && !subtype.starts_with('.')
        && subtype
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '+' | '-'))
}

impl MediaTypeRule {
    /// Check a declared media type; returns the normalized type and the extension.
    pub fn check(&self, declared: Option<&str>) -> ProcessingResult<(String, String)> {
        let normalized = declared.map(normalize_media_type).unwrap_or_default();

        let Some((top, subtype)) = normalized.split_once('/') else {
            return Err(unsupported(declared));
        };

        let accepted = match self {
            MediaTypeRule::AnyImage => top == "image" && is_safe_subtype(subtype),
            MediaTypeRule::Exact(expected) => {
                normalized == normalize_media_type(expected) && is_safe_subtype(subtype)
            }
        };

        if !accepted {
            return Err(unsupported(declared));
        }

        let extension = subtype.to_string();
        Ok((normalized, extension))
    }
}

fn unsupported(declared: Option<&str>) -> ProcessingError {
    tracing::debug!(declared = ?declared, "Rejected media type");
    ProcessingError::UnsupportedMediaType(INCORRECT_MEDIA_TYPE.to_string())
}
