//! Shared key generation for storage backends.

use tubely_core::models::AspectClass;

use crate::traits::{StorageError, StorageResult};

/// Storage key for a video: `{aspect}/{name}.mp4`.
pub fn video_key(aspect: AspectClass, name: &str) -> String {
    format!("{}/{}.mp4", aspect, name)
}

/// Reject keys that could escape a storage root or address nothing.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
