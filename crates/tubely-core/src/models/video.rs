use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// A video as stored in the record store.
///
/// `user_id` is the owner and is never written by the upload paths; only the
/// URL fields change after a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    pub fn new(user_id: Uuid, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: None,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Copy of this record with only the video URL replaced.
    pub fn with_video_url(&self, url: impl Into<String>) -> Self {
        Self {
            video_url: Some(url.into()),
            ..self.clone()
        }
    }

    /// Copy of this record with only the thumbnail URL replaced.
    pub fn with_thumbnail_url(&self, url: impl Into<String>) -> Self {
        Self {
            thumbnail_url: Some(url.into()),
            ..self.clone()
        }
    }
}

/// Coarse orientation bucket derived from pixel dimensions. Also used as the
/// storage key prefix for videos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectClass {
    Portrait,
    Landscape,
    Other,
}

impl AspectClass {
    /// Integer-floor classification: `width / height` of 0 is portrait, 1 is
    /// landscape, anything else is other. Near-square portrait footage lands in
    /// `Landscape` and every ratio of 2 or more in `Other`.
    ///
    /// Returns `None` when `height` is zero.
    pub fn classify(width: u32, height: u32) -> Option<Self> {
        if height == 0 {
            return None;
        }
        Some(match width / height {
            0 => AspectClass::Portrait,
            1 => AspectClass::Landscape,
            _ => AspectClass::Other,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectClass::Portrait => "portrait",
            AspectClass::Landscape => "landscape",
            AspectClass::Other => "other",
        }
    }
}

impl Display for AspectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
