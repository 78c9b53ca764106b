//! Configuration module
//!
//! Configuration is read once from the environment (and an optional `.env`
//! file) at startup, validated, and then handed to every component through
//! the application state.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

const SERVER_PORT: u16 = 8091;
const MAX_THUMBNAIL_SIZE_BYTES: usize = 10 << 20;
const MAX_VIDEO_SIZE_BYTES: usize = 1 << 30;
const PROBE_TIMEOUT_SECS: u64 = 30;
const TRANSCODE_TIMEOUT_SECS: u64 = 600;
const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Where finished videos are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Local,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            other => Err(anyhow::anyhow!(
                "Invalid STORAGE_BACKEND '{}': expected 's3' or 'local'",
                other
            )),
        }
    }
}

/// S3 bucket settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, ...)
    pub endpoint: Option<String>,
}

/// Local storage settings (development backend).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalStorageSettings {
    pub path: PathBuf,
    pub base_url: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    /// Postgres connection string. When unset the in-memory store is used.
    pub database_url: Option<String>,
    /// Local directory for thumbnails and per-upload working directories.
    pub assets_root: PathBuf,
    /// Public base URL under which `assets_root` is served.
    pub assets_base_url: String,
    pub storage_backend: StorageBackend,
    pub s3: Option<S3Settings>,
    pub local_storage: Option<LocalStorageSettings>,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub probe_timeout_secs: u64,
    pub transcode_timeout_secs: u64,
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
    /// The single media type accepted for video uploads.
    pub video_content_type: String,
    pub log_json: bool,
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, anyhow::Error> {
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: '{}'", name, raw)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = parse_or("PORT", SERVER_PORT)?;
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let jwt_secret =
            var("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let assets_root = PathBuf::from(var("ASSETS_ROOT").unwrap_or_else(|| "./assets".into()));
        let assets_base_url = var("ASSETS_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}/assets", server_port));

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let s3 = match var("S3_BUCKET") {
            Some(bucket) => {
                let region = var("S3_REGION").or_else(|| var("AWS_REGION")).ok_or_else(|| {
                    anyhow::anyhow!("S3_REGION or AWS_REGION must be set when S3_BUCKET is set")
                })?;
                Some(S3Settings {
                    bucket,
                    region,
                    endpoint: var("S3_ENDPOINT"),
                })
            }
            None => None,
        };

        let local_storage = var("LOCAL_STORAGE_PATH").map(|path| LocalStorageSettings {
            path: PathBuf::from(path),
            base_url: var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/media", server_port)),
        });

        let config = Config {
            server_port,
            environment,
            jwt_secret,
            database_url: var("DATABASE_URL"),
            assets_root,
            assets_base_url,
            storage_backend,
            s3,
            local_storage,
            ffmpeg_path: var("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            ffprobe_path: var("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            probe_timeout_secs: parse_or("PROBE_TIMEOUT_SECS", PROBE_TIMEOUT_SECS)?,
            transcode_timeout_secs: parse_or("TRANSCODE_TIMEOUT_SECS", TRANSCODE_TIMEOUT_SECS)?,
            max_thumbnail_size_bytes: parse_or(
                "MAX_THUMBNAIL_SIZE_BYTES",
                MAX_THUMBNAIL_SIZE_BYTES,
            )?,
            max_video_size_bytes: parse_or("MAX_VIDEO_SIZE_BYTES", MAX_VIDEO_SIZE_BYTES)?,
            video_content_type: var("VIDEO_CONTENT_TYPE")
                .map(|ct| ct.trim().to_lowercase())
                .unwrap_or_else(|| VIDEO_CONTENT_TYPE.to_string()),
            log_json: var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }

    /// Configuration with defaults for everything except the secret and asset root.
    /// Intended for tests and embedding; storage settings still have to be filled in
    /// for the selected backend.
    pub fn with_defaults(jwt_secret: impl Into<String>, assets_root: impl Into<PathBuf>) -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            jwt_secret: jwt_secret.into(),
            database_url: None,
            assets_root: assets_root.into(),
            assets_base_url: format!("http://localhost:{}/assets", SERVER_PORT),
            storage_backend: StorageBackend::S3,
            s3: None,
            local_storage: None,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            transcode_timeout_secs: TRANSCODE_TIMEOUT_SECS,
            max_thumbnail_size_bytes: MAX_THUMBNAIL_SIZE_BYTES,
            max_video_size_bytes: MAX_VIDEO_SIZE_BYTES,
            video_content_type: VIDEO_CONTENT_TYPE.to_string(),
            log_json: false,
        }
    }

    /// Fail fast on misconfiguration.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow::anyhow!("JWT_SECRET must not be empty"));
        }
        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }
        if self.probe_timeout_secs == 0 || self.transcode_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Process timeouts must be greater than zero"));
        }
        if !self.video_content_type.starts_with("video/") {
            return Err(anyhow::anyhow!(
                "VIDEO_CONTENT_TYPE must be a video/* type, got '{}'",
                self.video_content_type
            ));
        }
        match self.storage_backend {
            StorageBackend::S3 if self.s3.is_none() => Err(anyhow::anyhow!(
                "S3_BUCKET and S3_REGION must be set when using the S3 storage backend"
            )),
            StorageBackend::Local if self.local_storage.is_none() => Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using the local storage backend"
            )),
            _ => Ok(()),
        }
    }

    /// Largest request body the server accepts.
    pub fn max_request_body_bytes(&self) -> usize {
        self.max_video_size_bytes
            .max(self.max_thumbnail_size_bytes)
            .saturating_add(crate::constants::MULTIPART_OVERHEAD_BYTES)
    }
}
