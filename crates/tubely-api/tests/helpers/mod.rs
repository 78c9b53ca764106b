//! Test helpers: build AppState and router for integration tests.
//!
//! The router runs against an in-memory video store, an in-memory object
//! store and scripted ffprobe/ffmpeg, so no external services are needed.

#![allow(dead_code)]

pub mod fixtures;
pub mod media_tools;
pub mod repository;
pub mod storage;

use axum_test::TestServer;
use object_store::memory::InMemory;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::config::{LocalStorageSettings, S3Settings};
use tubely_core::models::VideoRecord;
use tubely_core::{Config, StorageBackend};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_storage::{LocalStorage, ObjectStorage, Storage};
use uuid::Uuid;

use media_tools::FakeMediaTools;
use repository::RejectingUpdates;
use storage::{FailingStorage, RecordingStorage};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const BUCKET: &str = "tubely-test";
pub const REGION: &str = "us-east-2";

/// Test application: server plus handles on every collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoRepository,
    pub storage: Arc<dyn Storage>,
    pub tools: Arc<FakeMediaTools>,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn assets_root(&self) -> PathBuf {
        self.config.assets_root.clone()
    }

    /// Names of everything directly under the asset root, hidden entries included.
    pub fn asset_entries(&self) -> Vec<String> {
        match std::fs::read_dir(self.assets_root()) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    /// Insert a video owned by `owner`.
    pub async fn seed_video(&self, owner: Uuid) -> VideoRecord {
        let video = VideoRecord::new(owner, "Boot.dev beats");
        self.videos.insert(video.clone()).await;
        video
    }

    pub async fn stored_video(&self, id: Uuid) -> VideoRecord {
        self.videos.get_video(id).await.unwrap().unwrap()
    }

    /// Object key for a public URL produced by the S3 backend.
    pub fn key_from_url(&self, url: &str) -> String {
        let prefix = format!("https://{}.s3.{}.amazonaws.com/", BUCKET, REGION);
        url.strip_prefix(&prefix)
            .unwrap_or_else(|| panic!("unexpected video URL {url}"))
            .to_string()
    }

    pub async fn object_exists(&self, key: &str) -> bool {
        self.storage.exists(key).await.unwrap()
    }
}

pub fn test_config(assets_root: PathBuf) -> Config {
    let mut config = Config::with_defaults(JWT_SECRET, assets_root);
    config.s3 = Some(S3Settings {
        bucket: BUCKET.to_string(),
        region: REGION.to_string(),
        endpoint: None,
    });
    config
}

/// Setup a test application with default limits.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test application, adjusting the configuration first.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(temp_dir.path().join("assets"));
    customize(&mut config);

    let storage = in_memory_s3(&config);
    build_test_app(config, temp_dir, storage, None).await
}

/// Test application whose video storage rejects every write.
pub async fn setup_failing_storage_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path().join("assets"));

    build_test_app(config, temp_dir, Arc::new(FailingStorage), None).await
}

/// Test application whose record updates fail after storage succeeds.
/// Returns the storage wrapper so tests can see what was written and deleted.
pub async fn setup_rejecting_updates_test_app() -> (TestApp, Arc<RecordingStorage>) {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(temp_dir.path().join("assets"));

    let storage = Arc::new(RecordingStorage::new(in_memory_s3(&config)));
    let app = build_test_app(
        config,
        temp_dir,
        storage.clone(),
        Some(Box::new(|videos: InMemoryVideoRepository| {
            Arc::new(RejectingUpdates::new(videos)) as Arc<dyn VideoRepository>
        })),
    )
    .await;
    (app, storage)
}

/// Test application using the local video storage backend with its default base URL.
pub async fn setup_local_storage_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(temp_dir.path().join("assets"));
    let settings = LocalStorageSettings {
        path: temp_dir.path().join("media"),
        base_url: "http://localhost:8091/media".to_string(),
    };
    config.storage_backend = StorageBackend::Local;
    config.s3 = None;
    config.local_storage = Some(settings.clone());

    let storage = LocalStorage::new(settings.path, settings.base_url)
        .await
        .unwrap();
    build_test_app(config, temp_dir, Arc::new(storage), None).await
}

fn in_memory_s3(config: &Config) -> Arc<dyn Storage> {
    Arc::new(ObjectStorage::from_store(
        Arc::new(InMemory::new()),
        config.s3.as_ref().unwrap(),
    ))
}

type WrapRepository = Box<dyn FnOnce(InMemoryVideoRepository) -> Arc<dyn VideoRepository>>;

async fn build_test_app(
    config: Config,
    temp_dir: TempDir,
    storage: Arc<dyn Storage>,
    wrap_repository: Option<WrapRepository>,
) -> TestApp {
    config.validate().unwrap();

    let videos = InMemoryVideoRepository::new();
    let repository: Arc<dyn VideoRepository> = match wrap_repository {
        Some(wrap) => wrap(videos.clone()),
        None => Arc::new(videos.clone()),
    };
    let tools = Arc::new(FakeMediaTools::new());

    let state = AppState::new(config.clone(), repository, storage.clone(), tools.clone());
    let router = routes::setup_routes(Arc::new(state));
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        videos,
        storage,
        tools,
        config,
        _temp_dir: temp_dir,
    }
}
