//! Shared application state

use crate::auth::UploadAuthorizer;
use std::sync::Arc;
use std::time::Duration;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{FastStartTranscoder, MediaProbe, ProcessRunner};
use tubely_storage::Storage;

pub struct AppState {
    pub config: Arc<Config>,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub authorizer: UploadAuthorizer,
    pub probe: MediaProbe,
    pub transcoder: FastStartTranscoder,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        let probe = MediaProbe::new(
            runner.clone(),
            config.ffprobe_path.clone(),
            Duration::from_secs(config.probe_timeout_secs),
        );
        let transcoder = FastStartTranscoder::new(
            runner,
            config.ffmpeg_path.clone(),
            Duration::from_secs(config.transcode_timeout_secs),
        );
        let authorizer = UploadAuthorizer::new(videos.clone(), config.jwt_secret.clone());

        Self {
            config: Arc::new(config),
            videos,
            storage,
            authorizer,
            probe,
            transcoder,
        }
    }
}
