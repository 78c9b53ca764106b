//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::{Config, StorageBackend};

const ASSETS_MOUNT: &str = "/assets";

/// Build the application router.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .route(
            "/api/videos/{videoID}/video",
            post(handlers::video_upload::upload_video),
        )
        .route(
            "/api/thumbnail_upload/{videoID}",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .nest_service(ASSETS_MOUNT, ServeDir::new(&config.assets_root));

    mount_local_storage(router, &config)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(config.max_request_body_bytes())),
        )
        .with_state(state)
}

/// With the local backend, serve its directory at the path of its base URL so
/// stored video URLs resolve.
fn mount_local_storage(router: Router<Arc<AppState>>, config: &Config) -> Router<Arc<AppState>> {
    let Some(local) = config
        .local_storage
        .as_ref()
        .filter(|_| config.storage_backend == StorageBackend::Local)
    else {
        return router;
    };

    match mount_path(&local.base_url) {
        Some(path) if !overlaps_assets(&path) => {
            tracing::info!(
                mount = %path,
                directory = %local.path.display(),
                "Serving local video storage"
            );
            router.nest_service(&path, ServeDir::new(&local.path))
        }
        _ => {
            tracing::warn!(
                base_url = %local.base_url,
                "Local storage base URL has no servable path; videos will not be served by this server"
            );
            router
        }
    }
}

fn overlaps_assets(path: &str) -> bool {
    path == ASSETS_MOUNT || path.starts_with(&format!("{}/", ASSETS_MOUNT))
}

/// Path component of a base URL, without a trailing slash. `None` for the root.
fn mount_path(base_url: &str) -> Option<String> {
    let path = match base_url.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|idx| &rest[idx..])?,
        None => base_url,
    };
    let path = path.trim_end_matches('/');
    (!path.is_empty()).then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_path_from_base_url() {
        assert_eq!(
            mount_path("http://localhost:8091/media").as_deref(),
            Some("/media")
        );
        assert_eq!(
            mount_path("https://cdn.example.com/videos/v1/").as_deref(),
            Some("/videos/v1")
        );
        assert_eq!(mount_path("/media").as_deref(), Some("/media"));
        assert_eq!(mount_path("http://localhost:8091"), None);
        assert_eq!(mount_path("http://localhost:8091/"), None);
    }

    #[test]
    fn asset_mount_is_not_shadowed() {
        assert!(overlaps_assets("/assets"));
        assert!(overlaps_assets("/assets/videos"));
        assert!(!overlaps_assets("/assetsx"));
        assert!(!overlaps_assets("/media"));
    }
}
