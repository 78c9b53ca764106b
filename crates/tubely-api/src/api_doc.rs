//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video and thumbnail ingestion. Videos are probed for orientation, rewritten for fast start and stored in object storage; thumbnails are served from the local asset directory."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::VideoRecord,
            error::ErrorResponse,
            handlers::health::HealthCheckResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video and thumbnail uploads"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
