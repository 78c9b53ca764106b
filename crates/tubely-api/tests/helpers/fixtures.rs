//! Tokens and multipart bodies.

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use uuid::Uuid;

use super::JWT_SECRET;

pub fn token_for(user_id: Uuid) -> String {
    tubely_api::auth::make_jwt(user_id, JWT_SECRET, chrono::Duration::hours(1)).unwrap()
}

pub fn expired_token_for(user_id: Uuid) -> String {
    tubely_api::auth::make_jwt(user_id, JWT_SECRET, chrono::Duration::hours(-1)).unwrap()
}

/// Bytes that look like the start of an MP4 (`ftyp` box).
pub fn mp4_bytes(len: usize) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len.max(data.len()), 0xAB);
    data.truncate(len);
    data
}

pub fn png_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&[0u8; 64]);
    data
}

pub fn file_form(field: &str, data: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}

pub fn video_form(data: Vec<u8>) -> MultipartForm {
    file_form("video", data, "boots.mp4", "video/mp4")
}

pub fn thumbnail_form(data: Vec<u8>, mime: &str) -> MultipartForm {
    file_form("thumbnail", data, "thumb", mime)
}
