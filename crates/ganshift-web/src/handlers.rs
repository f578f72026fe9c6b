//! HTTP handlers for the upload shell.

use std::io::Cursor;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing::debug;

use ganshift_adapters::uploads;
use image::DynamicImage;

use crate::state::{SharedState, TranslateJob};

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>ganshift</title></head>
<body>
<h1>Image translation</h1>
<form action="/translate" method="post" enctype="multipart/form-data">
  <p><label>Image A: <input type="file" name="image_a" accept=".png,.jpg,.jpeg"></label></p>
  <p><label>Image B: <input type="file" name="image_b" accept=".png,.jpg,.jpeg"></label></p>
  <p><button type="submit">Translate</button></p>
</form>
</body>
</html>
"#;

/// JSON error body for failed requests.
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ApiError>);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: message.into(),
        }),
    )
}

fn server_error(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError {
            error: message.into(),
        }),
    )
}

/// Upload page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health probe.
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// One multipart field, as collected before decoding.
struct UploadField {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: axum::body::Bytes,
}

/// Translates the first upload; the second is validated but untouched.
///
/// Request failures (missing field, bad payload) answer 400 and leave the
/// worker and its models untouched.
pub async fn translate(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut image_a: Option<UploadField> = None;
    let mut image_b: Option<UploadField> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read field '{name}': {e}")))?;

        let upload = UploadField {
            file_name,
            content_type,
            bytes,
        };
        match name.as_str() {
            "image_a" => image_a = Some(upload),
            "image_b" => image_b = Some(upload),
            _ => debug!("Ignoring unknown multipart field '{name}'"),
        }
    }

    let image_a = image_a.ok_or_else(|| bad_request("Missing upload field: image_a"))?;
    let image_b = image_b.ok_or_else(|| bad_request("Missing upload field: image_b"))?;

    let decoded_a = decode_field("image_a", &image_a)?;
    // Decoded to validate the upload; the demo route only transforms image A.
    let _decoded_b = decode_field("image_b", &image_b)?;

    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .job_tx
        .send(TranslateJob {
            image: decoded_a,
            direction: state.direction,
            reply: reply_tx,
        })
        .await
        .map_err(|_| server_error("Inference worker unavailable"))?;

    let translated = reply_rx
        .await
        .map_err(|_| server_error("Inference channel closed"))?
        .map_err(server_error)?;

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(translated)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| server_error(format!("Failed to encode result: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

fn decode_field(name: &str, field: &UploadField) -> Result<DynamicImage, HandlerError> {
    if let Some(content_type) = &field.content_type {
        if !uploads::is_supported_content_type(content_type) {
            return Err(bad_request(format!(
                "Unsupported content type for {name}: {content_type}"
            )));
        }
    }
    uploads::decode_upload(&field.bytes, field.file_name.as_deref())
        .map_err(|e| bad_request(format!("{e:#}")))
}
