//! News endpoints: create, list, fetch and preview.

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use bulletin_core::{NewNews, NewsRecord, validate_text_fields};
use bulletin_preview::{PreviewError, preview_response};

use crate::error::ApiError;
use crate::media::{MediaError, MediaForm, MediaUpload};
use crate::state::AppState;

/// Parsed creation request.
#[derive(Debug, Default)]
struct CreateForm {
    title: String,
    description: String,
    media: MediaForm,
}

/// Create a news record from a multipart form.
///
/// Route: `POST /news`
///
/// Fields: `title`, `description`, `image` (file, required), `video` (file
/// or URL), `videoUrl` (URL). Media is stored before the record; if the
/// record then fails to persist, the stored media is removed.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<NewsRecord>), ApiError> {
    let form = read_form(multipart).await?;

    let has_image = form
        .media
        .image
        .as_ref()
        .is_some_and(|image| !image.data.is_empty());
    if !has_image {
        reject("missing_image");
        return Err(MediaError::MissingImage.into());
    }
    if let Err(err) = validate_text_fields(&form.title, &form.description) {
        reject("validation");
        return Err(err.into());
    }

    let video_uploaded = form
        .media
        .video
        .as_ref()
        .is_some_and(|video| !video.data.is_empty());
    let stored = state.media.ingest(form.media).await.inspect_err(|_| {
        reject("storage");
    })?;

    let new = NewNews {
        title: form.title,
        description: form.description,
        image_url: Some(stored.image_url.clone()),
        video_url: stored.video_url.clone(),
    };

    let record = match state.store.create(new) {
        Ok(record) => record,
        Err(err) => {
            reject("database");
            state.media.remove(&stored.image_url).await;
            if let Some(video) = stored.video_url.as_deref().filter(|_| video_uploaded) {
                state.media.remove(video).await;
            }
            return Err(err.into());
        }
    };

    metrics::counter!("news_created_total").increment(1);
    tracing::info!(news_id = %record.id, title = %record.title, "news created");

    Ok((StatusCode::CREATED, Json(record)))
}

/// List every record, newest first.
///
/// Route: `GET /news`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<NewsRecord>>, ApiError> {
    let records = state.store.list_all()?;
    Ok(Json(records))
}

/// Fetch one record.
///
/// Route: `GET /news/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NewsRecord>, ApiError> {
    let record = state.store.get_by_id(&id)?;
    Ok(Json(record))
}

/// Render the link preview page for one record.
///
/// Routes: `GET /news/{id}/preview`, `GET /news/share/{id}`
pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, PreviewError> {
    let record = state.store.get_by_id(&id)?;
    Ok(preview_response(&record, &state.config.preview))
}

fn reject(reason: &'static str) {
    metrics::counter!("news_create_rejected_total", "reason" => reason).increment(1);
    tracing::debug!(reason, "news creation rejected");
}

async fn read_form(mut multipart: Multipart) -> Result<CreateForm, ApiError> {
    let mut form = CreateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_body)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => form.title = field.text().await.map_err(invalid_body)?,
            "description" => form.description = field.text().await.map_err(invalid_body)?,
            "image" => form.media.image = read_upload(field).await?,
            "video" if field.file_name().is_some() => {
                form.media.video = read_upload(field).await?;
            }
            "video" | "videoUrl" => {
                let url = field.text().await.map_err(invalid_body)?;
                if !url.trim().is_empty() {
                    form.media.video_url = Some(url);
                }
            }
            other => tracing::debug!(field = %other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// Read a file part. Parts without bytes count as absent.
async fn read_upload(field: Field<'_>) -> Result<Option<MediaUpload>, ApiError> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(invalid_body)?;

    if data.is_empty() {
        return Ok(None);
    }

    Ok(Some(MediaUpload {
        file_name,
        content_type,
        data,
    }))
}

/// Map a multipart failure onto the status axum assigns it. Bodies over the
/// upload limit become 413, everything else is a malformed request.
fn invalid_body(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        reject("too_large");
        return ApiError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()));
    }
    ApiError::Validation(format!("Invalid multipart body: {}", err.body_text()))
}
