use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::export::{export_filename_now, export_payload, EXPORT_CONTENT_TYPE};
use crate::models::SkillSheetRecord;
use crate::preview::render_preview;
use crate::state::AppState;

pub const NOT_JSON_MESSAGE: &str = "JSONファイルのみ対応しています";
pub const INVALID_JSON_MESSAGE: &str = "無効なJSONファイルです。";
pub const TOO_LARGE_MESSAGE: &str = "ファイルサイズは5MB以下にしてください。";
pub const NO_FILE_MESSAGE: &str = "ファイルが指定されていません。";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/upload
/// Parses the uploaded `file` part and returns the normalized record.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SkillSheetRecord>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if !filename.ends_with(".json") {
            warn!("Rejected upload '{filename}': not a JSON file");
            return Err(AppError::Validation(NOT_JSON_MESSAGE.to_string()));
        }

        let contents = field.bytes().await.map_err(multipart_error)?;
        if contents.len() > state.config.max_upload_bytes {
            warn!("Rejected upload '{filename}': {} bytes", contents.len());
            return Err(AppError::PayloadTooLarge(TOO_LARGE_MESSAGE.to_string()));
        }

        let record: SkillSheetRecord = serde_json::from_slice(&contents).map_err(|e| {
            warn!("Rejected upload '{filename}': {e}");
            AppError::Validation(INVALID_JSON_MESSAGE.to_string())
        })?;
        info!(
            "Parsed upload '{filename}' with {} career entries",
            record.career_history.len()
        );
        return Ok(Json(record));
    }
    Err(AppError::Validation(NO_FILE_MESSAGE.to_string()))
}

/// POST /api/preview
pub async fn handle_preview(Json(record): Json<SkillSheetRecord>) -> Json<SkillSheetRecord> {
    Json(record)
}

/// POST /api/preview/html
pub async fn handle_preview_html(Json(record): Json<SkillSheetRecord>) -> Html<String> {
    Html(render_preview(&record))
}

/// POST /api/export-json
/// Returns the record as a pretty-printed JSON attachment.
pub async fn handle_export_json(
    Json(record): Json<SkillSheetRecord>,
) -> Result<impl IntoResponse, AppError> {
    let body = export_payload(&record).map_err(|e| AppError::Internal(e.into()))?;
    let filename = export_filename_now();
    info!("Exporting {filename}");
    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
