//! Axum route handlers for the Report API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::{Condition, ReportRecord};
use crate::report::generator::{generate_report, GenerateParams};
use crate::report::images::UploadedImage;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    /// Echoed back (or freshly minted) so the client can query history.
    pub session_id: Uuid,
    pub report: ReportRecord,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub reports: Vec<ReportRecord>,
}

#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub session_id: Uuid,
    pub cleared: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports
///
/// Multipart form: one or more `image` parts plus optional `session_id`,
/// `jewelry_type`, `condition`, and `notes` text parts. Runs the full
/// pipeline and appends the result to the session's history.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateReportResponse>, AppError> {
    let mut images: Vec<UploadedImage> = Vec::new();
    let mut session_id: Option<Uuid> = None;
    let mut jewelry_type: Option<String> = None;
    let mut condition: Option<Condition> = None;
    let mut notes: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read upload '{filename}': {e}"))
                })?;
                images.push(UploadedImage::from_bytes(
                    &filename,
                    data,
                    state.config.max_upload_bytes,
                )?);
            }
            "session_id" => {
                let text = read_text_field(field, "session_id").await?;
                session_id = Some(Uuid::parse_str(text.trim()).map_err(|_| {
                    AppError::Validation("session_id must be a UUID".to_string())
                })?);
            }
            "jewelry_type" => jewelry_type = non_empty(read_text_field(field, "jewelry_type").await?),
            "condition" => {
                let text = read_text_field(field, "condition").await?;
                condition = Some(Condition::parse(&text).ok_or_else(|| {
                    AppError::Validation(format!(
                        "condition must be Excellent, Good, Fair, or Poor (got '{text}')"
                    ))
                })?);
            }
            "notes" => notes = non_empty(read_text_field(field, "notes").await?),
            // Unknown parts are ignored so form tweaks don't break old clients.
            _ => {}
        }
    }

    if images.is_empty() {
        return Err(AppError::Validation(
            "At least one image part is required".to_string(),
        ));
    }

    let session_id = session_id.unwrap_or_else(Uuid::new_v4);
    let params = GenerateParams {
        images,
        jewelry_type,
        condition,
        notes,
    };

    let report = generate_report(&state.llm, &params).await?;
    state.sessions.append(session_id, report.clone());

    Ok(Json(GenerateReportResponse { session_id, report }))
}

/// GET /api/v1/sessions/:session_id/history
///
/// Returns the session's reports, oldest first. An unknown session is an
/// empty history, not a 404.
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        session_id,
        reports: state.sessions.list(session_id),
    })
}

/// DELETE /api/v1/sessions/:session_id/history
///
/// The only way history shrinks short of a process restart.
pub async fn handle_clear_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Json<ClearHistoryResponse> {
    Json(ClearHistoryResponse {
        session_id,
        cleared: state.sessions.clear(session_id),
    })
}

/// GET /api/v1/reports/:session_id/:report_id/download
///
/// Plain-text rendering of a stored report, served as an attachment named
/// `<image-stem>_jewelry_report.txt`.
pub async fn handle_download_report(
    State(state): State<AppState>,
    Path((session_id, report_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, AppError> {
    let record = state
        .sessions
        .find(session_id, report_id)
        .ok_or_else(|| AppError::NotFound(format!("Report {report_id} not found")))?;

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", record.download_filename()),
        ),
    ];
    Ok((headers, record.report_text).into_response())
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
