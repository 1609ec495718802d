use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::export::{ExportArtifact, RasterOptions};
use crate::preview::preview_subtree;
use crate::state::AppState;

/// Capture size in pixels; defaults to the configured preview size.
#[derive(Deserialize)]
pub struct PdfQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatusResponse {
    pub pdf_in_progress: bool,
}

fn attachment(artifact: ExportArtifact) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// POST /api/v1/export/pdf
///
/// The rasterizer gets the whole preview container so the selected template's
/// class applies. The session lock is released before rasterizing so edits
/// keep flowing while the export runs.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    Query(params): Query<PdfQuery>,
) -> Result<Response, AppError> {
    let html = {
        let session = state.session.lock().await;
        preview_subtree(session.template(), &session.preview().html)
    };
    let options = RasterOptions::for_preview(
        params.width.unwrap_or(state.config.preview_width_px),
        params.height.unwrap_or(state.config.preview_height_px),
    );
    let artifact = state.export.export_pdf(&html, options).await?;
    Ok(attachment(artifact))
}

/// GET /api/v1/export/doc
pub async fn handle_export_doc(State(state): State<AppState>) -> Response {
    let html = {
        let session = state.session.lock().await;
        session.preview().html.clone()
    };
    attachment(state.export.export_doc(&html))
}

/// GET /api/v1/export/status
///
/// Lets a client disable its PDF control while an export is running.
pub async fn handle_export_status(State(state): State<AppState>) -> Json<ExportStatusResponse> {
    Json(ExportStatusResponse {
        pdf_in_progress: state.export.pdf_in_progress(),
    })
}
