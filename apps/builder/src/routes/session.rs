use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::analysis::run_analysis;
use crate::document::handlers::{edit_response, EditResponse};
use crate::errors::AppError;
use crate::export::ExportFormat;
use crate::persistence::SaveStatus;
use crate::render::html::to_container_html;
use crate::render::RenderedDocument;
use crate::state::AppState;

/// GET /api/v1/preview
/// The themed preview markup of the latest applied edit.
pub async fn handle_preview(State(state): State<AppState>) -> Html<String> {
    let doc = state.session.preview.borrow().clone();
    Html(to_container_html(&doc))
}

/// GET /api/v1/preview/tree
pub async fn handle_preview_tree(State(state): State<AppState>) -> Json<RenderedDocument> {
    let doc = state.session.preview.borrow().clone();
    Json((*doc).clone())
}

/// GET /api/v1/save-status
pub async fn handle_save_status(State(state): State<AppState>) -> Json<SaveStatus> {
    Json(state.session.persistence.status())
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
) -> Result<Json<EditResponse>, AppError> {
    let event = run_analysis(
        &state.session.store,
        &state.remote,
        state.credential.as_ref(),
    )
    .await?;
    let store = state.session.store.lock().await;
    Ok(edit_response(&store, event))
}

/// GET /api/v1/export/:format
pub async fn handle_export(
    State(state): State<AppState>,
    Path(format): Path<String>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse()?;
    let model = state.session.store.lock().await.model().clone();
    let artifact = state.exporter.export(&model, format).await?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, artifact.content_disposition()),
        ],
        artifact.bytes,
    )
        .into_response())
}
