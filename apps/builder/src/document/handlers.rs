use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::document::collections::{EditorSurface, SectionKind};
use crate::document::model::{DocumentModel, ScalarField};
use crate::document::store::{ChangeEvent, DocumentStore, SurfaceUpdate};
use crate::errors::AppError;
use crate::hydration::share_link::share_link;
use crate::hydration::HydrationOrigin;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub origin: HydrationOrigin,
    /// Text value of the skills input.
    pub skills_input: String,
    pub document: DocumentModel,
}

#[derive(Deserialize)]
pub struct ValueRequest {
    pub value: String,
}

#[derive(Deserialize)]
pub struct EntryFieldRequest {
    pub field: String,
    pub value: String,
}

/// Outcome of a mutation. `surface` is only sent when the section's editor
/// has to be rebuilt.
#[derive(Serialize)]
pub struct EditResponse {
    pub event: ChangeEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<EditorSurface>,
    pub document: DocumentModel,
}

#[derive(Serialize)]
pub struct ShareLinkResponse {
    pub link: String,
}

pub(crate) fn edit_response(store: &DocumentStore, event: ChangeEvent) -> Json<EditResponse> {
    let surface = match event.surface {
        SurfaceUpdate::Rebuild(section) => Some(store.surface(section)),
        SurfaceUpdate::InPlace => None,
    };
    Json(EditResponse {
        event,
        surface,
        document: store.model().clone(),
    })
}

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<DocumentResponse> {
    let store = state.session.store.lock().await;
    Json(DocumentResponse {
        origin: state.session.origin,
        skills_input: store.model().skills_input(),
        document: store.model().clone(),
    })
}

/// PUT /api/v1/document/fields/:field
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let field: ScalarField = field.parse()?;
    let mut store = state.session.store.lock().await;
    let event = store.set_field(field, &req.value);
    Ok(edit_response(&store, event))
}

/// PUT /api/v1/document/skills
pub async fn handle_set_skills(
    State(state): State<AppState>,
    Json(req): Json<ValueRequest>,
) -> Json<EditResponse> {
    let mut store = state.session.store.lock().await;
    let event = store.set_skills(&req.value);
    edit_response(&store, event)
}

/// GET /api/v1/sections/:section
pub async fn handle_get_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<EditorSurface>, AppError> {
    let section: SectionKind = section.parse()?;
    Ok(Json(state.session.store.lock().await.surface(section)))
}

/// POST /api/v1/sections/:section
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<(StatusCode, Json<EditResponse>), AppError> {
    let section: SectionKind = section.parse()?;
    let mut store = state.session.store.lock().await;
    let event = store.add_entry(section);
    Ok((StatusCode::CREATED, edit_response(&store, event)))
}

/// PATCH /api/v1/sections/:section/:index
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
    Json(req): Json<EntryFieldRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    let mut store = state.session.store.lock().await;
    let event = store.update_entry(section, index, &req.field, &req.value)?;
    Ok(edit_response(&store, event))
}

/// DELETE /api/v1/sections/:section/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Json<EditResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    let mut store = state.session.store.lock().await;
    let event = store.remove_entry(section, index)?;
    Ok(edit_response(&store, event))
}

/// GET /api/v1/share-link
pub async fn handle_share_link(
    State(state): State<AppState>,
) -> Result<Json<ShareLinkResponse>, AppError> {
    let store = state.session.store.lock().await;
    let link = share_link(&state.session.navigation, store.model())
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(ShareLinkResponse { link }))
}
