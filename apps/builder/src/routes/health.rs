use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and session mode.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-builder",
        "authenticated": state.credential.is_some(),
        "persistence": state.session.persistence.destination(),
        "autosaveDebounceMs": state.config.autosave_debounce.as_millis() as u64,
        "pdfExport": state.exporter.pdf_available(),
    }))
}
