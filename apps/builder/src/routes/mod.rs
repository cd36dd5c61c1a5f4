pub mod health;
pub mod session;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::document::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document fields
        .route("/api/v1/document", get(handlers::handle_get_document))
        .route(
            "/api/v1/document/fields/:field",
            put(handlers::handle_set_field),
        )
        .route("/api/v1/document/skills", put(handlers::handle_set_skills))
        // Collection editors
        .route(
            "/api/v1/sections/:section",
            get(handlers::handle_get_section).post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sections/:section/:index",
            patch(handlers::handle_update_entry).delete(handlers::handle_remove_entry),
        )
        // Preview, status and session actions
        .route("/api/v1/preview", get(session::handle_preview))
        .route("/api/v1/preview/tree", get(session::handle_preview_tree))
        .route("/api/v1/save-status", get(session::handle_save_status))
        .route("/api/v1/analyze", post(session::handle_analyze))
        .route("/api/v1/share-link", get(handlers::handle_share_link))
        .route("/api/v1/export/:format", get(session::handle_export))
        .with_state(state)
}
