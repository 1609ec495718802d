pub mod export;
pub mod health;
pub mod session;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session: load, edit, preview
        .route("/api/v1/session", get(session::handle_load_session))
        .route("/api/v1/session/preview", get(session::handle_preview))
        .route(
            "/api/v1/session/fields/:control",
            put(session::handle_edit_field),
        )
        .route(
            "/api/v1/session/entries/:section",
            post(session::handle_add_entry),
        )
        .route(
            "/api/v1/session/entries/:section/:index",
            delete(session::handle_remove_entry),
        )
        .route(
            "/api/v1/session/entries/:section/:index/:field",
            put(session::handle_edit_entry),
        )
        .route(
            "/api/v1/session/template",
            put(session::handle_select_template),
        )
        .route("/api/v1/templates", get(session::handle_list_templates))
        // Wizard navigation
        .route(
            "/api/v1/session/wizard/next",
            post(session::handle_next_step),
        )
        .route(
            "/api/v1/session/wizard/previous",
            post(session::handle_previous_step),
        )
        .route(
            "/api/v1/session/wizard/steps/:step",
            post(session::handle_jump_to_step),
        )
        // Highlight
        .route("/api/v1/session/focus", post(session::handle_focus))
        .route("/api/v1/session/blur", post(session::handle_blur))
        // Export
        .route("/api/v1/export/pdf", post(export::handle_export_pdf))
        .route("/api/v1/export/doc", get(export::handle_export_doc))
        .route("/api/v1/export/status", get(export::handle_export_status))
        .with_state(state)
}
