use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // ENTITY CATALOGUE
        // ========================================
        .route("/api/entities", get(handlers::entities::list_entities))
        .route(
            "/api/entities/:entity/fields",
            get(handlers::entities::list_fields),
        )
        .route(
            "/api/entities/:entity/records",
            get(handlers::entities::list_records),
        )
        // ========================================
        // EDIT FORMS
        // ========================================
        .route("/api/forms", post(handlers::edit_form::open_form))
        .route(
            "/api/forms/:key",
            get(handlers::edit_form::get_form).delete(handlers::edit_form::discard_form),
        )
        .route(
            "/api/forms/:key/render",
            post(handlers::edit_form::render_form),
        )
        .route("/api/forms/:key/save", post(handlers::edit_form::save_form))
        .route(
            "/api/forms/:key/delete",
            post(handlers::edit_form::request_delete),
        )
        .route(
            "/api/forms/:key/confirm-delete",
            post(handlers::edit_form::confirm_delete),
        )
}
