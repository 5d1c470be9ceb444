pub mod edit_form;
pub mod entities;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::shared::edit_view::EditError;

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn status_for(error: &EditError) -> StatusCode {
    match error {
        EditError::NotFound { .. } | EditError::EntityNotFound(_) => StatusCode::NOT_FOUND,
        EditError::InvalidSessionState(_) => StatusCode::CONFLICT,
        EditError::FieldNotFound { .. }
        | EditError::UnsupportedFieldKind { .. }
        | EditError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_body(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

impl From<EditError> for (StatusCode, Json<Value>) {
    fn from(error: EditError) -> Self {
        let status = status_for(&error);
        if status.is_server_error() {
            tracing::error!("{}", error);
        } else {
            tracing::debug!("{}", error);
        }
        error_body(status, error.to_string())
    }
}
