//! Edit form actions. Each action loads the stored session, applies one
//! transition and stores the session again before answering.

use axum::{extract::Path, http::StatusCode, Json};
use contracts::shared::edit_form::{
    ConfirmDeleteRequest, FormInput, FormResponse, OpenFormRequest, SubmitFormRequest,
};
use contracts::shared::record::Draft;
use sea_orm::DatabaseConnection;

use super::{error_body, ApiError, ApiResult};
use crate::shared::data::db::get_connection;
use crate::shared::edit_view::{
    delete_session, load_session, new_session_key, parse_answer, purge_stale_sessions,
    save_session, EditSession, EditView, RenderedForm,
};
use crate::shared::metadata::{get_registry, EntityRegistry};

fn form_title(registry: &EntityRegistry, session: &EditSession) -> String {
    let name = registry
        .get(&session.entity)
        .map(|e| e.ui.element_name)
        .unwrap_or(session.entity.as_str());
    match session.record.id {
        Some(id) => format!("{} #{}", name, id),
        None => format!("New {}", name),
    }
}

/// Store the session and build the page response from it.
///
/// `form` is absent after a terminal transition; the next render starts a
/// new record.
async fn respond(
    conn: &DatabaseConnection,
    registry: &EntityRegistry,
    session_key: String,
    mut session: EditSession,
    form: Option<RenderedForm>,
) -> ApiResult<FormResponse> {
    let notices = session.take_notices();
    save_session(conn, &session_key, &session).await?;

    let (controls, draft, page_warning) = match form {
        Some(form) => (form.controls, form.draft, form.page_warning),
        None => (Vec::new(), Draft::new(), None),
    };

    Ok(Json(FormResponse {
        title: form_title(registry, &session),
        entity: session.entity.clone(),
        state: session.state,
        record_id: session.record.id,
        navigation: session.navigation.clone(),
        confirm_message: session.confirm_message(),
        session_key,
        controls,
        draft,
        page_warning,
        notices,
    }))
}

fn session_not_found(session_key: &str) -> ApiError {
    error_body(
        StatusCode::NOT_FOUND,
        format!("Edit session not found: {}", session_key),
    )
}

async fn stored_session(conn: &DatabaseConnection, session_key: &str) -> Result<EditSession, ApiError> {
    load_session(conn, session_key)
        .await?
        .ok_or_else(|| session_not_found(session_key))
}

async fn open_action(
    conn: &DatabaseConnection,
    registry: &EntityRegistry,
    request: OpenFormRequest,
) -> ApiResult<FormResponse> {
    if let Err(e) = purge_stale_sessions(conn).await {
        tracing::warn!("Failed to purge stale edit sessions: {}", e);
    }

    let view = EditView::new(registry, conn);
    let mut session = match (request.id, request.copy_from) {
        (None, Some(source)) => view.duplicate(&request.entity, source).await?,
        (id, _) => view.open(&request.entity, id).await?,
    };
    let form = view.render_fields(&mut session, &FormInput::new()).await?;
    let session_key = new_session_key();
    tracing::info!(
        "Opened edit session {} for {} {:?}",
        session_key,
        session.entity,
        request.id
    );

    respond(conn, registry, session_key, session, Some(form)).await
}

async fn render_action(
    conn: &DatabaseConnection,
    registry: &EntityRegistry,
    session_key: String,
    inputs: FormInput,
) -> ApiResult<FormResponse> {
    let view = EditView::new(registry, conn);
    let mut session = stored_session(conn, &session_key).await?;
    let form = view.render_fields(&mut session, &inputs).await?;
    respond(conn, registry, session_key, session, Some(form)).await
}

async fn save_action(
    conn: &DatabaseConnection,
    registry: &EntityRegistry,
    session_key: String,
    inputs: FormInput,
) -> ApiResult<FormResponse> {
    let view = EditView::new(registry, conn);
    let mut session = stored_session(conn, &session_key).await?;
    let form = view.render_fields(&mut session, &inputs).await?;

    if let Err(e) = view.submit(&mut session, form.draft).await {
        // keep the error notice for the next render
        save_session(conn, &session_key, &session).await?;
        return Err(e.into());
    }

    if session.state.is_terminal() {
        return respond(conn, registry, session_key, session, None).await;
    }

    // rejected: render again so the failing fields carry their warnings
    let form = view.render_fields(&mut session, &inputs).await?;
    respond(conn, registry, session_key, session, Some(form)).await
}

async fn request_delete_action(
    conn: &DatabaseConnection,
    registry: &EntityRegistry,
    session_key: String,
) -> ApiResult<FormResponse> {
    let view = EditView::new(registry, conn);
    let mut session = stored_session(conn, &session_key).await?;
    view.request_delete(&mut session)?;
    let form = view.render_fields(&mut session, &FormInput::new()).await?;
    respond(conn, registry, session_key, session, Some(form)).await
}

async fn confirm_delete_action(
    conn: &DatabaseConnection,
    registry: &EntityRegistry,
    session_key: String,
    answer: &str,
) -> ApiResult<FormResponse> {
    let view = EditView::new(registry, conn);
    let answer = parse_answer(answer)?;
    let mut session = stored_session(conn, &session_key).await?;

    if let Err(e) = view.confirm_delete(&mut session, answer).await {
        save_session(conn, &session_key, &session).await?;
        return Err(e.into());
    }

    if session.state.is_terminal() {
        return respond(conn, registry, session_key, session, None).await;
    }

    let form = view.render_fields(&mut session, &FormInput::new()).await?;
    respond(conn, registry, session_key, session, Some(form)).await
}

async fn discard_action(conn: &DatabaseConnection, session_key: &str) -> Result<StatusCode, ApiError> {
    if delete_session(conn, session_key).await? {
        tracing::debug!("Discarded edit session {}", session_key);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(session_key))
    }
}

/// POST /api/forms
pub async fn open_form(Json(request): Json<OpenFormRequest>) -> ApiResult<FormResponse> {
    open_action(get_connection(), get_registry(), request).await
}

/// GET /api/forms/:key
pub async fn get_form(Path(session_key): Path<String>) -> ApiResult<FormResponse> {
    render_action(get_connection(), get_registry(), session_key, FormInput::new()).await
}

/// POST /api/forms/:key/render
pub async fn render_form(
    Path(session_key): Path<String>,
    Json(request): Json<SubmitFormRequest>,
) -> ApiResult<FormResponse> {
    render_action(get_connection(), get_registry(), session_key, request.inputs).await
}

/// POST /api/forms/:key/save
pub async fn save_form(
    Path(session_key): Path<String>,
    Json(request): Json<SubmitFormRequest>,
) -> ApiResult<FormResponse> {
    save_action(get_connection(), get_registry(), session_key, request.inputs).await
}

/// POST /api/forms/:key/delete
pub async fn request_delete(Path(session_key): Path<String>) -> ApiResult<FormResponse> {
    request_delete_action(get_connection(), get_registry(), session_key).await
}

/// POST /api/forms/:key/confirm-delete
pub async fn confirm_delete(
    Path(session_key): Path<String>,
    Json(request): Json<ConfirmDeleteRequest>,
) -> ApiResult<FormResponse> {
    confirm_delete_action(get_connection(), get_registry(), session_key, &request.answer).await
}

/// DELETE /api/forms/:key
pub async fn discard_form(Path(session_key): Path<String>) -> Result<StatusCode, ApiError> {
    discard_action(get_connection(), &session_key).await
}
