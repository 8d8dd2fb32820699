//! Request handlers
//!
//! Every handler returns `Result<_, SquirrelError>`; the error's
//! `IntoResponse` impl picks the status.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Form, Json};

use crate::error::{Result, SquirrelError};
use crate::repository::{SquirrelFields, SquirrelRecord};
use super::{AppState, COLLECTION_PATH};

// =============================================================================
// Collection Handlers
// =============================================================================

pub(super) async fn list_handler(State(repo): State<AppState>) -> Result<Json<Vec<SquirrelRecord>>> {
    let records = blocking(move || repo.list()).await?;
    Ok(Json(records))
}

pub(super) async fn create_handler(
    State(repo): State<AppState>,
    form: std::result::Result<Form<SquirrelFields>, FormRejection>,
) -> Result<impl IntoResponse> {
    let Form(fields) = form.map_err(form_error)?;

    let record = blocking(move || repo.create(fields)).await?;
    let location = format!("{}/{}", COLLECTION_PATH, record.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)))
}

// =============================================================================
// Item Handlers
// =============================================================================

pub(super) async fn get_handler(
    State(repo): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SquirrelRecord>> {
    let id = parse_id(&raw_id)?;
    let record = blocking(move || repo.get(id)).await?;
    Ok(Json(record))
}

pub(super) async fn replace_handler(
    State(repo): State<AppState>,
    Path(raw_id): Path<String>,
    form: std::result::Result<Form<SquirrelFields>, FormRejection>,
) -> Result<StatusCode> {
    let id = parse_id(&raw_id)?;
    let Form(fields) = form.map_err(form_error)?;

    blocking(move || repo.replace(id, fields)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn delete_handler(
    State(repo): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&raw_id)?;
    blocking(move || repo.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn unknown_path_handler(uri: Uri) -> SquirrelError {
    SquirrelError::UnknownPath(uri.path().to_string())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Plain decimal digits that fit in a `u64`; anything else names no resource
fn parse_id(raw: &str) -> Result<u64> {
    let unknown = || SquirrelError::UnknownPath(format!("{}/{}", COLLECTION_PATH, raw));

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(unknown());
    }
    raw.parse().map_err(|_| unknown())
}

/// Oversized bodies keep their 413; every other form failure is a 400
fn form_error(rejection: FormRejection) -> SquirrelError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        SquirrelError::PayloadTooLarge(rejection.body_text())
    } else {
        SquirrelError::Validation(rejection.body_text())
    }
}

/// Run a repository call on the blocking pool
async fn blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| SquirrelError::Storage(format!("Repository task failed: {}", e)))?
}
