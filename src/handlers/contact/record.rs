use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::ApiError;
use crate::store::Contact;
use crate::validation::{validate_draft, ContactDraft};
use crate::AppState;

/// GET /contact/:id/ - fetch a single contact by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state.contacts.get_by_id(id).await?;
    Ok(Json(contact))
}

/// PUT /contact/:id/ - wholesale replacement of name, email and number
///
/// The body is validated against the same schema as create. A contact
/// keeping its own email address is not a uniqueness conflict.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<ContactDraft>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    // 404 before 400: an update to a missing contact is not validated
    state.contacts.get_by_id(id).await?;

    let Json(draft) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;
    let fields = validate_draft(draft)
        .map_err(|errors| ApiError::validation_error("Validation failed", Some(errors)))?;

    let contact = state.contacts.update(id, fields).await?;
    Ok(Json(contact))
}

/// DELETE /contact/:id/ - remove a contact permanently
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.contacts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
