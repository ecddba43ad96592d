use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::ApiError;
use crate::store::Contact;
use crate::validation::{validate_draft, ContactDraft};
use crate::AppState;

/// GET /contact/ - list every contact in ascending id order
pub async fn get(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.contacts.list_all().await?;
    Ok(Json(contacts))
}

/// POST /contact/ - create a contact
///
/// Field-level validation failures and duplicate emails both come back
/// as 400 with a `field_errors` map.
pub async fn post(
    State(state): State<AppState>,
    body: Result<Json<ContactDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = body.map_err(|e| ApiError::invalid_json(e.body_text()))?;

    let fields = validate_draft(draft)
        .map_err(|errors| ApiError::validation_error("Validation failed", Some(errors)))?;

    let contact = state.contacts.insert(fields).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}
