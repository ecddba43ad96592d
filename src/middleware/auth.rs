use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ApiError;
use crate::AppState;

/// Authenticated caller context injected into the request extensions.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

/// HTTP Basic authentication middleware.
///
/// Decodes the Authorization header and verifies the username/password
/// pair against the injected credential store. Rejected requests never
/// reach a handler.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let (username, password) = decode_basic_credentials(&headers).map_err(unauthorized_response)?;

    let verified = state
        .users
        .verify(&username, &password)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    if !verified {
        return Err(unauthorized_response("Invalid username or password"));
    }

    tracing::debug!("Authenticated request for user {}", username);
    request.extensions_mut().insert(AuthUser { username });
    Ok(next.run(request).await)
}

/// Extract the username/password pair from a `Basic` Authorization header
fn decode_basic_credentials(headers: &HeaderMap) -> Result<(String, String), &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let encoded = auth_str
        .strip_prefix("Basic ")
        .ok_or("Authorization header must use Basic scheme")?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| "Invalid base64 in Authorization header")?;

    let credentials = String::from_utf8(decoded).map_err(|_| "Credentials must be valid UTF-8")?;

    let (username, password) = credentials
        .split_once(':')
        .ok_or("Credentials must be in username:password form")?;

    Ok((username.to_string(), password.to_string()))
}

/// 401 with the standard Basic challenge header
fn unauthorized_response(message: impl Into<String>) -> Response {
    let mut response = ApiError::unauthorized(message).into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"contact-api\""),
    );
    response
}
