//! Admin authorization for the user management routes.
//!
//! Callers authenticate with HTTP basic credentials, checked against the
//! credential store on every request.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::ApiError;
use crate::models::User;
use crate::services::CredentialStore;

/// Decode `Authorization: Basic <base64(username:password)>`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Resolve the caller and require the admin role.
///
/// Missing or wrong credentials give [`ApiError::Unauthorized`]; a valid
/// non-admin user gives [`ApiError::Forbidden`].
pub async fn require_admin(
    store: &dyn CredentialStore,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    let (username, password) = basic_credentials(headers).ok_or(ApiError::Unauthorized)?;
    let user = store
        .lookup(&username, &password)
        .await
        .ok_or_else(|| {
            tracing::warn!(username = %username, "Rejected user management request");
            ApiError::Unauthorized
        })?;
    if !user.is_admin() {
        tracing::warn!(username = %user.username, "User management requires admin");
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}
