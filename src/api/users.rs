use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::auth::require_admin;
use crate::error::ApiError;
use crate::models::User;
use crate::services::{CreateOutcome, CredentialStore};

/// Username and password pair
#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response from a snapshot import
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Users stored after the import
    pub count: usize,
}

/// Log in
///
/// Returns the matching user without its password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Authenticated", body = User),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Users"
)]
pub async fn handle_login(
    State(store): State<Arc<dyn CredentialStore>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<User>, ApiError> {
    let user = store
        .lookup(&credentials.username, &credentials.password)
        .await
        .ok_or_else(|| {
            tracing::warn!(username = %credentials.username, "Failed login");
            ApiError::Unauthorized
        })?;
    tracing::info!(username = %user.username, role = ?user.role, "Login");
    Ok(Json(user))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users without passwords", body = Vec<User>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Caller is not the admin"),
    ),
    security(("basic_auth" = [])),
    tag = "Users"
)]
pub async fn handle_list_users(
    State(store): State<Arc<dyn CredentialStore>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    require_admin(store.as_ref(), &headers).await?;
    Ok(Json(store.list().await))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = Credentials,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Empty username or password"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Caller is not the admin"),
        (status = 409, description = "Username taken"),
    ),
    security(("basic_auth" = [])),
    tag = "Users"
)]
pub async fn handle_create_user(
    State(store): State<Arc<dyn CredentialStore>>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(store.as_ref(), &headers).await?;
    match store
        .create(&credentials.username, &credentials.password)
        .await?
    {
        CreateOutcome::Created => Ok(StatusCode::CREATED),
        CreateOutcome::AlreadyExists => Err(ApiError::Conflict(
            credentials.username.trim().to_string(),
        )),
    }
}

/// Delete a user
///
/// The admin account cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    params(("username" = String, Path, description = "User to delete")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Caller is not the admin"),
        (status = 404, description = "Unknown user or the admin"),
    ),
    security(("basic_auth" = [])),
    tag = "Users"
)]
pub async fn handle_delete_user(
    State(store): State<Arc<dyn CredentialStore>>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(store.as_ref(), &headers).await?;
    if store.delete(&username).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Export all users
///
/// The snapshot includes passwords and can be restored with the import
/// endpoint.
#[utoipa::path(
    get,
    path = "/api/users/export",
    responses(
        (status = 200, description = "User snapshot", body = Vec<User>),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Caller is not the admin"),
    ),
    security(("basic_auth" = [])),
    tag = "Users"
)]
pub async fn handle_export_users(
    State(store): State<Arc<dyn CredentialStore>>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    let admin = require_admin(store.as_ref(), &headers).await?;
    tracing::info!(by = %admin.username, "Users exported");
    Ok(Json(store.export().await))
}

/// Import a user snapshot
///
/// Replaces every user. The configured admin is added back if the snapshot
/// lacks it, and keeps its configured password either way.
#[utoipa::path(
    post,
    path = "/api/users/import",
    request_body(content = Vec<User>, content_type = "application/json"),
    responses(
        (status = 200, description = "Imported", body = ImportResponse),
        (status = 400, description = "Invalid snapshot"),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Caller is not the admin"),
    ),
    security(("basic_auth" = [])),
    tag = "Users"
)]
pub async fn handle_import_users(
    State(store): State<Arc<dyn CredentialStore>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ImportResponse>, ApiError> {
    require_admin(store.as_ref(), &headers).await?;
    let count = store.import(&body).await?;
    Ok(Json(ImportResponse { count }))
}
