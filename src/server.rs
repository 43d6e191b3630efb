//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::error::ApiError;
use crate::models::{AppConfig, PrintLayout, User};
use crate::services::{
    Assistant, CredentialStore, GeminiAssistant, InMemoryCredentialStore, Pipeline,
    PreviewScheduler, PrintExporter,
};

/// Request bodies carry base64 images
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<Pipeline>,
    pub exporter: Arc<PrintExporter>,
    pub scheduler: Arc<PreviewScheduler>,
    pub credentials: Arc<dyn CredentialStore>,
    pub assistant: Arc<dyn Assistant>,
}

/// Create application state from configuration.
///
/// Must run inside a Tokio runtime: the preview scheduler spawns its
/// debounce task here.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let pipeline = Arc::new(Pipeline::new(config.pipeline.clone()));
    let exporter = Arc::new(PrintExporter::new(pipeline.clone(), config.export.clone()));
    let scheduler = Arc::new(PreviewScheduler::new(pipeline.clone(), &config.preview));
    let credentials: Arc<dyn CredentialStore> =
        Arc::new(InMemoryCredentialStore::new(config.admin.clone()));
    let assistant: Arc<dyn Assistant> = Arc::new(
        GeminiAssistant::new(config.assistant.clone())
            .map_err(|e| anyhow::anyhow!("Failed to create assistant client: {e}"))?,
    );

    Ok(AppState {
        config: Arc::new(config),
        pipeline,
        exporter,
        scheduler,
        credentials,
        assistant,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Processing
        .route("/api/process", post(handle_process))
        .route("/api/preview", post(handle_submit_preview).get(handle_get_preview))
        // Print export
        .route("/api/export", post(handle_export))
        .route("/api/print/layout", get(handle_layout))
        // Users
        .route("/api/auth/login", post(handle_login))
        .route("/api/users", get(handle_list_users).post(handle_create_user))
        .route("/api/users/export", get(handle_export_users))
        .route("/api/users/import", post(handle_import_users))
        .route("/api/users/:username", delete(handle_delete_user))
        // Assistant
        .route("/api/assistant/analyze", post(handle_analyze))
        .route("/api/assistant/chat", post(handle_chat))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_process(
    State(state): State<AppState>,
    body: Json<api::ProcessBody>,
) -> Result<Response, ApiError> {
    api::handle_process(State(state.pipeline), body).await
}

async fn handle_submit_preview(
    State(state): State<AppState>,
    body: Json<api::ProcessBody>,
) -> impl IntoResponse {
    api::handle_submit_preview(State(state.scheduler), body).await
}

async fn handle_get_preview(State(state): State<AppState>) -> Result<Response, ApiError> {
    api::handle_get_preview(State(state.scheduler)).await
}

async fn handle_export(
    State(state): State<AppState>,
    body: Json<api::ExportBody>,
) -> Result<Response, ApiError> {
    api::handle_export(State(state.exporter), body).await
}

async fn handle_layout(
    State(state): State<AppState>,
    query: Query<api::LayoutQuery>,
) -> Result<Json<PrintLayout>, ApiError> {
    api::handle_layout(State(state.exporter), query).await
}

async fn handle_login(
    State(state): State<AppState>,
    body: Json<api::Credentials>,
) -> Result<Json<User>, ApiError> {
    api::handle_login(State(state.credentials), body).await
}

async fn handle_list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    api::handle_list_users(State(state.credentials), headers).await
}

async fn handle_create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Json<api::Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    api::handle_create_user(State(state.credentials), headers, body).await
}

async fn handle_delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Path<String>,
) -> Result<axum::http::StatusCode, ApiError> {
    api::handle_delete_user(State(state.credentials), headers, path).await
}

async fn handle_export_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<User>>, ApiError> {
    api::handle_export_users(State(state.credentials), headers).await
}

async fn handle_import_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<api::ImportResponse>, ApiError> {
    api::handle_import_users(State(state.credentials), headers, body).await
}

async fn handle_analyze(
    State(state): State<AppState>,
    body: Json<api::AnalyzeRequest>,
) -> Json<api::AssistantReply> {
    api::handle_analyze(State(state.assistant), body).await
}

async fn handle_chat(
    State(state): State<AppState>,
    body: Json<api::ChatRequest>,
) -> Json<api::AssistantReply> {
    api::handle_chat(State(state.assistant), body).await
}
