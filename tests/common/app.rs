//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{header, request::Builder, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use inkpress::models::{AdminConfig, AppConfig, AssistantConfig, PreviewConfig};
use inkpress::server::{build_router, create_app_state, AppState};
use inkpress::services::{CredentialStore, PreviewScheduler};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "test-admin-pw";

/// Basic auth credentials for the seeded admin
pub const ADMIN: (&str, &str) = (ADMIN_USER, ADMIN_PASSWORD);

/// `Authorization` header value for basic auth
pub fn basic_auth((username, password): (&str, &str)) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub scheduler: Arc<PreviewScheduler>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl TestApp {
    /// Create a new test application with a short preview debounce and no
    /// assistant key. Must be called from within a Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(Self::test_config())
    }

    /// Configuration used by [`TestApp::new`]
    pub fn test_config() -> AppConfig {
        AppConfig {
            preview: PreviewConfig { debounce_ms: 20 },
            admin: AdminConfig {
                username: ADMIN_USER.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            assistant: AssistantConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                api_key: None,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = Self::create_state(config);

        // Keep references for test assertions
        let scheduler = state.scheduler.clone();
        let credentials = state.credentials.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            scheduler,
            credentials,
        }
    }

    pub fn create_state(config: AppConfig) -> AppState {
        create_app_state(config).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a DELETE request to the given path
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// POST a serializable value as JSON
    pub async fn post_value(&self, path: &str, body: &serde_json::Value) -> TestResponse {
        self.post_json(path, &body.to_string()).await
    }

    /// GET with basic auth
    pub async fn get_as(&self, path: &str, auth: (&str, &str)) -> TestResponse {
        let request = authorized(Request::get(path), auth)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    /// DELETE with basic auth
    pub async fn delete_as(&self, path: &str, auth: (&str, &str)) -> TestResponse {
        let request = authorized(Request::delete(path), auth)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }

    /// POST a JSON body with basic auth
    pub async fn post_json_as(&self, path: &str, body: &str, auth: (&str, &str)) -> TestResponse {
        let request = authorized(Request::post(path), auth)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// POST a serializable value as JSON with basic auth
    pub async fn post_value_as(
        &self,
        path: &str,
        body: &serde_json::Value,
        auth: (&str, &str),
    ) -> TestResponse {
        self.post_json_as(path, &body.to_string(), auth).await
    }

    /// Poll `GET /api/preview` until a frame of at least `generation` is
    /// served, or give up after a few seconds.
    pub async fn wait_for_preview(&self, generation: u64) -> TestResponse {
        for _ in 0..200 {
            let response = self.get("/api/preview").await;
            if response.status == StatusCode::OK
                && response.header_u64("x-generation") >= Some(generation)
            {
                return response;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        panic!("preview generation {generation} never committed");
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn authorized(builder: Builder, auth: (&str, &str)) -> Builder {
    builder.header(header::AUTHORIZATION, basic_auth(auth))
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn header_u64(&self, name: &str) -> Option<u64> {
        self.header(name).and_then(|v| v.parse().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
