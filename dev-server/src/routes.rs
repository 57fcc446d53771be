//! # Dev Server Routes
//!
//! Serves the built frontend the way the production web server does:
//! - `/` and `/index.html` answer with the entry page
//! - `/config.js` injects `window.APP_CONFIG` for the frontend
//! - `/dev/logs` receives frontend log lines and re-emits them through `tracing`
//! - everything else is a static file from the configured directory
//!
//! Every response is marked as non-cacheable so rebuilt assets show up on reload.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, error, info, warn};

use crate::config::{DevServerConfig, LOG_ENDPOINT};

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
}

pub fn router(config: Arc<DevServerConfig>) -> Router {
    let entry_page = ServeFile::new(config.entry_page_path());
    let static_files = ServeDir::new(&config.static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route_service("/", entry_page.clone())
        .route_service("/index.html", entry_page)
        .route("/config.js", get(config_js))
        .route(LOG_ENDPOINT, post(log_message))
        .fallback_service(static_files)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(PRAGMA, HeaderValue::from_static("no-cache")))
        .layer(SetResponseHeaderLayer::overriding(EXPIRES, HeaderValue::from_static("0")))
        .with_state(config)
}

/// `window.APP_CONFIG = {...};`
async fn config_js(State(config): State<Arc<DevServerConfig>>) -> Response {
    match serde_json::to_string(&config.app) {
        Ok(json) => (
            [(CONTENT_TYPE, "application/javascript; charset=utf-8")],
            format!("window.APP_CONFIG = {};\n", json),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize frontend config: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build config.js").into_response()
        }
    }
}

async fn log_message(Json(request): Json<LogRequest>) -> Json<LogResponse> {
    let component = request.component.as_deref().unwrap_or("frontend");
    let message = request.message.as_str();

    match request.level.to_lowercase().as_str() {
        "debug" => debug!(target: "frontend", component, "{}", message),
        "warn" => warn!(target: "frontend", component, "{}", message),
        "error" => error!(target: "frontend", component, "{}", message),
        // unknown levels are kept, not dropped
        level => info!(target: "frontend", component, level, "{}", message),
    }

    Json(LogResponse { success: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tempfile::TempDir;
    use tower::util::ServiceExt; // for `oneshot`

    fn setup_test_app() -> (TempDir, Router) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("login.html"), "<h1>Login</h1>").unwrap();
        std::fs::write(dir.path().join("dashboard.html"), "<h1>Dashboard</h1>").unwrap();

        let config = DevServerConfig {
            static_dir: dir.path().to_path_buf(),
            ..DevServerConfig::default()
        };
        (dir, router(Arc::new(config)))
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_root_and_index_serve_entry_page() {
        let (_dir, app) = setup_test_app();

        for uri in ["/", "/index.html"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_text(response).await, "<h1>Login</h1>");
        }
    }

    #[tokio::test]
    async fn test_static_files_and_missing_files() {
        let (_dir, app) = setup_test_app();

        let response = app.clone().oneshot(get_request("/dashboard.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>Dashboard</h1>");

        let response = app.oneshot(get_request("/missing.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_every_response_disables_caching() {
        let (_dir, app) = setup_test_app();

        for uri in ["/", "/dashboard.html", "/missing.html", "/config.js"] {
            let response = app.clone().oneshot(get_request(uri)).await.unwrap();
            let headers = response.headers();
            assert_eq!(headers[CACHE_CONTROL], "no-cache, no-store, must-revalidate", "{}", uri);
            assert_eq!(headers[PRAGMA], "no-cache", "{}", uri);
            assert_eq!(headers[EXPIRES], "0", "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_config_js_injects_app_config() {
        let (_dir, app) = setup_test_app();

        let response = app.oneshot(get_request("/config.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        let json = body
            .strip_prefix("window.APP_CONFIG = ")
            .and_then(|rest| rest.trim_end().strip_suffix(';'))
            .expect("unexpected config.js body");
        let config = shared::AppConfig::from_json(json).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.api_version, "/v1");
        assert_eq!(config.log_endpoint.as_deref(), Some("/dev/logs"));
    }

    #[tokio::test]
    async fn test_log_endpoint_accepts_frontend_lines() {
        let (_dir, app) = setup_test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/dev/logs")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({
                    "level": "warn",
                    "message": "Goal wizard halted",
                    "component": "goal_wizard"
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let response_json: LogResponse = serde_json::from_slice(&body).unwrap();
        assert!(response_json.success);
    }

    #[tokio::test]
    async fn test_log_endpoint_rejects_malformed_body() {
        let (_dir, app) = setup_test_app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/dev/logs")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message": "no level"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
