//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - lesson catalog and sessions under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // Catalog
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/lessons", get(http::http_lessons))
        .route("/api/v1/lessons/:lesson/concepts", get(http::http_concepts))
        // Sessions
        .route("/api/v1/sessions", post(http::http_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(http::http_get_session).delete(http::http_delete_session),
        )
        .route("/api/v1/sessions/:id/editor", post(http::http_editor_change))
        .route("/api/v1/sessions/:id/editor/toggle", post(http::http_toggle_editor))
        .route("/api/v1/sessions/:id/action", post(http::http_agent_action))
        .route("/api/v1/sessions/:id/chat", post(http::http_chat_send))
        .route("/api/v1/sessions/:id/select", post(http::http_select_story))
        .route("/api/v1/sessions/:id/quiz/answer", post(http::http_quiz_answer))
        .route("/api/v1/sessions/:id/quiz/next", post(http::http_quiz_next))
        .route("/api/v1/sessions/:id/quiz/restart", post(http::http_quiz_restart))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::LessonConfig;

    fn app() -> Router {
        build_router(Arc::new(AppState::with_banks(LessonConfig::default())))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header("content-type", "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn health_and_catalog() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (_, body) = call(&app, Method::GET, "/api/v1/lessons", None).await;
        assert_eq!(body["lessons"][1]["title"], "Story Maker");

        let (status, body) = call(&app, Method::GET, "/api/v1/lessons/story/concepts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slides"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn quiz_session_over_http() {
        let app = app();
        let (status, body) = call(&app, Method::POST, "/api/v1/sessions", Some(json!({ "lesson": "quiz" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["sessionId"].as_str().unwrap().to_string();

        let (status, body) =
            call(&app, Method::POST, &format!("/api/v1/sessions/{id}/action"), Some(json!({ "action": "make_harder" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["preview"]["config"]["pointsPerQuestion"], 15);
        assert_eq!(body["editor"]["open"], true);
        assert!(body["editor"]["text"].as_str().unwrap().contains("\"pointsPerQuestion\": 15,"));

        let (status, body) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/quiz/next"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Answer the question first.");

        let (status, _) =
            call(&app, Method::POST, &format!("/api/v1/sessions/{id}/action"), Some(json!({ "action": "fly" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, Method::DELETE, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn story_editor_error_is_a_field_not_a_failure() {
        let app = app();
        let (_, body) = call(&app, Method::POST, "/api/v1/sessions", Some(json!({ "lesson": "story" }))).await;
        let id = body["sessionId"].as_str().unwrap().to_string();

        let (status, body) =
            call(&app, Method::POST, &format!("/api/v1/sessions/{id}/editor"), Some(json!({ "text": "nonsense" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["editor"]["error"], "Hmm, that doesn't look quite right. Check your code and try again!");
        assert_eq!(body["version"], 1);
        assert_eq!(body["preview"]["story"].as_str().unwrap().split(' ').next(), Some("Wizard"));
    }
}
