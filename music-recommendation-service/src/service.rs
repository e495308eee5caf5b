use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info};
use turn_flow::{Activity, ExecutionStatus, FlowRunner, Session, SessionStorage};
use uuid::Uuid;

use crate::steps::RecommendationState;

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn not_found_error(message: &str, id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": message,
            "session_id": id
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub flow_runner: FlowRunner<RecommendationState>,
    pub session_storage: Arc<dyn SessionStorage<RecommendationState>>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub session_id: Option<String>,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub session_id: String,
    pub activities: Vec<Activity>,
    pub status: ExecutionStatus,
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/execute", post(execute_turn))
        .route("/session/{id}", get(get_session))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(correlation_id_middleware))
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Music Recommendation Service",
        "endpoints": {
            "POST /execute": "Send one user message; omit session_id to start a conversation",
            "GET /session/{id}": "Inspect a conversation's flow state",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn execute_turn(
    State(state): State<AppState>,
    Json(request): Json<ExecuteRequest>,
) -> ApiResult<ExecuteResponse> {
    let session_id = match request.session_id {
        Some(id) if Uuid::parse_str(&id).is_err() => {
            error!(session_id = %id, "Invalid session ID format");
            return Err(bad_request_error("session_id must be a UUID"));
        }
        Some(id) => id,
        None => Uuid::new_v4().to_string(),
    };

    info!(
        session_id = %session_id,
        content_length = request.content.len(),
        "Processing turn"
    );

    let result = state
        .flow_runner
        .run(&session_id, &request.content)
        .await
        .map_err(|e| {
            error!(session_id = %session_id, error = %e, "Turn failed");
            internal_error("Turn failed", &e.to_string())
        })?;

    info!(session_id = %session_id, status = ?result.status, "Turn completed");

    Ok(Json(ExecuteResponse {
        session_id,
        activities: result.activities,
        status: result.status,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Session<RecommendationState>> {
    match state.session_storage.get(&session_id).await {
        Ok(Some(session)) => Ok(Json(session)),
        Ok(None) => Err(not_found_error("Session not found", &session_id)),
        Err(e) => {
            error!(session_id = %session_id, error = %e, "Failed to get session");
            Err(internal_error("Failed to get session", &e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ServiceConfig,
        workflow::{Dependencies, create_flow_runner},
    };
    use axum::body::{Body, to_bytes};
    use tower::ServiceExt;
    use turn_flow::InMemorySessionStorage;

    fn app() -> Router {
        let config = ServiceConfig {
            seed: Some(3),
            ..ServiceConfig::default()
        };
        let deps = Dependencies::from_config(&config).unwrap();
        let session_storage: Arc<dyn SessionStorage<RecommendationState>> =
            Arc::new(InMemorySessionStorage::new());
        build_router(AppState {
            flow_runner: create_flow_runner(&deps, session_storage.clone()),
            session_storage,
        })
    }

    async fn post_json(app: &Router, body: Value) -> (StatusCode, Value) {
        let request = Request::post("/execute")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_execute_starts_a_conversation_and_offers_genres() {
        let app = app();
        let (status, body) = post_json(&app, json!({ "content": "hi" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"]["status"], "waiting_for_input");
        assert_eq!(body["status"]["prompt"], "choice");
        assert_eq!(body["activities"][0]["prompt"]["choices"][1], "metal");

        let session_id = body["session_id"].as_str().unwrap().to_string();
        let (_, body) = post_json(&app, json!({ "session_id": session_id, "content": "jazz" })).await;
        assert_eq!(body["activities"][1]["type"], "attachment");
        assert_eq!(body["status"]["prompt"], "confirm");
    }

    #[tokio::test]
    async fn test_malformed_session_id_is_rejected() {
        let (status, _) = post_json(&app(), json!({ "session_id": "abc", "content": "hi" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let request = Request::get(format!("/session/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
