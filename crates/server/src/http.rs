//! REST endpoints

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use vox_core::{HealthCheck, HealthReport};

use crate::chat::ChatReply;
use crate::error::ApiError;
use crate::metrics::{metrics_handler, record_request};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server.cors_origins);
    let timeout = Duration::from_secs(state.settings.server.request_timeout_secs);

    Router::new()
        // Session endpoints
        .route("/api/sessions", post(create_session))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id", delete(end_session))
        .route("/api/sessions/:id/history", get(session_history))
        // Chat
        .route("/api/chat/:session_id", post(chat))
        // Introspection
        .route("/api/capabilities", get(capabilities))
        // Lookup tools
        .route("/api/lookup/cities", get(lookup_cities))
        .route("/api/lookup/time/:city", get(lookup_time))
        .route("/api/lookup/weather/:city", get(lookup_weather))
        // Health and metrics
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins; no origins means
/// permissive (development).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!("no CORS origins configured, allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

async fn create_session(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    record_request("create_session");
    let session = state.sessions.create_session().await?;
    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "created_at": session.created_at,
    })))
}

async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sessions = state.sessions.list_sessions().await?;
    Ok(Json(serde_json::json!({
        "count": sessions.len(),
        "sessions": sessions,
    })))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.sessions.get_session(&id).await?;
    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "active": session.is_active(),
        "created_at": session.created_at,
        "ended_at": session.ended_at,
        "message_count": session.message_count,
    })))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.end_session(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let messages = state.sessions.list_messages(&id).await?;
    Ok(Json(serde_json::json!({
        "session_id": id,
        "messages": messages,
    })))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    message: String,
}

async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    record_request("chat");
    let reply = state.chat.chat(&session_id, &request.message).await?;
    Ok(Json(reply))
}

#[derive(Debug, Serialize)]
struct Capability {
    role: &'static str,
    provider: String,
    available: bool,
}

async fn capabilities(State(state): State<AppState>) -> Json<serde_json::Value> {
    let embedding_info = state.embedder.model_info();
    let caps = vec![
        Capability {
            role: "embedding",
            provider: format!("{}/{}", embedding_info.provider, embedding_info.model),
            available: state.embedder.is_available().await,
        },
        Capability {
            role: "llm",
            provider: format!(
                "{}/{}",
                state.llm.provider_name(),
                state.llm.model_name()
            ),
            available: state.llm.is_available().await,
        },
        Capability {
            role: "cache",
            provider: state.cache.name().to_string(),
            available: true,
        },
    ];
    Json(serde_json::json!({ "capabilities": caps }))
}

async fn lookup_cities() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "cities": vox_tools::cities::names() }))
}

async fn lookup_time(
    Path(city): Path<String>,
) -> Result<Json<vox_tools::LocalTime>, ApiError> {
    Ok(Json(vox_tools::local_time(&city)?))
}

async fn lookup_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<vox_tools::Weather>, ApiError> {
    Ok(Json(state.weather.weather(&city).await?))
}

/// Composite health: always 200, degradation lives in the body. A dead
/// dependency must not make the health endpoint itself look dead.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut checks = Vec::new();

    if state.embedder.is_available().await {
        checks.push(HealthCheck::healthy("embedding"));
    } else {
        checks.push(HealthCheck::unhealthy("embedding", "provider unreachable"));
    }

    if state.llm.is_available().await {
        checks.push(HealthCheck::healthy("llm"));
    } else {
        checks.push(HealthCheck::unhealthy("llm", "provider unreachable"));
    }

    let store_health = state.vector_store.store_health().await;
    if store_health.reachable {
        checks.push(HealthCheck::healthy("vector-store"));
    } else {
        checks.push(HealthCheck::unhealthy(
            "vector-store",
            store_health.detail.unwrap_or_else(|| "unreachable".to_string()),
        ));
    }

    let report = HealthReport::aggregate(checks);
    Json(serde_json::json!({
        "status": report.status,
        "version": env!("CARGO_PKG_VERSION"),
        "checks": report.checks,
    }))
}

/// Readiness: the LLM proxy must answer within two seconds, otherwise the
/// instance reports 503 and stays out of rotation.
async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let probe = tokio::time::timeout(Duration::from_secs(2), state.llm.is_available());
    let ready = matches!(probe.await, Ok(true));

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
        })),
    )
}
