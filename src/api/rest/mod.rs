pub mod extract;
pub mod identity;
pub mod orders;
pub mod quote;
pub mod rewards;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Origin of the local frontend dev server, always allowed.
const DEV_FRONTEND_ORIGIN: &str = "http://localhost:5173";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(quote::router())
        .merge(orders::router())
        .merge(rewards::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws/track", get(ws::ws_handler))
        .with_state(state)
}

pub fn cors_layer(frontend_origin: &str) -> Result<CorsLayer, AppError> {
    let mut origins = vec![HeaderValue::from_str(frontend_origin)
        .map_err(|err| AppError::Internal(format!("invalid FRONTEND_ORIGIN: {err}")))?];
    if frontend_origin != DEV_FRONTEND_ORIGIN {
        origins.push(HeaderValue::from_static(DEV_FRONTEND_ORIGIN));
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    env: String,
    orders: usize,
    rooms: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        env: state.config.app_env.clone(),
        orders: state.orders.len(),
        rooms: state.tracking.room_count(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
