use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::rest::extract::AppJson;
use crate::error::AppError;
use crate::models::identity::{Actor, Role};
use crate::models::reward::RewardEventType;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/rewards/balance", get(balance))
        .route("/rewards/event", post(add_event))
}

#[derive(Deserialize)]
pub struct RewardEventRequest {
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub points: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub struct RewardEventResponse {
    pub id: u64,
    pub points: i64,
    #[serde(rename = "type")]
    pub kind: RewardEventType,
    pub reason: Option<String>,
}

/// Largest magnitude a single ledger event may carry.
pub const MAX_EVENT_POINTS: i64 = 1_000_000;

async fn balance(State(state): State<Arc<AppState>>, actor: Actor) -> Json<i64> {
    Json(state.rewards.balance(actor.user_id))
}

async fn add_event(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    AppJson(payload): AppJson<RewardEventRequest>,
) -> Result<Json<RewardEventResponse>, AppError> {
    let kind = match payload.kind.as_deref() {
        None => RewardEventType::Earn,
        Some(raw) => raw.parse()?,
    };

    if !(-MAX_EVENT_POINTS..=MAX_EVENT_POINTS).contains(&payload.points) {
        return Err(AppError::InvalidInput(format!(
            "points must be within +/-{MAX_EVENT_POINTS}, got {}",
            payload.points
        )));
    }

    if let Some(order_id) = payload.order_id {
        let order = state
            .orders
            .get_order(order_id)
            .ok_or_else(|| AppError::NotFound(format!("order {order_id} not found")))?;
        if actor.role == Role::Customer && order.owner_id != actor.user_id {
            return Err(AppError::Forbidden(format!(
                "order {order_id} does not belong to caller"
            )));
        }
    }

    let event = state.rewards.record(
        actor.user_id,
        payload.order_id,
        kind,
        payload.points,
        payload.reason,
    );

    Ok(Json(RewardEventResponse {
        id: event.id,
        points: event.points,
        kind: event.kind,
        reason: event.reason,
    }))
}
