use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::engine::quote::{estimate, resolve};
use crate::engine::transitions::update_status;
use crate::api::rest::extract::AppJson;
use crate::error::AppError;
use crate::models::identity::Actor;
use crate::models::order::{NewOrder, Order};
use crate::models::quote::QuoteInput;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/mine", get(list_my_orders))
        .route("/orders/:id/status", patch(update_order_status))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    actor: Actor,
    AppJson(payload): AppJson<QuoteInput>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let request = resolve(payload)?;
    let quote = estimate(&request);

    let order = state.orders.create_order(NewOrder {
        owner_id: actor.user_id,
        pickup: request.pickup,
        dropoff: request.dropoff,
        vehicle: request.vehicle,
        item_type: request.item_type,
        quantity: request.quantity,
        weight_lb: request.weight_lb,
        dimensions: request.dimensions,
        weather: request.weather,
        traffic: request.traffic,
        price: quote.price,
        eta_minutes: quote.eta_minutes,
        miles: quote.miles,
        tier: quote.tier,
    });

    state.metrics.orders_created_total.inc();
    state
        .metrics
        .quotes_total
        .with_label_values(&[quote.tier.as_str()])
        .inc();

    info!(
        order_id = order.id,
        user_id = %actor.user_id,
        price = order.price,
        eta_minutes = order.eta_minutes,
        "order created"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_my_orders(State(state): State<Arc<AppState>>, actor: Actor) -> Json<Vec<Order>> {
    Json(state.orders.list_orders_for_user(actor.user_id))
}

async fn update_order_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    actor: Actor,
    AppJson(payload): AppJson<StatusUpdateRequest>,
) -> Result<Json<Order>, AppError> {
    let result = update_status(state.orders.as_ref(), id, &payload.status, &actor);

    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.code(),
    };
    state
        .metrics
        .status_updates_total
        .with_label_values(&[outcome])
        .inc();

    result.map(Json)
}
