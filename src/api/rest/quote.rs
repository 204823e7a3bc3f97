use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::engine::quote::{estimate, resolve};
use crate::api::rest::extract::AppJson;
use crate::error::AppError;
use crate::models::quote::{QuoteInput, QuoteResult};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/quote", post(quote_price))
}

async fn quote_price(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<QuoteInput>,
) -> Result<Json<QuoteResult>, AppError> {
    let request = resolve(payload)?;
    let quote = estimate(&request);

    state
        .metrics
        .quotes_total
        .with_label_values(&[quote.tier.as_str()])
        .inc();

    Ok(Json(quote))
}
