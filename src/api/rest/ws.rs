use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{info, warn};

use crate::state::AppState;
use crate::tracking::Subscriber;

#[derive(Debug, Deserialize)]
pub struct TrackParams {
    pub order_id: u64,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "client".to_string()
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<TrackParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, params: TrackParams) {
    let (mut sender, mut receiver) = socket.split();
    let (outbox_tx, outbox_rx) = mpsc::channel(state.config.track_outbox_size);

    let order_id = params.order_id;
    let subscriber = Subscriber::new(params.role, outbox_tx);
    let subscriber_id = subscriber.id;

    state.tracking.join(order_id, subscriber);
    state.metrics.tracking_connections.inc();
    state.refresh_tracking_gauges();

    info!(order_id, subscriber_id = %subscriber_id, "tracking client connected");

    let mut send_task = tokio::spawn(async move {
        let mut outbox = ReceiverStream::new(outbox_rx);
        while let Some(event) = outbox.next().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize tracking event");
                    continue;
                }
            };

            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    recv_state
                        .tracking
                        .on_message(order_id, subscriber_id, &text);
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.tracking.disconnect(order_id, subscriber_id);
    state.metrics.tracking_connections.dec();
    state.refresh_tracking_gauges();

    info!(order_id, subscriber_id = %subscriber_id, "tracking client disconnected");
}
