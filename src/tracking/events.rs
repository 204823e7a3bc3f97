use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackEventKind {
    Hello,
    Echo,
    Broadcast,
    Left,
}

/// Frame pushed to tracking subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    #[serde(rename = "type")]
    pub kind: TrackEventKind,
    pub order_id: u64,
    pub role: String,
    pub message: String,
    pub ts: DateTime<Utc>,
}

impl TrackEvent {
    pub fn hello(order_id: u64, role: &str) -> Self {
        Self {
            kind: TrackEventKind::Hello,
            order_id,
            role: role.to_string(),
            message: format!("joined room {order_id} as {role}"),
            ts: Utc::now(),
        }
    }

    pub fn echo(order_id: u64, role: &str, message: &str) -> Self {
        Self {
            kind: TrackEventKind::Echo,
            order_id,
            role: role.to_string(),
            message: message.to_string(),
            ts: Utc::now(),
        }
    }

    pub fn left(order_id: u64, role: &str) -> Self {
        Self {
            kind: TrackEventKind::Left,
            order_id,
            role: role.to_string(),
            message: "peer disconnected".to_string(),
            ts: Utc::now(),
        }
    }

    /// Same payload, re-tagged for the rest of the room.
    pub fn into_broadcast(self) -> Self {
        Self {
            kind: TrackEventKind::Broadcast,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::TrackEvent;

    #[test]
    fn wire_format_uses_type_tag() {
        let event = TrackEvent::echo(42, "courier", "5 minutes out");
        let json: Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "echo");
        assert_eq!(json["order_id"], 42);
        assert_eq!(json["role"], "courier");
        assert_eq!(json["message"], "5 minutes out");
        assert!(json["ts"].is_string());
    }

    #[test]
    fn broadcast_keeps_payload() {
        let echo = TrackEvent::echo(1, "client", "hi");
        let broadcast = echo.clone().into_broadcast();

        let json: Value = serde_json::to_value(&broadcast).unwrap();
        assert_eq!(json["type"], "broadcast");
        assert_eq!(broadcast.message, echo.message);
        assert_eq!(broadcast.ts, echo.ts);
    }
}
