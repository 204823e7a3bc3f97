use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardEventType {
    Earn,
    Redeem,
    Adjust,
}

impl RewardEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardEventType::Earn => "earn",
            RewardEventType::Redeem => "redeem",
            RewardEventType::Adjust => "adjust",
        }
    }
}

impl fmt::Display for RewardEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RewardEventType {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "earn" => Ok(RewardEventType::Earn),
            "redeem" => Ok(RewardEventType::Redeem),
            "adjust" => Ok(RewardEventType::Adjust),
            other => Err(AppError::InvalidInput(format!(
                "unknown reward event type: {other}, expected earn/redeem/adjust"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEvent {
    pub id: u64,
    pub user_id: Uuid,
    pub order_id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: RewardEventType,
    pub points: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
