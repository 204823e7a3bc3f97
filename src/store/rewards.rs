use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::reward::{RewardEvent, RewardEventType};

/// Append-only points ledger, one event list per user.
pub struct RewardLedger {
    events: DashMap<Uuid, Vec<RewardEvent>>,
    next_id: AtomicU64,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn record(
        &self,
        user_id: Uuid,
        order_id: Option<u64>,
        kind: RewardEventType,
        points: i64,
        reason: Option<String>,
    ) -> RewardEvent {
        let event = RewardEvent {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_id,
            order_id,
            kind,
            points,
            reason,
            created_at: Utc::now(),
        };

        self.events.entry(user_id).or_default().push(event.clone());
        event
    }

    /// Sum of the user's points, saturating at the `i64` bounds.
    pub fn balance(&self, user_id: Uuid) -> i64 {
        self.events
            .get(&user_id)
            .map(|events| {
                events
                    .iter()
                    .fold(0_i64, |total, e| total.saturating_add(e.points))
            })
            .unwrap_or(0)
    }
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::RewardLedger;
    use crate::models::reward::RewardEventType;

    #[test]
    fn balance_sums_signed_points() {
        let ledger = RewardLedger::new();
        let user = Uuid::new_v4();

        ledger.record(user, Some(1), RewardEventType::Earn, 120, None);
        ledger.record(user, None, RewardEventType::Redeem, -50, Some("coupon".into()));
        ledger.record(user, None, RewardEventType::Adjust, 5, None);

        assert_eq!(ledger.balance(user), 75);
    }

    #[test]
    fn unknown_user_has_zero_balance() {
        let ledger = RewardLedger::new();
        assert_eq!(ledger.balance(Uuid::new_v4()), 0);
    }

    #[test]
    fn balance_saturates_instead_of_overflowing() {
        let ledger = RewardLedger::new();
        let rich = Uuid::new_v4();
        let broke = Uuid::new_v4();

        ledger.record(rich, None, RewardEventType::Adjust, i64::MAX, None);
        ledger.record(rich, None, RewardEventType::Adjust, i64::MAX, None);
        ledger.record(broke, None, RewardEventType::Adjust, i64::MIN, None);
        ledger.record(broke, None, RewardEventType::Redeem, -1, None);

        assert_eq!(ledger.balance(rich), i64::MAX);
        assert_eq!(ledger.balance(broke), i64::MIN);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        assert!("earn".parse::<RewardEventType>().is_ok());
        assert!("gift".parse::<RewardEventType>().is_err());
    }
}
