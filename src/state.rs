use std::sync::Arc;

use crate::config::Config;
use crate::observability::metrics::Metrics;
use crate::store::{InMemoryOrderStore, OrderStore, RewardLedger};
use crate::tracking::TrackingRegistry;

pub struct AppState {
    pub config: Config,
    pub orders: Arc<dyn OrderStore>,
    pub rewards: RewardLedger,
    pub tracking: TrackingRegistry,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryOrderStore::new()))
    }

    pub fn with_store(config: Config, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            config,
            orders,
            rewards: RewardLedger::new(),
            tracking: TrackingRegistry::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn refresh_tracking_gauges(&self) {
        self.metrics
            .tracking_rooms
            .set(self.tracking.room_count() as i64);
    }

    /// Tears down process-wide state once the server has stopped accepting
    /// connections.
    pub fn shutdown(&self) {
        self.tracking.shutdown();
        self.refresh_tracking_gauges();
    }
}
