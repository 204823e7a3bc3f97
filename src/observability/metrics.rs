use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub quotes_total: IntCounterVec,
    pub orders_created_total: IntCounter,
    pub status_updates_total: IntCounterVec,
    pub tracking_connections: IntGauge,
    pub tracking_rooms: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let quotes_total = IntCounterVec::new(
            Opts::new("quotes_total", "Quotes computed by service tier"),
            &["tier"],
        )
        .expect("valid quotes_total metric");

        let orders_created_total =
            IntCounter::new("orders_created_total", "Orders created since start")
                .expect("valid orders_created_total metric");

        let status_updates_total = IntCounterVec::new(
            Opts::new(
                "status_updates_total",
                "Order status update attempts by outcome",
            ),
            &["outcome"],
        )
        .expect("valid status_updates_total metric");

        let tracking_connections = IntGauge::new(
            "tracking_connections",
            "Currently open tracking connections",
        )
        .expect("valid tracking_connections metric");

        let tracking_rooms = IntGauge::new("tracking_rooms", "Orders with at least one subscriber")
            .expect("valid tracking_rooms metric");

        registry
            .register(Box::new(quotes_total.clone()))
            .expect("register quotes_total");
        registry
            .register(Box::new(orders_created_total.clone()))
            .expect("register orders_created_total");
        registry
            .register(Box::new(status_updates_total.clone()))
            .expect("register status_updates_total");
        registry
            .register(Box::new(tracking_connections.clone()))
            .expect("register tracking_connections");
        registry
            .register(Box::new(tracking_rooms.clone()))
            .expect("register tracking_rooms");

        Self {
            registry,
            quotes_total,
            orders_created_total,
            status_updates_total,
            tracking_connections,
            tracking_rooms,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
