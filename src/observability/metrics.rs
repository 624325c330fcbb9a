use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub shipments_created_total: IntCounterVec,
    pub transitions_total: IntCounterVec,
    pub tracking_events_total: IntCounter,
    pub active_shipments: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let shipments_created_total = IntCounterVec::new(
            Opts::new("shipments_created_total", "Shipments created by tier"),
            &["tier"],
        )
        .expect("valid shipments_created_total metric");

        let transitions_total = IntCounterVec::new(
            Opts::new("transitions_total", "Status transitions by outcome"),
            &["outcome"],
        )
        .expect("valid transitions_total metric");

        let tracking_events_total = IntCounter::new(
            "tracking_events_total",
            "Tracking events appended to the ledger",
        )
        .expect("valid tracking_events_total metric");

        let active_shipments = IntGauge::new(
            "active_shipments",
            "Shipments not yet in a terminal status",
        )
        .expect("valid active_shipments metric");

        registry
            .register(Box::new(shipments_created_total.clone()))
            .expect("register shipments_created_total");
        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(tracking_events_total.clone()))
            .expect("register tracking_events_total");
        registry
            .register(Box::new(active_shipments.clone()))
            .expect("register active_shipments");

        Self {
            registry,
            shipments_created_total,
            transitions_total,
            tracking_events_total,
            active_shipments,
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
