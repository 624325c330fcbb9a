use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::Config;
use crate::engine::ledger::TrackingLedger;
use crate::engine::pricing::PricingConfig;
use crate::models::driver::DriverCandidate;
use crate::models::shipment::Shipment;
use crate::models::tracking::TrackingEvent;
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub shipments: DashMap<Uuid, Shipment>,
    pub drivers: DashMap<Uuid, DriverCandidate>,
    pub ledger: TrackingLedger,
    pub pricing: PricingConfig,
    pub tracking_prefix: String,
    pub event_tx: broadcast::Sender<TrackingEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let (event_tx, _unused_rx) = broadcast::channel(config.event_buffer_size);

        Self {
            shipments: DashMap::new(),
            drivers: DashMap::new(),
            ledger: TrackingLedger::new(),
            pricing: PricingConfig::from_config(config),
            tracking_prefix: config.tracking_prefix.clone(),
            event_tx,
            metrics: Metrics::new(),
        }
    }
}
