use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::shipment::{GeoPoint, ShipmentStatus};

/// One immutable entry in a shipment's tracking timeline. Ordering is by
/// `recorded_at`, ties broken by the globally monotonic `seq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub status: ShipmentStatus,
    pub location: Option<GeoPoint>,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub seq: u64,
}
