use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::shipment::GeoPoint;

/// A transporter as reported by the presence feed. Only an input to
/// dispatch ranking; assignment itself lives on the shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverCandidate {
    pub id: Uuid,
    pub name: String,
    pub location: GeoPoint,
    pub vehicle: String,
    pub available: bool,
    pub rating: f64,
    pub updated_at: DateTime<Utc>,
}
