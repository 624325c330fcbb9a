use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::shipments as ops;
use crate::error::AppError;
use crate::models::actor::Actor;
use crate::models::shipment::{GeoPoint, Shipment, ShipmentStatus};
use crate::models::tracking::TrackingEvent;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tracking", get(get_history).post(append_event))
}

#[derive(Deserialize)]
pub struct TrackingQuery {
    pub shipment_id: Uuid,
}

#[derive(Serialize)]
pub struct TrackingResponse {
    pub shipment: Shipment,
    pub history: Vec<TrackingEvent>,
}

#[derive(Deserialize)]
pub struct AppendTrackingRequest {
    pub shipment_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ShipmentStatus,
    pub notes: Option<String>,
    pub actor: Actor,
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrackingQuery>,
) -> Result<Json<TrackingResponse>, AppError> {
    let (shipment, history) = ops::get_tracking(&state, query.shipment_id)?;
    Ok(Json(TrackingResponse { shipment, history }))
}

/// Geotagged report from the driver's client. A report carrying the
/// shipment's current status is a location ping; a different status is a
/// full transition with the fix attached.
async fn append_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AppendTrackingRequest>,
) -> Result<Json<TrackingResponse>, AppError> {
    let location = GeoPoint {
        lat: payload.latitude,
        lng: payload.longitude,
    };

    let current = ops::get_shipment(&state, payload.shipment_id)?.status;
    if payload.status == current {
        ops::record_ping(
            &state,
            payload.shipment_id,
            &payload.actor,
            location,
            payload.notes,
        )?;
    } else {
        ops::advance_status(
            &state,
            payload.shipment_id,
            &payload.actor,
            payload.status,
            Some(location),
            payload.notes,
        )?;
    }

    let (shipment, history) = ops::get_tracking(&state, payload.shipment_id)?;
    Ok(Json(TrackingResponse { shipment, history }))
}
