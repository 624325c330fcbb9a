use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::dispatch::{self, RankedCandidate};
use crate::engine::shipments as ops;
use crate::engine::shipments::{CreateShipmentInput, ShipmentFilter};
use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::driver::DriverCandidate;
use crate::models::shipment::{GeoPoint, Shipment, ShipmentStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shipments", post(create_shipment).get(list_shipments))
        .route("/shipments/:id", get(get_shipment).put(update_status))
        .route("/shipments/:id/accept", put(accept_job))
        .route("/shipments/:id/requote", post(requote))
        .route("/shipments/:id/candidates", get(candidates))
}

#[derive(Deserialize)]
pub struct AcceptRequest {
    pub driver_id: Option<Uuid>,
    pub actor: Actor,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ShipmentStatus,
    pub location: Option<GeoPoint>,
    pub note: Option<String>,
    pub actor: Actor,
}

#[derive(Deserialize)]
pub struct RequoteRequest {
    pub actor: Actor,
}

async fn create_shipment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateShipmentInput>,
) -> Result<Json<Shipment>, AppError> {
    let shipment = ops::create_shipment(&state, payload)?;
    Ok(Json(shipment))
}

async fn list_shipments(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ShipmentFilter>,
) -> Json<Vec<Shipment>> {
    Json(ops::list_shipments(&state, &filter))
}

async fn get_shipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(ops::get_shipment(&state, id)?))
}

async fn accept_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptRequest>,
) -> Result<Json<Shipment>, AppError> {
    let driver_id = match payload.driver_id {
        Some(driver_id) => driver_id,
        // a driver accepting without an explicit id accepts for themselves
        None if payload.actor.role == Role::Transporter => payload.actor.id,
        None => {
            return Err(AppError::BadRequest(
                "driver_id is required for manual assignment".to_string(),
            ));
        }
    };

    let shipment = ops::accept_job(&state, id, driver_id, &payload.actor)?;
    Ok(Json(shipment))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Shipment>, AppError> {
    let shipment = match payload.status {
        ShipmentStatus::Cancelled => ops::cancel(&state, id, &payload.actor, payload.note)?,
        target => ops::advance_status(
            &state,
            id,
            &payload.actor,
            target,
            payload.location,
            payload.note,
        )?,
    };
    Ok(Json(shipment))
}

async fn requote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RequoteRequest>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(ops::requote(&state, id, &payload.actor)?))
}

async fn candidates(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RankedCandidate>>, AppError> {
    let shipment = ops::get_shipment(&state, id)?;
    let drivers: Vec<DriverCandidate> = state
        .drivers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Ok(Json(dispatch::rank(&shipment.pickup, &drivers)))
}
