use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::{lifecycle, pricing};
use crate::error::AppError;
use crate::geo;
use crate::models::actor::{Actor, Role};
use crate::models::shipment::{GeoPoint, PackageInfo, Shipment, ShipmentStatus};
use crate::models::tracking::TrackingEvent;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateShipmentInput {
    pub customer_id: Uuid,
    pub pickup: GeoPoint,
    pub pickup_address: String,
    pub delivery: GeoPoint,
    pub delivery_address: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub package: PackageInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShipmentFilter {
    pub customer_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub status: Option<ShipmentStatus>,
    pub unassigned: Option<bool>,
}

pub fn create_shipment(
    state: &AppState,
    input: CreateShipmentInput,
) -> Result<Shipment, AppError> {
    let quote = pricing::estimate(
        &state.pricing,
        &input.pickup,
        &input.delivery,
        &input.package,
    )?;

    let id = Uuid::new_v4();
    let now = Utc::now();
    let shipment = Shipment {
        id,
        tracking_number: tracking_number(&state.tracking_prefix, &id),
        customer_id: input.customer_id,
        driver_id: None,
        pickup: input.pickup,
        pickup_address: input.pickup_address,
        delivery: input.delivery,
        delivery_address: input.delivery_address,
        receiver_name: input.receiver_name,
        receiver_phone: input.receiver_phone,
        package: input.package,
        estimated_cost: quote.amount,
        currency: quote.currency,
        status: ShipmentStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    state.shipments.insert(shipment.id, shipment.clone());
    state
        .metrics
        .shipments_created_total
        .with_label_values(&[shipment.package.tier.as_str()])
        .inc();
    state.metrics.active_shipments.inc();

    info!(
        shipment_id = %shipment.id,
        tracking_number = %shipment.tracking_number,
        estimated_cost = shipment.estimated_cost,
        "shipment created"
    );

    Ok(shipment)
}

/// Accept (driver) or manually assign (admin) a pending shipment. The
/// shipment entry's exclusive guard is held across the whole check-and-set,
/// so of two concurrent accepts exactly one can win; the loser observes the
/// recorded driver and gets `AlreadyAssigned`.
pub fn accept_job(
    state: &AppState,
    shipment_id: Uuid,
    driver_id: Uuid,
    actor: &Actor,
) -> Result<Shipment, AppError> {
    let mut shipment = state
        .shipments
        .get_mut(&shipment_id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    if shipment.driver_id.is_some() {
        reject(state);
        return Err(AppError::AlreadyAssigned);
    }

    if actor.role == Role::Transporter && actor.id != driver_id {
        return Err(AppError::Unauthorized(format!(
            "driver {} may only accept jobs for themselves",
            actor.id
        )));
    }

    if let Err(err) = lifecycle::validate_transition(&shipment, ShipmentStatus::Assigned, actor) {
        reject(state);
        return Err(err);
    }

    shipment.driver_id = Some(driver_id);
    commit_transition(
        state,
        &mut shipment,
        ShipmentStatus::Assigned,
        None,
        Some(format!("assigned to driver {driver_id}")),
    );

    info!(shipment_id = %shipment.id, driver_id = %driver_id, "job accepted");
    Ok(shipment.clone())
}

/// One validated transition: state-machine check, status update, and
/// ledger append commit as a unit under the shipment entry's guard.
pub fn advance_status(
    state: &AppState,
    shipment_id: Uuid,
    actor: &Actor,
    target: ShipmentStatus,
    location: Option<GeoPoint>,
    note: Option<String>,
) -> Result<Shipment, AppError> {
    if target == ShipmentStatus::Assigned {
        return Err(AppError::BadRequest(
            "assignment goes through the accept operation".to_string(),
        ));
    }
    if let Some(point) = &location {
        geo::validate(point)?;
    }

    let mut shipment = state
        .shipments
        .get_mut(&shipment_id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    if let Err(err) = lifecycle::validate_transition(&shipment, target, actor) {
        reject(state);
        return Err(err);
    }

    commit_transition(state, &mut shipment, target, location, note);

    info!(shipment_id = %shipment.id, status = %target, "status advanced");
    Ok(shipment.clone())
}

pub fn cancel(
    state: &AppState,
    shipment_id: Uuid,
    actor: &Actor,
    note: Option<String>,
) -> Result<Shipment, AppError> {
    advance_status(
        state,
        shipment_id,
        actor,
        ShipmentStatus::Cancelled,
        None,
        note,
    )
}

/// Geotagged progress report from the assigned driver that does not move
/// the state machine: the event carries the shipment's current status.
/// Runs under the entry's write guard so pings serialize with transitions
/// and the derived status can never diverge from the stored one.
pub fn record_ping(
    state: &AppState,
    shipment_id: Uuid,
    actor: &Actor,
    location: GeoPoint,
    note: Option<String>,
) -> Result<TrackingEvent, AppError> {
    geo::validate(&location)?;

    let shipment = state
        .shipments
        .get_mut(&shipment_id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    if shipment.status.is_terminal() {
        return Err(AppError::InvalidTransition(format!(
            "shipment is {}, no further tracking",
            shipment.status
        )));
    }
    if actor.role != Role::Transporter || shipment.driver_id != Some(actor.id) {
        return Err(AppError::Unauthorized(
            "only the assigned driver may report locations".to_string(),
        ));
    }

    let event = state
        .ledger
        .append(shipment.id, shipment.status, Some(location), note);
    state.metrics.tracking_events_total.inc();
    let _ = state.event_tx.send(event.clone());

    Ok(event)
}

/// Explicit re-quote; the estimate never changes implicitly. Only pending
/// shipments may be repriced.
pub fn requote(state: &AppState, shipment_id: Uuid, actor: &Actor) -> Result<Shipment, AppError> {
    match actor.role {
        Role::Customer | Role::Business | Role::Admin => {}
        Role::Transporter => {
            return Err(AppError::Unauthorized(
                "drivers may not re-quote shipments".to_string(),
            ));
        }
    }

    let mut shipment = state
        .shipments
        .get_mut(&shipment_id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))?;

    if shipment.status != ShipmentStatus::Pending {
        return Err(AppError::InvalidTransition(format!(
            "re-quote only while pending, shipment is {}",
            shipment.status
        )));
    }

    let quote = pricing::estimate(
        &state.pricing,
        &shipment.pickup,
        &shipment.delivery,
        &shipment.package,
    )?;
    shipment.estimated_cost = quote.amount;
    shipment.currency = quote.currency;
    shipment.updated_at = Utc::now();

    info!(shipment_id = %shipment.id, estimated_cost = shipment.estimated_cost, "shipment re-quoted");
    Ok(shipment.clone())
}

pub fn get_shipment(state: &AppState, shipment_id: Uuid) -> Result<Shipment, AppError> {
    state
        .shipments
        .get(&shipment_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id} not found")))
}

pub fn get_tracking(
    state: &AppState,
    shipment_id: Uuid,
) -> Result<(Shipment, Vec<TrackingEvent>), AppError> {
    let shipment = get_shipment(state, shipment_id)?;
    let history = state.ledger.history(shipment_id);
    Ok((shipment, history))
}

pub fn list_shipments(state: &AppState, filter: &ShipmentFilter) -> Vec<Shipment> {
    let mut shipments: Vec<Shipment> = state
        .shipments
        .iter()
        .filter(|entry| {
            let shipment = entry.value();
            filter
                .customer_id
                .is_none_or(|id| shipment.customer_id == id)
                && filter
                    .driver_id
                    .is_none_or(|id| shipment.driver_id == Some(id))
                && filter.status.is_none_or(|status| shipment.status == status)
                && filter
                    .unassigned
                    .is_none_or(|unassigned| shipment.driver_id.is_none() == unassigned)
        })
        .map(|entry| entry.value().clone())
        .collect();

    shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    shipments
}

fn commit_transition(
    state: &AppState,
    shipment: &mut Shipment,
    target: ShipmentStatus,
    location: Option<GeoPoint>,
    note: Option<String>,
) -> TrackingEvent {
    shipment.status = target;
    shipment.updated_at = Utc::now();

    let event = state.ledger.append(shipment.id, target, location, note);
    if target.is_terminal() {
        state.metrics.active_shipments.dec();
    }
    state
        .metrics
        .transitions_total
        .with_label_values(&["accepted"])
        .inc();
    state.metrics.tracking_events_total.inc();
    let _ = state.event_tx.send(event.clone());

    event
}

fn reject(state: &AppState) {
    state
        .metrics
        .transitions_total
        .with_label_values(&["rejected"])
        .inc();
}

fn tracking_number(prefix: &str, id: &Uuid) -> String {
    let simple = id.simple().to_string();
    format!("{}-{}", prefix, simple[..10].to_uppercase())
}
