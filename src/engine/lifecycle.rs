use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::shipment::{Shipment, ShipmentStatus};

/// Checks that `actor` may move `shipment` to `target`. Pure validation:
/// the shipment is never mutated here, and a rejected transition must
/// leave the caller free to retry with the shipment unchanged.
pub fn validate_transition(
    shipment: &Shipment,
    target: ShipmentStatus,
    actor: &Actor,
) -> Result<(), AppError> {
    use ShipmentStatus::*;

    match (shipment.status, target) {
        (Pending, Assigned) => match actor.role {
            Role::Transporter | Role::Admin => Ok(()),
            _ => Err(unauthorized(actor, "accept or assign shipments")),
        },
        (Pending, Cancelled) | (Assigned, Cancelled) => match actor.role {
            Role::Customer | Role::Business | Role::Admin => Ok(()),
            _ => Err(unauthorized(actor, "cancel shipments")),
        },
        (Assigned, PickedUp) | (PickedUp, InTransit) | (InTransit, Delivered) => {
            require_assigned_driver(shipment, actor)
        }
        (from, to) => Err(AppError::InvalidTransition(format!("{from} -> {to}"))),
    }
}

/// Delivery-progress transitions belong to the driver on the shipment,
/// nobody else.
fn require_assigned_driver(shipment: &Shipment, actor: &Actor) -> Result<(), AppError> {
    if actor.role != Role::Transporter {
        return Err(unauthorized(actor, "advance delivery progress"));
    }
    if shipment.driver_id != Some(actor.id) {
        return Err(AppError::Unauthorized(format!(
            "driver {} is not assigned to shipment {}",
            actor.id, shipment.id
        )));
    }
    Ok(())
}

fn unauthorized(actor: &Actor, action: &str) -> AppError {
    AppError::Unauthorized(format!("role {:?} may not {action}", actor.role))
}
