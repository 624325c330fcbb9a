use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::shipment::{GeoPoint, ShipmentStatus};
use crate::models::tracking::TrackingEvent;

/// Append-only timeline of tracking events per shipment. The ledger does
/// not judge transition legality; callers append only after the state
/// machine has accepted the move. Events are never updated or deleted.
pub struct TrackingLedger {
    events: DashMap<Uuid, Vec<TrackingEvent>>,
    seq: AtomicU64,
}

impl TrackingLedger {
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    pub fn append(
        &self,
        shipment_id: Uuid,
        status: ShipmentStatus,
        location: Option<GeoPoint>,
        note: Option<String>,
    ) -> TrackingEvent {
        let event = TrackingEvent {
            id: Uuid::new_v4(),
            shipment_id,
            status,
            location,
            note,
            recorded_at: Utc::now(),
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
        };

        self.events
            .entry(shipment_id)
            .or_default()
            .push(event.clone());
        event
    }

    /// Full timeline, oldest first. Ordered by timestamp, with the
    /// insertion sequence breaking ties.
    pub fn history(&self, shipment_id: Uuid) -> Vec<TrackingEvent> {
        let mut events = self
            .events
            .get(&shipment_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        events.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then(a.seq.cmp(&b.seq))
        });
        events
    }

    /// Derived by replay: the status of the latest event. None means no
    /// events yet, which callers read as the initial pending.
    pub fn current_status(&self, shipment_id: Uuid) -> Option<ShipmentStatus> {
        self.history(shipment_id).last().map(|event| event.status)
    }

    pub fn event_count(&self) -> usize {
        self.events.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for TrackingLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::TrackingLedger;
    use crate::models::shipment::{GeoPoint, ShipmentStatus};

    #[test]
    fn empty_ledger_has_no_current_status() {
        let ledger = TrackingLedger::new();
        assert!(ledger.current_status(Uuid::from_u128(1)).is_none());
        assert!(ledger.history(Uuid::from_u128(1)).is_empty());
    }

    #[test]
    fn history_is_oldest_first_and_current_is_latest() {
        let ledger = TrackingLedger::new();
        let shipment_id = Uuid::from_u128(1);

        ledger.append(shipment_id, ShipmentStatus::Assigned, None, None);
        ledger.append(
            shipment_id,
            ShipmentStatus::PickedUp,
            Some(GeoPoint {
                lat: 12.97,
                lng: 77.59,
            }),
            Some("picked up at warehouse".to_string()),
        );
        ledger.append(shipment_id, ShipmentStatus::InTransit, None, None);

        let history = ledger.history(shipment_id);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].status, ShipmentStatus::Assigned);
        assert_eq!(history[2].status, ShipmentStatus::InTransit);
        assert_eq!(
            ledger.current_status(shipment_id),
            Some(ShipmentStatus::InTransit)
        );
    }

    #[test]
    fn insertion_sequence_breaks_timestamp_ties() {
        let ledger = TrackingLedger::new();
        let shipment_id = Uuid::from_u128(2);

        // Appends land within the same clock tick often enough that the
        // tie-break is what actually orders them.
        for _ in 0..50 {
            ledger.append(shipment_id, ShipmentStatus::InTransit, None, None);
        }
        ledger.append(shipment_id, ShipmentStatus::Delivered, None, None);

        let history = ledger.history(shipment_id);
        let seqs: Vec<u64> = history.iter().map(|event| event.seq).collect();
        let mut sorted = seqs.clone();
        sorted.sort_unstable();
        assert_eq!(seqs, sorted);
        assert_eq!(
            ledger.current_status(shipment_id),
            Some(ShipmentStatus::Delivered)
        );
    }

    #[test]
    fn shipments_do_not_share_timelines() {
        let ledger = TrackingLedger::new();
        ledger.append(Uuid::from_u128(1), ShipmentStatus::Assigned, None, None);
        ledger.append(Uuid::from_u128(2), ShipmentStatus::Cancelled, None, None);

        assert_eq!(ledger.history(Uuid::from_u128(1)).len(), 1);
        assert_eq!(
            ledger.current_status(Uuid::from_u128(2)),
            Some(ShipmentStatus::Cancelled)
        );
        assert_eq!(ledger.event_count(), 2);
    }
}
