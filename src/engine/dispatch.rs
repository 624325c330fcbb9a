use serde::Serialize;

use crate::geo;
use crate::models::driver::DriverCandidate;
use crate::models::shipment::GeoPoint;

#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub driver: DriverCandidate,
    pub distance_km: f64,
    /// Heading from the driver's position toward the pickup.
    pub bearing_deg: f64,
}

/// Ranks candidates for a pickup: unavailable drivers are dropped, the
/// rest sort nearest-first with rating as the tie-break. An empty result
/// means no drivers right now, which is a normal outcome.
pub fn rank(pickup: &GeoPoint, candidates: &[DriverCandidate]) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter(|candidate| candidate.available)
        .filter_map(|candidate| {
            // A candidate whose feed reported a garbage coordinate is
            // unrankable, not a reason to fail the whole query.
            let distance_km = geo::distance_km(&candidate.location, pickup).ok()?;
            let bearing_deg = geo::initial_bearing_deg(&candidate.location, pickup).ok()?;
            Some(RankedCandidate {
                driver: candidate.clone(),
                distance_km,
                bearing_deg,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| b.driver.rating.total_cmp(&a.driver.rating))
    });
    ranked
}
