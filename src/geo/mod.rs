use crate::error::AppError;
use crate::models::shipment::GeoPoint;

const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn validate(point: &GeoPoint) -> Result<(), AppError> {
    if !point.lat.is_finite() || !(-90.0..=90.0).contains(&point.lat) {
        return Err(AppError::InvalidCoordinate(format!(
            "latitude {} out of range [-90, 90]",
            point.lat
        )));
    }
    if !point.lng.is_finite() || !(-180.0..=180.0).contains(&point.lng) {
        return Err(AppError::InvalidCoordinate(format!(
            "longitude {} out of range [-180, 180]",
            point.lng
        )));
    }
    Ok(())
}

pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> Result<f64, AppError> {
    validate(a)?;
    validate(b)?;
    Ok(haversine_km(a, b))
}

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Forward azimuth from `a` to `b` in degrees, normalized to [0, 360).
pub fn initial_bearing_deg(a: &GeoPoint, b: &GeoPoint) -> Result<f64, AppError> {
    validate(a)?;
    validate(b)?;

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    Ok((y.atan2(x).to_degrees() + 360.0) % 360.0)
}

#[cfg(test)]
mod tests {
    use super::{distance_km, haversine_km, initial_bearing_deg, validate};
    use crate::models::shipment::GeoPoint;

    #[test]
    fn zero_distance_for_same_point() {
        let p = GeoPoint {
            lat: 12.9716,
            lng: 77.5946,
        };
        let distance = haversine_km(&p, &p);
        assert!(distance < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let bangalore = GeoPoint {
            lat: 12.9716,
            lng: 77.5946,
        };
        let chennai = GeoPoint {
            lat: 13.0827,
            lng: 80.2707,
        };
        let there = haversine_km(&bangalore, &chennai);
        let back = haversine_km(&chennai, &bangalore);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn bangalore_to_chennai_is_around_290_km() {
        let bangalore = GeoPoint {
            lat: 12.9716,
            lng: 77.5946,
        };
        let chennai = GeoPoint {
            lat: 13.0827,
            lng: 80.2707,
        };
        let distance = haversine_km(&bangalore, &chennai);
        assert!((distance - 290.0).abs() < 5.0);
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        let bad = GeoPoint {
            lat: 91.0,
            lng: 0.0,
        };
        assert!(validate(&bad).is_err());
        let ok = GeoPoint { lat: 0.0, lng: 0.0 };
        assert!(distance_km(&bad, &ok).is_err());
    }

    #[test]
    fn out_of_range_longitude_is_rejected() {
        let bad = GeoPoint {
            lat: 0.0,
            lng: -180.5,
        };
        assert!(validate(&bad).is_err());
    }

    #[test]
    fn bearing_due_east_on_equator() {
        let origin = GeoPoint { lat: 0.0, lng: 0.0 };
        let east = GeoPoint { lat: 0.0, lng: 1.0 };
        let bearing = initial_bearing_deg(&origin, &east).unwrap();
        assert!((bearing - 90.0).abs() < 1e-6);
    }
}
