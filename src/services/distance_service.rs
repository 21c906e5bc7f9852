//! Distance Service
//!
//! Straight-line distance and travel time estimates between geocoded stops.
//!
//! ## Features
//! - Great-circle (Haversine) distance in kilometers
//! - Flat urban travel time estimate for consecutive stops

use crate::models::place::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;
/// Flat city average speed used for stop-to-stop estimates
const URBAN_SPEED_KMH: f64 = 20.0;

/// Great-circle distance between two points, in kilometers
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn distance_between(from: Coordinates, to: Coordinates) -> f64 {
    haversine_distance(from.0, from.1, to.0, to.1)
}

/// Whole minutes needed to cover `distance_km` at urban speed, rounded down
pub fn travel_minutes(distance_km: f64) -> u32 {
    ((distance_km / URBAN_SPEED_KMH) * 60.0).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: Coordinates = (48.8566, 2.3522);
    const LONDON: Coordinates = (51.5074, -0.1278);

    #[test]
    fn test_paris_to_london() {
        let distance = distance_between(PARIS, LONDON);
        assert!((340.0..=350.0).contains(&distance), "got {}", distance);
    }

    #[test]
    fn test_distance_is_zero_for_same_point() {
        for point in [PARIS, LONDON, (0.0, 0.0), (-33.8688, 151.2093)] {
            assert_eq!(distance_between(point, point), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (PARIS, LONDON),
            ((12.9716, 77.5946), (13.0827, 80.2707)),
            ((-33.8688, 151.2093), (40.7128, -74.0060)),
        ];
        for (a, b) in pairs {
            assert_eq!(distance_between(a, b), distance_between(b, a));
        }
    }

    #[test]
    fn test_travel_minutes_rounds_down() {
        assert_eq!(travel_minutes(0.0), 0);
        assert_eq!(travel_minutes(10.0), 30);
        assert_eq!(travel_minutes(1.0), 3);
        assert_eq!(travel_minutes(0.33), 0);
        assert_eq!(travel_minutes(6.99), 20);
    }
}
