//! Route Optimization Service
//!
//! Orders the stops of a single day so the traveller does not zig-zag across
//! the city, then annotates each stop with the estimated travel time to the
//! next one.
//!
//! ## Policy
//! - Stops are geocoded through the shared [`CachedGeocoder`]
//! - Resolved stops are ordered with a nearest-neighbor heuristic starting at
//!   the first resolved stop (greedy, O(n²), not an optimal tour)
//! - Stops that cannot be geocoded keep their relative order and are appended
//!   after the resolved route

use futures::future::join_all;
use std::sync::Arc;

use crate::models::itinerary::ScheduledActivity;
use crate::models::place::Coordinates;
use crate::services::distance_service::{distance_between, travel_minutes};
use crate::services::geocoding_service::CachedGeocoder;

/// Visiting order over `points`, as indices, starting at index 0.
/// Ties go to the point that appears first.
pub fn nearest_neighbor_order(points: &[Coordinates]) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut visited = vec![false; points.len()];
    let mut route = Vec::with_capacity(points.len());
    let mut current = 0;
    visited[0] = true;
    route.push(0);

    while route.len() < points.len() {
        let mut nearest: Option<(usize, f64)> = None;

        for (idx, coords) in points.iter().enumerate() {
            if visited[idx] {
                continue;
            }
            let distance = distance_between(points[current], *coords);
            match nearest {
                Some((_, best)) if distance >= best => {}
                _ => nearest = Some((idx, distance)),
            }
        }

        match nearest {
            Some((idx, _)) => {
                visited[idx] = true;
                route.push(idx);
                current = idx;
            }
            None => break,
        }
    }

    route
}

/// Fill `travel_minutes_to_next` for every consecutive pair with coordinates
pub fn annotate_travel_times(activities: &mut [ScheduledActivity]) {
    for i in 0..activities.len() {
        let next = activities.get(i + 1).and_then(|a| a.coordinates);
        activities[i].travel_minutes_to_next = match (activities[i].coordinates, next) {
            (Some(from), Some(to)) => Some(travel_minutes(distance_between(from, to))),
            _ => None,
        };
    }
}

pub struct RouteOptimizationService {
    geocoder: Arc<CachedGeocoder>,
}

impl RouteOptimizationService {
    pub fn new(geocoder: Arc<CachedGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Optimize the order of activities for a single day
    pub async fn order_route(
        &self,
        activities: Vec<ScheduledActivity>,
        city: &str,
    ) -> Vec<ScheduledActivity> {
        if activities.is_empty() {
            return activities;
        }

        let lookups = activities.iter().map(|activity| {
            let query = if activity.place.location.trim().is_empty() {
                activity.place.name.clone()
            } else {
                activity.place.location.clone()
            };
            async move { self.geocoder.resolve(&query, city).await }
        });
        let coordinates = join_all(lookups).await;

        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for (mut activity, coords) in activities.into_iter().zip(coordinates) {
            activity.coordinates = coords;
            if coords.is_some() {
                resolved.push(activity);
            } else {
                unresolved.push(activity);
            }
        }

        let mut ordered = if resolved.len() >= 2 {
            let points: Vec<Coordinates> =
                resolved.iter().filter_map(|a| a.coordinates).collect();
            let order = nearest_neighbor_order(&points);
            let mut slots: Vec<Option<ScheduledActivity>> =
                resolved.into_iter().map(Some).collect();
            order
                .into_iter()
                .filter_map(|idx| slots[idx].take())
                .collect::<Vec<_>>()
        } else {
            resolved
        };

        if !unresolved.is_empty() {
            log::debug!(
                "{} stop(s) in {} could not be geocoded; keeping them at the end",
                unresolved.len(),
                city
            );
        }
        ordered.extend(unresolved);

        annotate_travel_times(&mut ordered);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceResult;
    use crate::models::place::{Category, Place};
    use crate::services::geocoding_service::Geocoder;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct TableGeocoder(HashMap<String, Coordinates>);

    #[async_trait]
    impl Geocoder for TableGeocoder {
        async fn search(&self, query: &str) -> ServiceResult<Option<Coordinates>> {
            let place = query.split(',').next().unwrap_or_default().trim();
            Ok(self.0.get(place).copied())
        }
    }

    fn stop(name: &str) -> ScheduledActivity {
        ScheduledActivity::new(Place::new(name, name, ""), Category::Other)
    }

    fn service(table: &[(&str, Coordinates)]) -> RouteOptimizationService {
        let table = table.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let geocoder = CachedGeocoder::new(Arc::new(TableGeocoder(table)));
        RouteOptimizationService::new(Arc::new(geocoder))
    }

    fn names(stops: &[ScheduledActivity]) -> Vec<&str> {
        stops.iter().map(|s| s.place.name.as_str()).collect()
    }

    #[test]
    fn test_nearest_neighbor_is_greedy() {
        // B is closest to A, C is farthest; greedy keeps A, B, C
        let points = [(0.0, 0.0), (0.0, 0.01), (0.0, 0.05)];
        assert_eq!(nearest_neighbor_order(&points), vec![0, 1, 2]);

        // From A the nearest is C, then B
        let points = [(0.0, 0.0), (0.0, 0.05), (0.0, 0.01)];
        assert_eq!(nearest_neighbor_order(&points), vec![0, 2, 1]);
    }

    #[test]
    fn test_nearest_neighbor_ties_keep_input_order() {
        let points = [(0.0, 0.0), (0.0, 0.01), (0.0, -0.01)];
        assert_eq!(nearest_neighbor_order(&points), vec![0, 1, 2]);
        assert!(nearest_neighbor_order(&[]).is_empty());
    }

    #[actix_rt::test]
    async fn test_unresolved_stops_are_appended() {
        let service = service(&[
            ("A", (12.9716, 77.5946)),
            ("C", (12.9720, 77.5950)),
            ("B", (13.0500, 77.6500)),
        ]);
        let stops = vec![stop("A"), stop("X"), stop("B"), stop("Y"), stop("C")];

        let ordered = service.order_route(stops, "Bangalore").await;

        assert_eq!(names(&ordered), vec!["A", "C", "B", "X", "Y"]);
        assert!(ordered[0].travel_minutes_to_next.is_some());
        assert!(ordered[1].travel_minutes_to_next.is_some());
        assert_eq!(ordered[2].travel_minutes_to_next, None);
        assert_eq!(ordered[4].travel_minutes_to_next, None);
    }

    #[actix_rt::test]
    async fn test_travel_time_uses_urban_speed() {
        // 0.09 degrees of latitude is roughly 10 km
        let service = service(&[("A", (0.0, 0.0)), ("B", (0.09, 0.0))]);
        let ordered = service.order_route(vec![stop("A"), stop("B")], "").await;
        let expected = travel_minutes(distance_between((0.0, 0.0), (0.09, 0.0)));
        assert_eq!(ordered[0].travel_minutes_to_next, Some(expected));
        assert_eq!(expected, 30);
    }
}
