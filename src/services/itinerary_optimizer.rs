//! Itinerary Optimizer
//!
//! Turns per-day candidate lists into a trip without repeats: a place is
//! visited at most once across the whole trip, a day never holds more than
//! `max_per_category` stops of the same kind, and every day's stops are put
//! into a short walking/driving order.
//!
//! When a candidate has to go, the optimizer tries to swap in a place from a
//! curated per-category catalog before dropping it outright.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::ServiceResult;
use crate::models::itinerary::{DayPlan, DraftItinerary, ScheduledActivity};
use crate::models::place::{Category, Place};
use crate::services::category_service::category_of;
use crate::services::route_optimization_service::RouteOptimizationService;

#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    name: String,
    location: String,
    category: Category,
    /// Destination the entry belongs to; absent means any destination
    #[serde(default)]
    city: Option<String>,
}

#[derive(Debug, Clone)]
struct Alternative {
    /// Lowercase city names; empty serves every destination
    cities: Vec<String>,
    place: Place,
}

impl Alternative {
    /// `destination` is expected lowercase
    fn serves(&self, destination: &str) -> bool {
        self.cities.is_empty() || self.cities.iter().any(|city| destination.contains(city.as_str()))
    }
}

/// Curated substitutes keyed by category, tried in listed order. Entries are
/// tied to a destination so a trip never borrows another city's landmarks.
#[derive(Debug, Clone)]
pub struct AlternativesCatalog {
    places: HashMap<Category, Vec<Alternative>>,
}

impl Default for AlternativesCatalog {
    fn default() -> Self {
        let table: [(Category, &[(&str, &str)]); 5] = [
            (
                Category::Cultural,
                &[
                    ("ISKCON Temple", "Hare Krishna Hill, Rajajinagar"),
                    ("Bull Temple", "Basavanagudi"),
                    ("Bangalore Palace", "Palace Road"),
                    ("Tipu Sultan Summer Palace", "Albert Victor Road"),
                    ("St. Mary's Basilica", "Shivajinagar"),
                ],
            ),
            (
                Category::Nature,
                &[
                    ("Lalbagh Botanical Garden", "Lalbagh"),
                    ("Cubbon Park", "Cubbon Park"),
                    ("Bannerghatta National Park", "Bannerghatta Road"),
                    ("Ulsoor Lake", "Ulsoor"),
                    ("Hebbal Lake", "Hebbal"),
                ],
            ),
            (
                Category::Shopping,
                &[
                    ("Commercial Street", "Commercial Street"),
                    ("Brigade Road", "Brigade Road"),
                    ("UB City Mall", "Vittal Mallya Road"),
                    ("Phoenix Marketcity", "Whitefield"),
                    ("Mantri Square Mall", "Malleswaram"),
                ],
            ),
            (
                Category::Dining,
                &[
                    ("MTR Restaurant", "Lalbagh Road"),
                    ("Vidyarthi Bhavan", "Gandhi Bazaar"),
                    ("The Only Place", "Museum Road"),
                    ("Mavalli Tiffin Room", "Lalbagh Road"),
                    ("Koshy's", "St. Marks Road"),
                ],
            ),
            (
                Category::Entertainment,
                &[
                    ("Innovative Film City", "Bidadi"),
                    ("Wonderla Amusement Park", "Mysore Road"),
                    ("HAL Aerospace Museum", "Old Airport Road"),
                    ("National Gallery of Modern Art", "Palace Road"),
                    ("Visvesvaraya Industrial Museum", "Kasturba Road"),
                ],
            ),
        ];

        let cities = vec!["bangalore".to_string(), "bengaluru".to_string()];
        let places = table
            .iter()
            .map(|(category, entries)| {
                let places = entries
                    .iter()
                    .map(|(name, location)| Alternative {
                        cities: cities.clone(),
                        place: Place::new(name, location, ""),
                    })
                    .collect();
                (*category, places)
            })
            .collect();

        Self { places }
    }
}

impl AlternativesCatalog {
    pub fn empty() -> Self {
        Self {
            places: HashMap::new(),
        }
    }

    /// Load a catalog from a JSON array of `{name, location, category, city?}`
    pub fn from_json(json: &str) -> ServiceResult<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        let mut places: HashMap<Category, Vec<Alternative>> = HashMap::new();
        for entry in entries {
            let cities = entry
                .city
                .map(|city| city.trim().to_lowercase())
                .filter(|city| !city.is_empty())
                .into_iter()
                .collect();
            places.entry(entry.category).or_default().push(Alternative {
                cities,
                place: Place::new(&entry.name, &entry.location, ""),
            });
        }
        Ok(Self { places })
    }

    /// Built-in catalog, or the one at `path` when it loads cleanly
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path)
            .map_err(|e| crate::errors::ServiceError::Other(e.to_string()))
            .and_then(|json| Self::from_json(&json))
        {
            Ok(catalog) => {
                log::info!("Loaded alternatives catalog from {}", path);
                catalog
            }
            Err(e) => {
                log::warn!("Could not load alternatives from {}: {}. Using built-in list", path, e);
                Self::default()
            }
        }
    }

    /// Substitutes of `category` usable for a trip to `city`
    pub fn places_for(&self, city: &str, category: Category) -> impl Iterator<Item = &Place> + '_ {
        let destination = city.trim().to_lowercase();
        self.places
            .get(&category)
            .into_iter()
            .flatten()
            .filter(move |alt| alt.serves(&destination))
            .map(|alt| &alt.place)
    }
}

/// Per-day bookkeeping while activities are being accepted
#[derive(Default)]
struct DayTally {
    counts: HashMap<Category, usize>,
}

impl DayTally {
    fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    fn has(&self, category: Category) -> bool {
        self.count(category) > 0
    }

    fn record(&mut self, category: Category) {
        *self.counts.entry(category).or_insert(0) += 1;
    }
}

pub struct ItineraryOptimizer {
    catalog: AlternativesCatalog,
    max_per_category: usize,
    route_optimizer: Arc<RouteOptimizationService>,
}

impl ItineraryOptimizer {
    pub fn new(
        catalog: AlternativesCatalog,
        max_per_category: usize,
        route_optimizer: Arc<RouteOptimizationService>,
    ) -> Self {
        Self {
            catalog,
            max_per_category: max_per_category.max(1),
            route_optimizer,
        }
    }

    /// First catalog place of `category` that is unvisited, provided the day
    /// has not used that category yet
    fn alternative_place(
        &self,
        category: Category,
        city: &str,
        visited: &HashSet<String>,
        tally: &DayTally,
    ) -> Option<&Place> {
        if tally.has(category) {
            return None;
        }
        self.catalog
            .places_for(city, category)
            .find(|place| !visited.contains(&place.identity_key()))
    }

    /// Dedupe and diversify one day of a trip to `city`. `visited` spans the whole trip.
    pub fn optimize_day_activities(
        &self,
        activities: Vec<Place>,
        city: &str,
        visited: &mut HashSet<String>,
    ) -> Vec<ScheduledActivity> {
        let mut optimized = Vec::new();
        let mut tally = DayTally::default();

        for activity in activities {
            let place_id = activity.identity_key();
            let category = category_of(&activity);

            if visited.contains(&place_id) {
                match self.alternative_place(category, city, visited, &tally) {
                    Some(alternative) => {
                        let note = format!("Alternative to {} (previously visited)", activity.name);
                        visited.insert(alternative.identity_key());
                        tally.record(category);
                        optimized.push(
                            ScheduledActivity::new(alternative.clone(), category).with_note(note),
                        );
                    }
                    None => log::debug!("Dropping repeat visit to {}", activity.name),
                }
                continue;
            }

            if tally.count(category) >= self.max_per_category {
                let substitute = Category::SUBSTITUTABLE
                    .iter()
                    .filter(|alt| **alt != category)
                    .find_map(|alt| {
                        self.alternative_place(*alt, city, visited, &tally)
                            .map(|place| (*alt, place.clone()))
                    });

                match substitute {
                    Some((alt_category, alternative)) => {
                        visited.insert(alternative.identity_key());
                        tally.record(alt_category);
                        optimized.push(
                            ScheduledActivity::new(alternative, alt_category)
                                .with_note("Alternative activity for better variety".to_string()),
                        );
                    }
                    None => log::debug!(
                        "Dropping {}: day already has {} {} stops",
                        activity.name,
                        self.max_per_category,
                        category
                    ),
                }
                continue;
            }

            visited.insert(place_id);
            tally.record(category);
            optimized.push(ScheduledActivity::new(activity, category));
        }

        optimized
    }

    /// Optimize the full itinerary, one day at a time in ascending order
    pub async fn optimize(&self, itinerary: DraftItinerary, city: &str) -> Vec<DayPlan> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut days = Vec::with_capacity(itinerary.len());

        for (day, activities) in itinerary {
            let accepted = self.optimize_day_activities(activities, city, &mut visited);
            let ordered = self.route_optimizer.order_route(accepted, city).await;
            days.push(DayPlan::new(day, ordered));
        }

        days
    }
}
