use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::errors::{ServiceError, ServiceResult};
use crate::models::itinerary::{DayPlan, DraftItinerary, Narrative, TripPlan};
use crate::models::place::{Category, Place};
use crate::models::session::{BudgetLevel, Preferences};
use crate::models::weather::{WeatherDay, WeatherOutlook};
use crate::services::category_service::{category_for_interest, category_of};
use crate::services::itinerary_optimizer::ItineraryOptimizer;
use crate::services::llm_service::{parse_narrative, NarrativeProvider};
use crate::services::places_service::PlacesProvider;
use crate::services::weather_service::{summarize, WeatherProvider};

/// Everything needed to build one trip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    pub duration: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub budget: BudgetLevel,
    #[serde(default)]
    pub include_food: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl TripRequest {
    pub fn from_preferences(preferences: &Preferences) -> ServiceResult<Self> {
        let destination = preferences
            .location
            .clone()
            .ok_or_else(|| ServiceError::InvalidRequest("destination is missing".to_string()))?;
        let duration = preferences
            .duration
            .ok_or_else(|| ServiceError::InvalidRequest("duration is missing".to_string()))?;

        Ok(Self {
            destination,
            duration,
            interests: preferences.interests.clone(),
            budget: preferences.budget.unwrap_or_default(),
            include_food: preferences.include_food,
            start_date: preferences.start_date,
        })
    }

    pub fn validate(&self, max_trip_days: u32) -> ServiceResult<()> {
        if self.destination.trim().is_empty() {
            return Err(ServiceError::InvalidRequest("Destination is required".to_string()));
        }
        if self.duration == 0 || self.duration > max_trip_days {
            return Err(ServiceError::InvalidRequest(format!(
                "Duration must be between 1 and {} days",
                max_trip_days
            )));
        }
        Ok(())
    }
}

#[async_trait]
pub trait TripPlanner: Send + Sync {
    async fn plan(&self, request: &TripRequest) -> ServiceResult<TripPlan>;
}

fn rating_of(place: &Place) -> f32 {
    place.rating.unwrap_or(0.0)
}

/// Preference score of an attraction for one day
fn day_score(category: Category, interests: &HashSet<Category>, outlook: Option<WeatherOutlook>) -> u8 {
    let mut score = 0;
    if interests.contains(&category) {
        score += 2;
    }
    match outlook {
        Some(WeatherOutlook::Indoor | WeatherOutlook::Snow) if category.is_indoor() => score += 1,
        Some(WeatherOutlook::Outdoor | WeatherOutlook::Water) if category == Category::Nature => {
            score += 1
        }
        _ => {}
    }
    score
}

/// Per-day candidate lists, before deduplication and routing.
///
/// Attractions are ranked by rating, then by fit with the interests and the
/// day's weather; places already drafted on earlier days are only reused when
/// nothing fresh is left, leaving the optimizer to swap them out. Restaurants
/// are always scheduled as dining, whatever their names say.
pub fn build_candidates(
    attractions: &[Place],
    restaurants: &[Place],
    forecast: &[WeatherDay],
    request: &TripRequest,
    activities_per_day: usize,
) -> DraftItinerary {
    let interests: HashSet<Category> = request
        .interests
        .iter()
        .filter_map(|i| category_for_interest(i))
        .collect();

    let mut by_rating: Vec<(&Place, Category)> =
        attractions.iter().map(|p| (p, category_of(p))).collect();
    by_rating.sort_by(|a, b| rating_of(b.0).total_cmp(&rating_of(a.0)));

    let mut restaurants_by_rating: Vec<&Place> = restaurants.iter().collect();
    restaurants_by_rating.sort_by(|a, b| rating_of(b).total_cmp(&rating_of(a)));

    let mut drafted: HashSet<String> = HashSet::new();
    let mut draft: DraftItinerary = BTreeMap::new();

    for day in 1..=request.duration {
        let outlook = forecast.get(day as usize - 1).map(WeatherDay::outlook);

        let mut ranked = by_rating.clone();
        ranked.sort_by_key(|(_, category)| std::cmp::Reverse(day_score(*category, &interests, outlook)));

        let (fresh, reused): (Vec<_>, Vec<_>) = ranked
            .into_iter()
            .partition(|(place, _)| !drafted.contains(&place.identity_key()));

        let mut activities: Vec<Place> = fresh
            .into_iter()
            .chain(reused)
            .take(activities_per_day)
            .map(|(place, _)| place.clone())
            .collect();

        if request.include_food && !restaurants_by_rating.is_empty() {
            let restaurant = restaurants_by_rating
                .iter()
                .find(|r| !drafted.contains(&r.identity_key()))
                .copied()
                .unwrap_or(restaurants_by_rating[(day as usize - 1) % restaurants_by_rating.len()]);
            activities.push(restaurant.clone().with_category(Category::Dining));
        }

        for place in &activities {
            drafted.insert(place.identity_key());
        }
        draft.insert(day, activities);
    }

    draft
}

fn build_prompt(request: &TripRequest, weather_summary: &str, attractions: &[Place], restaurants: &[Place], days: &[DayPlan]) -> String {
    let top = |places: &[Place]| {
        places
            .iter()
            .take(5)
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut prompt = format!(
        "Enrich this {}-day travel itinerary for {}. Budget level: {}. ",
        request.duration,
        request.destination,
        request.budget.as_str()
    );
    if !request.interests.is_empty() {
        prompt.push_str(&format!("The traveler is interested in: {}. ", request.interests.join(", ")));
    }
    prompt.push_str(&format!("{}\n", weather_summary));
    if !attractions.is_empty() {
        prompt.push_str(&format!("Top attractions: {}\n", top(attractions)));
    }
    if !restaurants.is_empty() {
        prompt.push_str(&format!("Top restaurants: {}\n", top(restaurants)));
    }

    prompt.push_str("Planned stops by day:\n");
    for day in days {
        let stops: Vec<&str> = day.activities.iter().map(|a| a.place.name.as_str()).collect();
        prompt.push_str(&format!(
            "day_{}: {} (about {} minutes of travel)\n",
            day.day,
            stops.join(" -> "),
            day.total_travel_minutes()
        ));
    }
    prompt.push_str(
        "\nFor each day give a short theme and two or three local tips, including \
         alternatives for bad weather, plus a one-paragraph overview of the trip.",
    );
    prompt
}

pub struct ItineraryGenerator {
    weather: Option<Arc<dyn WeatherProvider>>,
    places: Option<Arc<dyn PlacesProvider>>,
    narrative: Option<Arc<dyn NarrativeProvider>>,
    optimizer: Arc<ItineraryOptimizer>,
    config: PlannerConfig,
}

impl ItineraryGenerator {
    pub fn new(optimizer: Arc<ItineraryOptimizer>, config: PlannerConfig) -> Self {
        Self {
            weather: None,
            places: None,
            narrative: None,
            optimizer,
            config,
        }
    }

    pub fn with_weather(mut self, weather: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_places(mut self, places: Arc<dyn PlacesProvider>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn with_narrative(mut self, narrative: Arc<dyn NarrativeProvider>) -> Self {
        self.narrative = Some(narrative);
        self
    }

    async fn forecast(&self, request: &TripRequest) -> Vec<WeatherDay> {
        let Some(weather) = &self.weather else {
            return Vec::new();
        };
        weather
            .get_forecast(&request.destination, request.duration)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Weather unavailable for {}: {}", request.destination, e);
                Vec::new()
            })
    }

    async fn candidates(&self, request: &TripRequest) -> (Vec<Place>, Vec<Place>) {
        let Some(places) = &self.places else {
            return (Vec::new(), Vec::new());
        };

        let city = request.destination.as_str();
        let restaurants = async {
            if request.include_food {
                places.get_restaurants(city).await
            } else {
                Ok(Vec::new())
            }
        };
        let (attractions, restaurants) = futures::join!(places.get_attractions(city), restaurants);

        let attractions = attractions.unwrap_or_else(|e| {
            log::warn!("Attractions unavailable for {}: {}", city, e);
            Vec::new()
        });
        let restaurants = restaurants.unwrap_or_else(|e| {
            log::warn!("Restaurants unavailable for {}: {}", city, e);
            Vec::new()
        });
        (attractions, restaurants)
    }

    async fn enrich(&self, prompt: &str) -> Option<Narrative> {
        let provider = self.narrative.as_ref()?;
        match provider.complete(prompt).await {
            Ok(text) => {
                let narrative = parse_narrative(&text);
                if narrative.is_none() {
                    log::warn!("Narrative was not usable JSON; returning the structured plan");
                }
                narrative
            }
            Err(e) => {
                log::warn!("Narrative unavailable: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl TripPlanner for ItineraryGenerator {
    async fn plan(&self, request: &TripRequest) -> ServiceResult<TripPlan> {
        request.validate(self.config.max_trip_days)?;
        log::info!(
            "Generating a {}-day itinerary for {}",
            request.duration,
            request.destination
        );

        let (forecast, (attractions, restaurants)) =
            futures::join!(self.forecast(request), self.candidates(request));

        let draft = build_candidates(
            &attractions,
            &restaurants,
            &forecast,
            request,
            self.config.activities_per_day,
        );

        let mut days = self.optimizer.optimize(draft, &request.destination).await;
        for day in days.iter_mut() {
            if let Some(weather) = forecast.get(day.day as usize - 1) {
                day.weather_tip = Some(weather.outlook().tip().to_string());
                day.weather = Some(weather.clone());
            }
        }

        let weather_summary = summarize(&forecast);
        let prompt = build_prompt(request, &weather_summary, &attractions, &restaurants, &days);
        let narrative = self.enrich(&prompt).await;

        Ok(TripPlan {
            summary: format!("{}-day itinerary for {}", request.duration, request.destination),
            destination: request.destination.clone(),
            duration: request.duration,
            interests: request.interests.clone(),
            budget: request.budget,
            include_food: request.include_food,
            weather_summary,
            days,
            narrative,
        })
    }
}
