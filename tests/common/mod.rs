#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{body::MessageBody, middleware::Logger, web, App};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::collections::HashSet;
use std::sync::Arc;

use trip_planner_api::config::PlannerConfig;
use trip_planner_api::db::session_store::InMemorySessionStore;
use trip_planner_api::errors::{ServiceError, ServiceResult};
use trip_planner_api::models::itinerary::TripPlan;
use trip_planner_api::models::place::{Category, Coordinates, Place};
use trip_planner_api::models::weather::WeatherDay;
use trip_planner_api::routes;
use trip_planner_api::services::geocoding_service::{CachedGeocoder, Geocoder};
use trip_planner_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_planner_api::services::itinerary_optimizer::{AlternativesCatalog, ItineraryOptimizer};
use trip_planner_api::services::llm_service::NarrativeProvider;
use trip_planner_api::services::places_service::PlacesProvider;
use trip_planner_api::services::route_optimization_service::RouteOptimizationService;
use trip_planner_api::services::weather_service::WeatherProvider;
use trip_planner_api::state::AppState;

/// Spreads stops around central Tokyo, one small step per character of the query
pub struct GridGeocoder;

#[async_trait]
impl Geocoder for GridGeocoder {
    async fn search(&self, query: &str) -> ServiceResult<Option<Coordinates>> {
        if query.to_lowercase().starts_with("nowhere") {
            return Ok(None);
        }
        let n = query.len() as f64;
        Ok(Some((35.68 + n * 0.001, 139.76 - n * 0.0007)))
    }
}

pub struct MockWeather;

#[async_trait]
impl WeatherProvider for MockWeather {
    async fn get_forecast(&self, _city: &str, days: u32) -> ServiceResult<Vec<WeatherDay>> {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        Ok((0..days.min(14))
            .map(|i| WeatherDay {
                date: start.checked_add_days(Days::new(u64::from(i))).unwrap(),
                condition: if i % 2 == 0 { "Sunny" } else { "Patchy rain possible" }.to_string(),
                avg_temp_c: 18.0,
                avg_temp_f: 64.4,
                min_temp_c: 12.0,
                max_temp_c: 23.0,
                min_temp_f: 53.6,
                max_temp_f: 73.4,
                chance_of_rain: if i % 2 == 0 { 5 } else { 70 },
            })
            .collect())
    }
}

pub struct FailingWeather;

#[async_trait]
impl WeatherProvider for FailingWeather {
    async fn get_forecast(&self, _city: &str, _days: u32) -> ServiceResult<Vec<WeatherDay>> {
        Err(ServiceError::Upstream {
            service: "weather",
            status: 503,
        })
    }
}

/// Restaurant names deliberately avoid any dining keyword
pub struct MockPlaces;

#[async_trait]
impl PlacesProvider for MockPlaces {
    async fn get_attractions(&self, _city: &str) -> ServiceResult<Vec<Place>> {
        Ok(vec![
            Place::new("Senso-ji Temple", "Asakusa", "Ancient Buddhist temple").with_rating(4.7),
            Place::new("Tokyo National Museum", "Ueno", "").with_rating(4.6),
            Place::new("Imperial Palace", "Chiyoda", "").with_rating(4.5),
            Place::new("Mori Art Museum", "Roppongi", "").with_rating(4.4),
            Place::new("Ueno Park", "Ueno", "Cherry blossoms").with_rating(4.3),
            Place::new("Tokyo Skytree", "Sumida", "Observation deck").with_rating(4.2),
            Place::new("Meiji Jingu", "Shibuya", "Shinto shrine").with_rating(4.1),
            Place::new("Ameyoko Market", "Ueno", "").with_rating(4.0),
        ])
    }

    async fn get_restaurants(&self, _city: &str) -> ServiceResult<Vec<Place>> {
        Ok(vec![
            Place::new("Sushi Dai", "Tsukiji", "").with_rating(4.8),
            Place::new("Ichiran Shibuya", "Shibuya", "").with_rating(4.5),
            Place::new("Tempura Kondo", "Ginza", "").with_rating(4.4),
            Place::new("Afuri Harajuku", "Harajuku", "").with_rating(4.2),
        ])
    }
}

pub struct MockNarrative;

#[async_trait]
impl NarrativeProvider for MockNarrative {
    async fn complete(&self, _prompt: &str) -> ServiceResult<String> {
        Ok(r#"Here is the plan: {"overview": "Temples, museums and ramen",
            "days": {"day_1": {"theme": "Old Tokyo", "tips": ["Go early to Asakusa"]}}}"#
            .to_string())
    }
}

pub struct ProseNarrative;

#[async_trait]
impl NarrativeProvider for ProseNarrative {
    async fn complete(&self, _prompt: &str) -> ServiceResult<String> {
        Ok("Day 1 is lovely. Day 2 is lovelier.".to_string())
    }
}

pub fn planner_config(extended: bool) -> PlannerConfig {
    PlannerConfig {
        extended_conversation: extended,
        ..PlannerConfig::default()
    }
}

pub fn generator(config: &PlannerConfig) -> ItineraryGenerator {
    let geocoder = Arc::new(CachedGeocoder::new(Arc::new(GridGeocoder)));
    let route_optimizer = Arc::new(RouteOptimizationService::new(geocoder));
    let optimizer = Arc::new(ItineraryOptimizer::new(
        AlternativesCatalog::default(),
        config.max_per_category,
        route_optimizer,
    ));
    ItineraryGenerator::new(optimizer, config.clone())
}

pub fn full_generator(config: &PlannerConfig) -> ItineraryGenerator {
    generator(config)
        .with_weather(Arc::new(MockWeather))
        .with_places(Arc::new(MockPlaces))
        .with_narrative(Arc::new(MockNarrative))
}

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(planner_config(false))
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        let planner = Arc::new(full_generator(&config));
        let state = AppState::new(
            planner,
            Some(Arc::new(MockWeather)),
            Arc::new(InMemorySessionStore::new()),
            config,
        );
        Self {
            state: web::Data::new(state),
        }
    }

    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    }
}

/// Checks the trip-wide and per-day guarantees of an optimized plan
pub fn assert_plan_invariants(plan: &TripPlan, max_per_category: usize) {
    let mut seen = HashSet::new();
    for day in &plan.days {
        for activity in &day.activities {
            assert!(
                seen.insert(activity.place.identity_key()),
                "{} scheduled twice",
                activity.place.name
            );
        }
        for (category, count) in day.category_counts() {
            assert!(
                count <= max_per_category,
                "day {} has {} {} stops",
                day.day,
                count,
                category
            );
        }
    }
}

pub fn dining_count(plan: &TripPlan, day: usize) -> usize {
    plan.days[day]
        .activities
        .iter()
        .filter(|a| a.category == Category::Dining)
        .count()
}

pub fn cultural_count(plan: &TripPlan, day: usize) -> usize {
    plan.days[day]
        .activities
        .iter()
        .filter(|a| a.category == Category::Cultural)
        .count()
}
