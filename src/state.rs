use mongodb::Client;
use std::sync::Arc;

use crate::config::{AppConfig, PlannerConfig};
use crate::db::mongo::create_mongo_client;
use crate::db::session_store::{InMemorySessionStore, MongoSessionStore, SessionStore};
use crate::errors::ServiceResult;
use crate::services::conversation_service::ConversationService;
use crate::services::geocoding_service::{CachedGeocoder, NominatimGeocoder};
use crate::services::itinerary_generation_service::{ItineraryGenerator, TripPlanner};
use crate::services::itinerary_optimizer::{AlternativesCatalog, ItineraryOptimizer};
use crate::services::llm_service::{GroqClient, NarrativeProvider};
use crate::services::places_service::{PlacesProvider, TravelAdvisorClient};
use crate::services::route_optimization_service::RouteOptimizationService;
use crate::services::weather_service::{WeatherApiClient, WeatherProvider};

/// Which collaborators were configured at startup
#[derive(Debug, Clone, Default)]
pub struct Collaborators {
    pub weather: bool,
    pub places: bool,
    pub narrative: bool,
}

/// Shared handler state, registered once as `web::Data<AppState>`
pub struct AppState {
    pub conversation: ConversationService,
    pub planner: Arc<dyn TripPlanner>,
    pub weather: Option<Arc<dyn WeatherProvider>>,
    pub mongo: Option<Arc<Client>>,
    pub collaborators: Collaborators,
    pub planner_config: PlannerConfig,
}

impl AppState {
    pub fn new(
        planner: Arc<dyn TripPlanner>,
        weather: Option<Arc<dyn WeatherProvider>>,
        store: Arc<dyn SessionStore>,
        planner_config: PlannerConfig,
    ) -> Self {
        Self {
            conversation: ConversationService::new(planner.clone(), store, planner_config.clone()),
            planner,
            collaborators: Collaborators {
                weather: weather.is_some(),
                ..Collaborators::default()
            },
            weather,
            mongo: None,
            planner_config,
        }
    }

    /// Wire the production collaborators. Missing API keys disable the
    /// matching collaborator instead of failing startup.
    pub async fn from_config(config: &AppConfig) -> ServiceResult<Self> {
        let http_client = config.http_client();

        let geocoder = Arc::new(CachedGeocoder::new(Arc::new(NominatimGeocoder::new(
            http_client.clone(),
            &config.geocoder_url,
        ))));
        let route_optimizer = Arc::new(RouteOptimizationService::new(geocoder));
        let catalog = AlternativesCatalog::load(config.planner.alternatives_path.as_deref());
        let optimizer = Arc::new(ItineraryOptimizer::new(
            catalog,
            config.planner.max_per_category,
            route_optimizer,
        ));

        let weather: Option<Arc<dyn WeatherProvider>> = match WeatherApiClient::new(
            http_client.clone(),
            &config.weather_api_url,
            config.weather_api_key.clone(),
        ) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                log::warn!("Weather forecasts disabled: {}", e);
                None
            }
        };

        let places: Option<Arc<dyn PlacesProvider>> = match TravelAdvisorClient::new(
            http_client.clone(),
            &config.places_api_url,
            config.rapidapi_key.clone(),
        ) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                log::warn!("Places lookups disabled: {}", e);
                None
            }
        };

        let narrative: Option<Arc<dyn NarrativeProvider>> = match GroqClient::new(
            http_client,
            &config.groq_api_url,
            config.groq_api_key.clone(),
            &config.groq_model,
        ) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                log::warn!("Narrative enrichment disabled: {}", e);
                None
            }
        };

        let collaborators = Collaborators {
            weather: weather.is_some(),
            places: places.is_some(),
            narrative: narrative.is_some(),
        };

        let mut generator = ItineraryGenerator::new(optimizer, config.planner.clone());
        if let Some(weather) = &weather {
            generator = generator.with_weather(weather.clone());
        }
        if let Some(places) = places {
            generator = generator.with_places(places);
        }
        if let Some(narrative) = narrative {
            generator = generator.with_narrative(narrative);
        }
        let planner: Arc<dyn TripPlanner> = Arc::new(generator);

        let (store, mongo) = match &config.mongodb_uri {
            Some(uri) => {
                let client = create_mongo_client(uri).await?;
                let store: Arc<dyn SessionStore> = Arc::new(MongoSessionStore::new(client.clone()));
                (store, Some(client))
            }
            None => {
                log::info!("MONGODB_URI not set, keeping sessions in memory");
                let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
                (store, None)
            }
        };

        let mut state = Self::new(planner, weather, store, config.planner.clone());
        state.mongo = mongo;
        state.collaborators = collaborators;
        Ok(state)
    }
}
