use std::{env, time::Duration};

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const HTTP_TIMEOUT_SECS: u64 = 10;
const MAX_PER_CATEGORY: usize = 2;
const ACTIVITIES_PER_DAY: usize = 3;
const MAX_TRIP_DAYS: u32 = 30;

const WEATHER_API_URL: &str = "http://api.weatherapi.com/v1";
const PLACES_API_URL: &str = "https://travel-advisor.p.rapidapi.com";
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "mixtral-8x7b-32768";
const GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Knobs for the itinerary build that do not involve any network access.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Same-category cap per day
    pub max_per_category: usize,
    /// Attractions drawn per day before the optimizer runs
    pub activities_per_day: usize,
    /// Upper bound accepted for the trip duration question
    pub max_trip_days: u32,
    /// Ask the transport and food questions after interests
    pub extended_conversation: bool,
    /// Optional JSON file replacing the built-in alternatives catalog
    pub alternatives_path: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_per_category: MAX_PER_CATEGORY,
            activities_per_day: ACTIVITIES_PER_DAY,
            max_trip_days: MAX_TRIP_DAYS,
            extended_conversation: false,
            alternatives_path: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub weather_api_key: Option<String>,
    pub weather_api_url: String,
    pub rapidapi_key: Option<String>,
    pub places_api_url: String,
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,
    pub groq_model: String,
    pub geocoder_url: String,
    pub http_timeout: Duration,
    pub planner: PlannerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongodb_uri: None,
            weather_api_key: None,
            weather_api_url: WEATHER_API_URL.to_string(),
            rapidapi_key: None,
            places_api_url: PLACES_API_URL.to_string(),
            groq_api_key: None,
            groq_api_url: GROQ_API_URL.to_string(),
            groq_model: GROQ_MODEL.to_string(),
            geocoder_url: GEOCODER_URL.to_string(),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            planner: PlannerConfig::default(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    var(name).and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Create config from environment variables or use defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let planner_defaults = defaults.planner.clone();

        let planner = PlannerConfig {
            max_per_category: parsed("MAX_PER_CATEGORY", planner_defaults.max_per_category)
                .max(1),
            activities_per_day: parsed(
                "ACTIVITIES_PER_DAY",
                planner_defaults.activities_per_day,
            )
            .max(1),
            max_trip_days: parsed("MAX_TRIP_DAYS", planner_defaults.max_trip_days).max(1),
            extended_conversation: parsed(
                "EXTENDED_CONVERSATION",
                planner_defaults.extended_conversation,
            ),
            alternatives_path: var("ALTERNATIVES_PATH"),
        };

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT", defaults.port),
            mongodb_uri: var("MONGODB_URI"),
            weather_api_key: var("WEATHER_API_KEY"),
            weather_api_url: var("WEATHER_API_URL").unwrap_or(defaults.weather_api_url),
            rapidapi_key: var("RAPIDAPI_KEY"),
            places_api_url: var("PLACES_API_URL").unwrap_or(defaults.places_api_url),
            groq_api_key: var("GROQ_API_KEY"),
            groq_api_url: var("GROQ_API_URL").unwrap_or(defaults.groq_api_url),
            groq_model: var("GROQ_MODEL").unwrap_or(defaults.groq_model),
            geocoder_url: var("GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            http_timeout: Duration::from_secs(parsed("HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS)),
            planner,
        }
    }

    /// Shared outbound client; every collaborator call is bounded by `http_timeout`.
    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent("TravelPlanner/1.0")
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            })
    }
}
