//! Places Service
//!
//! Points of interest and restaurants from a Travel Advisor style API
//! (RapidAPI). Every lookup is two calls: resolve the city to a location id,
//! then list attractions or restaurants for that id.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::place::{Category, Place};
use crate::services::category_service::{category_for_interest, category_of};

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn get_attractions(&self, city: &str) -> ServiceResult<Vec<Place>>;

    async fn get_restaurants(&self, city: &str) -> ServiceResult<Vec<Place>>;

    /// Places matching a free-text activity type such as "museums" or "food"
    async fn get_places(&self, city: &str, activity_type: &str) -> ServiceResult<Vec<Place>> {
        match category_for_interest(activity_type) {
            Some(Category::Dining) => self.get_restaurants(city).await,
            Some(category) => Ok(self
                .get_attractions(city)
                .await?
                .into_iter()
                .filter(|place| category_of(place) == category)
                .collect()),
            None => self.get_attractions(city).await,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct LocationSearchItem {
    result_object: Option<ResultObject>,
}

#[derive(Debug, Deserialize)]
struct ResultObject {
    location_id: String,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    location_string: Option<String>,
    #[serde(default)]
    rating: Option<serde_json::Value>,
    #[serde(default)]
    price_level: Option<String>,
}

impl RawPlace {
    fn into_place(self) -> Option<Place> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let rating = match self.rating {
            Some(serde_json::Value::Number(n)) => n.as_f64().map(|f| f as f32),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        Some(Place {
            name,
            location: self
                .address
                .or(self.location_string)
                .unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            rating,
            price_level: self.price_level.filter(|p| !p.is_empty()),
            category: None,
        })
    }
}

fn parse_location_id(body: &str) -> ServiceResult<Option<String>> {
    let response: ListResponse<LocationSearchItem> = serde_json::from_str(body)?;
    Ok(response
        .data
        .into_iter()
        .find_map(|item| item.result_object.map(|r| r.location_id)))
}

fn parse_places(body: &str) -> ServiceResult<Vec<Place>> {
    let response: ListResponse<RawPlace> = serde_json::from_str(body)?;
    Ok(response
        .data
        .into_iter()
        .filter_map(RawPlace::into_place)
        .collect())
}

pub struct TravelAdvisorClient {
    http_client: reqwest::Client,
    base_url: String,
    host: String,
    api_key: String,
}

impl TravelAdvisorClient {
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
    ) -> ServiceResult<Self> {
        let api_key = api_key.ok_or_else(|| ServiceError::Config("RAPIDAPI_KEY".to_string()))?;
        let host = url::Url::parse(base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "travel-advisor.p.rapidapi.com".to_string());

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            api_key,
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> ServiceResult<String> {
        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, path))
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream {
                service: "places",
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn location_id(&self, city: &str) -> ServiceResult<Option<String>> {
        let body = self.get_json("/locations/search", &[("query", city)]).await?;
        parse_location_id(&body)
    }

    async fn list(&self, city: &str, path: &str) -> ServiceResult<Vec<Place>> {
        let Some(location_id) = self.location_id(city).await? else {
            log::warn!("No location id found for {}", city);
            return Ok(Vec::new());
        };
        let body = self
            .get_json(path, &[("location_id", location_id.as_str()), ("limit", "30")])
            .await?;
        parse_places(&body)
    }
}

#[async_trait]
impl PlacesProvider for TravelAdvisorClient {
    async fn get_attractions(&self, city: &str) -> ServiceResult<Vec<Place>> {
        self.list(city, "/attractions/list").await
    }

    async fn get_restaurants(&self, city: &str) -> ServiceResult<Vec<Place>> {
        let restaurants = self.list(city, "/restaurants/list").await?;
        Ok(restaurants
            .into_iter()
            .map(|place| place.with_category(Category::Dining))
            .collect())
    }
}
