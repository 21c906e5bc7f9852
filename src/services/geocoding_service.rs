//! Geocoding Service
//!
//! Resolves free-text place descriptions to coordinates through an
//! OpenStreetMap Nominatim compatible endpoint. Successful lookups are kept in
//! a process-wide cache so the same stop is never looked up twice.

use async_trait::async_trait;
use serde::Deserialize;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::errors::{ServiceError, ServiceResult};
use crate::models::place::Coordinates;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` means the lookup worked but found nothing
    async fn search(&self, query: &str) -> ServiceResult<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

pub struct NominatimGeocoder {
    http_client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(http_client: reqwest::Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.to_string(),
        }
    }
}

fn parse_first_result(results: &[NominatimResult]) -> Option<Coordinates> {
    let first = results.first()?;
    let lat = first.lat.trim().parse::<f64>().ok()?;
    let lon = first.lon.trim().parse::<f64>().ok()?;
    Some((lat, lon))
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> ServiceResult<Option<Coordinates>> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream {
                service: "geocoder",
                status: response.status().as_u16(),
            });
        }

        let results: Vec<NominatimResult> = response.json().await?;
        Ok(parse_first_result(&results))
    }
}

/// Cache-aside wrapper; concurrent misses may both hit the network and the
/// last write wins, which is harmless for idempotent lookups.
pub struct CachedGeocoder {
    inner: Arc<dyn Geocoder>,
    cache: RwLock<HashMap<String, Coordinates>>,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn query_for(place: &str, city: &str) -> String {
        if city.trim().is_empty() {
            place.trim().to_string()
        } else {
            format!("{}, {}", place.trim(), city.trim())
        }
    }

    /// Coordinates for `place` inside `city`, or `None` when unavailable
    pub async fn resolve(&self, place: &str, city: &str) -> Option<Coordinates> {
        if place.trim().is_empty() {
            return None;
        }

        let query = Self::query_for(place, city);
        let key = query.to_lowercase();

        if let Ok(cache) = self.cache.read() {
            if let Some(coords) = cache.get(&key) {
                return Some(*coords);
            }
        }

        match self.inner.search(&query).await {
            Ok(Some(coords)) => {
                if let Ok(mut cache) = self.cache.write() {
                    cache.insert(key, coords);
                }
                Some(coords)
            }
            Ok(None) => {
                log::debug!("No geocoding results for '{}'", query);
                None
            }
            Err(e) => {
                log::warn!("Error getting coordinates for '{}': {}", query, e);
                None
            }
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}
