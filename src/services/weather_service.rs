use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::weather::WeatherDay;

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Daily forecast in ascending date order
    async fn get_forecast(&self, city: &str, days: u32) -> ServiceResult<Vec<WeatherDay>>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    forecast: Option<Forecast>,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: NaiveDate,
    day: DaySummary,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    avgtemp_c: f64,
    avgtemp_f: f64,
    #[serde(default)]
    mintemp_c: f64,
    #[serde(default)]
    maxtemp_c: f64,
    #[serde(default)]
    mintemp_f: f64,
    #[serde(default)]
    maxtemp_f: f64,
    #[serde(default)]
    daily_chance_of_rain: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

fn parse_forecast(body: &str) -> ServiceResult<Vec<WeatherDay>> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    let Some(forecast) = response.forecast else {
        log::warn!("No forecast data found");
        return Ok(Vec::new());
    };

    let mut days: Vec<WeatherDay> = forecast
        .forecastday
        .into_iter()
        .map(|fd| WeatherDay {
            date: fd.date,
            condition: fd.day.condition.text,
            avg_temp_c: fd.day.avgtemp_c,
            avg_temp_f: fd.day.avgtemp_f,
            min_temp_c: fd.day.mintemp_c,
            max_temp_c: fd.day.maxtemp_c,
            min_temp_f: fd.day.mintemp_f,
            max_temp_f: fd.day.maxtemp_f,
            chance_of_rain: fd.day.daily_chance_of_rain.clamp(0.0, 100.0) as u8,
        })
        .collect();
    days.sort_by_key(|d| d.date);
    Ok(days)
}

/// weatherapi.com forecast client
pub struct WeatherApiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(http_client: reqwest::Client, base_url: &str, api_key: Option<String>) -> ServiceResult<Self> {
        let api_key =
            api_key.ok_or_else(|| ServiceError::Config("WEATHER_API_KEY".to_string()))?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn get_forecast(&self, city: &str, days: u32) -> ServiceResult<Vec<WeatherDay>> {
        log::info!("Fetching weather for {} for {} days", city, days);
        let days = days.to_string();
        let response = self
            .http_client
            .get(format!("{}/forecast.json", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", days.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Upstream {
                service: "weather",
                status: response.status().as_u16(),
            });
        }

        parse_forecast(&response.text().await?)
    }
}

/// Natural language summary of a forecast
pub fn summarize(forecast: &[WeatherDay]) -> String {
    if forecast.is_empty() {
        return "Weather information is currently unavailable.".to_string();
    }

    let parts: Vec<String> = forecast
        .iter()
        .map(|day| {
            format!(
                "{}: {}, temperature {:.0}°C ({:.0}°F)",
                day.date.format("%A, %B %d"),
                day.condition,
                day.avg_temp_c,
                day.avg_temp_f
            )
        })
        .collect();

    format!("Weather forecast: {}", parts.join(". "))
}
