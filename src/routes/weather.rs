use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::services::weather_service::summarize;
use crate::state::AppState;

const DEFAULT_DAYS: u32 = 3;

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<u32>,
}

/*
    /api/weather/{city}?days=N
*/
pub async fn get_forecast(
    data: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ForecastQuery>,
) -> impl Responder {
    let city = path.into_inner();
    let days = query
        .days
        .unwrap_or(DEFAULT_DAYS)
        .clamp(1, data.planner_config.max_trip_days);

    let forecast = match &data.weather {
        Some(weather) => weather.get_forecast(&city, days).await.unwrap_or_else(|e| {
            log::warn!("Weather unavailable for {}: {}", city, e);
            Vec::new()
        }),
        None => Vec::new(),
    };

    HttpResponse::Ok().json(serde_json::json!({
        "city": city,
        "summary": summarize(&forecast),
        "forecast": forecast,
    }))
}
