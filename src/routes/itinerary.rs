use actix_web::{web, HttpResponse, Responder};

use crate::errors::ServiceError;
use crate::services::itinerary_generation_service::TripRequest;
use crate::state::AppState;

/*
    /api/itineraries/generate
*/
pub async fn generate(data: web::Data<AppState>, body: web::Json<TripRequest>) -> impl Responder {
    let mut request = body.into_inner();
    request.destination = request.destination.trim().to_string();
    request.interests = request
        .interests
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();

    match data.planner.plan(&request).await {
        Ok(plan) => HttpResponse::Ok().json(plan),
        Err(ServiceError::InvalidRequest(message)) => {
            HttpResponse::BadRequest().json(serde_json::json!({"error": message}))
        }
        Err(err) => {
            log::error!("Failed to generate itinerary for {}: {}", request.destination, err);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": "Failed to generate itinerary"}))
        }
    }
}
