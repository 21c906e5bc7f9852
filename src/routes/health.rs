use actix_web::{web, HttpResponse, Responder};
use mongodb::bson::doc;
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::db::mongo::DATABASE;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn configured(configured: bool, name: &str) -> Self {
        if configured {
            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("{} configured", name)),
            }
        } else {
            ServiceStatus {
                status: "disabled".to_string(),
                details: Some(format!("{} not configured, falling back to empty results", name)),
            }
        }
    }
}

pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let sessions = check_sessions(&data).await;
    if sessions.status == "error" {
        health.status = "degraded".to_string();
    }
    health.services.insert("sessions".to_string(), sessions);

    let collaborators = &data.collaborators;
    for (key, configured, name) in [
        ("weather", collaborators.weather, "Weather API"),
        ("places", collaborators.places, "Places API"),
        ("narrative", collaborators.narrative, "LLM API"),
    ] {
        health
            .services
            .insert(key.to_string(), ServiceStatus::configured(configured, name));
    }

    HttpResponse::Ok().json(health)
}

async fn check_sessions(data: &AppState) -> ServiceStatus {
    let Some(client) = &data.mongo else {
        return ServiceStatus {
            status: "ok".to_string(),
            details: Some("In-memory session store".to_string()),
        };
    };

    match client.database(DATABASE).run_command(doc! {"ping": 1}).await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            log::error!("MongoDB health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}
