use actix_web::web;

pub mod chat;
pub mod health;
pub mod itinerary;
pub mod weather;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check)).service(
        web::scope("/api")
            .service(
                web::scope("/chat")
                    .route("/start", web::post().to(chat::start))
                    .route("/message", web::post().to(chat::message)),
            )
            .route("/itineraries/generate", web::post().to(itinerary::generate))
            .route("/weather/{city}", web::get().to(weather::get_forecast)),
    );
}
