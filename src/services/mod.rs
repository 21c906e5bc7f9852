pub mod category_service;
pub mod conversation_service;
pub mod distance_service;
pub mod geocoding_service;
pub mod itinerary_generation_service;
pub mod itinerary_optimizer;
pub mod llm_service;
pub mod places_service;
pub mod route_optimization_service;
pub mod weather_service;
