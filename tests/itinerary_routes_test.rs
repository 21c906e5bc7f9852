mod common;

use actix_web::test;
use serde_json::{json, Value};
use serial_test::serial;

use common::TestApp;
use trip_planner_api::config::AppConfig;
use trip_planner_api::routes;
use trip_planner_api::state::AppState;

#[actix_rt::test]
#[serial]
async fn test_generate_itinerary() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(&json!({
            "destination": " Tokyo ",
            "duration": 3,
            "interests": ["Culture", "food"],
            "budget": "luxury",
            "include_food": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["destination"], "Tokyo");
    assert_eq!(body["budget"], "luxury");
    assert_eq!(body["days"].as_array().unwrap().len(), 3);
    assert_eq!(body["interests"], json!(["culture", "food"]));
    assert!(body["weather_summary"].as_str().unwrap().starts_with("Weather forecast:"));
    assert!(body["days"][0]["weather_tip"].is_string());
}

#[actix_rt::test]
#[serial]
async fn test_generate_rejects_bad_duration() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for duration in [0, 31] {
        let req = test::TestRequest::post()
            .uri("/api/itineraries/generate")
            .set_json(&json!({"destination": "Tokyo", "duration": duration}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Duration"));
    }
}

#[actix_rt::test]
#[serial]
async fn test_generate_rejects_blank_destination() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/itineraries/generate")
        .set_json(&json!({"destination": "   ", "duration": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_weather_route() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/weather/Tokyo?days=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["city"], "Tokyo");
    assert_eq!(body["forecast"].as_array().unwrap().len(), 2);
    assert_eq!(body["forecast"][1]["condition"], "Patchy rain possible");
}

#[actix_rt::test]
#[serial]
async fn test_health_without_collaborators() {
    // No keys and no database: everything degrades to empty results
    let state = AppState::from_config(&AppConfig::default()).await.unwrap();
    let app = test::init_service(
        actix_web::App::new()
            .app_data(actix_web::web::Data::new(state))
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["services"]["sessions"]["status"], "ok");
    assert_eq!(body["services"]["weather"]["status"], "disabled");
    assert_eq!(body["services"]["narrative"]["status"], "disabled");

    let req = test::TestRequest::get().uri("/api/weather/Paris").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["summary"], "Weather information is currently unavailable.");
    assert!(body["forecast"].as_array().unwrap().is_empty());
}
