mod common;

use std::sync::Arc;

use common::{
    assert_plan_invariants, cultural_count, dining_count, full_generator, generator,
    planner_config, FailingWeather, MockPlaces, ProseNarrative,
};
use trip_planner_api::models::place::Category;
use trip_planner_api::models::session::BudgetLevel;
use trip_planner_api::services::category_service::classify;
use trip_planner_api::services::itinerary_generation_service::{TripPlanner, TripRequest};

fn request(days: u32, interests: &[&str], include_food: bool) -> TripRequest {
    TripRequest {
        destination: "Tokyo".to_string(),
        duration: days,
        interests: interests.iter().map(|s| s.to_string()).collect(),
        budget: BudgetLevel::Moderate,
        include_food,
        start_date: None,
    }
}

#[actix_rt::test]
async fn test_plans_keep_invariants_across_lengths() {
    let config = planner_config(false);
    let planner = full_generator(&config);

    for days in [1, 2, 4, 7] {
        for interests in [&["culture", "food"][..], &["nature"][..], &[][..]] {
            let plan = planner.plan(&request(days, interests, true)).await.unwrap();
            assert_eq!(plan.days.len(), days as usize);
            assert_plan_invariants(&plan, config.max_per_category);
        }
    }
}

#[actix_rt::test]
async fn test_tokyo_four_days_with_food() {
    let config = planner_config(false);
    let plan = full_generator(&config)
        .plan(&request(4, &["culture", "food"], true))
        .await
        .unwrap();

    for (i, day) in plan.days.iter().enumerate() {
        assert_eq!(day.day, i as u32 + 1);
        assert!(cultural_count(&plan, i) <= 2);
        assert!(dining_count(&plan, i) >= 1, "day {} has no dining stop", day.day);
    }
}

#[actix_rt::test]
async fn test_restaurants_stay_dining_without_keywords() {
    let config = planner_config(false);
    let plan = full_generator(&config)
        .plan(&request(4, &["culture", "food"], true))
        .await
        .unwrap();

    let restaurants = ["Sushi Dai", "Ichiran Shibuya", "Tempura Kondo", "Afuri Harajuku"];
    let mut scheduled = Vec::new();
    for day in &plan.days {
        for activity in &day.activities {
            if restaurants.contains(&activity.place.name.as_str()) {
                assert_eq!(classify(&activity.place), Category::Other);
                assert_eq!(activity.category, Category::Dining);
                scheduled.push(activity.place.name.clone());
            }
        }
    }
    // One per day, best rated first
    assert_eq!(scheduled, restaurants);
}

#[actix_rt::test]
async fn test_route_is_annotated_with_travel_times() {
    let config = planner_config(false);
    let plan = full_generator(&config)
        .plan(&request(1, &[], false))
        .await
        .unwrap();

    let activities = &plan.days[0].activities;
    assert!(activities.len() >= 2);
    assert!(activities.iter().all(|a| a.coordinates.is_some()));
    assert!(activities[activities.len() - 1].travel_minutes_to_next.is_none());
    assert!(activities[..activities.len() - 1]
        .iter()
        .all(|a| a.travel_minutes_to_next.is_some()));
}

#[actix_rt::test]
async fn test_upstream_failures_degrade_gracefully() {
    let config = planner_config(false);
    let planner = generator(&config)
        .with_weather(Arc::new(FailingWeather))
        .with_places(Arc::new(MockPlaces))
        .with_narrative(Arc::new(ProseNarrative));

    let plan = planner.plan(&request(2, &["culture"], false)).await.unwrap();
    assert_eq!(plan.days.len(), 2);
    assert_eq!(plan.weather_summary, "Weather information is currently unavailable.");
    assert!(plan.days.iter().all(|d| d.weather.is_none()));
    assert!(plan.narrative.is_none());
}

#[actix_rt::test]
async fn test_without_places_days_are_empty() {
    let config = planner_config(false);
    let plan = generator(&config).plan(&request(3, &[], true)).await.unwrap();
    assert_eq!(plan.days.len(), 3);
    assert!(plan.days.iter().all(|d| d.activities.is_empty()));
}
