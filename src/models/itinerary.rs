use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::place::{Category, Coordinates, Place};
use super::session::BudgetLevel;
use super::weather::WeatherDay;

/// Candidate activities keyed by 1-based day index, before optimization.
pub type DraftItinerary = BTreeMap<u32, Vec<Place>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledActivity {
    #[serde(flatten)]
    pub place: Place,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Minutes to the following stop, when both ends were geocoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_minutes_to_next: Option<u32>,
}

impl ScheduledActivity {
    pub fn new(place: Place, category: Category) -> Self {
        Self {
            place,
            category,
            note: None,
            coordinates: None,
            travel_minutes_to_next: None,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: u32,
    pub activities: Vec<ScheduledActivity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_tip: Option<String>,
}

impl DayPlan {
    pub fn new(day: u32, activities: Vec<ScheduledActivity>) -> Self {
        Self {
            day,
            activities,
            weather: None,
            weather_tip: None,
        }
    }

    pub fn category_counts(&self) -> HashMap<Category, usize> {
        let mut counts = HashMap::new();
        for activity in &self.activities {
            *counts.entry(activity.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn total_travel_minutes(&self) -> u32 {
        self.activities
            .iter()
            .filter_map(|a| a.travel_minutes_to_next)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DayNarrative {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Narrative {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub days: HashMap<String, DayNarrative>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub summary: String,
    pub destination: String,
    pub duration: u32,
    pub interests: Vec<String>,
    pub budget: BudgetLevel,
    pub include_food: bool,
    pub weather_summary: String,
    pub days: Vec<DayPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}
