use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::itinerary::TripPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversationState {
    #[default]
    Start,
    Duration,
    Budget,
    Activity,
    Transport,
    FoodPreference,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Budget,
    #[default]
    Moderate,
    Luxury,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "budget",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::Luxury => "luxury",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportPreference {
    Public,
    Private,
    Walking,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStyle {
    Adventure,
    Relaxing,
    Cultural,
    Mixed,
}

/// Everything gathered from the traveller so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetLevel>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub include_food: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_style: Option<ActivityStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportPreference>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub session_id: String,
    pub state: ConversationState,
    pub preferences: Preferences,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            state: ConversationState::Start,
            preferences: Preferences::default(),
            updated_at: Utc::now(),
        }
    }

    pub fn reset(&mut self) {
        self.state = ConversationState::Start;
        self.preferences = Preferences::default();
        self.updated_at = Utc::now();
    }
}

/// The response to a single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: String,
    pub message: String,
    pub state: ConversationState,
    pub preferences: Preferences,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<TripPlan>,
}
