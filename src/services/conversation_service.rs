//! Conversation Service
//!
//! Multi-turn collection of trip preferences. Each state validates one reply;
//! a valid reply is stored and the session advances, an invalid one keeps the
//! state and answers with a corrective prompt. Once everything is collected the
//! planner is called and its itinerary is returned with the final message.
//!
//! Short form: START -> DURATION -> BUDGET -> ACTIVITY -> FINAL
//! Extended:   ... ACTIVITY -> TRANSPORT -> FOOD_PREFERENCE -> FINAL

use chrono::{Days, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::PlannerConfig;
use crate::db::session_store::SessionStore;
use crate::errors::{ServiceError, ServiceResult};
use crate::models::itinerary::TripPlan;
use crate::models::session::{
    ActivityStyle, BudgetLevel, ChatReply, ChatSession, ConversationState, TransportPreference,
};
use crate::services::itinerary_generation_service::{TripPlanner, TripRequest};

const GREETING: &str = "Hi! I'm your travel planner. Where would you like to go?";
const RESTART: &str = "Sorry, something went wrong while planning your trip. \
Let's start over: where would you like to go?";

const GREETING_WORDS: [&str; 6] = ["hi", "hello", "hey", "hiya", "howdy", "greetings"];

const BUDGET_SYNONYMS: [(&str, BudgetLevel); 8] = [
    ("budget", BudgetLevel::Budget),
    ("low", BudgetLevel::Budget),
    ("cheap", BudgetLevel::Budget),
    ("moderate", BudgetLevel::Moderate),
    ("medium", BudgetLevel::Moderate),
    ("mid", BudgetLevel::Moderate),
    ("luxury", BudgetLevel::Luxury),
    ("high", BudgetLevel::Luxury),
];

const FOOD_WORDS: [&str; 7] = ["food", "dining", "dine", "cuisine", "restaurant", "eat", "culinary"];

const STYLE_WORDS: [(ActivityStyle, &[&str]); 3] = [
    (ActivityStyle::Adventure, &["adventure", "hik", "trek", "sport", "outdoor", "climb"]),
    (ActivityStyle::Relaxing, &["relax", "spa", "beach", "leisure", "wellness"]),
    (ActivityStyle::Cultural, &["cultur", "histor", "museum", "art", "heritage", "temple"]),
];

const TRANSPORT_WORDS: [(TransportPreference, &[&str]); 4] = [
    (TransportPreference::Public, &["public", "bus", "metro", "train", "subway", "transit"]),
    (TransportPreference::Private, &["private", "car", "taxi", "cab"]),
    (TransportPreference::Walking, &["walk", "walking", "foot"]),
    (TransportPreference::Mixed, &["mixed", "both", "combination"]),
];

const YES_WORDS: [&str; 6] = ["yes", "yeah", "yep", "sure", "please", "include"];
const NO_WORDS: [&str; 4] = ["no", "nope", "skip", "without"];

fn words(message: &str) -> Vec<String> {
    message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Trimmed destination, unless the reply is too short or just a greeting
pub fn parse_destination(message: &str) -> Option<String> {
    let trimmed = message.trim();
    if trimmed.chars().count() < 3 {
        return None;
    }
    match words(trimmed).first() {
        Some(first) if GREETING_WORDS.contains(&first.as_str()) => None,
        None => None,
        Some(_) => Some(trimmed.to_string()),
    }
}

/// First run of digits in the reply, within `1..=max_days`
pub fn parse_duration(message: &str, max_days: u32) -> Option<u32> {
    let digits: String = message
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let days: u32 = digits.parse().ok()?;
    (1..=max_days).contains(&days).then_some(days)
}

fn budget_synonym(token: &str) -> Option<BudgetLevel> {
    BUDGET_SYNONYMS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, level)| *level)
}

/// Exact synonym first, then word by word as long as every recognised word agrees
pub fn parse_budget(message: &str) -> Option<BudgetLevel> {
    let normalized = message.trim().to_lowercase();
    if let Some(level) = budget_synonym(&normalized) {
        return Some(level);
    }

    let mut levels: Vec<BudgetLevel> = words(&normalized)
        .iter()
        .filter_map(|w| budget_synonym(w))
        .collect();
    levels.dedup();
    match levels.as_slice() {
        [level] => Some(*level),
        _ => None,
    }
}

pub fn parse_interests(message: &str) -> Vec<String> {
    message
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

pub fn mentions_food(interests: &[String]) -> bool {
    interests.iter().any(|interest| {
        words(interest)
            .iter()
            .any(|w| FOOD_WORDS.iter().any(|food| w.starts_with(food)))
    })
}

pub fn activity_style(interests: &[String]) -> Option<ActivityStyle> {
    let matched: Vec<ActivityStyle> = STYLE_WORDS
        .iter()
        .filter(|(_, stems)| {
            interests.iter().any(|interest| {
                words(interest)
                    .iter()
                    .any(|w| stems.iter().any(|stem| w.starts_with(stem)))
            })
        })
        .map(|(style, _)| *style)
        .collect();

    match matched.as_slice() {
        [] => None,
        [style] => Some(*style),
        _ => Some(ActivityStyle::Mixed),
    }
}

pub fn parse_transport(message: &str) -> Option<TransportPreference> {
    let words = words(message);
    let matched: Vec<TransportPreference> = TRANSPORT_WORDS
        .iter()
        .filter(|(_, tokens)| words.iter().any(|w| tokens.contains(&w.as_str())))
        .map(|(mode, _)| *mode)
        .collect();

    match matched.as_slice() {
        [] => None,
        [mode] => Some(*mode),
        _ => Some(TransportPreference::Mixed),
    }
}

/// `Some(false)` wins when the reply both accepts and declines
pub fn parse_food_preference(message: &str) -> Option<bool> {
    let words = words(message);
    if words.iter().any(|w| NO_WORDS.contains(&w.as_str())) {
        Some(false)
    } else if words.iter().any(|w| YES_WORDS.contains(&w.as_str())) {
        Some(true)
    } else {
        None
    }
}

enum Turn {
    Prompt(String),
    Generate,
}

pub struct ConversationService {
    planner: Arc<dyn TripPlanner>,
    store: Arc<dyn SessionStore>,
    config: PlannerConfig,
}

impl ConversationService {
    pub fn new(
        planner: Arc<dyn TripPlanner>,
        store: Arc<dyn SessionStore>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            planner,
            store,
            config,
        }
    }

    pub async fn start(&self) -> ServiceResult<ChatReply> {
        let session = ChatSession::new(&Uuid::new_v4().to_string());
        self.store.put(&session).await?;
        log::info!("Started conversation {}", session.session_id);
        Ok(reply(&session, GREETING.to_string(), None))
    }

    pub async fn process_message(&self, session_id: &str, message: &str) -> ServiceResult<ChatReply> {
        let stored = match self.store.get(session_id).await? {
            Some(session) => session,
            None => ChatSession::new(session_id),
        };

        // Work on a copy so a failed turn leaves nothing half applied
        let mut session = stored.clone();
        let (text, itinerary) = match self.apply(&mut session, message) {
            Ok(Turn::Prompt(text)) => (text, None),
            Ok(Turn::Generate) => match self.generate(&session).await {
                Ok(plan) => {
                    session.state = ConversationState::Final;
                    let text = format!(
                        "Here is your {}-day itinerary for {}! Send a new destination any time to plan another trip.",
                        plan.duration, plan.destination
                    );
                    (text, Some(plan))
                }
                Err(e) => {
                    log::error!("Itinerary generation failed for {}: {}", session_id, e);
                    session = stored;
                    session.reset();
                    (RESTART.to_string(), None)
                }
            },
            Err(e) => {
                log::error!("Conversation turn failed for {}: {}", session_id, e);
                session = stored;
                session.reset();
                (RESTART.to_string(), None)
            }
        };

        session.updated_at = Utc::now();
        self.store.put(&session).await?;
        Ok(reply(&session, text, itinerary))
    }

    async fn generate(&self, session: &ChatSession) -> ServiceResult<TripPlan> {
        let request = TripRequest::from_preferences(&session.preferences)?;
        self.planner.plan(&request).await
    }

    fn apply(&self, session: &mut ChatSession, message: &str) -> ServiceResult<Turn> {
        let preferences = &mut session.preferences;

        match session.state {
            ConversationState::Start => match parse_destination(message) {
                Some(destination) => {
                    let prompt = format!(
                        "Great choice! How many days are you planning to spend in {}?",
                        destination
                    );
                    preferences.location = Some(destination);
                    session.state = ConversationState::Duration;
                    Ok(Turn::Prompt(prompt))
                }
                None => Ok(Turn::Prompt(
                    "Please tell me which city or destination you'd like to visit.".to_string(),
                )),
            },

            ConversationState::Duration => {
                let Some(days) = parse_duration(message, self.config.max_trip_days) else {
                    return Ok(Turn::Prompt(format!(
                        "Please enter the number of days as a number between 1 and {}.",
                        self.config.max_trip_days
                    )));
                };
                let start = Utc::now().date_naive();
                let end = start
                    .checked_add_days(Days::new(u64::from(days - 1)))
                    .ok_or_else(|| ServiceError::Conversation("trip end date out of range".to_string()))?;

                preferences.duration = Some(days);
                preferences.start_date = Some(start);
                preferences.end_date = Some(end);
                session.state = ConversationState::Budget;
                Ok(Turn::Prompt(
                    "What's your budget level for this trip? (budget, moderate, or luxury)".to_string(),
                ))
            }

            ConversationState::Budget => match parse_budget(message) {
                Some(level) => {
                    preferences.budget = Some(level);
                    session.state = ConversationState::Activity;
                    Ok(Turn::Prompt(
                        "What kind of activities interest you? Separate them with commas \
                         (e.g. culture, food, nature)."
                            .to_string(),
                    ))
                }
                None => Ok(Turn::Prompt(
                    "Please choose a budget level: budget, moderate, or luxury.".to_string(),
                )),
            },

            ConversationState::Activity => {
                let interests = parse_interests(message);
                if interests.is_empty() {
                    return Ok(Turn::Prompt(
                        "Please list at least one activity you enjoy, separated by commas.".to_string(),
                    ));
                }
                preferences.include_food = mentions_food(&interests);
                preferences.activity_style = activity_style(&interests);
                preferences.interests = interests;

                if self.config.extended_conversation {
                    session.state = ConversationState::Transport;
                    Ok(Turn::Prompt(
                        "How would you prefer to get around? (public transport, private car/taxi, \
                         walking, or mixed)"
                            .to_string(),
                    ))
                } else {
                    Ok(Turn::Generate)
                }
            }

            ConversationState::Transport => match parse_transport(message) {
                Some(mode) => {
                    preferences.transport = Some(mode);
                    session.state = ConversationState::FoodPreference;
                    Ok(Turn::Prompt(
                        "Would you like restaurant recommendations included in your itinerary? (yes/no)"
                            .to_string(),
                    ))
                }
                None => Ok(Turn::Prompt(
                    "Please choose public transport, private car/taxi, walking, or mixed.".to_string(),
                )),
            },

            ConversationState::FoodPreference => match parse_food_preference(message) {
                Some(include_food) => {
                    preferences.include_food = include_food;
                    Ok(Turn::Generate)
                }
                None => Ok(Turn::Prompt(
                    "Please answer yes or no: should restaurants be included?".to_string(),
                )),
            },

            // A finished trip: the message opens a new one
            ConversationState::Final => {
                session.reset();
                self.apply(session, message)
            }
        }
    }
}

fn reply(session: &ChatSession, message: String, itinerary: Option<TripPlan>) -> ChatReply {
    ChatReply {
        session_id: session.session_id.clone(),
        message,
        state: session.state,
        preferences: session.preferences.clone(),
        itinerary,
    }
}
