use crate::models::place::{Category, Place};

// Checked in order; the first rule with a matching keyword wins.
const RULES: [(Category, &[&str]); 5] = [
    (
        Category::Cultural,
        &["temple", "palace", "museum", "art", "historical"],
    ),
    (Category::Nature, &["park", "garden", "lake", "hill", "nature"]),
    (Category::Shopping, &["mall", "shopping", "market", "street"]),
    (Category::Dining, &["restaurant", "cafe", "food", "dining"]),
    (
        Category::Entertainment,
        &["entertainment", "amusement", "theatre", "cinema"],
    ),
];

/// Keyword classification over name, location and description
pub fn classify(place: &Place) -> Category {
    let text = format!("{} {} {}", place.name, place.location, place.description).to_lowercase();

    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// The source's own category when it gave one, keywords otherwise
pub fn category_of(place: &Place) -> Category {
    place.category.unwrap_or_else(|| classify(place))
}

/// Interest tags that point at a category, used to bias candidate selection
pub fn category_for_interest(interest: &str) -> Option<Category> {
    let interest = interest.to_lowercase();
    let matches = |words: &[&str]| words.iter().any(|w| interest.contains(w));

    if matches(&["cultur", "histor", "museum", "art", "temple", "heritage"]) {
        Some(Category::Cultural)
    } else if matches(&["nature", "outdoor", "park", "hik", "garden", "adventure"]) {
        Some(Category::Nature)
    } else if matches(&["shop", "market"]) {
        Some(Category::Shopping)
    } else if matches(&["food", "dining", "cuisine", "restaurant", "culinary"]) {
        Some(Category::Dining)
    } else if matches(&["entertainment", "nightlife", "cinema", "theatre", "amusement"]) {
        Some(Category::Entertainment)
    } else {
        None
    }
}
