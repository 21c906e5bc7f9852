use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type Coordinates = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cultural,
    Nature,
    Shopping,
    Dining,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    /// Categories that have curated alternatives, in substitution order.
    pub const SUBSTITUTABLE: [Category; 5] = [
        Category::Cultural,
        Category::Nature,
        Category::Shopping,
        Category::Dining,
        Category::Entertainment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cultural => "cultural",
            Category::Nature => "nature",
            Category::Shopping => "shopping",
            Category::Dining => "dining",
            Category::Entertainment => "entertainment",
            Category::Other => "other",
        }
    }

    /// Roughly whether a visit happens under a roof; drives weather-aware picks.
    pub fn is_indoor(&self) -> bool {
        matches!(
            self,
            Category::Cultural | Category::Shopping | Category::Dining | Category::Entertainment
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Providers send ratings either as numbers or as numeric strings
fn deserialize_lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64().map(|f| f as f32)),
        Some(serde_json::Value::String(s)) => Ok(s.trim().parse::<f32>().ok()),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Place {
    pub name: String,
    /// Free-text location resolvable by the geocoder
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f32")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub price_level: Option<String>,
    /// Category reported by the source, e.g. every restaurant listing is dining.
    /// Scheduled activities carry their own `category`, so this is not echoed back.
    #[serde(default, skip_serializing)]
    pub category: Option<Category>,
}

impl Place {
    pub fn new(name: &str, location: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            description: description.to_string(),
            rating: None,
            price_level: None,
            category: None,
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Trip-wide deduplication key
    pub fn identity_key(&self) -> String {
        format!("{}|{}", self.name, self.location).to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_is_case_insensitive() {
        let a = Place::new("Cubbon Park", "Cubbon Park", "");
        let b = Place::new("CUBBON PARK", "cubbon park", "different text");
        assert_eq!(a.identity_key(), "cubbon park|cubbon park");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_rating_accepts_strings_and_numbers() {
        let from_string: Place =
            serde_json::from_str(r#"{"name": "A", "rating": "4.5"}"#).unwrap();
        let from_number: Place = serde_json::from_str(r#"{"name": "B", "rating": 4}"#).unwrap();
        let missing: Place = serde_json::from_str(r#"{"name": "C", "rating": null}"#).unwrap();
        assert_eq!(from_string.rating, Some(4.5));
        assert_eq!(from_number.rating, Some(4.0));
        assert_eq!(missing.rating, None);
    }

    #[test]
    fn test_source_category_is_read_but_not_written() {
        let place: Place =
            serde_json::from_str(r#"{"name": "Sushi Dai", "category": "dining"}"#).unwrap();
        assert_eq!(place.category, Some(Category::Dining));

        let json = serde_json::to_value(&place).unwrap();
        assert!(json.get("category").is_none());
    }
}
