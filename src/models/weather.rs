use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub date: NaiveDate,
    pub condition: String,
    pub avg_temp_c: f64,
    pub avg_temp_f: f64,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub min_temp_f: f64,
    pub max_temp_f: f64,
    pub chance_of_rain: u8,
}

/// What kind of day the forecast suggests planning for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherOutlook {
    Indoor,
    Outdoor,
    Snow,
    Water,
}

impl WeatherOutlook {
    pub fn tip(&self) -> &'static str {
        match self {
            WeatherOutlook::Indoor => {
                "Rain or cold is likely, so museums, galleries and covered markets come first today."
            }
            WeatherOutlook::Outdoor => "Good weather for parks, gardens and walking between stops.",
            WeatherOutlook::Snow => "Snow is expected; dress warmly and allow extra travel time.",
            WeatherOutlook::Water => "It will be hot; plan for shade, water and lakeside breaks.",
        }
    }
}

impl WeatherDay {
    pub fn outlook(&self) -> WeatherOutlook {
        let condition = self.condition.to_lowercase();
        if condition.contains("rain") || condition.contains("shower") || self.chance_of_rain > 60 {
            WeatherOutlook::Indoor
        } else if condition.contains("snow") {
            WeatherOutlook::Snow
        } else if self.avg_temp_c > 28.0 {
            WeatherOutlook::Water
        } else if self.avg_temp_c < 10.0 {
            WeatherOutlook::Indoor
        } else {
            WeatherOutlook::Outdoor
        }
    }
}
