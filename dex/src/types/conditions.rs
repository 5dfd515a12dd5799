//! Field conditions relevant to a single exchange

use serde::{Deserialize, Serialize};

/// Weather conditions (generation 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Hail,
}

impl Weather {
    /// Parse from the setting move, the weather name or an id
    pub fn from_id(s: &str) -> Option<Self> {
        match crate::to_id(s).as_str() {
            "sunnyday" | "sun" | "harshsunlight" => Some(Weather::Sun),
            "raindance" | "rain" => Some(Weather::Rain),
            "sandstorm" | "sand" => Some(Weather::Sand),
            "hail" => Some(Weather::Hail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_from_id() {
        assert_eq!(Weather::from_id("Sunny Day"), Some(Weather::Sun));
        assert_eq!(Weather::from_id("raindance"), Some(Weather::Rain));
        assert_eq!(Weather::from_id("Sandstorm"), Some(Weather::Sand));
        assert_eq!(Weather::from_id("Harsh Sunlight"), Some(Weather::Sun));
        assert_eq!(Weather::from_id("none"), None);
    }
}
