//! Species reference entities

use serde::{Deserialize, Serialize};

use crate::types::{StatTable, Type};

/// A species as loaded from reference data. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: String,
    pub name: String,

    #[serde(rename = "baseStats")]
    pub base_stats: StatTable,

    /// One or two types
    pub types: Vec<Type>,

    /// Abilities this species may have; the first is the default
    pub abilities: Vec<String>,

    /// Legal move ids in learnset order
    #[serde(default)]
    pub learnset: Vec<String>,
}

impl Species {
    pub fn has_type(&self, t: Type) -> bool {
        self.types.contains(&t)
    }

    pub fn can_learn(&self, move_id: &str) -> bool {
        self.learnset.iter().any(|m| m == move_id)
    }

    pub fn can_have_ability(&self, ability_id: &str) -> bool {
        self.abilities.iter().any(|a| a == ability_id)
    }

    /// Default ability (first listed)
    pub fn default_ability(&self) -> Option<&str> {
        self.abilities.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garchomp() -> Species {
        Species {
            id: "garchomp".into(),
            name: "Garchomp".into(),
            base_stats: StatTable::new(108, 130, 95, 80, 85, 102),
            types: vec![Type::Dragon, Type::Ground],
            abilities: vec!["roughskin".into(), "sandveil".into()],
            learnset: vec!["earthquake".into(), "outrage".into()],
        }
    }

    #[test]
    fn test_species_queries() {
        let chomp = garchomp();
        assert!(chomp.has_type(Type::Ground));
        assert!(!chomp.has_type(Type::Flying));
        assert!(chomp.can_learn("earthquake"));
        assert!(!chomp.can_learn("spore"));
        assert_eq!(chomp.default_ability(), Some("roughskin"));
    }

    #[test]
    fn test_species_json() {
        let json = r#"{
            "id": "garchomp",
            "name": "Garchomp",
            "baseStats": {"hp": 108, "atk": 130, "def": 95, "spa": 80, "spd": 85, "spe": 102},
            "types": ["Dragon", "Ground"],
            "abilities": ["roughskin", "sandveil"],
            "learnset": ["earthquake", "outrage"]
        }"#;
        let parsed: Species = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, garchomp());
    }
}
