//! Abilities and items, reduced to the effect tags the engine understands

use serde::{Deserialize, Serialize};

use crate::types::Type;

/// Ability effect tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AbilityEffect {
    /// No effect on a single exchange
    #[default]
    Other,
    /// STAB becomes x2
    Adaptability,
    /// x1.5 power for moves of 60 base power or less
    Technician,
    /// Resisted hits deal double damage
    TintedLens,
    /// Normal moves become `to` with x1.2 power (Aerilate, Pixilate, ...)
    TypeConversion { to: Type },
    /// Doubles Attack
    HugePower,
    /// Ground immunity
    Levitate,
    /// Halves Fire and Ice damage taken
    ThickFat,
    /// Super effective damage taken x0.75 (also Solid Rock)
    Filter,
    /// Halves damage taken at full HP
    Multiscale,
    SpeedBoost,
    /// Only super effective hits land
    WonderGuard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effect: AbilityEffect,
}

/// Item effect tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ItemEffect {
    #[default]
    Other,
    ChoiceBand,
    ChoiceSpecs,
    ChoiceScarf,
    LifeOrb,
    ExpertBelt,
    MuscleBand,
    WiseGlasses,
    /// x1.2 power for one type (Charcoal, Mystic Water, plates, ...)
    TypeBoost { boosted: Type },
    AssaultVest,
    Eviolite,
    /// Lowers foe accuracy (Bright Powder, Lax Incense)
    Evasion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub effect: ItemEffect,
}

impl Item {
    /// Items that lock the holder into one move
    pub fn is_choice(&self) -> bool {
        matches!(
            self.effect,
            ItemEffect::ChoiceBand | ItemEffect::ChoiceSpecs | ItemEffect::ChoiceScarf
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_effects() {
        let json = r#"{"id": "pixilate", "name": "Pixilate", "effect": {"kind": "typeConversion", "to": "Fairy"}}"#;
        let ability: Ability = serde_json::from_str(json).unwrap();
        assert_eq!(ability.effect, AbilityEffect::TypeConversion { to: Type::Fairy });

        let json = r#"{"id": "choicescarf", "name": "Choice Scarf", "effect": {"kind": "choiceScarf"}}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.is_choice());
    }

    #[test]
    fn test_missing_effect_defaults_to_other() {
        let json = r#"{"id": "leftovers", "name": "Leftovers"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.effect, ItemEffect::Other);
        assert!(!item.is_choice());
    }
}
