//! Elemental types and the generation 7 effectiveness chart

use serde::{Deserialize, Serialize};

/// Pokemon types (18 types as of Gen 6+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Type {
    Normal = 0,
    Fire = 1,
    Water = 2,
    Electric = 3,
    Grass = 4,
    Ice = 5,
    Fighting = 6,
    Poison = 7,
    Ground = 8,
    Flying = 9,
    Psychic = 10,
    Bug = 11,
    Rock = 12,
    Ghost = 13,
    Dragon = 14,
    Dark = 15,
    Steel = 16,
    Fairy = 17,
}

impl Type {
    /// All 18 Pokemon types in chart order
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    pub fn all() -> &'static [Type] {
        &Self::ALL
    }

    /// Effectiveness against a single defending type
    pub fn effectiveness(&self, defender: Type) -> f32 {
        f32::from(TYPE_CHART[*self as usize][defender as usize]) / 4.0
    }

    /// Effectiveness against one or two defending types (multiplied)
    pub fn effectiveness_multi(&self, defenders: &[Type]) -> f32 {
        defenders
            .iter()
            .map(|t| self.effectiveness(*t))
            .product()
    }

    /// Effectiveness in quarter steps: 0 = immune, 4 = neutral, 16 = 4x.
    ///
    /// The damage pipeline works on integers, so the chart is applied as
    /// `damage * quarters / 4`.
    pub fn effectiveness_quarters(&self, defenders: &[Type]) -> u32 {
        defenders
            .iter()
            .fold(4, |acc, t| acc * u32::from(TYPE_CHART[*self as usize][*t as usize]) / 4)
    }

    /// Parse from a display name or id (case-insensitive)
    pub fn from_id(s: &str) -> Option<Self> {
        let id = crate::to_id(s);
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(&id))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attacking type (row) against defending type (column), in quarter steps:
/// 0 immune, 2 resisted, 4 neutral, 8 super effective. Columns follow
/// [`Type::ALL`].
#[rustfmt::skip]
pub static TYPE_CHART: [[u8; 18]; 18] = [
    //  Nor Fir Wat Ele Gra Ice Fig Poi Gro Fly Psy Bug Roc Gho Dra Dar Ste Fai
    [ 4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  2,  0,  4,  4,  2,  4], // Normal
    [ 4,  2,  2,  4,  8,  8,  4,  4,  4,  4,  4,  8,  2,  4,  2,  4,  8,  4], // Fire
    [ 4,  8,  2,  4,  2,  4,  4,  4,  8,  4,  4,  4,  8,  4,  2,  4,  4,  4], // Water
    [ 4,  4,  8,  2,  2,  4,  4,  4,  0,  8,  4,  4,  4,  4,  2,  4,  4,  4], // Electric
    [ 4,  2,  8,  4,  2,  4,  4,  2,  8,  2,  4,  2,  8,  4,  2,  4,  2,  4], // Grass
    [ 4,  2,  2,  4,  8,  2,  4,  4,  8,  8,  4,  4,  4,  4,  8,  4,  2,  4], // Ice
    [ 8,  4,  4,  4,  4,  8,  4,  2,  4,  2,  2,  2,  8,  0,  4,  8,  8,  2], // Fighting
    [ 4,  4,  4,  4,  8,  4,  4,  2,  2,  4,  4,  4,  2,  2,  4,  4,  0,  8], // Poison
    [ 4,  8,  4,  8,  2,  4,  4,  8,  4,  0,  4,  2,  8,  4,  4,  4,  8,  4], // Ground
    [ 4,  4,  4,  2,  8,  4,  8,  4,  4,  4,  4,  8,  2,  4,  4,  4,  2,  4], // Flying
    [ 4,  4,  4,  4,  4,  4,  8,  8,  4,  4,  2,  4,  4,  4,  4,  0,  2,  4], // Psychic
    [ 4,  2,  4,  4,  8,  4,  2,  2,  4,  2,  8,  4,  4,  2,  4,  8,  2,  2], // Bug
    [ 4,  8,  4,  4,  4,  8,  2,  4,  2,  8,  4,  8,  4,  4,  4,  4,  2,  4], // Rock
    [ 0,  4,  4,  4,  4,  4,  4,  4,  4,  4,  8,  4,  4,  8,  4,  2,  4,  4], // Ghost
    [ 4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  4,  8,  4,  2,  0], // Dragon
    [ 4,  4,  4,  4,  4,  4,  2,  4,  4,  4,  8,  4,  4,  8,  4,  2,  4,  2], // Dark
    [ 4,  2,  2,  2,  4,  8,  4,  4,  4,  4,  4,  4,  8,  4,  4,  4,  2,  8], // Steel
    [ 4,  2,  4,  4,  4,  4,  8,  2,  4,  4,  4,  4,  4,  4,  8,  8,  2,  4], // Fairy
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_effectiveness_super_effective() {
        assert_eq!(Type::Fire.effectiveness(Type::Grass), 2.0);
        assert_eq!(Type::Water.effectiveness(Type::Fire), 2.0);
        assert_eq!(Type::Fairy.effectiveness(Type::Dragon), 2.0);
    }

    #[test]
    fn test_type_effectiveness_immune() {
        assert_eq!(Type::Normal.effectiveness(Type::Ghost), 0.0);
        assert_eq!(Type::Electric.effectiveness(Type::Ground), 0.0);
        assert_eq!(Type::Dragon.effectiveness(Type::Fairy), 0.0);
        assert_eq!(Type::Poison.effectiveness(Type::Steel), 0.0);
    }

    #[test]
    fn test_effectiveness_quarters() {
        // Ice vs Dragon/Ground (Garchomp) = 4x
        assert_eq!(Type::Ice.effectiveness_quarters(&[Type::Dragon, Type::Ground]), 16);
        // Fire vs Water/Rock = 0.25x
        assert_eq!(Type::Fire.effectiveness_quarters(&[Type::Water, Type::Rock]), 1);
        // Ground vs Flying/Steel = immune
        assert_eq!(Type::Ground.effectiveness_quarters(&[Type::Flying, Type::Steel]), 0);
        assert_eq!(Type::Normal.effectiveness_quarters(&[Type::Normal]), 4);
    }

    #[test]
    fn test_type_from_id() {
        assert_eq!(Type::from_id("Fire"), Some(Type::Fire));
        assert_eq!(Type::from_id("FAIRY"), Some(Type::Fairy));
        assert_eq!(Type::from_id(" steel "), Some(Type::Steel));
        assert_eq!(Type::from_id("???"), None);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&Type::Psychic).unwrap();
        assert_eq!(json, "\"Psychic\"");
        let parsed: Type = serde_json::from_str("\"Ground\"").unwrap();
        assert_eq!(parsed, Type::Ground);
    }
}
