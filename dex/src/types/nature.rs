//! Natures

use serde::{Deserialize, Serialize};

use super::stats::Stat;

/// A nature boosts one stat by 10% and lowers another by 10%, or is neutral
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nature {
    pub id: String,
    pub name: String,

    /// Stat raised by 10%
    #[serde(default)]
    pub plus: Option<Stat>,

    /// Stat lowered by 10%
    #[serde(default)]
    pub minus: Option<Stat>,
}

impl Nature {
    pub fn new(name: &str, plus: Option<Stat>, minus: Option<Stat>) -> Self {
        Self {
            id: crate::to_id(name),
            name: name.to_string(),
            plus,
            minus,
        }
    }

    /// Neutral natures either touch nothing or raise and lower the same stat
    pub fn is_neutral(&self) -> bool {
        self.plus.is_none() || self.minus.is_none() || self.plus == self.minus
    }

    /// Multiplier for a stat, in percent (90, 100 or 110). HP is never affected.
    pub fn multiplier_percent(&self, stat: Stat) -> u32 {
        if stat == Stat::Hp || self.is_neutral() {
            return 100;
        }
        if self.plus == Some(stat) {
            110
        } else if self.minus == Some(stat) {
            90
        } else {
            100
        }
    }

    /// The 25 standard natures
    pub fn standard() -> Vec<Nature> {
        use Stat::*;
        let table: [(&str, Option<Stat>, Option<Stat>); 25] = [
            ("Hardy", None, None),
            ("Lonely", Some(Atk), Some(Def)),
            ("Brave", Some(Atk), Some(Spe)),
            ("Adamant", Some(Atk), Some(Spa)),
            ("Naughty", Some(Atk), Some(Spd)),
            ("Bold", Some(Def), Some(Atk)),
            ("Docile", None, None),
            ("Relaxed", Some(Def), Some(Spe)),
            ("Impish", Some(Def), Some(Spa)),
            ("Lax", Some(Def), Some(Spd)),
            ("Timid", Some(Spe), Some(Atk)),
            ("Hasty", Some(Spe), Some(Def)),
            ("Serious", None, None),
            ("Jolly", Some(Spe), Some(Spa)),
            ("Naive", Some(Spe), Some(Spd)),
            ("Modest", Some(Spa), Some(Atk)),
            ("Mild", Some(Spa), Some(Def)),
            ("Quiet", Some(Spa), Some(Spe)),
            ("Bashful", None, None),
            ("Rash", Some(Spa), Some(Spd)),
            ("Calm", Some(Spd), Some(Atk)),
            ("Gentle", Some(Spd), Some(Def)),
            ("Sassy", Some(Spd), Some(Spe)),
            ("Careful", Some(Spd), Some(Spa)),
            ("Quirky", None, None),
        ];
        table
            .iter()
            .map(|(name, plus, minus)| Nature::new(name, *plus, *minus))
            .collect()
    }
}

/// Id of the nature used for fallback builds
pub const DEFAULT_NATURE: &str = "serious";
