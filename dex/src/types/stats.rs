//! Stat sextuples and the final stat formula

use serde::{Deserialize, Serialize};

use super::nature::Nature;

/// Maximum EVs in a single stat
pub const MAX_EV: u16 = 252;

/// Maximum EVs across all six stats
pub const MAX_EV_TOTAL: u16 = 510;

/// Maximum IV in a single stat
pub const MAX_IV: u16 = 31;

/// EVs only count in steps of four
pub const EV_STEP: u16 = 4;

/// One of the six permanent stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

impl Stat {
    pub const ALL: [Stat; 6] = [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spa, Stat::Spd, Stat::Spe];

    /// Parse from an id or a paste label ("SpA", "Spe", "attack", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hp" => Some(Stat::Hp),
            "atk" | "attack" => Some(Stat::Atk),
            "def" | "defense" => Some(Stat::Def),
            "spa" | "spatk" | "specialattack" => Some(Stat::Spa),
            "spd" | "spdef" | "specialdefense" => Some(Stat::Spd),
            "spe" | "speed" => Some(Stat::Spe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
        }
    }

    /// Label used in Showdown team pastes
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "Atk",
            Stat::Def => "Def",
            Stat::Spa => "SpA",
            Stat::Spd => "SpD",
            Stat::Spe => "Spe",
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A value per stat. Used for base stats, EVs, IVs and final stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StatTable {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

impl StatTable {
    pub const fn new(hp: u16, atk: u16, def: u16, spa: u16, spd: u16, spe: u16) -> Self {
        Self {
            hp,
            atk,
            def,
            spa,
            spd,
            spe,
        }
    }

    /// Same value in every stat
    pub const fn uniform(value: u16) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Perfect IVs, the default for every build
    pub const fn max_ivs() -> Self {
        Self::uniform(MAX_IV)
    }

    pub fn get(&self, stat: Stat) -> u16 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u16) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Atk => self.atk = value,
            Stat::Def => self.def = value,
            Stat::Spa => self.spa = value,
            Stat::Spd => self.spd = value,
            Stat::Spe => self.spe = value,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, stat: Stat, value: u16) -> Self {
        self.set(stat, value);
        self
    }

    /// Sum of all six values
    pub fn total(&self) -> u32 {
        Stat::ALL.iter().map(|s| self.get(*s) as u32).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, u16)> + '_ {
        Stat::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    /// Final stats from base stats, IVs, EVs, level and nature
    pub fn compute(base: &StatTable, ivs: &StatTable, evs: &StatTable, level: u8, nature: &Nature) -> StatTable {
        let mut out = StatTable::default();
        for stat in Stat::ALL {
            out.set(
                stat,
                calc_stat(
                    stat,
                    base.get(stat),
                    ivs.get(stat),
                    evs.get(stat),
                    level,
                    nature.multiplier_percent(stat),
                ),
            );
        }
        out
    }
}

/// The generation 3+ stat formula.
///
/// HP: `floor((2B + IV + floor(EV/4)) * L / 100) + L + 10` (species with base
/// HP 1 always have 1 HP). Other stats:
/// `floor((floor((2B + IV + floor(EV/4)) * L / 100) + 5) * nature)` where the
/// nature factor is given in percent (90, 100 or 110).
pub fn calc_stat(stat: Stat, base: u16, iv: u16, ev: u16, level: u8, nature_percent: u32) -> u16 {
    let level = level as u32;
    let core = (2 * base as u32 + iv as u32 + ev as u32 / 4) * level / 100;
    if stat == Stat::Hp {
        if base == 1 {
            return 1;
        }
        return (core + level + 10) as u16;
    }
    ((core + 5) * nature_percent / 100) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut table = StatTable::default();
        table.set(Stat::Spa, 252);
        assert_eq!(table.get(Stat::Spa), 252);
        assert_eq!(table.with(Stat::Spe, 4).spe, 4);
        assert_eq!(table.total(), 252);
    }

    #[test]
    fn test_neutral_speed_fixture() {
        // Base 100 Speed, 31 IV, 0 EV, neutral nature, level 100
        assert_eq!(calc_stat(Stat::Spe, 100, 31, 0, 100, 100), 236);
        // Same with 0 IVs: plain 2 * base + 5
        assert_eq!(calc_stat(Stat::Spe, 100, 0, 0, 100, 100), 205);
    }

    #[test]
    fn test_nature_modifiers_truncate() {
        // Garchomp Jolly 252 Spe: floor(303 * 1.1) = 333
        assert_eq!(calc_stat(Stat::Spe, 102, 31, 252, 100, 110), 333);
        // Hindering nature: floor(236 * 0.9) = 212
        assert_eq!(calc_stat(Stat::Atk, 100, 31, 0, 100, 90), 212);
    }

    #[test]
    fn test_hp_formula() {
        // Garchomp 252 HP: 2*108 + 31 + 63 = 310, + 110 = 420
        assert_eq!(calc_stat(Stat::Hp, 108, 31, 252, 100, 100), 420);
        // Level 50 halves the core term
        assert_eq!(calc_stat(Stat::Hp, 108, 31, 0, 50, 100), 183);
    }

    #[test]
    fn test_base_one_hp() {
        assert_eq!(calc_stat(Stat::Hp, 1, 31, 252, 100, 100), 1);
    }

    #[test]
    fn test_ev_remainder_ignored() {
        assert_eq!(
            calc_stat(Stat::Atk, 100, 31, 7, 100, 100),
            calc_stat(Stat::Atk, 100, 31, 4, 100, 100)
        );
    }

    #[test]
    fn test_stat_parse() {
        assert_eq!(Stat::parse("SpA"), Some(Stat::Spa));
        assert_eq!(Stat::parse("speed"), Some(Stat::Spe));
        assert_eq!(Stat::parse("hp"), Some(Stat::Hp));
        assert_eq!(Stat::parse("acc"), None);
    }
}
