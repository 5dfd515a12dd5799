//! Move reference entities

use serde::{Deserialize, Serialize};

use crate::types::{Stat, Type};

/// Damage category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    /// The attacking stat used by this category
    pub fn attack_stat(&self) -> Option<Stat> {
        match self {
            MoveCategory::Physical => Some(Stat::Atk),
            MoveCategory::Special => Some(Stat::Spa),
            MoveCategory::Status => None,
        }
    }

    /// The defending stat used by this category
    pub fn defense_stat(&self) -> Option<Stat> {
        match self {
            MoveCategory::Physical => Some(Stat::Def),
            MoveCategory::Special => Some(Stat::Spd),
            MoveCategory::Status => None,
        }
    }
}

/// Who a move targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveTarget {
    #[default]
    Normal,
    Any,
    AllAdjacentFoes,
    AllAdjacent,
    #[serde(rename = "self")]
    SelfTarget,
    AllySide,
    FoeSide,
    All,
    RandomNormal,
}

impl MoveTarget {
    /// Moves that hit more than one target get the spread reduction
    pub fn is_spread(&self) -> bool {
        matches!(self, MoveTarget::AllAdjacentFoes | MoveTarget::AllAdjacent)
    }
}

/// Effect flags consumed by the damage calculator and validator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MoveFlags {
    pub contact: bool,
    /// Induces sleep (Sleep Clause)
    pub sleep: bool,
    /// One-hit KO (OHKO Clause)
    pub ohko: bool,
    /// Raises the user's evasion (Evasion Moves Clause)
    pub evasion: bool,
    pub baton_pass: bool,
    /// Power depends on battle state; the listed base power is a nominal value
    pub variable_power: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub move_type: Type,

    pub category: MoveCategory,

    #[serde(default)]
    pub base_power: u16,

    /// None = never misses
    #[serde(default)]
    pub accuracy: Option<u8>,

    #[serde(default)]
    pub priority: i8,

    #[serde(default)]
    pub target: MoveTarget,

    #[serde(default)]
    pub flags: MoveFlags,

    /// Inclusive hit count range for multi-hit moves
    #[serde(default)]
    pub multi_hit: Option<[u8; 2]>,

    /// Stats raised on the user
    #[serde(default)]
    pub boosts: Vec<Stat>,
}

impl Move {
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status && self.base_power > 0
    }

    pub fn is_spread(&self) -> bool {
        self.target.is_spread()
    }

    /// (min, max) hit count
    pub fn hit_range(&self) -> (u8, u8) {
        match self.multi_hit {
            Some([lo, hi]) => (lo.max(1), hi.max(lo).max(1)),
            None => (1, 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_json() {
        let json = r#"{
            "id": "bulletseed",
            "name": "Bullet Seed",
            "type": "Grass",
            "category": "Physical",
            "basePower": 25,
            "accuracy": 100,
            "flags": {"contact": false},
            "multiHit": [2, 5]
        }"#;
        let mv: Move = serde_json::from_str(json).unwrap();
        assert_eq!(mv.move_type, Type::Grass);
        assert_eq!(mv.hit_range(), (2, 5));
        assert_eq!(mv.target, MoveTarget::Normal);
        assert!(mv.is_damaging());
        assert!(!mv.is_spread());
    }

    #[test]
    fn test_status_move() {
        let json = r#"{
            "id": "swordsdance",
            "name": "Swords Dance",
            "type": "Normal",
            "category": "Status",
            "target": "self",
            "boosts": ["atk"]
        }"#;
        let mv: Move = serde_json::from_str(json).unwrap();
        assert!(!mv.is_damaging());
        assert_eq!(mv.target, MoveTarget::SelfTarget);
        assert_eq!(mv.boosts, vec![Stat::Atk]);
        assert_eq!(mv.accuracy, None);
    }

    #[test]
    fn test_spread_targets() {
        assert!(MoveTarget::AllAdjacentFoes.is_spread());
        assert!(MoveTarget::AllAdjacent.is_spread());
        assert!(!MoveTarget::Normal.is_spread());
    }
}
