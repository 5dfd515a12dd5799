//! Role tags used for roster diversity

use std::fmt;

use serde::{Deserialize, Serialize};
use teamforge_dex::{CombatantBuild, Species};

use crate::config::RoleThresholds;

pub const HAZARD_MOVES: [&str; 3] = ["stealthrock", "spikes", "toxicspikes"];
pub const HAZARD_REMOVAL_MOVES: [&str; 2] = ["defog", "rapidspin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Sweeper,
    Wallbreaker,
    Tank,
    HazardSetter,
    HazardRemover,
    Support,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Sweeper,
        Role::Wallbreaker,
        Role::Tank,
        Role::HazardSetter,
        Role::HazardRemover,
        Role::Support,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Sweeper => "sweeper",
            Role::Wallbreaker => "wallbreaker",
            Role::Tank => "tank",
            Role::HazardSetter => "hazard setter",
            Role::HazardRemover => "hazard remover",
            Role::Support => "support",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every role a build fills, in [`Role::ALL`] order. Never empty: a build
/// with no other role is support.
pub fn roles_of(species: &Species, build: &CombatantBuild, thresholds: &RoleThresholds) -> Vec<Role> {
    let base = &species.base_stats;
    let attack = base.atk.max(base.spa);
    let mut roles = Vec::new();

    if base.spe >= thresholds.sweeper_speed && attack >= thresholds.sweeper_attack {
        roles.push(Role::Sweeper);
    }
    if attack >= thresholds.wallbreaker_attack {
        roles.push(Role::Wallbreaker);
    }
    if base.def >= thresholds.tank_defense && base.spd >= thresholds.tank_defense {
        roles.push(Role::Tank);
    }
    if HAZARD_MOVES.iter().any(|m| build.has_move(m)) {
        roles.push(Role::HazardSetter);
    }
    if HAZARD_REMOVAL_MOVES.iter().any(|m| build.has_move(m)) {
        roles.push(Role::HazardRemover);
    }
    if roles.is_empty() {
        roles.push(Role::Support);
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use teamforge_dex::DexProvider;

    fn roles(species: &str, build: &CombatantBuild) -> Vec<Role> {
        let dex = fixtures::dex();
        let species = dex.require_species(species).unwrap().clone();
        roles_of(&species, build, &RoleThresholds::default())
    }

    #[test]
    fn test_roles() {
        assert_eq!(
            roles("garchomp", &fixtures::garchomp()),
            vec![Role::Sweeper, Role::Wallbreaker]
        );
        assert_eq!(
            roles("ferrothorn", &fixtures::ferrothorn()),
            vec![Role::Tank, Role::HazardSetter]
        );
        assert_eq!(roles("toxapex", &fixtures::toxapex()), vec![Role::Tank]);
    }

    #[test]
    fn test_support_when_nothing_else() {
        let build = CombatantBuild::new("Smeargle", "Own Tempo", "Jolly")
            .with_moves(["spore", "uturn", "knockoff", "protect"]);
        assert_eq!(roles("smeargle", &build), vec![Role::Support]);
    }

    #[test]
    fn test_hazard_removal() {
        let build = CombatantBuild::new("Zapdos", "Static", "Bold")
            .with_moves(["thunderbolt", "heatwave", "roost", "defog"]);
        assert_eq!(roles("zapdos", &build), vec![Role::Sweeper, Role::Wallbreaker, Role::HazardRemover]);
    }
}
