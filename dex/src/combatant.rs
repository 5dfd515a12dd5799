//! Concrete builds and rosters

use serde::{Deserialize, Serialize};

use crate::provider::{DexProvider, MissingReference};
use crate::types::{Stat, StatTable};
use crate::id::serde_id;
use crate::to_id;

fn default_level() -> u8 {
    100
}

fn max_ivs() -> StatTable {
    StatTable::max_ivs()
}

/// One combatant: species plus its configuration.
///
/// Final stats are derived on demand through [`CombatantBuild::final_stats`]
/// and never stored, so EV edits are always reflected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantBuild {
    #[serde(deserialize_with = "serde_id::one")]
    pub species: String,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(deserialize_with = "serde_id::one")]
    pub nature: String,
    #[serde(deserialize_with = "serde_id::one")]
    pub ability: String,
    #[serde(default, deserialize_with = "serde_id::optional")]
    pub item: Option<String>,
    #[serde(deserialize_with = "serde_id::many")]
    pub moves: Vec<String>,
    #[serde(default)]
    pub evs: StatTable,
    #[serde(default = "max_ivs")]
    pub ivs: StatTable,
}

impl CombatantBuild {
    /// Level 100, no item, no moves, zero EVs, perfect IVs
    pub fn new(species: &str, ability: &str, nature: &str) -> Self {
        Self {
            species: to_id(species),
            level: default_level(),
            nature: to_id(nature),
            ability: to_id(ability),
            item: None,
            moves: Vec::new(),
            evs: StatTable::default(),
            ivs: StatTable::max_ivs(),
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.item = Some(to_id(item));
        self
    }

    pub fn with_moves<'a>(mut self, moves: impl IntoIterator<Item = &'a str>) -> Self {
        self.moves = moves.into_iter().map(to_id).collect();
        self
    }

    pub fn with_evs(mut self, evs: StatTable) -> Self {
        self.evs = evs;
        self
    }

    pub fn with_ev(mut self, stat: Stat, value: u16) -> Self {
        self.evs.set(stat, value);
        self
    }

    pub fn with_ivs(mut self, ivs: StatTable) -> Self {
        self.ivs = ivs;
        self
    }

    pub fn has_move(&self, move_id: &str) -> bool {
        self.moves.iter().any(|m| m == move_id)
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.item.as_deref() == Some(item_id)
    }

    /// Derive the six final stats
    pub fn final_stats(&self, dex: &dyn DexProvider) -> Result<StatTable, MissingReference> {
        let species = dex.require_species(&self.species)?;
        let nature = dex.require_nature(&self.nature)?;
        Ok(StatTable::compute(
            &species.base_stats,
            &self.ivs,
            &self.evs,
            self.level,
            nature,
        ))
    }

    /// Derive a single final stat
    pub fn stat(&self, dex: &dyn DexProvider, stat: Stat) -> Result<u16, MissingReference> {
        Ok(self.final_stats(dex)?.get(stat))
    }
}

/// Ordered list of combatants.
///
/// Any length is representable so the validator can report size problems;
/// a roster is analysis ready once it holds exactly six validator-clean
/// builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    members: Vec<CombatantBuild>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_builds(members: Vec<CombatantBuild>) -> Self {
        Self { members }
    }

    /// Append a build unless its species is already present
    pub fn push(&mut self, build: CombatantBuild) -> bool {
        if self.contains_species(&build.species) {
            return false;
        }
        self.members.push(build);
        true
    }

    /// Append without the species check (lets callers build invalid rosters)
    pub fn push_unchecked(&mut self, build: CombatantBuild) {
        self.members.push(build);
    }

    pub fn remove(&mut self, index: usize) -> Option<CombatantBuild> {
        if index < self.members.len() {
            Some(self.members.remove(index))
        } else {
            None
        }
    }

    pub fn replace(&mut self, index: usize, build: CombatantBuild) -> Option<CombatantBuild> {
        self.members
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, build))
    }

    pub fn members(&self) -> &[CombatantBuild] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&CombatantBuild> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut CombatantBuild> {
        self.members.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatantBuild> {
        self.members.iter()
    }

    pub fn contains_species(&self, species_id: &str) -> bool {
        self.members.iter().any(|m| m.species == species_id)
    }

    pub fn species_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.species.as_str()).collect()
    }

    pub fn into_builds(self) -> Vec<CombatantBuild> {
        self.members
    }
}

impl FromIterator<CombatantBuild> for Roster {
    fn from_iter<I: IntoIterator<Item = CombatantBuild>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a CombatantBuild;
    type IntoIter = std::slice::Iter<'a, CombatantBuild>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(species: &str) -> CombatantBuild {
        CombatantBuild::new(species, "pressure", "Serious")
    }

    #[test]
    fn test_builder_normalizes_ids() {
        let b = CombatantBuild::new("Landorus-Therian", "Intimidate", "Impish")
            .with_item("Rocky Helmet")
            .with_moves(["Stealth Rock", "U-turn"]);
        assert_eq!(b.species, "landorustherian");
        assert_eq!(b.item.as_deref(), Some("rockyhelmet"));
        assert!(b.has_move("uturn"));
        assert_eq!(b.ivs, StatTable::max_ivs());
        assert_eq!(b.level, 100);
    }

    #[test]
    fn test_roster_rejects_duplicate_species() {
        let mut roster = Roster::new();
        assert!(roster.push(build("zapdos")));
        assert!(!roster.push(build("zapdos")));
        roster.push_unchecked(build("zapdos"));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.species_ids(), vec!["zapdos", "zapdos"]);
    }

    #[test]
    fn test_roster_replace_and_remove() {
        let mut roster: Roster = vec![build("zapdos"), build("mew")].into_iter().collect();
        let old = roster.replace(1, build("clefable"));
        assert_eq!(old.map(|b| b.species), Some("mew".to_string()));
        assert!(roster.contains_species("clefable"));
        assert!(roster.remove(5).is_none());
        assert_eq!(roster.remove(0).map(|b| b.species), Some("zapdos".to_string()));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_build_json_defaults() {
        let json = r#"{"species": "mew", "nature": "bold", "ability": "synchronize", "moves": ["psychic"]}"#;
        let b: CombatantBuild = serde_json::from_str(json).unwrap();
        assert_eq!(b.level, 100);
        assert_eq!(b.ivs, StatTable::max_ivs());
        assert_eq!(b.evs.total(), 0);
        assert!(b.item.is_none());
    }

    #[test]
    fn test_build_json_display_names_become_ids() {
        let json = r#"{"species": "Landorus-Therian", "nature": "Jolly", "ability": "Intimidate",
            "item": "Choice Scarf", "moves": ["U-turn", "Stone Edge"]}"#;
        let b: CombatantBuild = serde_json::from_str(json).unwrap();
        assert_eq!(b, CombatantBuild::new("landorustherian", "intimidate", "jolly")
            .with_item("choicescarf")
            .with_moves(["uturn", "stoneedge"]));
    }
}
