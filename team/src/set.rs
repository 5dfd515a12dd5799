//! Name-level team sets and their resolution against a dex

use serde::{Deserialize, Serialize};
use teamforge_dex::{
    to_id, CombatantBuild, DexProvider, MissingReference, RecordKind, StatTable, DEFAULT_NATURE,
};

use crate::error::ResolveError;

/// One set as written in a paste: display names, nothing resolved yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSet {
    pub nickname: Option<String>,
    pub species: String,
    /// "M" or "F"
    pub gender: Option<String>,
    pub item: Option<String>,
    pub ability: Option<String>,
    pub level: u8,
    pub nature: Option<String>,
    pub evs: StatTable,
    pub ivs: StatTable,
    pub moves: Vec<String>,
}

impl TeamSet {
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            nickname: None,
            species: species.into(),
            gender: None,
            item: None,
            ability: None,
            level: 100,
            nature: None,
            evs: StatTable::default(),
            ivs: StatTable::max_ivs(),
            moves: Vec::new(),
        }
    }

    /// Resolve names to ids and check every reference exists.
    ///
    /// A missing ability falls back to the species' first ability and a
    /// missing nature to Serious.
    pub fn resolve(&self, dex: &dyn DexProvider) -> Result<CombatantBuild, ResolveError> {
        let species = dex.require_species(&self.species)?;

        let ability = match &self.ability {
            Some(name) => dex.require_ability(name)?.id.clone(),
            None => species
                .default_ability()
                .map(str::to_string)
                .ok_or_else(|| ResolveError::NoAbility(species.id.clone()))?,
        };

        let nature = match &self.nature {
            Some(name) => dex.require_nature(name)?.id.clone(),
            None => DEFAULT_NATURE.to_string(),
        };

        let item = match &self.item {
            Some(name) => Some(dex.require_item(name)?.id.clone()),
            None => None,
        };

        let moves = self
            .moves
            .iter()
            .map(|name| {
                dex.get_move(name)
                    .map(|m| m.id.clone())
                    .ok_or_else(|| MissingReference::new(RecordKind::Move, to_id(name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CombatantBuild {
            species: species.id.clone(),
            level: self.level,
            nature,
            ability,
            item,
            moves,
            evs: self.evs,
            ivs: self.ivs,
        })
    }

    /// Display-name set for a build. Ids the dex does not know are kept as-is.
    pub fn from_build(build: &CombatantBuild, dex: &dyn DexProvider) -> Self {
        let species = dex
            .get_species(&build.species)
            .map_or_else(|| build.species.clone(), |s| s.name.clone());
        let ability = dex
            .get_ability(&build.ability)
            .map_or_else(|| build.ability.clone(), |a| a.name.clone());
        let nature = dex
            .get_nature(&build.nature)
            .map_or_else(|| build.nature.clone(), |n| n.name.clone());
        let item = build.item.as_ref().map(|id| {
            dex.get_item(id)
                .map_or_else(|| id.clone(), |i| i.name.clone())
        });
        let moves = build
            .moves
            .iter()
            .map(|id| dex.get_move(id).map_or_else(|| id.clone(), |m| m.name.clone()))
            .collect();

        Self {
            nickname: None,
            species,
            gender: None,
            item,
            ability: Some(ability),
            level: build.level,
            nature: Some(nature),
            evs: build.evs,
            ivs: build.ivs,
            moves,
        }
    }
}
