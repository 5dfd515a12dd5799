//! In-memory reference data, loadable from JSON

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::effects::{Ability, Item};
use crate::format::FormatRuleset;
use crate::moves::Move;
use crate::provider::{DexProvider, RecordKind};
use crate::records::BuildRecord;
use crate::species::Species;
use crate::to_id;
use crate::types::Nature;

/// Errors from loading reference data
#[derive(Debug, Error)]
pub enum DexError {
    #[error("Invalid dex JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: RecordKind, id: String },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Serialized form of a whole dex. Natures default to the standard 25.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DexData {
    pub species: Vec<Species>,
    pub moves: Vec<Move>,
    pub abilities: Vec<Ability>,
    pub items: Vec<Item>,
    pub natures: Vec<Nature>,
    pub formats: Vec<FormatRuleset>,
    pub records: Vec<BuildRecord>,
}

/// A [`DexProvider`] backed by ordered maps
#[derive(Debug, Clone)]
pub struct MemoryDex {
    species: BTreeMap<String, Species>,
    moves: BTreeMap<String, Move>,
    abilities: BTreeMap<String, Ability>,
    items: BTreeMap<String, Item>,
    natures: BTreeMap<String, Nature>,
    formats: BTreeMap<String, FormatRuleset>,
    records: Vec<BuildRecord>,
}

impl Default for MemoryDex {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: RecordKind,
    id: &str,
    value: T,
) -> Result<(), DexError> {
    let id = to_id(id);
    if id.is_empty() {
        return Err(DexError::InvalidRecord(format!("{} with an empty id", kind)));
    }
    if map.contains_key(&id) {
        return Err(DexError::DuplicateId { kind, id });
    }
    map.insert(id, value);
    Ok(())
}

/// Exact id first, then the normalized form of a display name
fn lookup<'a, T>(map: &'a BTreeMap<String, T>, id: &str) -> Option<&'a T> {
    map.get(id).or_else(|| map.get(&to_id(id)))
}

impl MemoryDex {
    /// Empty dex seeded with the standard natures
    pub fn new() -> Self {
        let natures = Nature::standard()
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();
        Self {
            species: BTreeMap::new(),
            moves: BTreeMap::new(),
            abilities: BTreeMap::new(),
            items: BTreeMap::new(),
            natures,
            formats: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DexError> {
        let data: DexData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    pub fn from_data(data: DexData) -> Result<Self, DexError> {
        let mut dex = Self::new();
        if !data.natures.is_empty() {
            dex.natures.clear();
        }
        for nature in data.natures {
            let id = nature.id.clone();
            insert_unique(&mut dex.natures, RecordKind::Nature, &id, nature)?;
        }
        for species in data.species {
            if species.types.is_empty() || species.types.len() > 2 {
                return Err(DexError::InvalidRecord(format!(
                    "species {} must have one or two types",
                    species.id
                )));
            }
            let id = species.id.clone();
            insert_unique(&mut dex.species, RecordKind::Species, &id, species)?;
        }
        for mv in data.moves {
            let id = mv.id.clone();
            insert_unique(&mut dex.moves, RecordKind::Move, &id, mv)?;
        }
        for ability in data.abilities {
            let id = ability.id.clone();
            insert_unique(&mut dex.abilities, RecordKind::Ability, &id, ability)?;
        }
        for item in data.items {
            let id = item.id.clone();
            insert_unique(&mut dex.items, RecordKind::Item, &id, item)?;
        }
        for format in data.formats {
            let id = format.id.clone();
            insert_unique(&mut dex.formats, RecordKind::Format, &id, format)?;
        }
        dex.records = data.records;
        Ok(dex)
    }

    pub fn with_species(mut self, species: Species) -> Self {
        self.species.insert(to_id(&species.id), species);
        self
    }

    pub fn with_move(mut self, mv: Move) -> Self {
        self.moves.insert(to_id(&mv.id), mv);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.insert(to_id(&ability.id), ability);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.insert(to_id(&item.id), item);
        self
    }

    pub fn with_format(mut self, format: FormatRuleset) -> Self {
        self.formats.insert(to_id(&format.id), format);
        self
    }

    pub fn with_record(mut self, record: BuildRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl DexProvider for MemoryDex {
    fn get_species(&self, id: &str) -> Option<&Species> {
        lookup(&self.species, id)
    }

    fn list_species(&self, format_id: &str) -> Vec<&Species> {
        let ruleset = self.get_format_ruleset(format_id);
        self.species
            .values()
            .filter(|s| ruleset.is_none_or(|r| !r.is_species_banned(&s.id)))
            .collect()
    }

    fn get_move(&self, id: &str) -> Option<&Move> {
        lookup(&self.moves, id)
    }

    fn get_ability(&self, id: &str) -> Option<&Ability> {
        lookup(&self.abilities, id)
    }

    fn get_item(&self, id: &str) -> Option<&Item> {
        lookup(&self.items, id)
    }

    fn get_nature(&self, id: &str) -> Option<&Nature> {
        lookup(&self.natures, id)
    }

    fn get_format_ruleset(&self, format_id: &str) -> Option<&FormatRuleset> {
        lookup(&self.formats, format_id)
    }

    fn list_build_records(&self, species_id: &str, format_id: &str) -> Vec<&BuildRecord> {
        let species_id = to_id(species_id);
        let format_id = to_id(format_id);
        self.records
            .iter()
            .filter(|r| to_id(&r.species) == species_id && to_id(&r.format) == format_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StatTable, Type};

    const SMALL_DEX: &str = r#"{
        "species": [
            {"id": "mew", "name": "Mew", "baseStats": {"hp": 100, "atk": 100, "def": 100, "spa": 100, "spd": 100, "spe": 100},
             "types": ["Psychic"], "abilities": ["synchronize"], "learnset": ["psychic"]},
            {"id": "kyogre", "name": "Kyogre", "baseStats": {"hp": 100, "atk": 100, "def": 90, "spa": 150, "spd": 140, "spe": 90},
             "types": ["Water"], "abilities": ["drizzle"], "learnset": ["surf"]}
        ],
        "moves": [
            {"id": "psychic", "name": "Psychic", "type": "Psychic", "category": "Special", "basePower": 90, "accuracy": 100}
        ],
        "formats": [
            {"id": "gen7ou", "name": "[Gen 7] OU", "bannedSpecies": ["kyogre"], "clauses": ["speciesClause"]}
        ],
        "records": [
            {"species": "mew", "format": "gen7ou", "source": "analysis",
             "build": {"fixed": {"ability": "synchronize", "nature": "timid", "moves": ["psychic"]}}}
        ]
    }"#;

    #[test]
    fn test_load_and_lookup() {
        let dex = MemoryDex::from_json(SMALL_DEX).unwrap();
        assert_eq!(dex.species_count(), 2);
        assert_eq!(dex.get_species("Mew").map(|s| s.types.clone()), Some(vec![Type::Psychic]));
        assert!(dex.get_move("psychic").is_some());
        assert!(dex.get_nature("Timid").is_some());
        assert!(dex.get_format_ruleset("gen7ou").is_some());
    }

    #[test]
    fn test_list_species_excludes_bans() {
        let dex = MemoryDex::from_json(SMALL_DEX).unwrap();
        let ou: Vec<&str> = dex.list_species("gen7ou").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ou, vec!["mew"]);
        // Unknown format: nothing is banned
        assert_eq!(dex.list_species("gen7ubers").len(), 2);
    }

    #[test]
    fn test_list_build_records() {
        let dex = MemoryDex::from_json(SMALL_DEX).unwrap();
        assert_eq!(dex.list_build_records("mew", "gen7ou").len(), 1);
        assert!(dex.list_build_records("mew", "gen7uu").is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let data = DexData {
            species: vec![
                Species {
                    id: "mew".into(),
                    name: "Mew".into(),
                    base_stats: StatTable::uniform(100),
                    types: vec![Type::Psychic],
                    abilities: vec!["synchronize".into()],
                    learnset: vec![],
                };
                2
            ],
            ..DexData::default()
        };
        match MemoryDex::from_data(data) {
            Err(DexError::DuplicateId { kind, id }) => {
                assert_eq!(kind, RecordKind::Species);
                assert_eq!(id, "mew");
            }
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(MemoryDex::from_json("{"), Err(DexError::Json(_))));
    }
}
