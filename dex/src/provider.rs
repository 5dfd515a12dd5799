//! Read-only access to reference data
//!
//! Every engine component receives a `&dyn DexProvider` at construction.
//! Implementations must be safe to share across threads; nothing in the
//! engine mutates reference data.

use std::fmt;

use thiserror::Error;

use crate::effects::{Ability, Item};
use crate::format::FormatRuleset;
use crate::moves::Move;
use crate::records::BuildRecord;
use crate::species::Species;
use crate::types::Nature;

/// Kind of reference record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Species,
    Move,
    Ability,
    Item,
    Nature,
    Format,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Species => "species",
            RecordKind::Move => "move",
            RecordKind::Ability => "ability",
            RecordKind::Item => "item",
            RecordKind::Nature => "nature",
            RecordKind::Format => "format",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A required reference record could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing {kind} reference data for '{id}'")]
pub struct MissingReference {
    pub kind: RecordKind,
    pub id: String,
}

impl MissingReference {
    pub fn new(kind: RecordKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Read-only query interface over reference data
pub trait DexProvider: Send + Sync {
    fn get_species(&self, id: &str) -> Option<&Species>;

    /// Species legal in a format (not banned), sorted by id
    fn list_species(&self, format_id: &str) -> Vec<&Species>;

    fn get_move(&self, id: &str) -> Option<&Move>;

    fn get_ability(&self, id: &str) -> Option<&Ability>;

    fn get_item(&self, id: &str) -> Option<&Item>;

    fn get_nature(&self, id: &str) -> Option<&Nature>;

    fn get_format_ruleset(&self, format_id: &str) -> Option<&FormatRuleset>;

    fn list_build_records(&self, species_id: &str, format_id: &str) -> Vec<&BuildRecord>;

    fn require_species(&self, id: &str) -> Result<&Species, MissingReference> {
        self.get_species(id)
            .ok_or_else(|| MissingReference::new(RecordKind::Species, id))
    }

    fn require_move(&self, id: &str) -> Result<&Move, MissingReference> {
        self.get_move(id)
            .ok_or_else(|| MissingReference::new(RecordKind::Move, id))
    }

    fn require_ability(&self, id: &str) -> Result<&Ability, MissingReference> {
        self.get_ability(id)
            .ok_or_else(|| MissingReference::new(RecordKind::Ability, id))
    }

    fn require_item(&self, id: &str) -> Result<&Item, MissingReference> {
        self.get_item(id)
            .ok_or_else(|| MissingReference::new(RecordKind::Item, id))
    }

    fn require_nature(&self, id: &str) -> Result<&Nature, MissingReference> {
        self.get_nature(id)
            .ok_or_else(|| MissingReference::new(RecordKind::Nature, id))
    }

    fn require_format(&self, format_id: &str) -> Result<&FormatRuleset, MissingReference> {
        self.get_format_ruleset(format_id)
            .ok_or_else(|| MissingReference::new(RecordKind::Format, format_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_message() {
        let err = MissingReference::new(RecordKind::Move, "hyperbeam");
        assert_eq!(err.to_string(), "missing move reference data for 'hyperbeam'");
    }
}
