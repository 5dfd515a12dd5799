//! Format rulesets: ban lists and clauses

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::to_id;

/// Named format restriction beyond simple ban lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Clause {
    /// No two combatants of the same species
    SpeciesClause,
    /// At most one combatant with a sleep-inducing move
    SleepClause,
    /// No one-hit KO moves
    OhkoClause,
    /// No moves that raise evasion
    EvasionMovesClause,
    /// No items that lower foe accuracy
    EvasionItemsClause,
    /// Baton Pass chain restrictions
    BatonPassClause,
}

impl Clause {
    pub const ALL: [Clause; 6] = [
        Clause::SpeciesClause,
        Clause::SleepClause,
        Clause::OhkoClause,
        Clause::EvasionMovesClause,
        Clause::EvasionItemsClause,
        Clause::BatonPassClause,
    ];

    /// Parse a Showdown rule name ("Sleep Clause Mod", "OHKO Clause", ...)
    pub fn from_rule(rule: &str) -> Option<Self> {
        match to_id(rule).as_str() {
            "speciesclause" => Some(Clause::SpeciesClause),
            "sleepclause" | "sleepclausemod" => Some(Clause::SleepClause),
            "ohkoclause" => Some(Clause::OhkoClause),
            "evasionmovesclause" => Some(Clause::EvasionMovesClause),
            "evasionitemsclause" => Some(Clause::EvasionItemsClause),
            "batonpassclause" | "batonpassmod" | "onebatonpassclause" => {
                Some(Clause::BatonPassClause)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Clause::SpeciesClause => "Species Clause",
            Clause::SleepClause => "Sleep Clause Mod",
            Clause::OhkoClause => "OHKO Clause",
            Clause::EvasionMovesClause => "Evasion Moves Clause",
            Clause::EvasionItemsClause => "Evasion Items Clause",
            Clause::BatonPassClause => "Baton Pass Clause",
        }
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_team_size() -> usize {
    6
}

fn default_level() -> u8 {
    100
}

/// Everything the validator needs to know about one format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRuleset {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub banned_species: BTreeSet<String>,
    #[serde(default)]
    pub banned_abilities: BTreeSet<String>,
    #[serde(default)]
    pub banned_items: BTreeSet<String>,
    #[serde(default)]
    pub banned_moves: BTreeSet<String>,

    #[serde(default)]
    pub clauses: BTreeSet<Clause>,

    #[serde(default = "default_team_size")]
    pub team_size: usize,

    /// Level every combatant must be at
    #[serde(default = "default_level")]
    pub level: u8,
}

impl FormatRuleset {
    /// Empty ruleset: no bans, no clauses
    pub fn new(name: &str) -> Self {
        Self {
            id: to_id(name),
            name: name.to_string(),
            banned_species: BTreeSet::new(),
            banned_abilities: BTreeSet::new(),
            banned_items: BTreeSet::new(),
            banned_moves: BTreeSet::new(),
            clauses: BTreeSet::new(),
            team_size: default_team_size(),
            level: default_level(),
        }
    }

    /// Build from a Showdown-style rule list.
    ///
    /// Entries are clause names (`"Sleep Clause Mod"`), prefixed bans
    /// (`"Ability: Moody"`, `"Item: King's Rock"`, `"Move: Baton Pass"`) or
    /// plain species names. A leading `-` is accepted and ignored.
    pub fn from_rules<'a>(name: &str, rules: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ruleset = Self::new(name);
        for rule in rules {
            let rule = rule.trim().trim_start_matches('-').trim();
            if rule.is_empty() {
                continue;
            }
            if let Some(clause) = Clause::from_rule(rule) {
                ruleset.clauses.insert(clause);
                continue;
            }
            match rule.split_once(':') {
                Some((kind, value)) => {
                    let value = to_id(value);
                    match to_id(kind).as_str() {
                        "ability" => ruleset.banned_abilities.insert(value),
                        "item" => ruleset.banned_items.insert(value),
                        "move" => ruleset.banned_moves.insert(value),
                        _ => ruleset.banned_species.insert(value),
                    };
                }
                None => {
                    ruleset.banned_species.insert(to_id(rule));
                }
            }
        }
        ruleset
    }

    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.insert(clause);
        self
    }

    pub fn without_clause(mut self, clause: Clause) -> Self {
        self.clauses.remove(&clause);
        self
    }

    pub fn has_clause(&self, clause: Clause) -> bool {
        self.clauses.contains(&clause)
    }

    pub fn is_species_banned(&self, id: &str) -> bool {
        self.banned_species.contains(id)
    }

    pub fn is_ability_banned(&self, id: &str) -> bool {
        self.banned_abilities.contains(id)
    }

    pub fn is_item_banned(&self, id: &str) -> bool {
        self.banned_items.contains(id)
    }

    pub fn is_move_banned(&self, id: &str) -> bool {
        self.banned_moves.contains(id)
    }
}
