//! Team and build legality checks
//!
//! Legality problems are data: [`Validator::validate`] always returns a
//! [`ValidationReport`] holding every violation found in one pass. Checks
//! run in a fixed order so the same roster always yields the same report:
//!
//! 1. roster size
//! 2. species uniqueness (Species Clause)
//! 3. per combatant, in roster order
//! 4. cross-roster clauses (Sleep, OHKO, Evasion Moves, Evasion Items, Baton Pass)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use teamforge_dex::{
    to_id, AbilityEffect, Clause, CombatantBuild, DexProvider, FormatRuleset, ItemEffect, Move,
    Roster, Stat, EV_STEP, MAX_EV, MAX_EV_TOTAL, MAX_IV,
};

/// Moves a legal combatant carries
pub const MOVES_PER_COMBATANT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationCode {
    RosterSize,
    DuplicateSpecies,
    UnknownSpecies,
    UnknownNature,
    UnknownAbility,
    UnknownItem,
    UnknownMove,
    InvalidLevel,
    BannedSpecies,
    BannedAbility,
    BannedItem,
    BannedMove,
    IllegalAbility,
    IllegalMove,
    DuplicateMove,
    MoveCount,
    EvOutOfRange,
    EvNotMultipleOfFour,
    EvTotalExceeded,
    IvOutOfRange,
    SleepClause,
    OhkoClause,
    EvasionMovesClause,
    EvasionItemsClause,
    BatonPassClause,
}

impl ViolationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCode::RosterSize => "roster-size",
            ViolationCode::DuplicateSpecies => "duplicate-species",
            ViolationCode::UnknownSpecies => "unknown-species",
            ViolationCode::UnknownNature => "unknown-nature",
            ViolationCode::UnknownAbility => "unknown-ability",
            ViolationCode::UnknownItem => "unknown-item",
            ViolationCode::UnknownMove => "unknown-move",
            ViolationCode::InvalidLevel => "invalid-level",
            ViolationCode::BannedSpecies => "banned-species",
            ViolationCode::BannedAbility => "banned-ability",
            ViolationCode::BannedItem => "banned-item",
            ViolationCode::BannedMove => "banned-move",
            ViolationCode::IllegalAbility => "illegal-ability",
            ViolationCode::IllegalMove => "illegal-move",
            ViolationCode::DuplicateMove => "duplicate-move",
            ViolationCode::MoveCount => "move-count",
            ViolationCode::EvOutOfRange => "ev-out-of-range",
            ViolationCode::EvNotMultipleOfFour => "ev-not-multiple-of-four",
            ViolationCode::EvTotalExceeded => "ev-total-exceeded",
            ViolationCode::IvOutOfRange => "iv-out-of-range",
            ViolationCode::SleepClause => "sleep-clause",
            ViolationCode::OhkoClause => "ohko-clause",
            ViolationCode::EvasionMovesClause => "evasion-moves-clause",
            ViolationCode::EvasionItemsClause => "evasion-items-clause",
            ViolationCode::BatonPassClause => "baton-pass-clause",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One legality problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub code: ViolationCode,
    /// Roster position, None for roster-wide problems
    pub combatant_index: Option<usize>,
    pub detail: String,
}

impl Violation {
    fn roster(code: ViolationCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            combatant_index: None,
            detail: detail.into(),
        }
    }

    fn combatant(code: ViolationCode, index: usize, detail: impl Into<String>) -> Self {
        Self {
            code,
            combatant_index: Some(index),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.combatant_index {
            Some(i) => write!(f, "[{}] #{}: {}", self.code, i, self.detail),
            None => write!(f, "[{}] {}", self.code, self.detail),
        }
    }
}

/// Ordered list of violations; empty means valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    pub fn codes(&self) -> Vec<ViolationCode> {
        self.violations.iter().map(|v| v.code).collect()
    }

    /// Violations attributed to one roster position
    pub fn for_combatant(&self, index: usize) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.combatant_index == Some(index))
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn extend(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }
}

/// Rules checker over an injected dex
#[derive(Clone, Copy)]
pub struct Validator<'d> {
    dex: &'d dyn DexProvider,
}

impl<'d> Validator<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self { dex }
    }

    /// Check a whole roster. Never fails.
    pub fn validate(&self, roster: &Roster, ruleset: &FormatRuleset) -> ValidationReport {
        let mut report = ValidationReport::default();

        if roster.len() != ruleset.team_size {
            report.push(Violation::roster(
                ViolationCode::RosterSize,
                format!(
                    "roster has {} combatants, {} required",
                    roster.len(),
                    ruleset.team_size
                ),
            ));
        }

        if ruleset.has_clause(Clause::SpeciesClause) {
            let mut seen = BTreeMap::new();
            for (i, build) in roster.iter().enumerate() {
                let key = to_id(&build.species);
                if let Some(first) = seen.insert(key.clone(), i) {
                    seen.insert(key, first);
                    report.push(Violation::combatant(
                        ViolationCode::DuplicateSpecies,
                        i,
                        format!("{} already appears at #{}", build.species, first),
                    ));
                }
            }
        }

        for (i, build) in roster.iter().enumerate() {
            report.extend(self.check_build(build, i, ruleset));
        }

        self.check_clauses(roster, ruleset, &mut report);

        tracing::debug!(
            format = %ruleset.id,
            combatants = roster.len(),
            violations = report.len(),
            "roster validated"
        );
        report
    }

    /// Per-combatant checks only, reported at index 0
    pub fn validate_build(&self, build: &CombatantBuild, ruleset: &FormatRuleset) -> ValidationReport {
        self.check_build(build, 0, ruleset)
    }

    fn check_build(&self, build: &CombatantBuild, index: usize, ruleset: &FormatRuleset) -> ValidationReport {
        let mut report = ValidationReport::default();
        let mut flag = |code: ViolationCode, detail: String| {
            report.push(Violation::combatant(code, index, detail));
        };

        // Builds with public fields may still carry display names
        let species_id = to_id(&build.species);
        let ability = to_id(&build.ability);
        let item = build.item.as_deref().map(to_id);

        let species = self.dex.get_species(&species_id);
        if species.is_none() {
            flag(
                ViolationCode::UnknownSpecies,
                format!("unknown species '{}'", build.species),
            );
        }
        if build.level != ruleset.level {
            flag(
                ViolationCode::InvalidLevel,
                format!("level {} but the format requires {}", build.level, ruleset.level),
            );
        }
        if self.dex.get_nature(&build.nature).is_none() {
            flag(
                ViolationCode::UnknownNature,
                format!("unknown nature '{}'", build.nature),
            );
        }
        if ruleset.is_species_banned(&species_id) {
            flag(
                ViolationCode::BannedSpecies,
                format!("{} is banned", build.species),
            );
        }

        if self.dex.get_ability(&ability).is_none() {
            flag(
                ViolationCode::UnknownAbility,
                format!("unknown ability '{}'", build.ability),
            );
        }
        if ruleset.is_ability_banned(&ability) {
            flag(
                ViolationCode::BannedAbility,
                format!("{} is banned", build.ability),
            );
        }
        if let Some(species) = species
            && !species.can_have_ability(&ability)
        {
            flag(
                ViolationCode::IllegalAbility,
                format!("{} cannot have {}", species.id, build.ability),
            );
        }

        if let Some(item) = &item {
            if self.dex.get_item(item).is_none() {
                flag(ViolationCode::UnknownItem, format!("unknown item '{}'", item));
            }
            if ruleset.is_item_banned(item) {
                flag(ViolationCode::BannedItem, format!("{} is banned", item));
            }
        }

        // Sorted so that move order never changes the report
        let mut move_counts: BTreeMap<String, usize> = BTreeMap::new();
        for mv in &build.moves {
            *move_counts.entry(to_id(mv)).or_default() += 1;
        }
        for (move_id, &count) in &move_counts {
            let move_id = move_id.as_str();
            if self.dex.get_move(move_id).is_none() {
                flag(ViolationCode::UnknownMove, format!("unknown move '{}'", move_id));
            }
            if ruleset.is_move_banned(move_id) {
                flag(ViolationCode::BannedMove, format!("{} is banned", move_id));
            }
            if let Some(species) = species
                && !species.can_learn(move_id)
            {
                flag(
                    ViolationCode::IllegalMove,
                    format!("{} cannot learn {}", species.id, move_id),
                );
            }
            if count > 1 {
                flag(
                    ViolationCode::DuplicateMove,
                    format!("{} appears {} times", move_id, count),
                );
            }
        }
        if move_counts.len() != MOVES_PER_COMBATANT {
            flag(
                ViolationCode::MoveCount,
                format!(
                    "{} distinct moves, {} required",
                    move_counts.len(),
                    MOVES_PER_COMBATANT
                ),
            );
        }

        for (stat, ev) in build.evs.iter() {
            if ev > MAX_EV {
                flag(
                    ViolationCode::EvOutOfRange,
                    format!("{} EVs {} exceed {}", stat, ev, MAX_EV),
                );
            }
            if ev % EV_STEP != 0 {
                flag(
                    ViolationCode::EvNotMultipleOfFour,
                    format!("{} EVs {} are not a multiple of {}", stat, ev, EV_STEP),
                );
            }
        }
        if build.evs.total() > MAX_EV_TOTAL as u32 {
            flag(
                ViolationCode::EvTotalExceeded,
                format!("{} total EVs exceed {}", build.evs.total(), MAX_EV_TOTAL),
            );
        }
        for (stat, iv) in build.ivs.iter() {
            if iv > MAX_IV {
                flag(
                    ViolationCode::IvOutOfRange,
                    format!("{} IV {} exceeds {}", stat, iv, MAX_IV),
                );
            }
        }

        report
    }

    /// Distinct resolvable moves in id order
    fn known_moves(&self, build: &CombatantBuild) -> Vec<&'d Move> {
        let unique: BTreeSet<&str> = build.moves.iter().map(String::as_str).collect();
        unique.into_iter().filter_map(|id| self.dex.get_move(id)).collect()
    }

    fn check_clauses(&self, roster: &Roster, ruleset: &FormatRuleset, report: &mut ValidationReport) {
        if ruleset.has_clause(Clause::SleepClause) {
            let sleepers: Vec<usize> = roster
                .iter()
                .enumerate()
                .filter(|(_, b)| self.known_moves(b).iter().any(|m| m.flags.sleep))
                .map(|(i, _)| i)
                .collect();
            for &i in sleepers.iter().skip(1) {
                report.push(Violation::combatant(
                    ViolationCode::SleepClause,
                    i,
                    format!("second sleep-inducing combatant (first at #{})", sleepers[0]),
                ));
            }
        }

        if ruleset.has_clause(Clause::OhkoClause) {
            for (i, build) in roster.iter().enumerate() {
                for mv in self.known_moves(build).into_iter().filter(|m| m.flags.ohko) {
                    report.push(Violation::combatant(
                        ViolationCode::OhkoClause,
                        i,
                        format!("{} is a one-hit KO move", mv.id),
                    ));
                }
            }
        }

        if ruleset.has_clause(Clause::EvasionMovesClause) {
            for (i, build) in roster.iter().enumerate() {
                for mv in self.known_moves(build).into_iter().filter(|m| m.flags.evasion) {
                    report.push(Violation::combatant(
                        ViolationCode::EvasionMovesClause,
                        i,
                        format!("{} raises evasion", mv.id),
                    ));
                }
            }
        }

        if ruleset.has_clause(Clause::EvasionItemsClause) {
            for (i, build) in roster.iter().enumerate() {
                if let Some(item_id) = &build.item
                    && let Some(item) = self.dex.get_item(item_id)
                    && item.effect == ItemEffect::Evasion
                {
                    report.push(Violation::combatant(
                        ViolationCode::EvasionItemsClause,
                        i,
                        format!("{} raises evasion", item.id),
                    ));
                }
            }
        }

        if ruleset.has_clause(Clause::BatonPassClause) {
            for violation in self.baton_pass_graph(roster).violations() {
                report.push(violation);
            }
        }
    }

    fn baton_pass_graph(&self, roster: &Roster) -> BatonPassGraph {
        let mut graph = BatonPassGraph::default();
        for (i, build) in roster.iter().enumerate() {
            let moves = self.known_moves(build);
            if !moves.iter().any(|m| m.flags.baton_pass) {
                continue;
            }
            let mut boosts: BTreeSet<Stat> = moves
                .iter()
                .flat_map(|m| m.boosts.iter().copied())
                .collect();
            if self
                .dex
                .get_ability(&build.ability)
                .is_some_and(|a| a.effect == AbilityEffect::SpeedBoost)
            {
                boosts.insert(Stat::Spe);
            }
            graph.passers.push((i, boosts));
        }
        graph
    }
}

/// Baton Pass users and the boosts each can hand on.
///
/// Every passer can pass to every other, so boosts flow along chains of
/// passers until nothing new is reachable.
#[derive(Debug, Default)]
struct BatonPassGraph {
    passers: Vec<(usize, BTreeSet<Stat>)>,
}

impl BatonPassGraph {
    /// Boosts each passer can end up holding, indexed like `passers`
    fn reachable(&self) -> Vec<BTreeSet<Stat>> {
        let mut reach: Vec<BTreeSet<Stat>> = self.passers.iter().map(|(_, b)| b.clone()).collect();
        loop {
            let mut changed = false;
            for from in 0..reach.len() {
                for to in 0..reach.len() {
                    if from == to {
                        continue;
                    }
                    let incoming: Vec<Stat> = reach[from].difference(&reach[to]).copied().collect();
                    if !incoming.is_empty() {
                        reach[to].extend(incoming);
                        changed = true;
                    }
                }
            }
            if !changed {
                return reach;
            }
        }
    }

    fn violations(&self) -> Vec<Violation> {
        let mut out = Vec::new();
        for &(i, _) in self.passers.iter().skip(1) {
            out.push(Violation::combatant(
                ViolationCode::BatonPassClause,
                i,
                format!("second Baton Pass user (first at #{})", self.passers[0].0),
            ));
        }
        for (&(i, _), boosts) in self.passers.iter().zip(self.reachable()) {
            if boosts.contains(&Stat::Spe) && boosts.len() > 1 {
                let stats: Vec<&str> = boosts.iter().map(|s| s.label()).collect();
                out.push(Violation::combatant(
                    ViolationCode::BatonPassClause,
                    i,
                    format!("can pass Speed with other boosts ({})", stats.join(", ")),
                ));
            }
        }
        out
    }
}
