//! Opponent modelling: turn bare species into concrete builds
//!
//! Record selection per species:
//!
//! ```text
//! usage-stats records? ──yes──> latest period ─> highest weight ─> first listed
//!        │no
//!        ▼
//! analysis records?   ──yes──> highest total base power ─> first listed
//!        │no
//!        ▼
//! fallback build (low confidence)
//! ```
//!
//! Usage records that carry per-slot distributions are materialized slot by
//! slot (most frequent ability, item, spread and four most frequent moves).
//! Such a build may never have been used as a whole by anyone and is marked
//! `composite`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use teamforge_dex::{
    to_id, BuildRecord, BuildSource, CombatantBuild, DexProvider, FormatRuleset, RecordedBuild,
    SetTemplate, Species, StatTable, UsageProfile, Weighted,
};

use crate::config::PredictorConfig;
use crate::error::{EngineError, Result};
use crate::validator::MOVES_PER_COMBATANT;

/// A predicted build and where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedBuild {
    pub build: CombatantBuild,
    /// None for fallback builds
    pub source: Option<BuildSource>,
    pub role: Option<String>,
    /// Weight of the usage record the build came from
    pub usage_weight: Option<f64>,
    /// No record existed; the build is a minimal default
    pub low_confidence: bool,
    /// Assembled slot by slot from a usage distribution
    pub composite: bool,
}

impl PredictedBuild {
    pub(crate) fn low_confidence(build: CombatantBuild) -> Self {
        Self {
            build,
            source: None,
            role: None,
            usage_weight: None,
            low_confidence: true,
            composite: false,
        }
    }

    pub fn species(&self) -> &str {
        &self.build.species
    }
}

/// Build predictor over an injected dex
#[derive(Clone)]
pub struct Predictor<'d> {
    dex: &'d dyn DexProvider,
    config: PredictorConfig,
}

impl<'d> Predictor<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self::with_config(dex, PredictorConfig::default())
    }

    pub fn with_config(dex: &'d dyn DexProvider, config: PredictorConfig) -> Self {
        Self { dex, config }
    }

    /// One build per species, in input order, choosing among `records`
    pub fn predict<S: AsRef<str>>(&self, species: &[S], records: &[BuildRecord]) -> Result<Vec<PredictedBuild>> {
        species
            .iter()
            .map(|s| {
                let id = to_id(s.as_ref());
                let own: Vec<&BuildRecord> = records.iter().filter(|r| to_id(&r.species) == id).collect();
                self.predict_one(&id, &own, None)
            })
            .collect()
    }

    /// As [`predict`](Self::predict) with records and bans from the dex
    pub fn predict_for_format<S: AsRef<str>>(&self, species: &[S], format_id: &str) -> Result<Vec<PredictedBuild>> {
        let ruleset = self.dex.require_format(format_id)?;
        species
            .iter()
            .map(|s| {
                let records = self.dex.list_build_records(s.as_ref(), format_id);
                self.predict_one(s.as_ref(), &records, Some(ruleset))
            })
            .collect()
    }

    /// Predict a single species from the records given
    pub fn predict_one(
        &self,
        species_id: &str,
        records: &[&BuildRecord],
        ruleset: Option<&FormatRuleset>,
    ) -> Result<PredictedBuild> {
        let species = self.dex.require_species(species_id)?;
        let level = ruleset.map_or(100, |r| r.level);

        let Some(record) = self.select_record(records) else {
            let build = self.fallback(species, ruleset)?.with_level(level);
            tracing::warn!(
                species = %species.id,
                moves = ?build.moves,
                "no build records, using fallback build"
            );
            return Ok(PredictedBuild::low_confidence(build));
        };

        let (build, composite) = match &record.build {
            RecordedBuild::Fixed(set) => (self.from_template(species, set), false),
            RecordedBuild::Distribution(profile) => (self.from_profile(species, profile), true),
        };
        tracing::debug!(
            species = %species.id,
            source = %record.source,
            composite,
            "predicted build"
        );
        Ok(PredictedBuild {
            build: build.with_level(level),
            source: Some(record.source.clone()),
            role: record.role.clone(),
            usage_weight: record.source.is_usage().then_some(record.weight),
            low_confidence: false,
            composite,
        })
    }

    /// Pick the record the selection policy prefers, if any
    pub fn select_record<'r>(&self, records: &[&'r BuildRecord]) -> Option<&'r BuildRecord> {
        let usage = self.best_usage(records);
        let analysis = self.best_analysis(records);
        if self.config.prefer_usage {
            usage.or(analysis)
        } else {
            analysis.or(usage)
        }
    }

    fn best_usage<'r>(&self, records: &[&'r BuildRecord]) -> Option<&'r BuildRecord> {
        let mut best: Option<&'r BuildRecord> = None;
        for &record in records {
            let Some(period) = record.source.period() else {
                continue;
            };
            let better = match best {
                None => true,
                Some(current) => {
                    let current_period = current.source.period().unwrap_or_default();
                    period > current_period || (period == current_period && record.weight > current.weight)
                }
            };
            if better {
                best = Some(record);
            }
        }
        best
    }

    fn best_analysis<'r>(&self, records: &[&'r BuildRecord]) -> Option<&'r BuildRecord> {
        let mut best: Option<(&'r BuildRecord, u32)> = None;
        for &record in records.iter().filter(|r| r.source == BuildSource::Analysis) {
            let power = self.total_base_power(record);
            if best.is_none_or(|(_, p)| power > p) {
                best = Some((record, power));
            }
        }
        best.map(|(record, _)| record)
    }

    /// Sum of base power over the record's moves. Unknown moves count zero.
    pub fn total_base_power(&self, record: &BuildRecord) -> u32 {
        record
            .move_ids()
            .into_iter()
            .filter_map(|id| self.dex.get_move(id))
            .map(|m| m.base_power as u32)
            .sum()
    }

    fn from_template(&self, species: &Species, set: &SetTemplate) -> CombatantBuild {
        let mut build = CombatantBuild::new(&species.id, &set.ability, &set.nature)
            .with_moves(set.moves.iter().map(String::as_str))
            .with_evs(set.evs)
            .with_ivs(set.ivs);
        if let Some(item) = &set.item {
            build = build.with_item(item);
        }
        build
    }

    fn from_profile(&self, species: &Species, profile: &UsageProfile) -> CombatantBuild {
        let ability = top(&profile.abilities, Ord::cmp)
            .map(String::as_str)
            .or(species.default_ability())
            .unwrap_or_default();
        let (nature, evs) = match top(&profile.spreads, |a, b| a.nature.cmp(&b.nature)) {
            Some(spread) => (spread.nature.as_str(), spread.evs),
            None => (self.config.fallback_nature.as_str(), StatTable::default()),
        };

        let mut moves: Vec<&Weighted<String>> = profile.moves.iter().collect();
        moves.sort_by(|a, b| b.frequency.total_cmp(&a.frequency).then_with(|| a.value.cmp(&b.value)));
        let mut chosen: Vec<&str> = Vec::with_capacity(MOVES_PER_COMBATANT);
        for mv in moves {
            if chosen.len() == MOVES_PER_COMBATANT {
                break;
            }
            if !chosen.contains(&mv.value.as_str()) {
                chosen.push(&mv.value);
            }
        }

        let mut build = CombatantBuild::new(&species.id, ability, nature)
            .with_moves(chosen)
            .with_evs(evs);
        if let Some(item) = top(&profile.items, Ord::cmp) {
            build = build.with_item(item);
        }
        build
    }

    /// Minimal default build: fallback nature, no item, first legal ability,
    /// first four legal damaging learnset moves (padded with other legal
    /// learnset moves when short), zero EVs.
    pub fn fallback(&self, species: &Species, ruleset: Option<&FormatRuleset>) -> Result<CombatantBuild> {
        let ability = species
            .abilities
            .iter()
            .find(|a| ruleset.is_none_or(|r| !r.is_ability_banned(a)))
            .ok_or_else(|| EngineError::InvalidInput(format!("{} has no legal ability", species.id)))?;

        let legal: Vec<&str> = species
            .learnset
            .iter()
            .map(String::as_str)
            .filter(|m| ruleset.is_none_or(|r| !r.is_move_banned(m)))
            .filter(|m| self.dex.get_move(m).is_some())
            .collect();
        let is_damaging = |id: &str| self.dex.get_move(id).is_some_and(|m| m.is_damaging());

        let mut moves: Vec<&str> = legal
            .iter()
            .copied()
            .filter(|m| is_damaging(*m))
            .take(MOVES_PER_COMBATANT)
            .collect();
        let missing = MOVES_PER_COMBATANT - moves.len();
        moves.extend(legal.iter().copied().filter(|m| !is_damaging(*m)).take(missing));

        Ok(CombatantBuild::new(&species.id, ability, &self.config.fallback_nature).with_moves(moves))
    }
}

/// Most frequent entry, ties going to the entry `order` ranks first
fn top<T>(entries: &[Weighted<T>], order: impl Fn(&T, &T) -> Ordering) -> Option<&T> {
    entries
        .iter()
        .max_by(|a, b| a.frequency.total_cmp(&b.frequency).then_with(|| order(&b.value, &a.value)))
        .map(|w| &w.value)
}
