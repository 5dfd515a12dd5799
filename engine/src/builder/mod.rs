//! Team builder
//!
//! Choosing six of N species with builds cannot be enumerated, so the
//! builder runs a two-phase heuristic:
//!
//! ```text
//! user pool ─> candidate builds ─> validate ─(illegal)─> fallback ─(illegal)─> dropped
//!                    │
//!                    ▼
//! Phase 1: score each candidate alone (defensive / offensive / speed)
//!                    │
//!                    ▼
//!          greedy pick under the role cap
//!                    │
//!                    ▼
//! Phase 2: best-improvement single swaps on the aggregate score
//!                    │
//!                    ▼
//!          repair until validator-clean, else UnresolvedClauses
//! ```
//!
//! The result is reproducible for a fixed pool and dex, but it is not
//! guaranteed to be the best possible team under the scoring model.

mod roles;
mod scoring;

pub use roles::{roles_of, Role, HAZARD_MOVES, HAZARD_REMOVAL_MOVES};
pub use scoring::{benchmark_speed, defensive_score, offensive_score, speed_score};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use teamforge_dex::{to_id, CombatantBuild, DexProvider, FormatRuleset, Roster};

use crate::config::{BuilderConfig, PredictorConfig};
use crate::damage::ResolvedBuild;
use crate::error::{EngineError, Result};
use crate::exec::par_map;
use crate::opponent::{PredictedBuild, Predictor};
use crate::validator::Validator;

/// How to lean the scoring model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrategyHint {
    #[default]
    Balanced,
    HyperOffense,
    Stall,
}

/// Weights applied to the three score components
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub defensive: f64,
    pub offensive: f64,
    pub speed: f64,
}

impl StrategyHint {
    pub fn weights(&self, config: &BuilderConfig) -> ScoreWeights {
        let (d, o, s) = match self {
            StrategyHint::Balanced => (1.0, 1.0, 1.0),
            StrategyHint::HyperOffense => (0.5, 1.5, 1.5),
            StrategyHint::Stall => (1.5, 0.75, 0.5),
        };
        ScoreWeights {
            defensive: config.defensive_weight * d,
            offensive: config.offensive_weight * o,
            speed: config.speed_weight * s,
        }
    }
}

/// What is known about the opposing roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpponentInput {
    /// Concrete builds, each weighted equally
    Builds(Vec<CombatantBuild>),
    /// Bare species, predicted from the format's build records
    Species(Vec<String>),
}

impl OpponentInput {
    pub fn species<S: AsRef<str>>(species: impl IntoIterator<Item = S>) -> Self {
        OpponentInput::Species(species.into_iter().map(|s| to_id(s.as_ref())).collect())
    }
}

impl From<Roster> for OpponentInput {
    fn from(roster: Roster) -> Self {
        OpponentInput::Builds(roster.into_builds())
    }
}

/// Phase 1 score of one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub species: String,
    pub roles: Vec<Role>,
    pub defensive: f64,
    pub offensive: f64,
    pub speed: f64,
    /// Weighted sum of the three components
    pub total: f64,
    /// The build is a fallback rather than a recorded set
    pub low_confidence: bool,
}

impl CandidateScore {
    /// The role counted against the diversity cap
    pub fn primary_role(&self) -> Role {
        self.roles.first().copied().unwrap_or(Role::Support)
    }
}

/// A finished team and how it was scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltTeam {
    pub roster: Roster,
    /// Scores of the members, in roster order
    pub members: Vec<CandidateScore>,
    /// Aggregate score of the final roster
    pub aggregate: f64,
    /// Phase 2 swaps accepted
    pub swaps: usize,
    /// Opposing builds the team was scored against
    pub opponents: Vec<CombatantBuild>,
    pub hint: StrategyHint,
}

struct Candidate<'d> {
    resolved: ResolvedBuild<'d>,
    score: CandidateScore,
}

/// Two-phase roster optimizer over an injected dex
pub struct TeamBuilder<'d> {
    dex: &'d dyn DexProvider,
    config: BuilderConfig,
    predictor: Predictor<'d>,
    validator: Validator<'d>,
}

impl<'d> TeamBuilder<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self::with_config(dex, BuilderConfig::default(), PredictorConfig::default())
    }

    pub fn with_config(dex: &'d dyn DexProvider, config: BuilderConfig, predictor: PredictorConfig) -> Self {
        Self {
            dex,
            config,
            predictor: Predictor::with_config(dex, predictor),
            validator: Validator::new(dex),
        }
    }

    /// Build a validator-clean roster of `ruleset.team_size` species from `pool`
    pub fn build_team<S: AsRef<str>>(
        &self,
        pool: &[S],
        opponent: &OpponentInput,
        ruleset: &FormatRuleset,
        hint: Option<StrategyHint>,
    ) -> Result<BuiltTeam> {
        let required = ruleset.team_size;
        let mut species_ids: Vec<String> = Vec::new();
        for s in pool {
            let id = to_id(s.as_ref());
            if !species_ids.contains(&id) {
                species_ids.push(id);
            }
        }
        if species_ids.len() < required {
            return Err(EngineError::InvalidInput(format!(
                "pool has {} distinct species, {} required",
                species_ids.len(),
                required
            )));
        }

        let (opponents, weights) = self.prepare_opponents(opponent, ruleset)?;

        let mut builds = Vec::new();
        for id in &species_ids {
            if let Some(predicted) = self.prepare_candidate(id, ruleset)? {
                builds.push(predicted);
            }
        }
        if builds.len() < required {
            return Err(EngineError::InsufficientLegalPool {
                legal: builds.len(),
                required,
            });
        }

        let hint = hint.unwrap_or_default();
        let score_weights = hint.weights(&self.config);
        let candidates: Vec<Candidate<'d>> = par_map(&builds, |predicted| {
            self.score_candidate(predicted, &opponents, &weights, score_weights)
        })
        .into_iter()
        .collect::<Result<_>>()?;

        let mut team = self.greedy_pick(&candidates, required);
        let swaps = self.local_search(&mut team, &candidates, ruleset, score_weights);
        self.repair(&mut team, &candidates, ruleset)?;

        let aggregate = self.aggregate(&team, &candidates, ruleset, score_weights);
        let roster = roster_of(&team, &candidates);
        tracing::info!(
            format = %ruleset.id,
            hint = ?hint,
            members = ?roster.species_ids(),
            aggregate,
            swaps,
            "team built"
        );
        Ok(BuiltTeam {
            members: team.iter().map(|&i| candidates[i].score.clone()).collect(),
            roster,
            aggregate,
            swaps,
            opponents: opponents.into_iter().map(|o| o.build).collect(),
            hint,
        })
    }

    fn prepare_opponents(
        &self,
        opponent: &OpponentInput,
        ruleset: &FormatRuleset,
    ) -> Result<(Vec<ResolvedBuild<'d>>, Vec<f64>)> {
        let predicted: Vec<(CombatantBuild, f64)> = match opponent {
            OpponentInput::Builds(builds) => builds.iter().map(|b| (b.clone(), 1.0)).collect(),
            OpponentInput::Species(species) => {
                let mut out = Vec::with_capacity(species.len());
                for s in species {
                    let records = self.dex.list_build_records(s, &ruleset.id);
                    let p = self.predictor.predict_one(s, &records, Some(ruleset))?;
                    let weight = p.usage_weight.filter(|w| *w > 0.0).unwrap_or(1.0);
                    out.push((p.build, weight));
                }
                out
            }
        };
        let mut resolved = Vec::with_capacity(predicted.len());
        let mut weights = Vec::with_capacity(predicted.len());
        for (build, weight) in predicted {
            resolved.push(ResolvedBuild::resolve(&build, self.dex)?);
            weights.push(weight);
        }
        Ok((resolved, weights))
    }

    /// Recorded build if legal, else the fallback if legal, else None
    fn prepare_candidate(&self, species_id: &str, ruleset: &FormatRuleset) -> Result<Option<PredictedBuild>> {
        let species = self.dex.require_species(species_id)?;
        if ruleset.is_species_banned(&species.id) {
            tracing::debug!(species = %species.id, "species banned, skipping");
            return Ok(None);
        }

        let records = self.dex.list_build_records(&species.id, &ruleset.id);
        let predicted = self.predictor.predict_one(&species.id, &records, Some(ruleset))?;
        let report = self.validator.validate_build(&predicted.build, ruleset);
        if report.is_valid() {
            return Ok(Some(predicted));
        }

        if !predicted.low_confidence {
            tracing::warn!(
                species = %species.id,
                violations = report.len(),
                "recorded build is illegal, using fallback build"
            );
            if let Ok(build) = self.predictor.fallback(species, Some(ruleset)) {
                let build = build.with_level(ruleset.level);
                if self.validator.validate_build(&build, ruleset).is_valid() {
                    return Ok(Some(PredictedBuild::low_confidence(build)));
                }
            }
        }

        tracing::warn!(species = %species.id, "no legal build, dropping species");
        Ok(None)
    }

    fn score_candidate(
        &self,
        predicted: &PredictedBuild,
        opponents: &[ResolvedBuild<'d>],
        weights: &[f64],
        score_weights: ScoreWeights,
    ) -> Result<Candidate<'d>> {
        let species = self.dex.require_species(&predicted.build.species)?;
        let resolved = ResolvedBuild::resolve(&predicted.build, self.dex)?;

        let defensive = defensive_score(&resolved, opponents, weights);
        let offensive = offensive_score(&resolved, opponents, self.config.ko_threshold);
        let speed = speed_score(
            benchmark_speed(species, &resolved, self.config.speed_benchmark_evs),
            opponents,
        );
        let total = score_weights.defensive * defensive
            + score_weights.offensive * offensive
            + score_weights.speed * speed;

        tracing::debug!(
            species = %species.id,
            defensive,
            offensive,
            speed,
            total,
            "candidate scored"
        );
        Ok(Candidate {
            score: CandidateScore {
                species: species.id.clone(),
                roles: roles_of(species, &predicted.build, &self.config.roles),
                defensive,
                offensive,
                speed,
                total,
                low_confidence: predicted.low_confidence,
            },
            resolved,
        })
    }

    /// Candidate indices by descending score, ties by species id
    fn ranking(candidates: &[Candidate<'_>]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&candidates[a].score, &candidates[b].score);
            b.total.total_cmp(&a.total).then_with(|| a.species.cmp(&b.species))
        });
        order
    }

    fn greedy_pick(&self, candidates: &[Candidate<'_>], required: usize) -> Vec<usize> {
        let order = Self::ranking(candidates);
        let mut team = Vec::with_capacity(required);
        let mut counts: BTreeMap<Role, usize> = BTreeMap::new();

        for &i in &order {
            if team.len() == required {
                break;
            }
            let role = candidates[i].score.primary_role();
            let count = counts.entry(role).or_default();
            if *count < self.config.role_cap {
                *count += 1;
                team.push(i);
            }
        }

        if team.len() < required {
            tracing::debug!(picked = team.len(), "role cap relaxed to fill the roster");
            for &i in &order {
                if team.len() == required {
                    break;
                }
                if !team.contains(&i) {
                    team.push(i);
                }
            }
        }
        team
    }

    fn within_role_cap(&self, team: &[usize], candidates: &[Candidate<'_>]) -> bool {
        let mut counts: BTreeMap<Role, usize> = BTreeMap::new();
        for &i in team {
            *counts.entry(candidates[i].score.primary_role()).or_default() += 1;
        }
        counts.values().all(|&c| c <= self.config.role_cap)
    }

    /// Weighted average defensive and offensive scores plus summed speed
    /// score, minus the violation penalty
    fn aggregate(
        &self,
        team: &[usize],
        candidates: &[Candidate<'_>],
        ruleset: &FormatRuleset,
        weights: ScoreWeights,
    ) -> f64 {
        let n = team.len().max(1) as f64;
        let defensive: f64 = team.iter().map(|&i| candidates[i].score.defensive).sum::<f64>() / n;
        let offensive: f64 = team.iter().map(|&i| candidates[i].score.offensive).sum::<f64>() / n;
        let speed: f64 = team.iter().map(|&i| candidates[i].score.speed).sum();
        let violations = self.validator.validate(&roster_of(team, candidates), ruleset).len();
        weights.defensive * defensive + weights.offensive * offensive + weights.speed * speed
            - self.config.violation_penalty * violations as f64
    }

    fn local_search(
        &self,
        team: &mut [usize],
        candidates: &[Candidate<'_>],
        ruleset: &FormatRuleset,
        weights: ScoreWeights,
    ) -> usize {
        let enforce_cap = self.within_role_cap(team, candidates);
        let mut current = self.aggregate(team, candidates, ruleset, weights);
        let mut swaps = 0;

        for iteration in 0..self.config.max_swap_iterations {
            let mut trials: Vec<(usize, usize)> = Vec::new();
            for slot in 0..team.len() {
                for cand in 0..candidates.len() {
                    if team.contains(&cand) {
                        continue;
                    }
                    let mut trial = team.to_vec();
                    trial[slot] = cand;
                    if enforce_cap && !self.within_role_cap(&trial, candidates) {
                        continue;
                    }
                    trials.push((slot, cand));
                }
            }

            let scores = par_map(&trials, |&(slot, cand)| {
                let mut trial = team.to_vec();
                trial[slot] = cand;
                self.aggregate(&trial, candidates, ruleset, weights)
            });

            let mut best: Option<(usize, f64)> = None;
            for (t, &score) in scores.iter().enumerate() {
                if score > current && best.is_none_or(|(_, b)| score > b) {
                    best = Some((t, score));
                }
            }
            let Some((t, score)) = best else {
                break;
            };

            let (slot, cand) = trials[t];
            tracing::debug!(
                iteration,
                out = %candidates[team[slot]].score.species,
                into = %candidates[cand].score.species,
                score,
                "swap accepted"
            );
            team[slot] = cand;
            current = score;
            swaps += 1;
        }
        swaps
    }

    /// Replace offending members until the roster validates
    fn repair(&self, team: &mut [usize], candidates: &[Candidate<'_>], ruleset: &FormatRuleset) -> Result<()> {
        let order = Self::ranking(candidates);
        loop {
            let report = self.validator.validate(&roster_of(team, candidates), ruleset);
            if report.is_valid() {
                return Ok(());
            }

            let mut offenders: Vec<usize> = report
                .violations()
                .iter()
                .filter_map(|v| v.combatant_index)
                .collect();
            offenders.sort_unstable();
            offenders.dedup();

            let mut repaired = false;
            'search: for &slot in offenders.iter().rev() {
                for &cand in &order {
                    if team.contains(&cand) {
                        continue;
                    }
                    let mut trial = team.to_vec();
                    trial[slot] = cand;
                    let remaining = self.validator.validate(&roster_of(&trial, candidates), ruleset).len();
                    if remaining < report.len() {
                        tracing::warn!(
                            out = %candidates[team[slot]].score.species,
                            into = %candidates[cand].score.species,
                            remaining,
                            "repair swap"
                        );
                        team[slot] = cand;
                        repaired = true;
                        break 'search;
                    }
                }
            }

            if !repaired {
                let mut blocking = report.codes();
                blocking.sort_unstable();
                blocking.dedup();
                return Err(EngineError::UnresolvedClauses {
                    fitting: team.len() - offenders.len(),
                    required: ruleset.team_size,
                    blocking,
                });
            }
        }
    }
}

fn roster_of(team: &[usize], candidates: &[Candidate<'_>]) -> Roster {
    team.iter()
        .map(|&i| candidates[i].resolved.build.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::validator::ViolationCode;
    use std::collections::BTreeSet;

    const POOL: [&str; 14] = [
        "garchomp",
        "landorustherian",
        "toxapex",
        "magearna",
        "ferrothorn",
        "breloom",
        "scizor",
        "lapras",
        "greninja",
        "mew",
        "dragonite",
        "blissey",
        "kyogre",
        "ninjask",
    ];

    fn assert_clean(dex: &dyn DexProvider, team: &BuiltTeam, ruleset: &FormatRuleset) {
        assert_eq!(team.roster.len(), 6);
        let unique: BTreeSet<&str> = team.roster.species_ids().into_iter().collect();
        assert_eq!(unique.len(), 6);
        let report = Validator::new(dex).validate(&team.roster, ruleset);
        assert!(report.is_valid(), "unexpected violations: {:?}", report);
    }

    #[test]
    fn test_builds_clean_roster() {
        let dex = fixtures::dex();
        let ruleset = fixtures::ou();
        let team = TeamBuilder::new(&dex)
            .build_team(&POOL, &fixtures::opponent_roster().into(), &ruleset, None)
            .unwrap();
        assert_clean(&dex, &team, &ruleset);
        assert!(!team.roster.contains_species("kyogre"));
        assert_eq!(team.members.len(), 6);
        assert_eq!(team.opponents.len(), 6);
        assert!(team.swaps <= BuilderConfig::default().max_swap_iterations);
    }

    #[test]
    fn test_opponent_species_are_predicted() {
        let dex = fixtures::dex();
        let ruleset = fixtures::ou();
        let opponent = OpponentInput::species(["Garchomp", "Tapu Koko", "Heatran", "Greninja"]);
        let team = TeamBuilder::new(&dex)
            .build_team(&POOL, &opponent, &ruleset, Some(StrategyHint::HyperOffense))
            .unwrap();
        assert_clean(&dex, &team, &ruleset);
        assert_eq!(team.hint, StrategyHint::HyperOffense);
        assert_eq!(team.opponents[0].item.as_deref(), Some("rockyhelmet"));
    }

    #[test]
    fn test_every_hint_is_clean() {
        let dex = fixtures::dex();
        let ruleset = fixtures::ou();
        let builder = TeamBuilder::new(&dex);
        for hint in [StrategyHint::Balanced, StrategyHint::HyperOffense, StrategyHint::Stall] {
            let team = builder
                .build_team(&POOL, &fixtures::opponent_roster().into(), &ruleset, Some(hint))
                .unwrap();
            assert_clean(&dex, &team, &ruleset);
        }
    }

    #[test]
    fn test_deterministic() {
        let dex = fixtures::dex();
        let ruleset = fixtures::ou();
        let builder = TeamBuilder::new(&dex);
        let opponent: OpponentInput = fixtures::opponent_roster().into();
        let a = builder.build_team(&POOL, &opponent, &ruleset, None).unwrap();
        let b = builder.build_team(&POOL, &opponent, &ruleset, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pool_too_small() {
        let dex = fixtures::dex();
        let err = TeamBuilder::new(&dex)
            .build_team(&POOL[..5], &fixtures::opponent_roster().into(), &fixtures::ou(), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let dex = fixtures::dex();
        let pool = ["garchomp", "Garchomp", "toxapex", "magearna", "ferrothorn", "breloom"];
        let err = TeamBuilder::new(&dex)
            .build_team(&pool, &fixtures::opponent_roster().into(), &fixtures::ou(), None)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_insufficient_legal_pool() {
        let dex = fixtures::dex();
        let pool = ["garchomp", "toxapex", "magearna", "ferrothorn", "breloom", "kyogre"];
        let err = TeamBuilder::new(&dex)
            .build_team(&pool, &fixtures::opponent_roster().into(), &fixtures::ou(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientLegalPool {
                legal: 5,
                required: 6
            }
        ));
    }

    #[test]
    fn test_repair_reports_blocking_clause() {
        let dex = fixtures::dex();
        let ruleset = fixtures::ou();
        let builder = TeamBuilder::new(&dex);
        let (opponents, weights) = builder
            .prepare_opponents(&fixtures::opponent_roster().into(), &ruleset)
            .unwrap();
        let pool = ["garchomp", "toxapex", "magearna", "ferrothorn", "breloom", "smeargle"];
        let mut candidates: Vec<Candidate<'_>> = pool
            .iter()
            .map(|s| builder.prepare_candidate(s, &ruleset).unwrap().unwrap())
            .map(|p| {
                builder
                    .score_candidate(&p, &opponents, &weights, StrategyHint::Balanced.weights(&builder.config))
                    .unwrap()
            })
            .collect();
        // Breloom already carries Spore; a second sleeper trips the clause
        let smeargle = candidates.iter_mut().find(|c| c.score.species == "smeargle").unwrap();
        smeargle.resolved.build = smeargle
            .resolved
            .build
            .clone()
            .with_moves(["spore", "uturn", "knockoff", "protect"]);

        let mut team: Vec<usize> = (0..6).collect();
        let err = builder.repair(&mut team, &candidates, &ruleset).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnresolvedClauses {
                fitting: 5,
                required: 6,
                blocking: vec![ViolationCode::SleepClause],
            }
        );
        assert!(err.to_string().contains("sleep-clause"));
    }

    #[test]
    fn test_illegal_record_falls_back() {
        let dex = fixtures::dex();
        let builder = TeamBuilder::new(&dex);
        let lapras = builder.prepare_candidate("lapras", &fixtures::ou()).unwrap().unwrap();
        assert!(lapras.low_confidence);
        assert!(!lapras.build.has_move("spore"));
        assert_eq!(lapras.build.moves, vec!["freezedry", "icebeam", "hydropump", "surf"]);
    }

    #[test]
    fn test_greedy_respects_role_cap() {
        let dex = fixtures::dex();
        let ruleset = fixtures::ou();
        let builder = TeamBuilder::new(&dex);
        let (opponents, weights) = builder
            .prepare_opponents(&fixtures::opponent_roster().into(), &ruleset)
            .unwrap();
        let candidates: Vec<Candidate<'_>> = POOL
            .iter()
            .filter_map(|s| builder.prepare_candidate(s, &ruleset).unwrap())
            .map(|p| {
                builder
                    .score_candidate(&p, &opponents, &weights, StrategyHint::Balanced.weights(&builder.config))
                    .unwrap()
            })
            .collect();
        let team = builder.greedy_pick(&candidates, 6);
        assert_eq!(team.len(), 6);
        assert!(builder.within_role_cap(&team, &candidates));
    }

    #[test]
    fn test_primary_role_is_first_role() {
        let mut score = CandidateScore {
            species: "ferrothorn".to_string(),
            roles: vec![Role::Tank, Role::HazardSetter],
            defensive: 0.0,
            offensive: 0.0,
            speed: 0.0,
            total: 0.0,
            low_confidence: false,
        };
        assert_eq!(score.primary_role(), Role::Tank);
        score.roles.clear();
        assert_eq!(score.primary_role(), Role::Support);
    }

    #[test]
    fn test_hint_weights() {
        let config = BuilderConfig::default();
        let offense = StrategyHint::HyperOffense.weights(&config);
        let stall = StrategyHint::Stall.weights(&config);
        assert!(offense.offensive > stall.offensive);
        assert!(stall.defensive > offense.defensive);
    }
}
