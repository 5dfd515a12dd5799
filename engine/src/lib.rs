//! Team construction and matchup analysis for Pokemon Showdown.
//!
//! Every component reads reference data through an injected
//! [`DexProvider`] and is a pure function of its inputs.
//!
//! # Overview
//!
//! ```text
//! teamforge-dex (data model + DexProvider)
//!        │
//!        ▼
//! teamforge-engine ← THIS CRATE
//!   damage ──┬──> builder (two-phase roster search)
//!            ├──> evs (benchmark-driven EV allocation)
//!            ├──> analysis ─> strategy
//!            └──> recommend
//!   validator ─> builder
//!   opponent ──> builder
//! ```
//!
//! # Main Types
//!
//! - [`DamageCalculator`], [`DamageRange`], [`ko_chance`] - Single-exchange damage
//! - [`Validator`], [`ValidationReport`] - Format legality
//! - [`Predictor`], [`PredictedBuild`] - Opponent build prediction
//! - [`TeamBuilder`], [`BuiltTeam`] - Roster construction
//! - [`EvOptimizer`], [`Benchmark`] - EV allocation
//! - [`MatchupAnalyzer`], [`MatchupReport`], [`suggest_lead`] - Two-roster analysis
//! - [`generate_strategy`], [`analyze_synergy`], [`Recommender`] - Advice
//! - [`Engine`] - All of the above behind one handle and one [`EngineConfig`]
//!
//! # Example Usage
//!
//! ```ignore
//! use teamforge_dex::MemoryDex;
//! use teamforge_engine::{Engine, OpponentInput};
//!
//! let dex = MemoryDex::from_json(&std::fs::read_to_string("gen7.json")?)?;
//! let engine = Engine::new(&dex);
//!
//! let team = engine.build_team(&pool, &OpponentInput::species(["Garchomp", "Heatran"]), "gen7ou", None)?;
//! let report = engine.analyze(&team.roster, &opponents)?;
//! println!("Lead with {:?}", engine.suggest_lead(&report));
//! ```

pub mod analysis;
pub mod builder;
pub mod config;
pub mod damage;
mod error;
pub mod evs;
mod exec;
pub mod opponent;
pub mod recommend;
pub mod strategy;
pub mod synergy;
pub mod validator;

#[cfg(test)]
mod fixtures;

pub use analysis::{suggest_lead, MatchupAnalyzer, MatchupReport, Side};
pub use builder::{BuiltTeam, OpponentInput, Role, StrategyHint, TeamBuilder};
pub use config::{AnalysisConfig, BuilderConfig, EngineConfig, EvConfig, PredictorConfig, RoleThresholds};
pub use damage::{best_move, hits_to_ko, ko_chance, DamageCalculator, DamageContext, DamageRange, KoChance};
pub use error::{EngineError, Result};
pub use evs::{Benchmark, EvOptimization, EvOptimizer, UnmetBenchmark, UnmetReason};
pub use opponent::{PredictedBuild, Predictor};
pub use recommend::{ItemScore, MoveRecommendations, Recommender};
pub use strategy::{generate_strategy, StrategyPlan};
pub use synergy::{analyze_synergy, SynergyReport};
pub use validator::{ValidationReport, Validator, Violation, ViolationCode};

use teamforge_dex::{CombatantBuild, DexProvider, FormatRuleset, Roster};

/// Every engine operation over one dex and one configuration
#[derive(Clone)]
pub struct Engine<'d> {
    dex: &'d dyn DexProvider,
    config: EngineConfig,
}

impl<'d> Engine<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self::with_config(dex, EngineConfig::default())
    }

    pub fn with_config(dex: &'d dyn DexProvider, config: EngineConfig) -> Self {
        Self { dex, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dex(&self) -> &'d dyn DexProvider {
        self.dex
    }

    pub fn ruleset(&self, format_id: &str) -> Result<&'d FormatRuleset> {
        Ok(self.dex.require_format(format_id)?)
    }

    pub fn validate(&self, roster: &Roster, ruleset: &FormatRuleset) -> ValidationReport {
        Validator::new(self.dex).validate(roster, ruleset)
    }

    pub fn estimate(
        &self,
        attacker: &CombatantBuild,
        defender: &CombatantBuild,
        move_id: &str,
        ctx: &DamageContext,
    ) -> Result<DamageRange> {
        DamageCalculator::new(self.dex).estimate_by_id(attacker, defender, move_id, ctx)
    }

    pub fn predict<S: AsRef<str>>(&self, species: &[S], format_id: &str) -> Result<Vec<PredictedBuild>> {
        self.predictor().predict_for_format(species, format_id)
    }

    pub fn build_team<S: AsRef<str>>(
        &self,
        pool: &[S],
        opponent: &OpponentInput,
        format_id: &str,
        hint: Option<StrategyHint>,
    ) -> Result<BuiltTeam> {
        let ruleset = self.ruleset(format_id)?;
        TeamBuilder::with_config(self.dex, self.config.builder.clone(), self.config.predictor.clone())
            .build_team(pool, opponent, ruleset, hint)
    }

    pub fn optimize_evs(&self, build: &CombatantBuild, benchmarks: &[Benchmark]) -> Result<EvOptimization> {
        EvOptimizer::with_config(self.dex, self.config.ev.clone()).optimize(build, benchmarks)
    }

    pub fn analyze(&self, user: &Roster, opponent: &Roster) -> Result<MatchupReport> {
        MatchupAnalyzer::with_config(self.dex, self.config.analysis.clone())
            .with_pressure_threshold(self.config.builder.ko_threshold)
            .analyze(user, opponent)
    }

    pub fn suggest_lead(&self, report: &MatchupReport) -> Option<String> {
        suggest_lead(report)
    }

    pub fn generate_strategy(&self, report: &MatchupReport) -> StrategyPlan {
        generate_strategy(report, &self.config.analysis)
    }

    pub fn analyze_synergy(&self, roster: &Roster) -> Result<SynergyReport> {
        analyze_synergy(self.dex, roster, &self.config.builder.roles, &self.config.analysis)
    }

    pub fn recommend_moves(
        &self,
        build: &CombatantBuild,
        opponents: &Roster,
        format_id: Option<&str>,
    ) -> Result<MoveRecommendations> {
        let ruleset = format_id.map(|id| self.ruleset(id)).transpose()?;
        Recommender::new(self.dex).recommend_moves(build, opponents, ruleset)
    }

    pub fn recommend_items<S: AsRef<str>>(
        &self,
        build: &CombatantBuild,
        candidates: &[S],
        opponents: &Roster,
        format_id: Option<&str>,
    ) -> Result<Vec<ItemScore>> {
        let ruleset = format_id.map(|id| self.ruleset(id)).transpose()?;
        Recommender::new(self.dex).recommend_items(build, candidates, opponents, ruleset)
    }

    fn predictor(&self) -> Predictor<'d> {
        Predictor::with_config(self.dex, self.config.predictor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format() {
        let dex = fixtures::dex();
        let err = Engine::new(&dex)
            .build_team(&["garchomp"], &OpponentInput::Builds(vec![]), "gen9ou", None)
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingReferenceData(_)));
    }

    #[test]
    fn test_config_reaches_components() {
        let dex = fixtures::dex();
        let mut config = EngineConfig::default();
        config.ev.max_steps = 5;
        let engine = Engine::with_config(&dex, config);
        let result = engine
            .optimize_evs(&fixtures::garchomp(), &[Benchmark::Outspeed { target_speed: 400 }])
            .unwrap();
        assert!(!result.all_met());
        assert_eq!(result.unmet[0].reason, UnmetReason::BudgetExhausted);
    }

    #[test]
    fn test_pressure_follows_builder_threshold() {
        let dex = fixtures::dex();
        let pressures = |config: EngineConfig| -> Vec<f64> {
            Engine::with_config(&dex, config)
                .analyze(&fixtures::ou_roster(), &fixtures::opponent_roster())
                .unwrap()
                .combatants
                .iter()
                .map(|c| c.pressure)
                .collect()
        };
        let base = pressures(EngineConfig::default());
        assert!(base.iter().any(|p| *p > 0.0));

        let mut strict = EngineConfig::default();
        strict.builder.ko_threshold = 1.01;
        assert!(pressures(strict).iter().all(|p| *p == 0.0));

        let mut threats_only = EngineConfig::default();
        threats_only.analysis.probable_ko_threshold = 1.01;
        assert_eq!(pressures(threats_only), base);
    }

    #[test]
    fn test_facade_round() {
        let dex = fixtures::dex();
        let engine = Engine::new(&dex);
        let ou = engine.ruleset("gen7ou").unwrap();
        assert!(engine.validate(&fixtures::ou_roster(), ou).is_valid());
        let report = engine.analyze(&fixtures::ou_roster(), &fixtures::opponent_roster()).unwrap();
        let plan = engine.generate_strategy(&report);
        assert_eq!(plan.lead, engine.suggest_lead(&report));
        let predicted = engine.predict(&["Landorus-Therian"], "gen7ou").unwrap();
        assert_eq!(predicted[0].role.as_deref(), Some("Choice Scarf"));
    }
}
