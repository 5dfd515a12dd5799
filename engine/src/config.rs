//! Tunable policy for every engine component
//!
//! None of these values are game mechanics. They encode the scoring model
//! and budgets, and are expected to be retuned when the metagame shifts.
//! Partial JSON is accepted; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub predictor: PredictorConfig,
    pub builder: BuilderConfig,
    pub ev: EvConfig,
    pub analysis: AnalysisConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Opponent build selection policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Prefer usage-statistics records over analyses when both exist
    pub prefer_usage: bool,
    /// Nature given to fallback builds
    pub fallback_nature: String,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            prefer_usage: true,
            fallback_nature: teamforge_dex::DEFAULT_NATURE.to_string(),
        }
    }
}

/// Stat thresholds used to tag a species with a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleThresholds {
    /// Base Speed above which a strong attacker counts as a sweeper
    pub sweeper_speed: u16,
    /// Base Atk or SpA a sweeper needs
    pub sweeper_attack: u16,
    /// Base Atk or SpA above which a species is a wallbreaker
    pub wallbreaker_attack: u16,
    /// Base Def and SpD above which a species is a tank
    pub tank_defense: u16,
}

impl Default for RoleThresholds {
    fn default() -> Self {
        Self {
            sweeper_speed: 100,
            sweeper_attack: 100,
            wallbreaker_attack: 120,
            tank_defense: 100,
        }
    }
}

/// Team builder scoring model and search budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub defensive_weight: f64,
    pub offensive_weight: f64,
    pub speed_weight: f64,
    /// Subtracted from the aggregate score per unresolved violation
    pub violation_penalty: f64,
    /// Maximum members sharing one role before the cap is relaxed
    pub role_cap: usize,
    /// Phase 2 swap budget
    pub max_swap_iterations: usize,
    /// KO probability at which an opponent counts as threatened; matchup
    /// pressure uses the same value
    pub ko_threshold: f64,
    /// Speed EVs assumed for the speed-control benchmark
    pub speed_benchmark_evs: u16,
    pub roles: RoleThresholds,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            defensive_weight: 1.0,
            offensive_weight: 1.0,
            speed_weight: 1.0,
            violation_penalty: 10.0,
            role_cap: 2,
            max_swap_iterations: 25,
            ko_threshold: 0.5,
            speed_benchmark_evs: 252,
            roles: RoleThresholds::default(),
        }
    }
}

/// EV optimizer budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvConfig {
    /// Maximum number of 4-EV increments across all benchmarks
    pub max_steps: usize,
}

impl Default for EvConfig {
    fn default() -> Self {
        Self { max_steps: 127 }
    }
}

/// Matchup analysis and strategy thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// KO probability at which a pair is listed as a threat
    pub probable_ko_threshold: f64,
    /// Weak user combatants needed before a type is a vulnerability
    pub vulnerability_threshold: usize,
    /// Final Speed a win-condition sweeper needs
    pub sweeper_speed: u16,
    /// Share of opponents a sweeper must hit super effectively
    pub sweeper_coverage: f64,
    /// Final Atk or SpA a wallbreaker needs
    pub wallbreaker_attack: u16,
    /// Share of opponents a wallbreaker must hit super effectively
    pub wallbreaker_coverage: f64,
    /// Members weak to one type before a roster-wide weakness is reported
    pub shared_weakness_threshold: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            probable_ko_threshold: 0.5,
            vulnerability_threshold: 2,
            sweeper_speed: 100,
            sweeper_coverage: 0.7,
            wallbreaker_attack: 100,
            wallbreaker_coverage: 0.5,
            shared_weakness_threshold: 3,
        }
    }
}
