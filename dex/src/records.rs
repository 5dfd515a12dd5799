//! Externally sourced build records (analyses and usage statistics)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::StatTable;

/// Where a build record came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BuildSource {
    /// Expert-written analysis
    Analysis,
    /// Aggregated usage statistics for a period such as `2019-06`.
    /// Periods compare lexicographically, so they must be zero-padded.
    UsageStats { period: String },
}

impl BuildSource {
    pub fn is_usage(&self) -> bool {
        matches!(self, BuildSource::UsageStats { .. })
    }

    pub fn period(&self) -> Option<&str> {
        match self {
            BuildSource::UsageStats { period } => Some(period),
            BuildSource::Analysis => None,
        }
    }
}

impl fmt::Display for BuildSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildSource::Analysis => write!(f, "analysis"),
            BuildSource::UsageStats { period } => write!(f, "usage-stats:{}", period),
        }
    }
}

impl FromStr for BuildSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "analysis" {
            return Ok(BuildSource::Analysis);
        }
        match s.strip_prefix("usage-stats:") {
            Some(period) if !period.is_empty() => Ok(BuildSource::UsageStats {
                period: period.to_string(),
            }),
            _ => Err(format!("unknown build source: {}", s)),
        }
    }
}

impl TryFrom<String> for BuildSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BuildSource> for String {
    fn from(value: BuildSource) -> Self {
        value.to_string()
    }
}

/// A value with its observed frequency (0.0 - 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    pub value: T,
    pub frequency: f64,
}

impl<T> Weighted<T> {
    pub fn new(value: T, frequency: f64) -> Self {
        Self { value, frequency }
    }
}

/// Nature plus EV spread, as usage statistics report them together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadEntry {
    pub nature: String,
    pub evs: StatTable,
}

fn max_ivs() -> StatTable {
    StatTable::max_ivs()
}

/// One concrete set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTemplate {
    pub ability: String,
    #[serde(default)]
    pub item: Option<String>,
    pub nature: String,
    pub moves: Vec<String>,
    #[serde(default)]
    pub evs: StatTable,
    #[serde(default = "max_ivs")]
    pub ivs: StatTable,
}

/// Per-slot frequency tables from usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageProfile {
    pub abilities: Vec<Weighted<String>>,
    pub items: Vec<Weighted<String>>,
    pub moves: Vec<Weighted<String>>,
    pub spreads: Vec<Weighted<SpreadEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordedBuild {
    Fixed(SetTemplate),
    Distribution(UsageProfile),
}

/// A candidate build for one species in one format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub species: String,
    pub format: String,
    pub source: BuildSource,

    /// Role name from an analysis ("Stealth Rock Setter", "Swords Dance", ...)
    #[serde(default)]
    pub role: Option<String>,

    /// Usage weight; meaningless for analysis records
    #[serde(default)]
    pub weight: f64,

    pub build: RecordedBuild,
}

impl BuildRecord {
    /// Move ids listed by this record, in record order
    pub fn move_ids(&self) -> Vec<&str> {
        match &self.build {
            RecordedBuild::Fixed(set) => set.moves.iter().map(String::as_str).collect(),
            RecordedBuild::Distribution(profile) => {
                profile.moves.iter().map(|m| m.value.as_str()).collect()
            }
        }
    }
}
