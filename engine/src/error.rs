use teamforge_dex::MissingReference;
use thiserror::Error;

use crate::validator::ViolationCode;

/// Failures of engine operations.
///
/// Legality problems and unmet EV benchmarks are reported as data
/// (`ValidationReport`, `EvOptimization::unmet`) and never show up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Only {legal} legal species in the pool, {required} required")]
    InsufficientLegalPool { legal: usize, required: usize },

    /// Every species is legal alone but roster-wide clauses keep some out
    #[error("Only {fitting} of {required} combatants fit together, blocked by {}", join_codes(.blocking))]
    UnresolvedClauses {
        fitting: usize,
        required: usize,
        blocking: Vec<ViolationCode>,
    },

    #[error(transparent)]
    MissingReferenceData(#[from] MissingReference),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn join_codes(codes: &[ViolationCode]) -> String {
    codes.iter().map(ViolationCode::as_str).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
