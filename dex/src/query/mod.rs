//! Type matchup queries used by the team builder and analyzers

mod matchup;

pub use matchup::DefensiveProfile;
