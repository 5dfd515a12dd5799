//! Showdown team paste import and export.
//!
//! A paste is the plain-text format the Showdown teambuilder imports and
//! exports. Parsing yields name-level [`TeamSet`]s; [`TeamSet::resolve`]
//! turns a set into a [`CombatantBuild`](teamforge_dex::CombatantBuild)
//! once a dex is available to check every name.
//!
//! # Example Usage
//!
//! ```ignore
//! use teamforge_team::{export_paste, parse_paste, TeamSet};
//!
//! let sets = parse_paste(&text)?;
//! let builds = sets
//!     .iter()
//!     .map(|s| s.resolve(&dex))
//!     .collect::<Result<Vec<_>, _>>()?;
//!
//! let back: Vec<TeamSet> = builds.iter().map(|b| TeamSet::from_build(b, &dex)).collect();
//! println!("{}", export_paste(&back));
//! ```

mod error;
mod paste;
mod set;

pub use error::{ImportError, ParseError, ResolveError};
pub use paste::{export_paste, parse_paste};
pub use set::TeamSet;

use teamforge_dex::{DexProvider, Roster};

/// Parse a paste and resolve every set into a roster
pub fn import_roster(text: &str, dex: &dyn DexProvider) -> Result<Roster, ImportError> {
    let sets = parse_paste(text)?;
    let builds = sets
        .iter()
        .map(|s| s.resolve(dex))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Roster::from_builds(builds))
}

/// Export a roster with display names from the dex
pub fn export_roster(roster: &Roster, dex: &dyn DexProvider) -> String {
    let sets: Vec<TeamSet> = roster.iter().map(|b| TeamSet::from_build(b, dex)).collect();
    export_paste(&sets)
}

