//! Reference data model and stat math for Pokemon Showdown team building.
//!
//! This crate holds the immutable reference entities (species, moves,
//! abilities, items, natures, format rulesets, build records), the mutable
//! [`CombatantBuild`] and [`Roster`] values built from them, and the
//! [`DexProvider`] interface every engine component reads through.
//!
//! # Overview
//!
//! ```text
//! external data (JSON, scrapers, ...)
//!        │
//!        ▼
//! teamforge-dex (data model + DexProvider) ← THIS CRATE
//!        │
//!        ├─> teamforge-team (Showdown paste import/export)
//!        └─> teamforge-engine (damage, validation, team building, analysis)
//! ```
//!
//! # Main Types
//!
//! - [`Type`] - Types with the generation 7 effectiveness chart
//! - [`StatTable`], [`Stat`], [`calc_stat`] - Stat sextuples and the stat formula
//! - [`Nature`] - The 25 natures
//! - [`Species`], [`Move`], [`Ability`], [`Item`] - Reference entities
//! - [`FormatRuleset`], [`Clause`] - Ban lists and clauses
//! - [`BuildRecord`] - Analysis and usage-statistics builds
//! - [`CombatantBuild`], [`Roster`] - Concrete teams
//! - [`DexProvider`], [`MemoryDex`] - Read-only data access
//!
//! # Example Usage
//!
//! ```ignore
//! use teamforge_dex::{CombatantBuild, DexProvider, MemoryDex, Stat};
//!
//! let dex = MemoryDex::from_json(&std::fs::read_to_string("gen7.json")?)?;
//! let chomp = CombatantBuild::new("Garchomp", "Rough Skin", "Jolly")
//!     .with_ev(Stat::Atk, 252)
//!     .with_ev(Stat::Spe, 252);
//! let stats = chomp.final_stats(&dex)?;
//! println!("Garchomp speed: {}", stats.spe);
//! ```

mod combatant;
mod effects;
mod format;
mod id;
mod memory;
mod moves;
mod provider;
pub mod query;
mod records;
mod species;
pub mod types;

pub use combatant::{CombatantBuild, Roster};
pub use effects::{Ability, AbilityEffect, Item, ItemEffect};
pub use format::{Clause, FormatRuleset};
pub use id::to_id;
pub use memory::{DexData, DexError, MemoryDex};
pub use moves::{Move, MoveCategory, MoveFlags, MoveTarget};
pub use provider::{DexProvider, MissingReference, RecordKind};
pub use records::{
    BuildRecord, BuildSource, RecordedBuild, SetTemplate, SpreadEntry, UsageProfile, Weighted,
};
pub use species::Species;
pub use types::{
    calc_stat, Nature, Stat, StatTable, Type, Weather, DEFAULT_NATURE, EV_STEP, MAX_EV,
    MAX_EV_TOTAL, MAX_IV, TYPE_CHART,
};
