//! Domain value types shared by every reference entity

mod conditions;
mod nature;
mod pokemon_type;
mod stats;

pub use conditions::Weather;
pub use nature::{Nature, DEFAULT_NATURE};
pub use pokemon_type::{Type, TYPE_CHART};
pub use stats::{calc_stat, Stat, StatTable, EV_STEP, MAX_EV, MAX_EV_TOTAL, MAX_IV};
