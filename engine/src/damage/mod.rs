//! Damage calculator
//!
//! Produces the closed-form 16-roll damage range of one move in a static
//! snapshot, plus KO chances derived from that range.

mod context;
pub mod pipeline;

pub use context::{Combatant, DamageContext, ResolvedBuild};
pub use pipeline::Modifier;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use teamforge_dex::{CombatantBuild, DexProvider, Move};

use crate::error::Result;

/// Number of random damage rolls
pub const ROLL_COUNT: usize = 16;

/// Damage range of one move, in defender HP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
    /// Every roll, lowest first, at the minimum hit count
    pub rolls: [u32; ROLL_COUNT],
    pub defender_hp: u32,
    pub min_percent: f64,
    pub max_percent: f64,
    /// Hit count range (1, 1) for single-hit moves
    pub hits: (u8, u8),
    /// Type effectiveness after ability immunities (1.0 = neutral)
    pub effectiveness: f32,
}

impl DamageRange {
    /// The range for a move that deals no direct damage
    pub fn zero(defender_hp: u32) -> Self {
        Self {
            min: 0,
            max: 0,
            rolls: [0; ROLL_COUNT],
            defender_hp,
            min_percent: 0.0,
            max_percent: 0.0,
            hits: (1, 1),
            effectiveness: 1.0,
        }
    }

    pub fn roll_count(&self) -> usize {
        ROLL_COUNT
    }

    pub fn is_zero(&self) -> bool {
        self.max == 0
    }

    fn from_rolls(per_hit: [u32; ROLL_COUNT], hits: (u8, u8), defender_hp: u32, effectiveness: f32) -> Self {
        let rolls = per_hit.map(|r| r * hits.0 as u32);
        let min = rolls[0];
        let max = per_hit[ROLL_COUNT - 1] * hits.1 as u32;
        Self {
            min,
            max,
            rolls,
            defender_hp,
            min_percent: percent(min, defender_hp),
            max_percent: percent(max, defender_hp),
            hits,
            effectiveness,
        }
    }
}

fn percent(damage: u32, hp: u32) -> f64 {
    if hp == 0 {
        return 0.0;
    }
    damage as f64 * 100.0 / hp as f64
}

/// KO odds derived from a damage range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KoChance {
    /// Every roll KOs
    pub guaranteed_ohko: bool,
    /// Two lowest rolls KO
    pub guaranteed_2hko: bool,
    /// Share of the 16 rolls that KO
    pub ohko_probability: f64,
    /// Share of the 256 roll pairs whose sum KOs
    pub two_hko_probability: f64,
}

impl KoChance {
    /// Best KO probability within two hits
    pub fn within_two(&self) -> f64 {
        self.ohko_probability.max(self.two_hko_probability)
    }
}

/// KO odds of a range against a defender at `current_hp`
pub fn ko_chance(range: &DamageRange, current_hp: u32) -> KoChance {
    if current_hp == 0 {
        return KoChance {
            guaranteed_ohko: true,
            guaranteed_2hko: true,
            ohko_probability: 1.0,
            two_hko_probability: 1.0,
        };
    }
    let ohko_rolls = range.rolls.iter().filter(|r| **r >= current_hp).count();
    let mut two_hit_pairs = 0usize;
    for a in &range.rolls {
        for b in &range.rolls {
            if a + b >= current_hp {
                two_hit_pairs += 1;
            }
        }
    }
    KoChance {
        guaranteed_ohko: range.rolls[0] >= current_hp,
        guaranteed_2hko: range.rolls[0] * 2 >= current_hp,
        ohko_probability: ohko_rolls as f64 / ROLL_COUNT as f64,
        two_hko_probability: two_hit_pairs as f64 / (ROLL_COUNT * ROLL_COUNT) as f64,
    }
}

/// Hits needed to KO at the lowest roll, None if the move does no damage
pub fn hits_to_ko(range: &DamageRange, hp: u32) -> Option<u32> {
    if range.min == 0 {
        return None;
    }
    Some(hp.div_ceil(range.min).max(1))
}

/// Damage calculator over an injected dex
#[derive(Clone, Copy)]
pub struct DamageCalculator<'d> {
    dex: &'d dyn DexProvider,
}

impl<'d> DamageCalculator<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self { dex }
    }

    /// Damage range of `mv` from `attacker` into `defender`
    pub fn estimate(
        &self,
        attacker: &CombatantBuild,
        defender: &CombatantBuild,
        mv: &Move,
        ctx: &DamageContext,
    ) -> Result<DamageRange> {
        let attacker = Combatant::resolve(attacker, self.dex)?;
        let defender = Combatant::resolve(defender, self.dex)?;
        Ok(estimate_resolved(&attacker, &defender, mv, ctx))
    }

    /// As [`estimate`](Self::estimate) with the move looked up by id
    pub fn estimate_by_id(
        &self,
        attacker: &CombatantBuild,
        defender: &CombatantBuild,
        move_id: &str,
        ctx: &DamageContext,
    ) -> Result<DamageRange> {
        let mv = self.dex.require_move(move_id)?;
        self.estimate(attacker, defender, mv, ctx)
    }
}

/// Run the pipeline on already resolved combatants
pub fn estimate_resolved(attacker: &Combatant, defender: &Combatant, mv: &Move, ctx: &DamageContext) -> DamageRange {
    let hp = defender.max_hp();
    if !mv.is_damaging() {
        return DamageRange::zero(hp);
    }
    let out = pipeline::run(attacker, defender, mv, ctx);
    DamageRange::from_rolls(out.rolls, mv.hit_range(), hp, out.quarters as f32 / 4.0)
}

/// The best move of one attacker into one defender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    pub move_id: String,
    pub range: DamageRange,
    pub ko: KoChance,
}

impl MoveOutcome {
    /// Ranking key: KO odds within two hits, then guaranteed damage
    fn beats(&self, other: &MoveOutcome) -> bool {
        let key = |o: &MoveOutcome| (o.ko.within_two(), o.ko.ohko_probability, o.range.min);
        key(self).partial_cmp(&key(other)) == Some(Ordering::Greater)
    }
}

/// Highest-ranked damaging move, first listed on ties. None if no move
/// deals damage.
pub fn best_move(attacker: &ResolvedBuild<'_>, defender: &ResolvedBuild<'_>, ctx: &DamageContext) -> Option<MoveOutcome> {
    let hp = defender.combatant.max_hp();
    let mut best: Option<MoveOutcome> = None;
    for mv in attacker.damaging_moves() {
        let range = estimate_resolved(&attacker.combatant, &defender.combatant, mv, ctx);
        if range.is_zero() {
            continue;
        }
        let outcome = MoveOutcome {
            move_id: mv.id.clone(),
            ko: ko_chance(&range, hp),
            range,
        };
        if best.as_ref().is_none_or(|b| outcome.beats(b)) {
            best = Some(outcome);
        }
    }
    best
}
