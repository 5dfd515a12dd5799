//! Move and item recommendations for one combatant against a roster
//!
//! Both recommenders rank options by what they change in single-exchange
//! estimates: damage dealt, damage taken, and who moves first.

use serde::{Deserialize, Serialize};
use teamforge_dex::{to_id, CombatantBuild, DexProvider, FormatRuleset, ItemEffect, Move, Roster};

use crate::damage::{best_move, estimate_resolved, DamageContext, ResolvedBuild};
use crate::error::Result;

/// Status moves worth a slot regardless of matchup, in display order
pub const UTILITY_MOVES: [&str; 18] = [
    "stealthrock",
    "spikes",
    "toxicspikes",
    "stickyweb",
    "defog",
    "rapidspin",
    "recover",
    "roost",
    "softboiled",
    "wish",
    "healbell",
    "toxic",
    "willowisp",
    "thunderwave",
    "leechseed",
    "haze",
    "taunt",
    "encore",
];

/// Items considered when the caller supplies none
pub const COMMON_ITEMS: [&str; 10] = [
    "leftovers",
    "blacksludge",
    "rockyhelmet",
    "focussash",
    "lifeorb",
    "choiceband",
    "choicespecs",
    "choicescarf",
    "expertbelt",
    "assaultvest",
];

const PRIORITY_BONUS: f64 = 0.1;
const LEFTOVERS_RECOVERY: f64 = 1.0 / 16.0;
const ROCKY_HELMET_CHIP: f64 = 1.0 / 6.0;
const FOCUS_SASH_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveScore {
    pub move_id: String,
    /// Mean guaranteed damage share across the roster, plus a priority bonus
    pub score: f64,
    pub super_effective_on: Vec<String>,
    pub immune: Vec<String>,
    pub priority: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecommendations {
    /// Best first
    pub ranked: Vec<MoveScore>,
    /// Learnable moves from [`UTILITY_MOVES`]
    pub utility: Vec<String>,
}

impl MoveRecommendations {
    pub fn top(&self, n: usize) -> impl Iterator<Item = &str> {
        self.ranked.iter().take(n).map(|m| m.move_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemScore {
    pub item_id: String,
    /// Mean gain in guaranteed damage share dealt
    pub offense: f64,
    /// Mean drop in maximum damage share taken
    pub defense: f64,
    /// Gain in the share of the roster outsped
    pub speed: f64,
    /// Recovery, chip and survival effects outside the damage formula
    pub passive: f64,
    pub total: f64,
}

pub struct Recommender<'d> {
    dex: &'d dyn DexProvider,
}

impl<'d> Recommender<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self { dex }
    }

    /// Rank every legal damaging move the species learns
    pub fn recommend_moves(
        &self,
        build: &CombatantBuild,
        opponents: &Roster,
        ruleset: Option<&FormatRuleset>,
    ) -> Result<MoveRecommendations> {
        let species = self.dex.require_species(&build.species)?;
        let attacker = ResolvedBuild::resolve(build, self.dex)?;
        let opponents = self.resolve(opponents)?;
        let ctx = DamageContext::default();

        let legal: Vec<&Move> = species
            .learnset
            .iter()
            .filter(|id| ruleset.is_none_or(|r| !r.is_move_banned(id)))
            .filter_map(|id| self.dex.get_move(id))
            .collect();

        let mut ranked: Vec<MoveScore> = legal
            .iter()
            .filter(|m| m.is_damaging() && !m.flags.ohko)
            .map(|mv| {
                let mut dealt = 0.0;
                let mut super_effective_on = Vec::new();
                let mut immune = Vec::new();
                for opp in &opponents {
                    let range = estimate_resolved(&attacker.combatant, &opp.combatant, mv, &ctx);
                    dealt += range.min_percent.min(100.0) / 100.0;
                    if range.effectiveness == 0.0 {
                        immune.push(opp.species().to_string());
                    } else if range.effectiveness > 1.0 {
                        super_effective_on.push(opp.species().to_string());
                    }
                }
                let priority = mv.priority > 0;
                let mean = if opponents.is_empty() { 0.0 } else { dealt / opponents.len() as f64 };
                MoveScore {
                    move_id: mv.id.clone(),
                    score: mean + if priority { PRIORITY_BONUS } else { 0.0 },
                    super_effective_on,
                    immune,
                    priority,
                }
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.move_id.cmp(&b.move_id)));

        let utility = UTILITY_MOVES
            .iter()
            .filter(|id| legal.iter().any(|m| m.id == **id))
            .map(|id| id.to_string())
            .collect();

        Ok(MoveRecommendations { ranked, utility })
    }

    /// Score each candidate item against holding nothing. Banned items and
    /// Eviolite (no evolution data) are skipped.
    pub fn recommend_items<S: AsRef<str>>(
        &self,
        build: &CombatantBuild,
        candidates: &[S],
        opponents: &Roster,
        ruleset: Option<&FormatRuleset>,
    ) -> Result<Vec<ItemScore>> {
        let mut bare = build.clone();
        bare.item = None;
        let bare = ResolvedBuild::resolve(&bare, self.dex)?;
        let opponents = self.resolve(opponents)?;
        let ctx = DamageContext::default();
        let baseline = self.exchange(&bare, &opponents, &ctx);

        let mut scores = Vec::with_capacity(candidates.len());
        for id in candidates {
            let item = self.dex.require_item(&to_id(id.as_ref()))?;
            if ruleset.is_some_and(|r| r.is_item_banned(&item.id)) || item.effect == ItemEffect::Eviolite {
                tracing::debug!(item = %item.id, "item skipped");
                continue;
            }

            let held = ResolvedBuild::resolve(&build.clone().with_item(&item.id), self.dex)?;
            let with = self.exchange(&held, &opponents, &ctx);
            let passive = self.passive(&item.id, &held, &with);
            let offense = with.dealt - baseline.dealt;
            let defense = baseline.taken - with.taken;
            let speed = with.outsped - baseline.outsped;
            scores.push(ItemScore {
                item_id: item.id.clone(),
                offense,
                defense,
                speed,
                passive,
                total: offense + defense + speed + passive,
            });
        }
        scores.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.item_id.cmp(&b.item_id)));
        Ok(scores)
    }

    fn resolve(&self, roster: &Roster) -> Result<Vec<ResolvedBuild<'d>>> {
        roster
            .iter()
            .map(|b| ResolvedBuild::resolve(b, self.dex).map_err(Into::into))
            .collect()
    }

    fn exchange(&self, holder: &ResolvedBuild<'_>, opponents: &[ResolvedBuild<'_>], ctx: &DamageContext) -> Exchange {
        let mut out = Exchange::default();
        if opponents.is_empty() {
            return out;
        }
        let speed = holder.combatant.effective_speed();
        for opp in opponents {
            if let Some(dealt) = best_move(holder, opp, ctx) {
                out.dealt += dealt.range.min_percent.min(100.0) / 100.0;
            }
            if let Some(taken) = best_move(opp, holder, ctx) {
                out.taken += taken.range.max_percent.min(100.0) / 100.0;
                if taken.ko.ohko_probability > 0.0 {
                    out.ohko_threats += 1;
                }
                if self.dex.get_move(&taken.move_id).is_some_and(|m| m.flags.contact) {
                    out.contact_hits += 1;
                }
            }
            if speed > opp.combatant.effective_speed() {
                out.outsped += 1.0;
            }
        }
        let n = opponents.len() as f64;
        out.dealt /= n;
        out.taken /= n;
        out.outsped /= n;
        out.count = opponents.len();
        out
    }

    fn passive(&self, item_id: &str, holder: &ResolvedBuild<'_>, exchange: &Exchange) -> f64 {
        let share = |count: usize| {
            if exchange.count == 0 { 0.0 } else { count as f64 / exchange.count as f64 }
        };
        match item_id {
            "leftovers" => LEFTOVERS_RECOVERY,
            "blacksludge" if holder.combatant.has_type(teamforge_dex::Type::Poison) => LEFTOVERS_RECOVERY,
            // Non-Poison holders lose 1/8 per turn
            "blacksludge" => -2.0 * LEFTOVERS_RECOVERY,
            "rockyhelmet" => ROCKY_HELMET_CHIP * share(exchange.contact_hits),
            "focussash" => FOCUS_SASH_WEIGHT * share(exchange.ohko_threats),
            _ => 0.0,
        }
    }
}

/// Mean single-exchange figures of one holder against a roster
#[derive(Debug, Default)]
struct Exchange {
    dealt: f64,
    taken: f64,
    outsped: f64,
    ohko_threats: usize,
    contact_hits: usize,
    count: usize,
}
