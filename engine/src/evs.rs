//! EV optimizer
//!
//! Greedy search over the EV lattice (each stat 0..=252 in steps of 4,
//! total at most 510). Starting from zero investment, benchmarks are
//! satisfied in input order. For the current benchmark each step adds 4 EVs
//! to whichever relevant stat gives the best margin, ties going to the
//! earlier stat in HP/Atk/Def/SpA/SpD/Spe order. A benchmark that cannot be
//! met is rolled back and reported, so later benchmarks start from the last
//! good spread. Adding EVs never lowers a stat, so earlier benchmarks stay
//! met; they are re-checked anyway.

use serde::{Deserialize, Serialize};
use teamforge_dex::{CombatantBuild, DexProvider, Move, MoveCategory, Stat, StatTable, EV_STEP, MAX_EV, MAX_EV_TOTAL};

use crate::config::EvConfig;
use crate::damage::{estimate_resolved, Combatant, DamageContext};
use crate::error::Result;

/// A goal for one combatant's spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Benchmark {
    /// Final Speed (Choice Scarf applied) strictly above `target_speed`
    #[serde(rename_all = "camelCase")]
    Outspeed { target_speed: u32 },
    /// Take the highest roll of `move_id` from `attacker` and keep at least
    /// `min_survival_percent` of max HP
    #[serde(rename_all = "camelCase")]
    SurviveHit {
        attacker: CombatantBuild,
        move_id: String,
        min_survival_percent: f64,
    },
    /// KO `defender` with `move_id` in `hits` hits even at the lowest roll
    #[serde(rename_all = "camelCase")]
    GuaranteeKo {
        defender: CombatantBuild,
        move_id: String,
        hits: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnmetReason {
    /// The step budget ran out
    BudgetExhausted,
    /// Every relevant stat or the EV total is at its cap
    StatCapReached,
    /// The move deals no damage to that target
    NoDamage,
}

/// A benchmark the optimizer could not satisfy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetBenchmark {
    /// Position in the benchmark list
    pub index: usize,
    pub reason: UnmetReason,
    /// Margin left at the best spread tried (negative = short)
    pub margin: f64,
}

/// Outcome of an optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvOptimization {
    pub build: CombatantBuild,
    /// Indices of satisfied benchmarks
    pub met: Vec<usize>,
    pub unmet: Vec<UnmetBenchmark>,
    /// 4-EV increments kept in the final spread
    pub steps: usize,
}

impl EvOptimization {
    pub fn all_met(&self) -> bool {
        self.unmet.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Evaluation {
    met: bool,
    margin: f64,
}

pub struct EvOptimizer<'d> {
    dex: &'d dyn DexProvider,
    config: EvConfig,
}

impl<'d> EvOptimizer<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self::with_config(dex, EvConfig::default())
    }

    pub fn with_config(dex: &'d dyn DexProvider, config: EvConfig) -> Self {
        Self { dex, config }
    }

    pub fn optimize(&self, build: &CombatantBuild, benchmarks: &[Benchmark]) -> Result<EvOptimization> {
        let mut current = build.clone().with_evs(StatTable::default());
        let mut steps = 0usize;
        let mut met = Vec::new();
        let mut unmet = Vec::new();

        for (index, benchmark) in benchmarks.iter().enumerate() {
            let snapshot = (current.evs, steps);
            let stats = self.relevant_stats(benchmark)?;
            let mut eval = self.evaluate(&current, benchmark)?;

            let failure = loop {
                if eval.met {
                    break None;
                }
                if self.deals_no_damage(&current, benchmark)? {
                    break Some(UnmetReason::NoDamage);
                }
                if steps >= self.config.max_steps {
                    break Some(UnmetReason::BudgetExhausted);
                }

                let mut best: Option<(Stat, Evaluation)> = None;
                for &stat in &stats {
                    if !can_raise(&current.evs, stat) {
                        continue;
                    }
                    let trial = current.clone().with_ev(stat, current.evs.get(stat) + EV_STEP);
                    let trial_eval = self.evaluate(&trial, benchmark)?;
                    if best.is_none_or(|(_, b)| trial_eval.margin > b.margin) {
                        best = Some((stat, trial_eval));
                    }
                }
                let Some((stat, next)) = best else {
                    break Some(UnmetReason::StatCapReached);
                };

                current.evs.set(stat, current.evs.get(stat) + EV_STEP);
                steps += 1;
                eval = next;
                tracing::debug!(
                    benchmark = index,
                    stat = %stat,
                    evs = current.evs.get(stat),
                    margin = eval.margin,
                    "EV step"
                );
            };

            match failure {
                None => {
                    if self.earlier_still_met(&current, benchmarks, &met)? {
                        met.push(index);
                    } else {
                        tracing::warn!(benchmark = index, "benchmark would regress an earlier one, rolling back");
                        (current.evs, steps) = snapshot;
                        unmet.push(UnmetBenchmark {
                            index,
                            reason: UnmetReason::StatCapReached,
                            margin: eval.margin,
                        });
                    }
                }
                Some(reason) => {
                    tracing::warn!(
                        benchmark = index,
                        reason = ?reason,
                        margin = eval.margin,
                        "benchmark unmet, rolling back"
                    );
                    (current.evs, steps) = snapshot;
                    unmet.push(UnmetBenchmark {
                        index,
                        reason,
                        margin: eval.margin,
                    });
                }
            }
        }

        tracing::info!(
            species = %current.species,
            met = met.len(),
            unmet = unmet.len(),
            total_evs = current.evs.total(),
            "EV optimization finished"
        );
        Ok(EvOptimization {
            build: current,
            met,
            unmet,
            steps,
        })
    }

    fn earlier_still_met(&self, build: &CombatantBuild, benchmarks: &[Benchmark], met: &[usize]) -> Result<bool> {
        for &i in met {
            if !self.evaluate(build, &benchmarks[i])?.met {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn benchmark_move(&self, benchmark: &Benchmark) -> Result<Option<&'d Move>> {
        Ok(match benchmark {
            Benchmark::Outspeed { .. } => None,
            Benchmark::SurviveHit { move_id, .. } | Benchmark::GuaranteeKo { move_id, .. } => {
                Some(self.dex.require_move(move_id)?)
            }
        })
    }

    /// Stats whose EVs can move the benchmark, in stat order
    fn relevant_stats(&self, benchmark: &Benchmark) -> Result<Vec<Stat>> {
        let category = self.benchmark_move(benchmark)?.map(|m| m.category);
        Ok(match (benchmark, category) {
            (Benchmark::Outspeed { .. }, _) => vec![Stat::Spe],
            (Benchmark::SurviveHit { .. }, Some(MoveCategory::Physical)) => vec![Stat::Hp, Stat::Def],
            (Benchmark::SurviveHit { .. }, Some(MoveCategory::Special)) => vec![Stat::Hp, Stat::Spd],
            (Benchmark::GuaranteeKo { .. }, Some(MoveCategory::Physical)) => vec![Stat::Atk],
            (Benchmark::GuaranteeKo { .. }, Some(MoveCategory::Special)) => vec![Stat::Spa],
            _ => Vec::new(),
        })
    }

    fn deals_no_damage(&self, build: &CombatantBuild, benchmark: &Benchmark) -> Result<bool> {
        let Benchmark::GuaranteeKo { defender, move_id, .. } = benchmark else {
            return Ok(false);
        };
        let mv = self.dex.require_move(move_id)?;
        let range = estimate_resolved(
            &Combatant::resolve(build, self.dex)?,
            &Combatant::resolve(defender, self.dex)?,
            mv,
            &DamageContext::default(),
        );
        Ok(range.is_zero())
    }

    fn evaluate(&self, build: &CombatantBuild, benchmark: &Benchmark) -> Result<Evaluation> {
        let ctx = DamageContext::default();
        Ok(match benchmark {
            Benchmark::Outspeed { target_speed } => {
                let speed = Combatant::resolve(build, self.dex)?.effective_speed();
                Evaluation {
                    met: speed > *target_speed,
                    margin: speed as f64 - *target_speed as f64 - 1.0,
                }
            }
            Benchmark::SurviveHit {
                attacker,
                move_id,
                min_survival_percent,
            } => {
                let mv = self.dex.require_move(move_id)?;
                let defender = Combatant::resolve(build, self.dex)?;
                let range = estimate_resolved(&Combatant::resolve(attacker, self.dex)?, &defender, mv, &ctx);
                let hp = defender.max_hp();
                let remaining = hp.saturating_sub(range.max);
                let remaining_percent = remaining as f64 * 100.0 / hp.max(1) as f64;
                Evaluation {
                    met: remaining > 0 && remaining_percent >= *min_survival_percent,
                    margin: remaining_percent - min_survival_percent,
                }
            }
            Benchmark::GuaranteeKo { defender, move_id, hits } => {
                let mv = self.dex.require_move(move_id)?;
                let defender = Combatant::resolve(defender, self.dex)?;
                let range = estimate_resolved(&Combatant::resolve(build, self.dex)?, &defender, mv, &ctx);
                let hp = defender.max_hp();
                let dealt = range.min * (*hits).max(1);
                Evaluation {
                    met: dealt >= hp,
                    margin: (dealt as f64 - hp as f64) * 100.0 / hp.max(1) as f64,
                }
            }
        })
    }
}

fn can_raise(evs: &StatTable, stat: Stat) -> bool {
    evs.get(stat) + EV_STEP <= MAX_EV && evs.total() + EV_STEP as u32 <= MAX_EV_TOTAL as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn optimizer(dex: &dyn DexProvider) -> EvOptimizer<'_> {
        EvOptimizer::new(dex)
    }

    #[test]
    fn test_outspeed_exact_step() {
        // Jolly base 102: 64 Spe EVs is the first spread above 280
        let dex = fixtures::dex();
        let result = optimizer(&dex)
            .optimize(&fixtures::garchomp(), &[Benchmark::Outspeed { target_speed: 280 }])
            .unwrap();
        assert!(result.all_met());
        assert_eq!(result.build.evs, StatTable::default().with(Stat::Spe, 64));
        assert_eq!(result.steps, 16);
        assert_eq!(result.build.stat(&dex, Stat::Spe).unwrap(), 281);
    }

    #[test]
    fn test_unreachable_speed_rolls_back() {
        let dex = fixtures::dex();
        let result = optimizer(&dex)
            .optimize(&fixtures::garchomp(), &[Benchmark::Outspeed { target_speed: 500 }])
            .unwrap();
        assert_eq!(result.met, Vec::<usize>::new());
        assert_eq!(result.unmet.len(), 1);
        assert_eq!(result.unmet[0].reason, UnmetReason::StatCapReached);
        assert!(result.unmet[0].margin < 0.0);
        assert_eq!(result.build.evs, StatTable::default());
        assert_eq!(result.steps, 0);
    }

    #[test]
    fn test_step_budget() {
        let dex = fixtures::dex();
        let result = EvOptimizer::with_config(&dex, EvConfig { max_steps: 5 })
            .optimize(&fixtures::garchomp(), &[Benchmark::Outspeed { target_speed: 280 }])
            .unwrap();
        assert_eq!(result.unmet[0].reason, UnmetReason::BudgetExhausted);
        assert_eq!(result.build.evs.total(), 0);
    }

    #[test]
    fn test_survive_hit() {
        let dex = fixtures::dex();
        let benchmark = Benchmark::SurviveHit {
            attacker: fixtures::magearna(),
            move_id: "flashcannon".into(),
            min_survival_percent: 40.0,
        };
        let result = optimizer(&dex)
            .optimize(&fixtures::garchomp(), std::slice::from_ref(&benchmark))
            .unwrap();
        assert!(result.all_met());
        let evs = result.build.evs;
        assert!(evs.hp + evs.spd > 0);
        assert_eq!(evs.atk + evs.def + evs.spa + evs.spe, 0);

        let range = crate::damage::DamageCalculator::new(&dex)
            .estimate_by_id(&fixtures::magearna(), &result.build, "flashcannon", &DamageContext::default())
            .unwrap();
        let hp = range.defender_hp;
        assert!((hp - range.max) as f64 * 100.0 / hp as f64 >= 40.0);
    }

    #[test]
    fn test_guaranteed_ko() {
        let dex = fixtures::dex();
        // Already a guaranteed 2HKO with no investment
        let two = Benchmark::GuaranteeKo {
            defender: fixtures::toxapex(),
            move_id: "earthquake".into(),
            hits: 2,
        };
        // Out of reach even at 252 Atk
        let one = Benchmark::GuaranteeKo {
            defender: fixtures::toxapex(),
            move_id: "earthquake".into(),
            hits: 1,
        };
        let result = optimizer(&dex).optimize(&fixtures::garchomp(), &[two, one]).unwrap();
        assert_eq!(result.met, vec![0]);
        assert_eq!(result.unmet.len(), 1);
        assert_eq!(result.unmet[0].index, 1);
        assert_eq!(result.unmet[0].reason, UnmetReason::StatCapReached);
        assert_eq!(result.build.evs.atk, 0);
    }

    #[test]
    fn test_no_damage_move() {
        let dex = fixtures::dex();
        let benchmark = Benchmark::GuaranteeKo {
            defender: fixtures::toxapex(),
            move_id: "swordsdance".into(),
            hits: 3,
        };
        let result = optimizer(&dex).optimize(&fixtures::garchomp(), &[benchmark]).unwrap();
        assert_eq!(result.unmet[0].reason, UnmetReason::NoDamage);
    }

    #[test]
    fn test_later_benchmark_keeps_speed() {
        let dex = fixtures::dex();
        let benchmarks = [
            Benchmark::Outspeed { target_speed: 280 },
            Benchmark::SurviveHit {
                attacker: fixtures::magearna(),
                move_id: "flashcannon".into(),
                min_survival_percent: 40.0,
            },
        ];
        let result = optimizer(&dex).optimize(&fixtures::garchomp(), &benchmarks).unwrap();
        assert!(result.met.contains(&0));
        assert_eq!(result.build.evs.spe, 64);
        assert!(result.build.evs.total() <= MAX_EV_TOTAL as u32);

        let again = optimizer(&dex).optimize(&fixtures::garchomp(), &benchmarks).unwrap();
        assert_eq!(result, again);
    }

    #[test]
    fn test_missing_move() {
        let dex = fixtures::dex();
        let benchmark = Benchmark::GuaranteeKo {
            defender: fixtures::toxapex(),
            move_id: "hyperbeam".into(),
            hits: 1,
        };
        assert!(optimizer(&dex).optimize(&fixtures::garchomp(), &[benchmark]).is_err());
    }
}
