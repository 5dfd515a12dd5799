//! Per-candidate scores against an opposing roster
//!
//! Every score lies in `0.0..=1.0` so the weights in
//! [`BuilderConfig`](crate::config::BuilderConfig) compare like with like.

use teamforge_dex::query::DefensiveProfile;
use teamforge_dex::{calc_stat, Species, Stat};

use crate::damage::{best_move, DamageContext, ResolvedBuild};

/// Share of the opponents' offensive types the candidate resists or is
/// immune to. Each opponent counts with its weight; opponents without a
/// damaging move are skipped.
pub fn defensive_score(candidate: &ResolvedBuild<'_>, opponents: &[ResolvedBuild<'_>], weights: &[f64]) -> f64 {
    let profile = DefensiveProfile::new(&candidate.combatant.types, candidate.combatant.ability);
    let mut walled = 0.0;
    let mut total = 0.0;
    for (opponent, &weight) in opponents.iter().zip(weights) {
        let types = opponent.attacking_types();
        if types.is_empty() {
            continue;
        }
        let resisted = types.iter().filter(|t| profile.walls(**t)).count();
        walled += weight * resisted as f64 / types.len() as f64;
        total += weight;
    }
    if total == 0.0 { 0.0 } else { walled / total }
}

/// Share of targets the attacker KOs within two hits with probability at
/// least `ko_threshold`
pub fn offensive_score(attacker: &ResolvedBuild<'_>, targets: &[ResolvedBuild<'_>], ko_threshold: f64) -> f64 {
    if targets.is_empty() {
        return 0.0;
    }
    let ctx = DamageContext::default();
    let threatened = targets
        .iter()
        .filter(|target| {
            best_move(attacker, target, &ctx).is_some_and(|outcome| outcome.ko.within_two() >= ko_threshold)
        })
        .count();
    threatened as f64 / targets.len() as f64
}

/// Speed with `evs` Speed EVs and a neutral nature, Choice Scarf applied
pub fn benchmark_speed(species: &Species, candidate: &ResolvedBuild<'_>, evs: u16) -> u32 {
    let speed = calc_stat(
        Stat::Spe,
        species.base_stats.spe,
        candidate.build.ivs.spe,
        evs,
        candidate.build.level,
        100,
    ) as u32;
    if candidate.combatant.item == teamforge_dex::ItemEffect::ChoiceScarf {
        speed * 3 / 2
    } else {
        speed
    }
}

/// Share of opponents strictly slower than `speed`
pub fn speed_score(speed: u32, opponents: &[ResolvedBuild<'_>]) -> f64 {
    if opponents.is_empty() {
        return 0.0;
    }
    let outsped = opponents
        .iter()
        .filter(|o| speed > o.combatant.effective_speed())
        .count();
    outsped as f64 / opponents.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use teamforge_dex::{CombatantBuild, DexProvider};

    fn resolve<'d>(dex: &'d dyn DexProvider, builds: Vec<CombatantBuild>) -> Vec<ResolvedBuild<'d>> {
        builds
            .iter()
            .map(|b| ResolvedBuild::resolve(b, dex).unwrap())
            .collect()
    }

    #[test]
    fn test_defensive_score_ground_immunity() {
        let dex = fixtures::dex();
        let quaker = resolve(
            &dex,
            vec![CombatantBuild::new("Excadrill", "Mold Breaker", "Jolly").with_moves(["earthquake"])],
        );
        let rotom = ResolvedBuild::resolve(&fixtures::opponent_roster().get(5).cloned().unwrap(), &dex).unwrap();
        let magearna = ResolvedBuild::resolve(&fixtures::magearna(), &dex).unwrap();
        // Levitate walls Ground, Steel/Fairy is weak to it
        assert_eq!(defensive_score(&rotom, &quaker, &[1.0]), 1.0);
        assert_eq!(defensive_score(&magearna, &quaker, &[1.0]), 0.0);
    }

    #[test]
    fn test_defensive_score_weights() {
        let dex = fixtures::dex();
        let opponents = resolve(
            &dex,
            vec![
                CombatantBuild::new("Heatran", "Flash Fire", "Calm").with_moves(["flamethrower"]),
                CombatantBuild::new("Rotom-Wash", "Levitate", "Bold").with_moves(["voltswitch"]),
            ],
        );
        // Toxapex resists Fire, takes Electric super effectively
        let pex = ResolvedBuild::resolve(&fixtures::toxapex(), &dex).unwrap();
        assert_eq!(defensive_score(&pex, &opponents, &[1.0, 1.0]), 0.5);
        assert_eq!(defensive_score(&pex, &opponents, &[3.0, 1.0]), 0.75);
    }

    #[test]
    fn test_speed_score() {
        let dex = fixtures::dex();
        let opponents = resolve(&dex, fixtures::opponent_roster().into_builds());
        let chomp = ResolvedBuild::resolve(&fixtures::garchomp(), &dex).unwrap();
        let species = dex.require_species("garchomp").unwrap();
        // Neutral 252 Spe Garchomp: 303
        let speed = benchmark_speed(species, &chomp, 252);
        assert_eq!(speed, 303);
        let score = speed_score(speed, &opponents);
        assert!(score > 0.0 && score < 1.0);
        assert_eq!(speed_score(0, &opponents), 0.0);
    }

    #[test]
    fn test_offensive_score_bounds() {
        let dex = fixtures::dex();
        let opponents = resolve(&dex, fixtures::opponent_roster().into_builds());
        let chomp = ResolvedBuild::resolve(&fixtures::garchomp(), &dex).unwrap();
        let score = offensive_score(&chomp, &opponents, 0.5);
        assert!((0.0..=1.0).contains(&score));
        assert!(score > 0.0);
        assert_eq!(offensive_score(&chomp, &[], 0.5), 0.0);
    }
}
