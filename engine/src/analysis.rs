//! Matchup analysis between two finished rosters
//!
//! Every estimate is a single exchange at full HP with no field effects.
//! The report is plain data; [`suggest_lead`] and the strategy generator
//! read it without touching the dex again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use teamforge_dex::query::DefensiveProfile;
use teamforge_dex::{DexProvider, Roster, Type};

use crate::builder::offensive_score;
use crate::config::{AnalysisConfig, BuilderConfig};
use crate::damage::{best_move, DamageContext, MoveOutcome, ResolvedBuild};
use crate::error::Result;
use crate::exec::par_map;

/// Which roster a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    User,
    Opponent,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::User => Side::Opponent,
            Side::Opponent => Side::User,
        }
    }
}

/// Best move of one combatant into one member of the other roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairOutcome {
    pub side: Side,
    pub attacker: usize,
    pub defender: usize,
    pub attacker_species: String,
    pub defender_species: String,
    /// None when the attacker has no move that damages the defender
    pub best: Option<MoveOutcome>,
}

impl PairOutcome {
    /// KO probability within two hits, 0 without a damaging move
    pub fn ko_within_two(&self) -> f64 {
        self.best.as_ref().map_or(0.0, |b| b.ko.within_two())
    }

    pub fn ohko_probability(&self) -> f64 {
        self.best.as_ref().map_or(0.0, |b| b.ko.ohko_probability)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KoClass {
    Ohko,
    TwoHko,
}

/// A pair with a probable one- or two-hit KO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    pub side: Side,
    pub attacker: String,
    pub defender: String,
    pub move_id: String,
    pub class: KoClass,
    pub probability: f64,
    pub max_percent: f64,
}

/// Per-combatant stats and type tally against the other roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantSummary {
    pub side: Side,
    pub index: usize,
    pub species: String,
    /// Speed with Choice Scarf applied
    pub speed: u32,
    pub attack: u16,
    pub special_attack: u16,
    /// Opposing offensive types resisted or made immune
    pub resisted: usize,
    /// Opposing offensive types that hit super effectively
    pub weak: usize,
    /// Share of the other roster some move hits super effectively
    pub super_effective_share: f64,
    /// Share of the other roster KOed within two hits at the builder's
    /// `ko_threshold` (see [`offensive_score`])
    pub pressure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedEntry {
    pub side: Side,
    pub index: usize,
    pub species: String,
    pub speed: u32,
}

/// An opposing offensive type many user members are weak to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedWeakness {
    pub attacking_type: Type,
    pub weak_members: Vec<String>,
}

/// An opposing combatant strictly faster than a user combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedVulnerability {
    pub user: String,
    pub opponent: String,
    pub difference: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerabilities {
    /// Most shared first
    pub shared_weaknesses: Vec<SharedWeakness>,
    pub speed: Vec<SpeedVulnerability>,
    /// Opposing types no user move hits super effectively
    pub coverage_gaps: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupReport {
    /// User pairs first, then opponent pairs; attacker-major order
    pub pairs: Vec<PairOutcome>,
    pub threats: Vec<Threat>,
    /// User members, then opponent members
    pub combatants: Vec<CombatantSummary>,
    /// Fastest first; ties go to the user side, then roster order
    pub speed_order: Vec<SpeedEntry>,
    pub vulnerabilities: Vulnerabilities,
}

impl MatchupReport {
    pub fn side(&self, side: Side) -> impl Iterator<Item = &CombatantSummary> {
        self.combatants.iter().filter(move |c| c.side == side)
    }

    pub fn pair(&self, side: Side, attacker: usize, defender: usize) -> Option<&PairOutcome> {
        self.pairs
            .iter()
            .find(|p| p.side == side && p.attacker == attacker && p.defender == defender)
    }

    pub fn threats_from(&self, side: Side) -> impl Iterator<Item = &Threat> {
        self.threats.iter().filter(move |t| t.side == side)
    }
}

/// Matchup analyzer over an injected dex
pub struct MatchupAnalyzer<'d> {
    dex: &'d dyn DexProvider,
    config: AnalysisConfig,
    pressure_threshold: f64,
}

impl<'d> MatchupAnalyzer<'d> {
    pub fn new(dex: &'d dyn DexProvider) -> Self {
        Self::with_config(dex, AnalysisConfig::default())
    }

    pub fn with_config(dex: &'d dyn DexProvider, config: AnalysisConfig) -> Self {
        Self {
            dex,
            config,
            pressure_threshold: BuilderConfig::default().ko_threshold,
        }
    }

    /// Score pressure the way the team builder scores offense
    pub fn with_pressure_threshold(mut self, ko_threshold: f64) -> Self {
        self.pressure_threshold = ko_threshold;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, user: &Roster, opponent: &Roster) -> Result<MatchupReport> {
        let user = self.resolve(user)?;
        let opponent = self.resolve(opponent)?;
        let ctx = DamageContext::default();

        let mut jobs = Vec::with_capacity(2 * user.len() * opponent.len());
        for (side, attackers, defenders) in [(Side::User, &user, &opponent), (Side::Opponent, &opponent, &user)] {
            for a in 0..attackers.len() {
                for d in 0..defenders.len() {
                    jobs.push((side, a, d));
                }
            }
        }
        let pairs = par_map(&jobs, |&(side, a, d)| {
            let (attackers, defenders) = match side {
                Side::User => (&user, &opponent),
                Side::Opponent => (&opponent, &user),
            };
            PairOutcome {
                side,
                attacker: a,
                defender: d,
                attacker_species: attackers[a].species().to_string(),
                defender_species: defenders[d].species().to_string(),
                best: best_move(&attackers[a], &defenders[d], &ctx),
            }
        });

        let threats = self.threats(&pairs);
        let mut combatants = self.summarize(Side::User, &user, &opponent);
        combatants.extend(self.summarize(Side::Opponent, &opponent, &user));
        let speed_order = speed_order(&combatants);
        let vulnerabilities = Vulnerabilities {
            shared_weaknesses: self.shared_weaknesses(&user, &opponent),
            speed: speed_vulnerabilities(&speed_order),
            coverage_gaps: coverage_gaps(&user, &opponent),
        };

        tracing::debug!(
            pairs = pairs.len(),
            threats = threats.len(),
            shared_weaknesses = vulnerabilities.shared_weaknesses.len(),
            "matchup analyzed"
        );
        Ok(MatchupReport {
            pairs,
            threats,
            combatants,
            speed_order,
            vulnerabilities,
        })
    }

    fn resolve(&self, roster: &Roster) -> Result<Vec<ResolvedBuild<'d>>> {
        roster
            .iter()
            .map(|b| ResolvedBuild::resolve(b, self.dex).map_err(Into::into))
            .collect()
    }

    fn threats(&self, pairs: &[PairOutcome]) -> Vec<Threat> {
        let threshold = self.config.probable_ko_threshold;
        pairs
            .iter()
            .filter_map(|p| {
                let best = p.best.as_ref()?;
                let (class, probability) = if best.ko.ohko_probability >= threshold {
                    (KoClass::Ohko, best.ko.ohko_probability)
                } else if best.ko.two_hko_probability >= threshold {
                    (KoClass::TwoHko, best.ko.two_hko_probability)
                } else {
                    return None;
                };
                Some(Threat {
                    side: p.side,
                    attacker: p.attacker_species.clone(),
                    defender: p.defender_species.clone(),
                    move_id: best.move_id.clone(),
                    class,
                    probability,
                    max_percent: best.range.max_percent,
                })
            })
            .collect()
    }

    fn summarize(&self, side: Side, own: &[ResolvedBuild<'_>], other: &[ResolvedBuild<'_>]) -> Vec<CombatantSummary> {
        let incoming = union_attacking_types(other);
        own.iter()
            .enumerate()
            .map(|(index, member)| {
                let c = &member.combatant;
                let profile = DefensiveProfile::new(&c.types, c.ability);
                let hit = other.iter().filter(|o| hits_super_effectively(member, o)).count();
                CombatantSummary {
                    side,
                    index,
                    species: c.species.clone(),
                    speed: c.effective_speed(),
                    attack: c.stats.atk,
                    special_attack: c.stats.spa,
                    resisted: incoming.iter().filter(|t| profile.walls(**t)).count(),
                    weak: incoming.iter().filter(|t| profile.multiplier(**t) > 1.0).count(),
                    super_effective_share: share(hit, other.len()),
                    pressure: offensive_score(member, other, self.pressure_threshold),
                }
            })
            .collect()
    }

    fn shared_weaknesses(&self, user: &[ResolvedBuild<'_>], opponent: &[ResolvedBuild<'_>]) -> Vec<SharedWeakness> {
        let mut out: Vec<SharedWeakness> = union_attacking_types(opponent)
            .into_iter()
            .filter_map(|t| {
                let weak_members: Vec<String> = user
                    .iter()
                    .filter(|m| DefensiveProfile::new(&m.combatant.types, m.combatant.ability).multiplier(t) > 1.0)
                    .map(|m| m.species().to_string())
                    .collect();
                (weak_members.len() >= self.config.vulnerability_threshold).then_some(SharedWeakness {
                    attacking_type: t,
                    weak_members,
                })
            })
            .collect();
        out.sort_by(|a, b| {
            b.weak_members
                .len()
                .cmp(&a.weak_members.len())
                .then(a.attacking_type.cmp(&b.attacking_type))
        });
        out
    }
}

/// The user combatant to lead with.
///
/// The opponent's probable lead is the member with the highest pressure,
/// ties to the faster. Among user members its best move does not OHKO
/// with any roll, the one with the best KO chance into it wins, ties to
/// the faster then roster order. If every member can be OHKOed the whole
/// roster is considered. None when either side is empty.
pub fn suggest_lead(report: &MatchupReport) -> Option<String> {
    let lead = report
        .side(Side::Opponent)
        .reduce(|best, c| {
            let better = c
                .pressure
                .total_cmp(&best.pressure)
                .then(c.speed.cmp(&best.speed))
                .is_gt();
            if better { c } else { best }
        })?;

    let threat_to = |user: &CombatantSummary| {
        report
            .pair(Side::Opponent, lead.index, user.index)
            .map_or(0.0, PairOutcome::ohko_probability)
    };
    let ko_into = |user: &CombatantSummary| {
        report
            .pair(Side::User, user.index, lead.index)
            .map_or(0.0, PairOutcome::ko_within_two)
    };
    let pick = |survivors_only: bool| {
        report
            .side(Side::User)
            .filter(|u| !survivors_only || threat_to(u) == 0.0)
            .reduce(|best, u| {
                let better = ko_into(u)
                    .total_cmp(&ko_into(best))
                    .then(u.speed.cmp(&best.speed))
                    .is_gt();
                if better { u } else { best }
            })
    };

    let choice = pick(true).or_else(|| pick(false))?;
    tracing::debug!(
        opponent_lead = %lead.species,
        lead = %choice.species,
        "lead suggested"
    );
    Some(choice.species.clone())
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 { 0.0 } else { count as f64 / total as f64 }
}

fn union_attacking_types(roster: &[ResolvedBuild<'_>]) -> Vec<Type> {
    let mut types: Vec<Type> = roster.iter().flat_map(|m| m.attacking_types()).collect();
    types.sort();
    types.dedup();
    types
}

fn hits_super_effectively(attacker: &ResolvedBuild<'_>, defender: &ResolvedBuild<'_>) -> bool {
    let profile = DefensiveProfile::new(&defender.combatant.types, defender.combatant.ability);
    attacker
        .attacking_types()
        .into_iter()
        .any(|t| profile.multiplier(t) > 1.0)
}

fn speed_order(combatants: &[CombatantSummary]) -> Vec<SpeedEntry> {
    let mut order: Vec<SpeedEntry> = combatants
        .iter()
        .map(|c| SpeedEntry {
            side: c.side,
            index: c.index,
            species: c.species.clone(),
            speed: c.speed,
        })
        .collect();
    order.sort_by(|a, b| {
        b.speed
            .cmp(&a.speed)
            .then(a.side.cmp(&b.side))
            .then(a.index.cmp(&b.index))
    });
    order
}

fn speed_vulnerabilities(order: &[SpeedEntry]) -> Vec<SpeedVulnerability> {
    let mut out = Vec::new();
    for user in order.iter().filter(|e| e.side == Side::User) {
        for opp in order.iter().filter(|e| e.side == Side::Opponent && e.speed > user.speed) {
            out.push(SpeedVulnerability {
                user: user.species.clone(),
                opponent: opp.species.clone(),
                difference: opp.speed - user.speed,
            });
        }
    }
    out
}

/// Opposing single types that no user attacking type hits for more than
/// neutral damage
fn coverage_gaps(user: &[ResolvedBuild<'_>], opponent: &[ResolvedBuild<'_>]) -> Vec<Type> {
    let coverage = union_attacking_types(user);
    let mut defending: Vec<Type> = opponent
        .iter()
        .flat_map(|m| m.combatant.types.iter().copied())
        .collect();
    defending.sort();
    defending.dedup();
    defending
        .into_iter()
        .filter(|d| !coverage.iter().any(|a| a.effectiveness(*d) > 1.0))
        .collect()
}

/// Number of user members weak to each opposing offensive type
pub fn weakness_counts(report: &MatchupReport) -> BTreeMap<Type, usize> {
    report
        .vulnerabilities
        .shared_weaknesses
        .iter()
        .map(|w| (w.attacking_type, w.weak_members.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn report() -> MatchupReport {
        let dex = fixtures::dex();
        MatchupAnalyzer::new(&dex)
            .analyze(&fixtures::ou_roster(), &fixtures::opponent_roster())
            .unwrap()
    }

    #[test]
    fn test_every_ordered_pair() {
        let report = report();
        assert_eq!(report.pairs.len(), 72);
        assert_eq!(report.combatants.len(), 12);
        assert_eq!(report.side(Side::User).count(), 6);
        let pair = report.pair(Side::Opponent, 5, 0).unwrap();
        assert_eq!(pair.attacker_species, "rotomwash");
        assert_eq!(pair.defender_species, "garchomp");
    }

    #[test]
    fn test_levitate_blocks_earthquake() {
        let report = report();
        let best = report.pair(Side::User, 0, 5).unwrap().best.as_ref().unwrap();
        assert_ne!(best.move_id, "earthquake");
    }

    #[test]
    fn test_speed_order() {
        let report = report();
        assert_eq!(report.speed_order.len(), 12);
        assert!(report.speed_order.windows(2).all(|w| w[0].speed >= w[1].speed));
        // Jolly 252 Spe Scarf Landorus-T: 309 * 1.5
        assert_eq!(report.speed_order[0].species, "landorustherian");
        assert_eq!(report.speed_order[0].speed, 463);
        assert!(report
            .vulnerabilities
            .speed
            .iter()
            .any(|v| v.user == "ferrothorn" && v.opponent == "tapukoko"));
    }

    #[test]
    fn test_shared_weaknesses() {
        let report = report();
        let counts = weakness_counts(&report);
        // Garchomp, Landorus-T and Breloom all take Hidden Power Ice super effectively
        assert!(counts.get(&Type::Ice).is_some_and(|n| *n >= 3));
        assert!(report
            .vulnerabilities
            .shared_weaknesses
            .windows(2)
            .all(|w| w[0].weak_members.len() >= w[1].weak_members.len()));
        assert!(report.vulnerabilities.coverage_gaps.is_empty());
    }

    #[test]
    fn test_threats_meet_threshold() {
        let report = report();
        assert!(!report.threats.is_empty());
        assert!(report.threats.iter().all(|t| t.probability >= 0.5));
        assert!(report
            .threats_from(Side::User)
            .any(|t| t.attacker == "garchomp" && t.defender == "heatran"));
    }

    #[test]
    fn test_suggest_lead() {
        let dex = fixtures::dex();
        let user = Roster::from_builds(vec![fixtures::toxapex(), fixtures::garchomp()]);
        let opponent = Roster::from_builds(vec![fixtures::opponent_roster().get(1).cloned().unwrap()]);
        let report = MatchupAnalyzer::new(&dex).analyze(&user, &opponent).unwrap();
        assert_eq!(suggest_lead(&report).as_deref(), Some("garchomp"));
    }

    #[test]
    fn test_suggest_lead_empty() {
        let dex = fixtures::dex();
        let report = MatchupAnalyzer::new(&dex)
            .analyze(&fixtures::ou_roster(), &Roster::default())
            .unwrap();
        assert_eq!(suggest_lead(&report), None);
        assert!(report.pairs.is_empty());
    }
}
