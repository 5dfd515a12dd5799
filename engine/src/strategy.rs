//! Game plan derived from a [`MatchupReport`]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::{suggest_lead, KoClass, MatchupReport, Side};
use crate::config::AnalysisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinConditionKind {
    /// Fast and hits most of the opposing roster super effectively
    Sweep,
    /// Hard hitting with super effective coverage on half the roster
    Wallbreak,
}

impl fmt::Display for WinConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinConditionKind::Sweep => write!(f, "sweep"),
            WinConditionKind::Wallbreak => write!(f, "wallbreak"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinCondition {
    pub kind: WinConditionKind,
    pub species: String,
    pub reason: String,
}

/// An opposing combatant and the user members it probably KOs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatToHandle {
    pub attacker: String,
    pub ohko: Vec<String>,
    pub two_hko: Vec<String>,
}

impl ThreatToHandle {
    pub fn target_count(&self) -> usize {
        self.ohko.len() + self.two_hko.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPlan {
    pub lead: Option<String>,
    /// Most dangerous first
    pub threats_to_handle: Vec<ThreatToHandle>,
    pub win_conditions: Vec<WinCondition>,
    pub advice: Vec<String>,
}

pub fn generate_strategy(report: &MatchupReport, config: &AnalysisConfig) -> StrategyPlan {
    let plan = StrategyPlan {
        lead: suggest_lead(report),
        threats_to_handle: threats_to_handle(report),
        win_conditions: win_conditions(report, config),
        advice: advice(report),
    };
    tracing::debug!(
        lead = ?plan.lead,
        threats = plan.threats_to_handle.len(),
        win_conditions = plan.win_conditions.len(),
        "strategy generated"
    );
    plan
}

fn threats_to_handle(report: &MatchupReport) -> Vec<ThreatToHandle> {
    let mut out: Vec<ThreatToHandle> = Vec::new();
    for threat in report.threats_from(Side::Opponent) {
        let idx = match out.iter().position(|t| t.attacker == threat.attacker) {
            Some(i) => i,
            None => {
                out.push(ThreatToHandle {
                    attacker: threat.attacker.clone(),
                    ohko: Vec::new(),
                    two_hko: Vec::new(),
                });
                out.len() - 1
            }
        };
        let entry = &mut out[idx];
        match threat.class {
            KoClass::Ohko => entry.ohko.push(threat.defender.clone()),
            KoClass::TwoHko => entry.two_hko.push(threat.defender.clone()),
        }
    }
    // Stable: equal threats keep roster order
    out.sort_by(|a, b| {
        b.ohko
            .len()
            .cmp(&a.ohko.len())
            .then(b.target_count().cmp(&a.target_count()))
    });
    out
}

fn win_conditions(report: &MatchupReport, config: &AnalysisConfig) -> Vec<WinCondition> {
    let mut out = Vec::new();
    for member in report.side(Side::User) {
        let coverage = member.super_effective_share;
        if member.speed >= config.sweeper_speed as u32 && coverage >= config.sweeper_coverage {
            out.push(WinCondition {
                kind: WinConditionKind::Sweep,
                species: member.species.clone(),
                reason: format!(
                    "{} Speed and super effective coverage on {:.0}% of the opposing team",
                    member.speed,
                    coverage * 100.0
                ),
            });
        }
        let attack = member.attack.max(member.special_attack);
        if attack >= config.wallbreaker_attack && coverage >= config.wallbreaker_coverage {
            out.push(WinCondition {
                kind: WinConditionKind::Wallbreak,
                species: member.species.clone(),
                reason: format!(
                    "{} attacking stat and super effective coverage on {:.0}% of the opposing team",
                    attack,
                    coverage * 100.0
                ),
            });
        }
    }
    out
}

fn advice(report: &MatchupReport) -> Vec<String> {
    let mut out = Vec::new();
    let vulnerabilities = &report.vulnerabilities;

    if let Some(worst) = vulnerabilities.shared_weaknesses.first() {
        out.push(format!(
            "Watch out for {} moves: {} are weak to them",
            worst.attacking_type,
            worst.weak_members.join(", ")
        ));
    }

    let half = report.speed_order.len() / 2;
    let user_fast = report.speed_order[..half].iter().filter(|e| e.side == Side::User).count();
    if half > 0 && user_fast * 2 > half {
        out.push("You have the speed advantage; play aggressively".to_string());
    } else if half > 0 {
        out.push("The opponent has the speed advantage; play carefully and keep priority moves ready".to_string());
    }

    if !vulnerabilities.coverage_gaps.is_empty() {
        let gaps: Vec<&str> = vulnerabilities.coverage_gaps.iter().map(|t| t.as_str()).collect();
        out.push(format!("Nothing hits {} super effectively", gaps.join(", ")));
    }

    let user_count = report.side(Side::User).count();
    for threat in threats_to_handle(report) {
        if threat.target_count() * 2 >= user_count && user_count > 0 {
            out.push(format!(
                "{} threatens {} of your {} members; preserve its checks",
                threat.attacker,
                threat.target_count(),
                user_count
            ));
        }
    }
    out
}
