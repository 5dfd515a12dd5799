//! Roster self-assessment: roles, shared weaknesses, defensive holes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use teamforge_dex::query::DefensiveProfile;
use teamforge_dex::{DexProvider, Roster, Type};

use crate::builder::{roles_of, Role};
use crate::config::{AnalysisConfig, RoleThresholds};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeWeakness {
    pub attacking_type: Type,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyReport {
    /// Members filling each role; a member can fill several
    pub roles: BTreeMap<Role, Vec<String>>,
    /// Types at least `shared_weakness_threshold` members are weak to
    pub shared_weaknesses: Vec<TypeWeakness>,
    /// Attacking types no member resists or is immune to
    pub uncovered_types: Vec<Type>,
    /// Distinct types of the roster's damaging moves
    pub offensive_types: Vec<Type>,
    pub notes: Vec<String>,
}

impl SynergyReport {
    pub fn role_count(&self, role: Role) -> usize {
        self.roles.get(&role).map_or(0, Vec::len)
    }
}

pub fn analyze_synergy(
    dex: &dyn DexProvider,
    roster: &Roster,
    thresholds: &RoleThresholds,
    config: &AnalysisConfig,
) -> Result<SynergyReport> {
    let mut roles: BTreeMap<Role, Vec<String>> = BTreeMap::new();
    let mut profiles = Vec::with_capacity(roster.len());
    let mut offensive_types = Vec::new();

    for build in roster {
        let species = dex.require_species(&build.species)?;
        let ability = dex.require_ability(&build.ability)?;
        for role in roles_of(species, build, thresholds) {
            roles.entry(role).or_default().push(species.id.clone());
        }
        for id in &build.moves {
            let mv = dex.require_move(id)?;
            if mv.is_damaging() {
                offensive_types.push(mv.move_type);
            }
        }
        profiles.push((species.id.clone(), DefensiveProfile::new(&species.types, ability.effect)));
    }
    offensive_types.sort();
    offensive_types.dedup();

    let shared_weaknesses: Vec<TypeWeakness> = Type::all()
        .iter()
        .filter_map(|&t| {
            let members: Vec<String> = profiles
                .iter()
                .filter(|(_, p)| p.multiplier(t) > 1.0)
                .map(|(id, _)| id.clone())
                .collect();
            (members.len() >= config.shared_weakness_threshold).then_some(TypeWeakness {
                attacking_type: t,
                members,
            })
        })
        .collect();

    let uncovered_types: Vec<Type> = if profiles.is_empty() {
        Vec::new()
    } else {
        Type::all()
            .iter()
            .copied()
            .filter(|&t| !profiles.iter().any(|(_, p)| p.walls(t)))
            .collect()
    };

    let mut report = SynergyReport {
        roles,
        shared_weaknesses,
        uncovered_types,
        offensive_types,
        notes: Vec::new(),
    };
    report.notes = notes(&report);
    tracing::debug!(
        members = roster.len(),
        shared_weaknesses = report.shared_weaknesses.len(),
        uncovered = report.uncovered_types.len(),
        "synergy analyzed"
    );
    Ok(report)
}

fn notes(report: &SynergyReport) -> Vec<String> {
    let mut notes = Vec::new();
    if report.role_count(Role::Sweeper) + report.role_count(Role::Wallbreaker) < 2 {
        notes.push("Lacks offensive presence".to_string());
    }
    if report.role_count(Role::Tank) == 0 {
        notes.push("Lacks a defensive backbone".to_string());
    }
    if report.role_count(Role::HazardSetter) == 0 {
        notes.push("No entry hazards".to_string());
    }
    if report.role_count(Role::HazardRemover) == 0 {
        notes.push("No hazard removal".to_string());
    }
    for weakness in &report.shared_weaknesses {
        notes.push(format!(
            "{} members are weak to {}",
            weakness.members.len(),
            weakness.attacking_type
        ));
    }
    if !report.uncovered_types.is_empty() {
        let types: Vec<&str> = report.uncovered_types.iter().map(|t| t.as_str()).collect();
        notes.push(format!("Nothing resists {}", types.join(", ")));
    }
    notes
}
