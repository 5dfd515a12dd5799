//! Inputs of a single damage calculation

use serde::{Deserialize, Serialize};
use teamforge_dex::{
    AbilityEffect, CombatantBuild, DexProvider, ItemEffect, MissingReference, Move, Stat,
    StatTable, Type, Weather,
};

/// Situation of the exchange. Everything defaults to a plain single-target hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageContext {
    pub weather: Option<Weather>,
    pub critical: bool,
    /// Number of targets a spread move hits
    pub target_count: u8,
    pub attacker_burned: bool,
}

impl Default for DamageContext {
    fn default() -> Self {
        Self {
            weather: None,
            critical: false,
            target_count: 1,
            attacker_burned: false,
        }
    }
}

impl DamageContext {
    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    pub fn with_targets(mut self, target_count: u8) -> Self {
        self.target_count = target_count;
        self
    }

    pub fn burned(mut self) -> Self {
        self.attacker_burned = true;
        self
    }
}

/// A build with every reference resolved into the values the pipeline reads
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub species: String,
    pub level: u8,
    pub types: Vec<Type>,
    pub stats: StatTable,
    pub ability: AbilityEffect,
    pub item: ItemEffect,
}

impl Combatant {
    pub fn resolve(build: &CombatantBuild, dex: &dyn DexProvider) -> Result<Self, MissingReference> {
        let species = dex.require_species(&build.species)?;
        let stats = build.final_stats(dex)?;
        let ability = dex.require_ability(&build.ability)?.effect;
        let item = match &build.item {
            Some(id) => dex.require_item(id)?.effect,
            None => ItemEffect::Other,
        };
        Ok(Self {
            species: species.id.clone(),
            level: build.level,
            types: species.types.clone(),
            stats,
            ability,
            item,
        })
    }

    pub fn stat(&self, stat: Stat) -> u16 {
        self.stats.get(stat)
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.hp as u32
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.types.contains(&t)
    }

    /// Speed with Choice Scarf applied
    pub fn effective_speed(&self) -> u32 {
        let speed = self.stats.spe as u32;
        if self.item == ItemEffect::ChoiceScarf {
            speed * 3 / 2
        } else {
            speed
        }
    }
}

/// A build together with its resolved combatant and moves
#[derive(Debug, Clone)]
pub struct ResolvedBuild<'d> {
    pub build: CombatantBuild,
    pub combatant: Combatant,
    /// Distinct known moves, in build order
    pub moves: Vec<&'d Move>,
}

impl<'d> ResolvedBuild<'d> {
    pub fn resolve(build: &CombatantBuild, dex: &'d dyn DexProvider) -> Result<Self, MissingReference> {
        let combatant = Combatant::resolve(build, dex)?;
        let mut moves: Vec<&'d Move> = Vec::with_capacity(build.moves.len());
        for id in &build.moves {
            let mv = dex.require_move(id)?;
            if !moves.iter().any(|m| m.id == mv.id) {
                moves.push(mv);
            }
        }
        Ok(Self {
            build: build.clone(),
            combatant,
            moves,
        })
    }

    pub fn species(&self) -> &str {
        &self.combatant.species
    }

    pub fn damaging_moves(&self) -> impl Iterator<Item = &'d Move> + '_ {
        self.moves.iter().copied().filter(|m| m.is_damaging())
    }

    /// Distinct types of the damaging moves after -ate conversion, sorted
    pub fn attacking_types(&self) -> Vec<Type> {
        let mut types: Vec<Type> = self
            .damaging_moves()
            .map(|m| match self.combatant.ability {
                AbilityEffect::TypeConversion { to } if m.move_type == Type::Normal => to,
                _ => m.move_type,
            })
            .collect();
        types.sort();
        types.dedup();
        types
    }
}
