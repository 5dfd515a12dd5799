//! Ability-aware type matchups

use crate::effects::AbilityEffect;
use crate::types::Type;

/// A combatant's defensive typing with its ability folded in.
///
/// Levitate adds a Ground immunity and Wonder Guard turns every
/// non-super-effective type into an immunity. Other abilities only change
/// damage amounts, not the type tally.
#[derive(Debug, Clone, PartialEq)]
pub struct DefensiveProfile {
    types: Vec<Type>,
    ability: AbilityEffect,
}

impl DefensiveProfile {
    pub fn new(types: &[Type], ability: AbilityEffect) -> Self {
        Self {
            types: types.to_vec(),
            ability,
        }
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Effective multiplier of an attacking type against this profile
    pub fn multiplier(&self, attacking: Type) -> f32 {
        let raw = attacking.effectiveness_multi(&self.types);
        match self.ability {
            AbilityEffect::Levitate if attacking == Type::Ground => 0.0,
            AbilityEffect::WonderGuard if raw <= 1.0 => 0.0,
            _ => raw,
        }
    }

    pub fn weaknesses(&self) -> Vec<Type> {
        self.filter(|m| m > 1.0)
    }

    pub fn resistances(&self) -> Vec<Type> {
        self.filter(|m| m > 0.0 && m < 1.0)
    }

    pub fn immunities(&self) -> Vec<Type> {
        self.filter(|m| m == 0.0)
    }

    /// Resisted or immune
    pub fn walls(&self, attacking: Type) -> bool {
        self.multiplier(attacking) < 1.0
    }

    fn filter(&self, keep: impl Fn(f32) -> bool) -> Vec<Type> {
        Type::all()
            .iter()
            .copied()
            .filter(|t| keep(self.multiplier(*t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(types: &[Type]) -> DefensiveProfile {
        DefensiveProfile::new(types, AbilityEffect::Other)
    }

    #[test]
    fn test_dual_type_profile() {
        // Water/Ground is only weak to Grass (4x)
        assert_eq!(plain(&[Type::Water, Type::Ground]).weaknesses(), vec![Type::Grass]);
        assert_eq!(plain(&[Type::Water, Type::Ground]).multiplier(Type::Grass), 4.0);
        // Steel: Fire, Fighting, Ground
        assert_eq!(plain(&[Type::Steel]).weaknesses().len(), 3);
    }

    #[test]
    fn test_resistances_and_immunities() {
        let steel = plain(&[Type::Steel]);
        assert!(steel.resistances().contains(&Type::Fairy));
        assert!(!steel.walls(Type::Fire));
        assert!(steel.walls(Type::Poison));
        assert_eq!(plain(&[Type::Ghost]).immunities(), vec![Type::Normal, Type::Fighting]);
    }

    #[test]
    fn test_levitate_profile() {
        // Electric with Levitate: no Ground weakness, Ground immunity
        let profile = DefensiveProfile::new(&[Type::Electric], AbilityEffect::Levitate);
        assert!(profile.weaknesses().is_empty());
        assert_eq!(profile.immunities(), vec![Type::Ground]);
        assert!(profile.walls(Type::Ground));
    }

    #[test]
    fn test_wonder_guard_profile() {
        // Bug/Ghost: weak to Fire, Flying, Rock, Ghost, Dark
        let profile = DefensiveProfile::new(&[Type::Bug, Type::Ghost], AbilityEffect::WonderGuard);
        assert_eq!(profile.weaknesses().len(), 5);
        assert_eq!(profile.immunities().len(), 13);
        assert!(profile.resistances().is_empty());
    }
}
