//! Staged integer damage pipeline (generation 7 order).
//!
//! Every stage is a pure function over one accumulator and truncates its
//! result toward zero. The stage order matters: it moves boundary KO
//! outcomes by a point or two.
//!
//! 1. **Base power** - Technician, -ate, type-boost items, Muscle Band / Wise Glasses
//! 2. **Attack stat** - Huge Power, Choice Band/Specs, defender Thick Fat
//! 3. **Defense stat** - Assault Vest, Eviolite, Sandstorm Rock SpD boost
//! 4. **Base damage** - `floor(floor(floor(2L/5+2) * BP * A / D) / 50) + 2`
//! 5. **Spread** - x0.75 when a spread move hits more than one target
//! 6. **Weather** - Sun / Rain on Fire and Water moves
//! 7. **Critical** - x1.5
//! 8. **Random roll** - 85% to 100%, 16 values
//! 9. **STAB** - x1.5, Adaptability x2
//! 10. **Type effectiveness** - quarter steps from the chart
//! 11. **Burn** - halves physical damage
//! 12. **Final modifiers** - Life Orb, Expert Belt, Tinted Lens, Filter, Multiscale
//! 13. **Floor** - at least 1 unless immune

use teamforge_dex::{AbilityEffect, ItemEffect, Move, MoveCategory, Stat, Type, Weather};

use super::context::{Combatant, DamageContext};

/// A rational multiplier applied with floor division
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier {
    pub num: u32,
    pub den: u32,
}

impl Modifier {
    pub const ONE: Self = Self::new(1, 1);
    pub const HALF: Self = Self::new(1, 2);
    pub const THREE_QUARTERS: Self = Self::new(3, 4);
    pub const ONE_POINT_ONE: Self = Self::new(11, 10);
    pub const ONE_POINT_TWO: Self = Self::new(6, 5);
    pub const ONE_POINT_THREE: Self = Self::new(13, 10);
    pub const ONE_POINT_FIVE: Self = Self::new(3, 2);
    pub const DOUBLE: Self = Self::new(2, 1);

    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    #[inline]
    pub fn apply(self, value: u32) -> u32 {
        if self == Self::ONE {
            return value;
        }
        (value as u64 * self.num as u64 / self.den as u64) as u32
    }
}

/// Move type and base power after stage 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoweredMove {
    pub move_type: Type,
    pub base_power: u32,
}

/// Stage 1: effective type and base power
pub fn base_power(attacker: &Combatant, mv: &Move) -> PoweredMove {
    let mut move_type = mv.move_type;
    let mut bp = mv.base_power as u32;

    if attacker.ability == AbilityEffect::Technician && bp <= 60 {
        bp = Modifier::ONE_POINT_FIVE.apply(bp);
    }
    if let AbilityEffect::TypeConversion { to } = attacker.ability
        && move_type == Type::Normal
    {
        move_type = to;
        bp = Modifier::ONE_POINT_TWO.apply(bp);
    }
    match attacker.item {
        ItemEffect::TypeBoost { boosted } if boosted == move_type => {
            bp = Modifier::ONE_POINT_TWO.apply(bp);
        }
        ItemEffect::MuscleBand if mv.category == MoveCategory::Physical => {
            bp = Modifier::ONE_POINT_ONE.apply(bp);
        }
        ItemEffect::WiseGlasses if mv.category == MoveCategory::Special => {
            bp = Modifier::ONE_POINT_ONE.apply(bp);
        }
        _ => {}
    }

    PoweredMove {
        move_type,
        base_power: bp.max(1),
    }
}

/// Stage 2: attacking stat
pub fn attack_stat(attacker: &Combatant, defender: &Combatant, category: MoveCategory, move_type: Type) -> u32 {
    let physical = category == MoveCategory::Physical;
    let mut attack = attacker.stat(if physical { Stat::Atk } else { Stat::Spa }) as u32;

    if physical && attacker.ability == AbilityEffect::HugePower {
        attack = Modifier::DOUBLE.apply(attack);
    }
    match attacker.item {
        ItemEffect::ChoiceBand if physical => attack = Modifier::ONE_POINT_FIVE.apply(attack),
        ItemEffect::ChoiceSpecs if !physical => attack = Modifier::ONE_POINT_FIVE.apply(attack),
        _ => {}
    }
    if defender.ability == AbilityEffect::ThickFat && matches!(move_type, Type::Fire | Type::Ice) {
        attack = Modifier::HALF.apply(attack);
    }
    attack.max(1)
}

/// Stage 3: defending stat
pub fn defense_stat(defender: &Combatant, category: MoveCategory, weather: Option<Weather>) -> u32 {
    let physical = category == MoveCategory::Physical;
    let mut defense = defender.stat(if physical { Stat::Def } else { Stat::Spd }) as u32;

    if !physical && defender.item == ItemEffect::AssaultVest {
        defense = Modifier::ONE_POINT_FIVE.apply(defense);
    }
    if defender.item == ItemEffect::Eviolite {
        defense = Modifier::ONE_POINT_FIVE.apply(defense);
    }
    if !physical && weather == Some(Weather::Sand) && defender.has_type(Type::Rock) {
        defense = Modifier::ONE_POINT_FIVE.apply(defense);
    }
    defense.max(1)
}

/// Stage 4: the base damage formula
pub fn base_damage(level: u8, base_power: u32, attack: u32, defense: u32) -> u32 {
    let level_factor = 2 * level as u32 / 5 + 2;
    let scaled = level_factor as u64 * base_power as u64 * attack as u64 / defense.max(1) as u64;
    (scaled / 50) as u32 + 2
}

/// Stage 5
pub fn apply_spread(damage: u32, mv: &Move, target_count: u8) -> u32 {
    if mv.is_spread() && target_count > 1 {
        Modifier::THREE_QUARTERS.apply(damage)
    } else {
        damage
    }
}

/// Stage 6
pub fn apply_weather(damage: u32, move_type: Type, weather: Option<Weather>) -> u32 {
    let modifier = match (weather, move_type) {
        (Some(Weather::Sun), Type::Fire) | (Some(Weather::Rain), Type::Water) => Modifier::ONE_POINT_FIVE,
        (Some(Weather::Sun), Type::Water) | (Some(Weather::Rain), Type::Fire) => Modifier::HALF,
        _ => Modifier::ONE,
    };
    modifier.apply(damage)
}

/// Stage 7
pub fn apply_critical(damage: u32, critical: bool) -> u32 {
    if critical {
        Modifier::ONE_POINT_FIVE.apply(damage)
    } else {
        damage
    }
}

/// Stage 8: one of the 16 rolls, `roll_index` 0 = 85%, 15 = 100%
pub fn apply_random_roll(damage: u32, roll_index: usize) -> u32 {
    let roll_percent = 85 + roll_index as u32;
    Modifier::new(roll_percent, 100).apply(damage)
}

/// Stage 9
pub fn apply_stab(damage: u32, attacker: &Combatant, move_type: Type) -> u32 {
    if !attacker.has_type(move_type) {
        return damage;
    }
    if attacker.ability == AbilityEffect::Adaptability {
        Modifier::DOUBLE.apply(damage)
    } else {
        Modifier::ONE_POINT_FIVE.apply(damage)
    }
}

/// Effectiveness in quarters (4 = neutral) including ability immunities
pub fn effectiveness(defender: &Combatant, move_type: Type) -> u32 {
    let quarters = move_type.effectiveness_quarters(&defender.types);
    match defender.ability {
        AbilityEffect::Levitate if move_type == Type::Ground => 0,
        AbilityEffect::WonderGuard if quarters <= 4 => 0,
        _ => quarters,
    }
}

/// Stage 10
pub fn apply_effectiveness(damage: u32, quarters: u32) -> u32 {
    Modifier::new(quarters, 4).apply(damage)
}

/// Stage 11
pub fn apply_burn(damage: u32, burned: bool, category: MoveCategory) -> u32 {
    if burned && category == MoveCategory::Physical {
        Modifier::HALF.apply(damage)
    } else {
        damage
    }
}

/// Stage 12: item and ability final modifiers, in that order.
///
/// Multiscale assumes the defender is at full HP.
pub fn apply_final_modifiers(damage: u32, attacker: &Combatant, defender: &Combatant, quarters: u32) -> u32 {
    let mut damage = damage;
    match attacker.item {
        ItemEffect::LifeOrb => damage = Modifier::ONE_POINT_THREE.apply(damage),
        ItemEffect::ExpertBelt if quarters > 4 => damage = Modifier::ONE_POINT_TWO.apply(damage),
        _ => {}
    }
    if attacker.ability == AbilityEffect::TintedLens && quarters < 4 {
        damage = Modifier::DOUBLE.apply(damage);
    }
    match defender.ability {
        AbilityEffect::Filter if quarters > 4 => damage = Modifier::THREE_QUARTERS.apply(damage),
        AbilityEffect::Multiscale => damage = Modifier::HALF.apply(damage),
        _ => {}
    }
    damage
}

/// Stage 13
pub fn apply_floor(damage: u32, quarters: u32) -> u32 {
    if quarters == 0 { 0 } else { damage.max(1) }
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Per-hit rolls, lowest first
    pub rolls: [u32; 16],
    /// Effectiveness in quarters
    pub quarters: u32,
}

/// Run every stage for a damaging move
pub fn run(attacker: &Combatant, defender: &Combatant, mv: &Move, ctx: &DamageContext) -> PipelineOutput {
    let powered = base_power(attacker, mv);
    let attack = attack_stat(attacker, defender, mv.category, powered.move_type);
    let defense = defense_stat(defender, mv.category, ctx.weather);

    let mut damage = base_damage(attacker.level, powered.base_power, attack, defense);
    damage = apply_spread(damage, mv, ctx.target_count);
    damage = apply_weather(damage, powered.move_type, ctx.weather);
    damage = apply_critical(damage, ctx.critical);

    let quarters = effectiveness(defender, powered.move_type);
    let mut rolls = [0u32; 16];
    for (index, slot) in rolls.iter_mut().enumerate() {
        let mut roll = apply_random_roll(damage, index);
        roll = apply_stab(roll, attacker, powered.move_type);
        roll = apply_effectiveness(roll, quarters);
        roll = apply_burn(roll, ctx.attacker_burned, mv.category);
        roll = apply_final_modifiers(roll, attacker, defender, quarters);
        *slot = apply_floor(roll, quarters);
    }
    PipelineOutput { rolls, quarters }
}
