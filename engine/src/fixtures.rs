//! Fixture data shared by unit tests

use teamforge_dex::{CombatantBuild, DexProvider, FormatRuleset, MemoryDex, Roster, StatTable};

pub(crate) const GEN7_JSON: &str = include_str!("../tests/fixtures/gen7.json");

pub(crate) fn dex() -> MemoryDex {
    MemoryDex::from_json(GEN7_JSON).expect("fixture dex should load")
}

pub(crate) fn ou() -> FormatRuleset {
    dex().require_format("gen7ou").expect("gen7ou fixture").clone()
}

pub(crate) fn garchomp() -> CombatantBuild {
    CombatantBuild::new("Garchomp", "Rough Skin", "Jolly")
        .with_item("Life Orb")
        .with_moves(["Swords Dance", "Earthquake", "Outrage", "Fire Fang"])
        .with_evs(StatTable::new(0, 252, 0, 0, 4, 252))
}

pub(crate) fn landorus() -> CombatantBuild {
    CombatantBuild::new("Landorus-Therian", "Intimidate", "Jolly")
        .with_item("Choice Scarf")
        .with_moves(["Earthquake", "U-turn", "Stone Edge", "Knock Off"])
        .with_evs(StatTable::new(0, 252, 0, 0, 4, 252))
}

pub(crate) fn toxapex() -> CombatantBuild {
    CombatantBuild::new("Toxapex", "Regenerator", "Bold")
        .with_item("Black Sludge")
        .with_moves(["Scald", "Toxic", "Recover", "Haze"])
        .with_evs(StatTable::new(252, 0, 252, 0, 4, 0))
}

pub(crate) fn breloom() -> CombatantBuild {
    CombatantBuild::new("Breloom", "Technician", "Adamant")
        .with_item("Life Orb")
        .with_moves(["Spore", "Bullet Seed", "Mach Punch", "Rock Tomb"])
        .with_evs(StatTable::new(0, 252, 0, 0, 4, 252))
}

pub(crate) fn ferrothorn() -> CombatantBuild {
    CombatantBuild::new("Ferrothorn", "Iron Barbs", "Relaxed")
        .with_item("Leftovers")
        .with_moves(["Stealth Rock", "Spikes", "Leech Seed", "Power Whip"])
        .with_evs(StatTable::new(252, 0, 88, 0, 168, 0))
        .with_ivs(StatTable::new(31, 31, 31, 31, 31, 0))
}

pub(crate) fn magearna() -> CombatantBuild {
    CombatantBuild::new("Magearna", "Soul-Heart", "Modest")
        .with_item("Choice Specs")
        .with_moves(["Fleur Cannon", "Flash Cannon", "Volt Switch", "Hidden Power Ice"])
        .with_evs(StatTable::new(4, 0, 0, 252, 0, 252))
}

/// A legal gen7ou roster; Breloom at #3 carries the only sleep move
pub(crate) fn ou_roster() -> Roster {
    Roster::from_builds(vec![
        garchomp(),
        landorus(),
        toxapex(),
        breloom(),
        ferrothorn(),
        magearna(),
    ])
}

/// A second legal gen7ou roster
pub(crate) fn opponent_roster() -> Roster {
    Roster::from_builds(vec![
        CombatantBuild::new("Tapu Koko", "Electric Surge", "Naive")
            .with_item("Life Orb")
            .with_moves(["Wild Charge", "Brave Bird", "Hidden Power Ice", "U-turn"])
            .with_evs(StatTable::new(0, 252, 0, 4, 0, 252)),
        CombatantBuild::new("Heatran", "Flash Fire", "Calm")
            .with_item("Leftovers")
            .with_moves(["Magma Storm", "Earth Power", "Stealth Rock", "Toxic"])
            .with_evs(StatTable::new(252, 0, 0, 0, 216, 40)),
        CombatantBuild::new("Zapdos", "Static", "Bold")
            .with_item("Leftovers")
            .with_moves(["Thunderbolt", "Heat Wave", "Roost", "Defog"])
            .with_evs(StatTable::new(248, 0, 244, 0, 0, 16)),
        CombatantBuild::new("Clefable", "Magic Guard", "Modest")
            .with_item("Life Orb")
            .with_moves(["Calm Mind", "Moonblast", "Flamethrower", "Soft-Boiled"])
            .with_evs(StatTable::new(252, 0, 0, 252, 0, 4)),
        CombatantBuild::new("Excadrill", "Mold Breaker", "Jolly")
            .with_item("Focus Sash")
            .with_moves(["Earthquake", "Iron Head", "Rapid Spin", "Stealth Rock"])
            .with_evs(StatTable::new(0, 252, 0, 0, 4, 252)),
        CombatantBuild::new("Rotom-Wash", "Levitate", "Bold")
            .with_item("Leftovers")
            .with_moves(["Hydro Pump", "Volt Switch", "Will-O-Wisp", "Defog"])
            .with_evs(StatTable::new(252, 0, 212, 0, 0, 44)),
    ])
}
