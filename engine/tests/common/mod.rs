#![allow(dead_code)]

use teamforge_dex::{DexProvider, FormatRuleset, MemoryDex, Roster};

pub const GEN7_JSON: &str = include_str!("../fixtures/gen7.json");

pub const OU_PASTE: &str = "\
Garchomp @ Life Orb
Ability: Rough Skin
EVs: 252 Atk / 4 SpD / 252 Spe
Jolly Nature
- Swords Dance
- Earthquake
- Outrage
- Fire Fang

Landorus-Therian @ Choice Scarf
Ability: Intimidate
EVs: 252 Atk / 4 SpD / 252 Spe
Jolly Nature
- Earthquake
- U-turn
- Stone Edge
- Knock Off

Toxapex @ Black Sludge
Ability: Regenerator
EVs: 252 HP / 252 Def / 4 SpD
Bold Nature
- Scald
- Toxic
- Recover
- Haze

Breloom @ Life Orb
Ability: Technician
EVs: 252 Atk / 4 SpD / 252 Spe
Adamant Nature
- Spore
- Bullet Seed
- Mach Punch
- Rock Tomb

Ferrothorn @ Leftovers
Ability: Iron Barbs
EVs: 252 HP / 88 Def / 168 SpD
Relaxed Nature
IVs: 0 Spe
- Stealth Rock
- Spikes
- Leech Seed
- Power Whip

Magearna @ Choice Specs
Ability: Soul-Heart
EVs: 4 HP / 252 SpA / 252 Spe
Modest Nature
- Fleur Cannon
- Flash Cannon
- Volt Switch
- Hidden Power Ice
";

pub const OPPONENT_PASTE: &str = "\
Tapu Koko @ Life Orb
Ability: Electric Surge
EVs: 252 Atk / 4 SpA / 252 Spe
Naive Nature
- Wild Charge
- Brave Bird
- Hidden Power Ice
- U-turn

Heatran @ Leftovers
Ability: Flash Fire
EVs: 252 HP / 216 SpD / 40 Spe
Calm Nature
- Magma Storm
- Earth Power
- Stealth Rock
- Toxic

Zapdos @ Leftovers
Ability: Static
EVs: 248 HP / 244 Def / 16 Spe
Bold Nature
- Thunderbolt
- Heat Wave
- Roost
- Defog

Clefable @ Life Orb
Ability: Magic Guard
EVs: 252 HP / 252 SpA / 4 Spe
Modest Nature
- Calm Mind
- Moonblast
- Flamethrower
- Soft-Boiled

Excadrill @ Focus Sash
Ability: Mold Breaker
EVs: 252 Atk / 4 SpD / 252 Spe
Jolly Nature
- Earthquake
- Iron Head
- Rapid Spin
- Stealth Rock

Rotom-Wash @ Leftovers
Ability: Levitate
EVs: 252 HP / 212 Def / 44 Spe
Bold Nature
- Hydro Pump
- Volt Switch
- Will-O-Wisp
- Defog
";

pub fn dex() -> MemoryDex {
    MemoryDex::from_json(GEN7_JSON).expect("fixture dex should load")
}

pub fn ou(dex: &dyn DexProvider) -> FormatRuleset {
    dex.require_format("gen7ou").expect("gen7ou fixture").clone()
}

pub fn roster(dex: &dyn DexProvider, paste: &str) -> Roster {
    teamforge_team::import_roster(paste, dex).expect("fixture paste should import")
}
