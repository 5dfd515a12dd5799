//! Build a team from a species pool against named opponents.
//!
//! cargo run -p teamforge-engine --example build_team -- garchomp,toxapex,... heatran,zapdos [hint]

use std::env;
use std::process;

use anyhow::{Context, Result};
use teamforge_dex::MemoryDex;
use teamforge_engine::{Engine, OpponentInput, StrategyHint};

const DEX_JSON: &str = include_str!("../tests/fixtures/gen7.json");

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: build_team <pool,comma,separated> <opponents,comma,separated> [balanced|hyperoffense|stall]");
        process::exit(1);
    }

    let pool: Vec<&str> = args[0].split(',').map(str::trim).collect();
    let opponents: Vec<&str> = args[1].split(',').map(str::trim).collect();
    let hint = match args.get(2).map(String::as_str) {
        None | Some("balanced") => StrategyHint::Balanced,
        Some("hyperoffense") => StrategyHint::HyperOffense,
        Some("stall") => StrategyHint::Stall,
        Some(other) => anyhow::bail!("unknown hint: {}", other),
    };

    let dex = MemoryDex::from_json(DEX_JSON).context("loading dex")?;
    let engine = Engine::new(&dex);
    let team = engine.build_team(&pool, &OpponentInput::species(opponents), "gen7ou", Some(hint))?;

    println!("\n=== Team ({:?}, {} swaps) ===\n", team.hint, team.swaps);
    for member in &team.members {
        let roles: Vec<String> = member.roles.iter().map(|r| r.to_string()).collect();
        let flag = if member.low_confidence { " (fallback)" } else { "" };
        println!(
            "  • {:<18} {:>6.3}  [{}]{}",
            member.species,
            member.total,
            roles.join(", "),
            flag
        );
    }
    println!("\nAggregate: {:.3}\n", team.aggregate);
    println!("{}", teamforge_team::export_roster(&team.roster, &dex));

    Ok(())
}
