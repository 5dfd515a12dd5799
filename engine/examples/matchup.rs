//! Analyze two pasted teams and print a game plan.
//!
//! cargo run -p teamforge-engine --example matchup -- ours.txt theirs.txt

use std::env;
use std::fs;
use std::process;

use anyhow::{Context, Result};
use teamforge_dex::{MemoryDex, Roster};
use teamforge_engine::{Engine, Side};

const DEX_JSON: &str = include_str!("../tests/fixtures/gen7.json");

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let [ours, theirs] = args.as_slice() else {
        eprintln!("Usage: matchup <our_paste.txt> <their_paste.txt>");
        process::exit(1);
    };

    let dex = MemoryDex::from_json(DEX_JSON).context("loading dex")?;
    let read = |path: &str| -> Result<Roster> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
        teamforge_team::import_roster(&text, &dex).with_context(|| format!("importing {}", path))
    };
    let ours = read(ours.as_str())?;
    let theirs = read(theirs.as_str())?;

    let engine = Engine::new(&dex);
    let ou = engine.ruleset("gen7ou")?;
    for (label, roster) in [("ours", &ours), ("theirs", &theirs)] {
        let report = engine.validate(roster, ou);
        for violation in report.violations() {
            println!("[{}] {}", label, violation);
        }
    }

    let report = engine.analyze(&ours, &theirs)?;

    println!("\n=== Speed order ===\n");
    for entry in &report.speed_order {
        let marker = if entry.side == Side::User { "▲" } else { "▼" };
        println!("  {} {:<18} {}", marker, entry.species, entry.speed);
    }

    println!("\n=== Threats ===\n");
    for threat in report.threats_from(Side::Opponent) {
        println!(
            "  {} → {} with {} ({:?}, {:.0}%)",
            threat.attacker,
            threat.defender,
            threat.move_id,
            threat.class,
            threat.probability * 100.0
        );
    }

    let plan = engine.generate_strategy(&report);
    println!("\n=== Plan ===\n");
    if let Some(lead) = &plan.lead {
        println!("  Lead: {}", lead);
    }
    for win in &plan.win_conditions {
        println!("  {} via {}: {}", win.kind, win.species, win.reason);
    }
    for line in &plan.advice {
        println!("  - {}", line);
    }

    Ok(())
}
