//! Showdown team paste format
//!
//! ```text
//! Tapu Koko @ Life Orb
//! Ability: Electric Surge
//! EVs: 252 Atk / 4 SpA / 252 Spe
//! Naive Nature
//! - Wild Charge
//! - U-turn
//! ```

use teamforge_dex::{Stat, StatTable, MAX_IV};

use crate::error::ParseError;
use crate::set::TeamSet;

/// Keys Showdown writes that carry nothing a build needs
const IGNORED_KEYS: [&str; 7] = [
    "Shiny",
    "Happiness",
    "Hidden Power",
    "Tera Type",
    "Gigantamax",
    "Dynamax Level",
    "Pokeball",
];

/// Parse every set in a paste. Sets are separated by blank lines;
/// a header line right after a move also starts a new set.
pub fn parse_paste(text: &str) -> Result<Vec<TeamSet>, ParseError> {
    let mut sets = Vec::new();
    let mut current: Option<TeamSet> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() {
            if let Some(set) = current.take() {
                sets.push(set);
            }
            continue;
        }
        // Teambuilder folder/team banners
        if line.starts_with("===") {
            continue;
        }

        let body = line.strip_prefix('-').map(str::trim);
        let attribute = body.unwrap_or(line);

        match current.as_mut() {
            None => {
                if body.is_some() || is_attribute(attribute) {
                    return Err(ParseError::UnrecognizedLine {
                        line: line_no,
                        text: line.to_string(),
                    });
                }
                current = Some(parse_header(line, line_no)?);
            }
            Some(set) => {
                if apply_attribute(set, attribute, line_no)? {
                    continue;
                }
                match body {
                    Some(name) => set.moves.push(name.to_string()),
                    None => {
                        if let Some(done) = current.take() {
                            sets.push(done);
                        }
                        current = Some(parse_header(line, line_no)?);
                    }
                }
            }
        }
    }

    if let Some(set) = current {
        sets.push(set);
    }
    if sets.is_empty() {
        return Err(ParseError::EmptyPaste);
    }
    Ok(sets)
}

/// Write sets back out. Level 100 and 31 IVs are implied and omitted.
pub fn export_paste(sets: &[TeamSet]) -> String {
    let mut blocks = Vec::with_capacity(sets.len());
    for set in sets {
        let mut lines = Vec::new();

        let mut header = match &set.nickname {
            Some(nick) if nick != &set.species => format!("{} ({})", nick, set.species),
            _ => set.species.clone(),
        };
        if let Some(gender) = &set.gender {
            header.push_str(&format!(" ({})", gender));
        }
        if let Some(item) = &set.item {
            header.push_str(&format!(" @ {}", item));
        }
        lines.push(header);

        if let Some(ability) = &set.ability {
            lines.push(format!("Ability: {}", ability));
        }
        if set.level != 100 {
            lines.push(format!("Level: {}", set.level));
        }
        let evs = format_spread(&set.evs, |v| v > 0);
        if !evs.is_empty() {
            lines.push(format!("EVs: {}", evs));
        }
        if let Some(nature) = &set.nature {
            lines.push(format!("{} Nature", nature));
        }
        let ivs = format_spread(&set.ivs, |v| v != MAX_IV);
        if !ivs.is_empty() {
            lines.push(format!("IVs: {}", ivs));
        }
        for mv in &set.moves {
            lines.push(format!("- {}", mv));
        }
        blocks.push(lines.join("\n"));
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn is_attribute(line: &str) -> bool {
    line.ends_with(" Nature")
        || ["Ability:", "Level:", "EVs:", "IVs:"]
            .iter()
            .any(|p| line.starts_with(p))
}

fn is_ignored(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(key, _)| IGNORED_KEYS.contains(&key.trim()))
}

/// Returns true when the line was an attribute of the current set
fn apply_attribute(set: &mut TeamSet, line: &str, line_no: usize) -> Result<bool, ParseError> {
    if let Some(value) = line.strip_prefix("Ability:") {
        set.ability = Some(value.trim().to_string());
    } else if let Some(value) = line.strip_prefix("Level:") {
        set.level = value
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidLevel {
                line: line_no,
                text: line.to_string(),
            })?;
    } else if let Some(value) = line.strip_prefix("EVs:") {
        set.evs = parse_spread(value, StatTable::default(), line_no)?;
    } else if let Some(value) = line.strip_prefix("IVs:") {
        set.ivs = parse_spread(value, StatTable::max_ivs(), line_no)?;
    } else if let Some(nature) = line.strip_suffix(" Nature") {
        set.nature = Some(nature.trim().to_string());
    } else if !is_ignored(line) {
        return Ok(false);
    }
    Ok(true)
}

/// `Nickname (Species) (M) @ Item`, with every part but the species optional
fn parse_header(line: &str, line_no: usize) -> Result<TeamSet, ParseError> {
    let (name_part, item) = match line.split_once(" @ ") {
        Some((name, item)) => (name.trim(), Some(item.trim().to_string())),
        None => (line.trim(), None),
    };

    let mut name_part = name_part;
    let mut gender = None;
    for tag in ["M", "F"] {
        if let Some(rest) = name_part.strip_suffix(&format!(" ({})", tag)) {
            gender = Some(tag.to_string());
            name_part = rest.trim();
        }
    }

    let (nickname, species) = match name_part.strip_suffix(')').and_then(|s| s.rsplit_once(" (")) {
        Some((nick, species)) => (Some(nick.trim().to_string()), species.trim().to_string()),
        None => (None, name_part.to_string()),
    };

    if species.is_empty() {
        return Err(ParseError::InvalidHeader {
            line: line_no,
            text: line.to_string(),
        });
    }

    let mut set = TeamSet::new(species);
    set.nickname = nickname;
    set.gender = gender;
    set.item = item.filter(|i| !i.is_empty());
    Ok(set)
}

/// `252 Atk / 4 SpD / 252 Spe`; unlisted stats keep `base`
fn parse_spread(value: &str, base: StatTable, line_no: usize) -> Result<StatTable, ParseError> {
    let invalid = || ParseError::InvalidSpread {
        line: line_no,
        text: value.trim().to_string(),
    };
    let mut table = base;
    for part in value.split('/') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (amount, stat) = part.split_once(char::is_whitespace).ok_or_else(invalid)?;
        let amount: u16 = amount.trim().parse().map_err(|_| invalid())?;
        let stat = Stat::parse(stat).ok_or_else(invalid)?;
        table.set(stat, amount);
    }
    Ok(table)
}

fn format_spread(table: &StatTable, include: impl Fn(u16) -> bool) -> String {
    table
        .iter()
        .filter(|(_, v)| include(*v))
        .map(|(stat, v)| format!("{} {}", v, stat.label()))
        .collect::<Vec<_>>()
        .join(" / ")
}
