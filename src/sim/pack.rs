//! Level pack loader.
//!
//! ## Sources (priority order):
//!   1. `general.levels_file` from config, if set and readable
//!   2. Built-in embedded levels
//!
//! ## Pack format:
//!   ```text
//!   ## Pack Name
//!   ## Author: name
//!   ---
//!   # Level 1 - Name
//!   <plan rows>
//!   ---
//!   # Level 2 - Name
//!   <plan rows>
//!   ```
//!
//! Levels are separated by a line containing only `---`. Lines starting
//! with `##` before the first separator are pack metadata. Within a level
//! the first `#` line is its name; every other line is a plan row, kept
//! verbatim (rows may differ in length). Empty lines at either end of a
//! level are dropped, rows of spaces are kept.

use std::path::Path;

use log::{info, warn};

use crate::config::GameConfig;
use crate::error::{SimError, SimResult};

/// One level's name and plan rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub rows: Vec<String>,
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Levels for this run: the configured pack, or the embedded set when no
/// pack is configured or it cannot be used.
pub fn load_levels(config: &GameConfig) -> Vec<LevelDef> {
    let Some(path) = &config.levels_file else {
        return embedded_levels();
    };
    match load_pack(path) {
        Ok(levels) => {
            info!("loaded {} levels from {}", levels.len(), path.display());
            levels
        }
        Err(e) => {
            warn!("{e}; using built-in levels");
            embedded_levels()
        }
    }
}

pub fn load_pack(path: &Path) -> SimResult<Vec<LevelDef>> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| SimError::Io { path: path.to_path_buf(), source })?;
    let levels = parse_pack(&content);
    if levels.is_empty() {
        return Err(SimError::EmptyPack(path.to_path_buf()));
    }
    Ok(levels)
}

/// Parse pack text. A text without any `---` is a single level.
pub fn parse_pack(content: &str) -> Vec<LevelDef> {
    let has_separator = content.lines().any(|l| l.trim() == "---");
    let mut levels = vec![];
    let mut section: Vec<&str> = vec![];
    let mut in_levels = !has_separator;

    for line in content.lines() {
        if line.trim() == "---" {
            if in_levels {
                levels.extend(parse_level(&section, levels.len()));
            }
            section.clear();
            in_levels = true;
            continue;
        }
        if in_levels {
            section.push(line);
        }
    }
    if in_levels {
        levels.extend(parse_level(&section, levels.len()));
    }

    levels
}

// ══════════════════════════════════════════════════════════════
// Single-level parsing
// ══════════════════════════════════════════════════════════════

fn parse_level(lines: &[&str], index: usize) -> Option<LevelDef> {
    let mut name = String::new();
    let mut rows: Vec<String> = vec![];

    for line in lines {
        if name.is_empty() && rows.iter().all(|r| r.is_empty()) && line.starts_with('#') {
            name = line.trim_start_matches('#').trim().to_string();
        } else {
            rows.push(line.to_string());
        }
    }

    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    let leading = rows.iter().take_while(|r| r.is_empty()).count();
    rows.drain(..leading);

    if rows.is_empty() {
        return None;
    }
    if name.is_empty() {
        name = format!("Level {}", index + 1);
    }

    Some(LevelDef { name, rows })
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

pub fn embedded_levels() -> Vec<LevelDef> {
    vec![
        make_embedded("First Steps", &[
            "                    ",
            "                    ",
            "                    ",
            "                    ",
            "          o         ",
            "  @      xxx    o   ",
            "xxxxx          xxx  ",
            "    x!!!!!!!!!!x    ",
            "    xxxxxxxxxxxx    ",
        ]),
        make_embedded("Patrol", &[
            "                      ",
            "     |           o    ",
            "                      ",
            "  o       =      xx   ",
            "  xx                  ",
            "@      o    xxx       ",
            "xxxx  xxxx        xxxx",
            "   x!!x  x!!!!!!!!x   ",
            "   xxxx  xxxxxxxxxx   ",
        ]),
        make_embedded("Rain", &[
            "      v     v     v     ",
            "                        ",
            "                        ",
            "  o     o     o     o   ",
            "                        ",
            "@                       ",
            "xxxxxxxxxxxxxxxxxxxxxxxx",
        ]),
    ]
}

fn make_embedded(name: &str, map: &[&str]) -> LevelDef {
    LevelDef {
        name: name.to_string(),
        rows: map.iter().map(|s| s.to_string()).collect(),
    }
}
