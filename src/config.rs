//! Run settings from `config.toml`.
//!
//! Looked up next to the executable, then in the CWD. Every key is
//! optional; see `config.toml` at the repository root for the full list.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use crate::sim::level::DEFAULT_FINISH_DELAY;

// ── Resolved settings ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub player: PlayerConfig,
    pub levels_file: Option<PathBuf>,
    pub seed: u64,
    pub max_attempts: u32,
    /// Extra plan symbols: single character → actor kind name.
    pub symbols: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub max_frame_step: f64, // cap on elapsed seconds fed into one frame
    pub sub_step: f64,       // frames are split into slices of at most this
    pub frame_step: f64,     // fixed frame time used by the headless runner
    pub max_frames_per_attempt: u64,
    pub finish_delay: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    pub speed: f64,
    pub gravity: f64,
    pub jump_speed: f64,
}

// ── File layout ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    player: TomlPlayer,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    symbols: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_max_frame_step")]
    max_frame_step: f64,
    #[serde(default = "default_sub_step")]
    sub_step: f64,
    #[serde(default = "default_frame_step")]
    frame_step: f64,
    #[serde(default = "default_max_frames")]
    max_frames_per_attempt: u64,
    #[serde(default = "default_finish_delay")]
    finish_delay: i32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayer {
    #[serde(default = "default_player_speed")]
    speed: f64,
    #[serde(default = "default_gravity")]
    gravity: f64,
    #[serde(default = "default_jump_speed")]
    jump_speed: f64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    levels_file: Option<String>,
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,
}

// ── Defaults ──

/// Bounds on the slicing of one frame. Together they cap a frame at
/// `MAX_FRAME_STEP / MIN_SUB_STEP` sub-steps.
pub const MIN_SUB_STEP: f64 = 1e-4;
pub const MAX_FRAME_STEP: f64 = 1.0;

fn default_max_frame_step() -> f64 { 0.1 }
fn default_sub_step() -> f64 { 0.05 }
fn default_frame_step() -> f64 { 1.0 / 60.0 }
fn default_max_frames() -> u64 { 60 * 60 } // one minute at 60 fps
fn default_finish_delay() -> i32 { DEFAULT_FINISH_DELAY }
fn default_player_speed() -> f64 { 7.0 }
fn default_gravity() -> f64 { 30.0 }
fn default_jump_speed() -> f64 { 17.0 }
fn default_seed() -> u64 { 0x1eaf_c01d }
fn default_max_attempts() -> u32 { 3 }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            max_frame_step: default_max_frame_step(),
            sub_step: default_sub_step(),
            frame_step: default_frame_step(),
            max_frames_per_attempt: default_max_frames(),
            finish_delay: default_finish_delay(),
        }
    }
}

impl Default for TomlPlayer {
    fn default() -> Self {
        TomlPlayer {
            speed: default_player_speed(),
            gravity: default_gravity(),
            jump_speed: default_jump_speed(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_file: None,
            seed: default_seed(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

// ── Loading ──

impl GameConfig {
    /// Settings for this run. Absent keys, or an absent or broken file,
    /// leave the defaults in place.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly. Parse errors fall back to defaults.
    pub fn from_toml_str(text: &str) -> Self {
        let toml_cfg = match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("config parse error: {e}; using default settings");
                TomlConfig::default()
            }
        };
        GameConfig::from_toml(toml_cfg, &[])
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let defaults = TomlTiming::default();
        let mut timing = TimingConfig {
            max_frame_step: toml_cfg.timing.max_frame_step,
            sub_step: toml_cfg.timing.sub_step,
            frame_step: toml_cfg.timing.frame_step,
            max_frames_per_attempt: toml_cfg.timing.max_frames_per_attempt,
            finish_delay: toml_cfg.timing.finish_delay,
        };
        // Non-positive steps would stall the frame loop.
        if !(timing.sub_step > 0.0) {
            warn!("timing.sub_step must be positive, got {}", timing.sub_step);
            timing.sub_step = defaults.sub_step;
        }
        if !(timing.max_frame_step > 0.0) {
            warn!("timing.max_frame_step must be positive, got {}", timing.max_frame_step);
            timing.max_frame_step = defaults.max_frame_step;
        }
        if !(timing.frame_step > 0.0) {
            warn!("timing.frame_step must be positive, got {}", timing.frame_step);
            timing.frame_step = defaults.frame_step;
        }
        if timing.sub_step < MIN_SUB_STEP {
            warn!("timing.sub_step {} is below {MIN_SUB_STEP}, clamped", timing.sub_step);
            timing.sub_step = MIN_SUB_STEP;
        }
        if timing.max_frame_step > MAX_FRAME_STEP {
            warn!("timing.max_frame_step {} is above {MAX_FRAME_STEP}, clamped", timing.max_frame_step);
            timing.max_frame_step = MAX_FRAME_STEP;
        }

        // Resolve a relative levels file against the search dirs, else CWD.
        let levels_file = toml_cfg.general.levels_file.map(|name| {
            let path = PathBuf::from(&name);
            if path.is_absolute() {
                return path;
            }
            search_dirs.iter()
                .map(|d| d.join(&name))
                .find(|p| p.is_file())
                .unwrap_or(path)
        });

        GameConfig {
            timing,
            player: PlayerConfig {
                speed: toml_cfg.player.speed,
                gravity: toml_cfg.player.gravity,
                jump_speed: toml_cfg.player.jump_speed,
            },
            levels_file,
            seed: toml_cfg.general.seed,
            max_attempts: toml_cfg.general.max_attempts.max(1),
            symbols: toml_cfg.symbols,
        }
    }
}

const CONFIG_FILE: &str = "config.toml";

/// Where `config.toml` may live: the executable's directory, then the CWD.
fn candidate_dirs() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .map(|exe| exe.canonicalize().unwrap_or(exe))
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    let mut dirs: Vec<PathBuf> = exe_dir.into_iter().collect();
    if let Some(cwd) = std::env::current_dir().ok().filter(|cwd| !dirs.contains(cwd)) {
        dirs.push(cwd);
    }
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }
    dirs
}

/// First config file found wins, even if it turns out to be unusable.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    let Some(path) = search_dirs.iter().map(|d| d.join(CONFIG_FILE)).find(|p| p.is_file()) else {
        return TomlConfig::default();
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            return TomlConfig::default();
        }
    };
    match toml::from_str(&text) {
        Ok(cfg) => {
            info!("loaded {}", path.display());
            cfg
        }
        Err(e) => {
            warn!("{} parse error: {e}; using default settings", path.display());
            TomlConfig::default()
        }
    }
}
