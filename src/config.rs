/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::rules::{SelectionLimits, DEFAULT_MAX_ICONS, DEFAULT_MIN_ICONS};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub round: RoundConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct RoundConfig {
    pub limits: SelectionLimits,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub tick_rate_ms: u64,
    pub toast_ticks: u32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub submit: Vec<String>,
    pub new_game: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    round: TomlRound,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRound {
    #[serde(default = "default_min_icons")]
    min_icons: usize,
    #[serde(default = "default_max_icons")]
    max_icons: usize,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_toast_ticks")]
    toast_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_submit")]
    submit: Vec<String>,
    #[serde(default = "default_new_game")]
    new_game: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default = "default_log_level")]
    log_level: String,
}

// ── Defaults ──

fn default_min_icons() -> usize { DEFAULT_MIN_ICONS }
fn default_max_icons() -> usize { DEFAULT_MAX_ICONS }
fn default_tick_rate() -> u64 { 50 }
fn default_toast_ticks() -> u32 { 60 }   // 3s at 50ms tick

fn default_confirm() -> Vec<String> { vec!["A".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into()] }
fn default_submit() -> Vec<String> { vec!["Start".into()] }
fn default_new_game() -> Vec<String> { vec!["Select".into()] }
fn default_log_level() -> String { "info".into() }

impl Default for TomlRound {
    fn default() -> Self {
        TomlRound {
            min_icons: default_min_icons(),
            max_icons: default_max_icons(),
            seed: None,
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            tick_rate_ms: default_tick_rate(),
            toast_ticks: default_toast_ticks(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            cancel: default_cancel(),
            submit: default_submit(),
            new_game: default_new_game(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) ~/.local/share/iconorder, (4) /usr/share/iconorder.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let Some((text, dir)) = read_config_text(&search_dirs) else {
            return Self::from_toml(TomlConfig::default(), None);
        };
        match Self::parse(&text, Some(&dir)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: config.toml parse error: {e}");
                eprintln!("Using default settings.");
                Self::from_toml(TomlConfig::default(), None)
            }
        }
    }

    /// Build from TOML text. Relative paths resolve against `base_dir` (or CWD).
    pub fn parse(text: &str, base_dir: Option<&Path>) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, base_dir))
    }

    fn from_toml(toml_cfg: TomlConfig, base_dir: Option<&Path>) -> Self {
        let mut limits = SelectionLimits {
            min: toml_cfg.round.min_icons,
            max: toml_cfg.round.max_icons,
        };
        if !limits.is_sane() {
            eprintln!(
                "Warning: icon limits {}..={} are unusable, using {}..={}.",
                limits.min, limits.max, DEFAULT_MIN_ICONS, DEFAULT_MAX_ICONS,
            );
            limits = SelectionLimits::default();
        }

        let log_file = toml_cfg.general.log_file.map(|f| {
            let p = PathBuf::from(f);
            match base_dir {
                Some(dir) if p.is_relative() => dir.join(p),
                _ => p,
            }
        });

        GameConfig {
            round: RoundConfig {
                limits,
                seed: toml_cfg.round.seed,
            },
            display: DisplayConfig {
                tick_rate_ms: toml_cfg.display.tick_rate_ms.max(1),
                toast_ticks: toml_cfg.display.toast_ticks,
            },
            gamepad: GamepadConfig {
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                submit: toml_cfg.gamepad.submit,
                new_game: toml_cfg.gamepad.new_game,
            },
            log_file,
            log_level: toml_cfg.general.log_level,
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/iconorder)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/iconorder");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/iconorder)
    let sys = PathBuf::from("/usr/share/iconorder");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
/// Returns its text and the directory it was found in.
fn read_config_text(search_dirs: &[PathBuf]) -> Option<(String, PathBuf)> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some((text, dir.clone())),
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    None
}
