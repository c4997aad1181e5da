/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub timing: TimingConfig,
    pub ui: UiConfig,
}

/// Everything the progression state machine needs to run a session.
#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub highscore_key: String,
    pub default_deviation: u8,
    pub default_box_count: usize,
    pub min_deviation: u8,
    pub deviation_factor: u8,
    pub boxes_per_level: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate_ms: u64,
    pub reveal_ms: u64,        // decoy fade-out duration
    pub restart_delay_ms: u64, // hold after the fade before the next session
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub max_boxes_per_row: usize,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    ui: TomlUi,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_highscore_key")]
    highscore_key: String,
    #[serde(default = "default_deviation")]
    default_deviation: u8,
    #[serde(default = "default_box_count")]
    default_box_count: usize,
    #[serde(default = "default_min_deviation")]
    min_deviation: u8,
    #[serde(default = "default_deviation_factor")]
    deviation_factor: u8,
    #[serde(default = "default_boxes_per_level")]
    boxes_per_level: Vec<usize>,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_reveal")]
    reveal_ms: u64,
    #[serde(default = "default_restart_delay")]
    restart_delay_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlUi {
    #[serde(default = "default_boxes_per_row")]
    max_boxes_per_row: usize,
}

// ── Defaults ──

fn default_highscore_key() -> String { "HUEHUNT_HIGHSCORE".into() }
fn default_deviation() -> u8 { 60 }
fn default_box_count() -> usize { 3 }
fn default_min_deviation() -> u8 { 3 }
fn default_deviation_factor() -> u8 { 2 }
fn default_boxes_per_level() -> Vec<usize> {
    vec![3, 4, 6, 9, 9, 9, 12, 15, 16, 16, 20, 24, 25, 30, 36, 36, 36, 49]
}

fn default_tick_rate() -> u64 { 60 }
fn default_reveal() -> u64 { 1500 }
fn default_restart_delay() -> u64 { 1000 }

fn default_boxes_per_row() -> usize { 8 }

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            highscore_key: default_highscore_key(),
            default_deviation: default_deviation(),
            default_box_count: default_box_count(),
            min_deviation: default_min_deviation(),
            deviation_factor: default_deviation_factor(),
            boxes_per_level: default_boxes_per_level(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate_ms: default_tick_rate(),
            reveal_ms: default_reveal(),
            restart_delay_ms: default_restart_delay(),
        }
    }
}

impl Default for TomlUi {
    fn default() -> Self {
        TomlUi {
            max_boxes_per_row: default_boxes_per_row(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let mut boxes_per_level = toml_cfg.rules.boxes_per_level;
        // An empty level table would leave no box count to clamp to.
        if boxes_per_level.is_empty() {
            boxes_per_level = default_boxes_per_level();
        }

        GameConfig {
            rules: RulesConfig {
                highscore_key: toml_cfg.rules.highscore_key,
                default_deviation: toml_cfg.rules.default_deviation,
                default_box_count: toml_cfg.rules.default_box_count.max(1),
                min_deviation: toml_cfg.rules.min_deviation,
                deviation_factor: toml_cfg.rules.deviation_factor,
                boxes_per_level,
            },
            timing: TimingConfig {
                tick_rate_ms: toml_cfg.timing.tick_rate_ms.max(1),
                reveal_ms: toml_cfg.timing.reveal_ms,
                restart_delay_ms: toml_cfg.timing.restart_delay_ms,
            },
            ui: UiConfig {
                max_boxes_per_row: toml_cfg.ui.max_boxes_per_row.max(1),
            },
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so /usr/bin/huehunt → /usr/games/huehunt
        // still finds data relative to the real binary.
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

    // 3. XDG data home (~/.local/share/huehunt)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/huehunt");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
