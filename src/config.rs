/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub tuning: TuningConfig,
    pub gamepad: GamepadConfig,
    /// Custom level file; `None` means the embedded level.
    pub level_path: Option<PathBuf>,
    /// Custom theme file; `None` means built-in visuals.
    pub theme_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub tick_rate_ms: u64,
}

#[derive(Clone, Debug)]
pub struct TuningConfig {
    pub player_speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
    pub friction: f32,
    pub eject_velocity: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub interact: Vec<String>,
    pub mode_toggle: Vec<String>,
    pub restart: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    tuning: TomlTuning,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_tile_size")]
    tile_size: u32,
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlTuning {
    #[serde(default = "default_player_speed")]
    player_speed: f32,
    #[serde(default = "default_jump_strength")]
    jump_strength: f32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_friction")]
    friction: f32,
    #[serde(default = "default_eject_velocity")]
    eject_velocity: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_jump")]
    jump: Vec<String>,
    #[serde(default = "default_interact")]
    interact: Vec<String>,
    #[serde(default = "default_mode_toggle")]
    mode_toggle: Vec<String>,
    #[serde(default = "default_restart")]
    restart: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    level_path: Option<String>,
    #[serde(default)]
    theme_path: Option<String>,
}

// ── Defaults ──

fn default_width() -> u32 { 768 }
fn default_height() -> u32 { 512 }
fn default_tile_size() -> u32 { 32 }
fn default_tick_rate() -> u64 { 16 }

fn default_player_speed() -> f32 { 5.0 }
fn default_jump_strength() -> f32 { -20.0 }
fn default_gravity() -> f32 { 1.0 }
fn default_friction() -> f32 { 0.9 }
fn default_eject_velocity() -> f32 { -10.0 }

fn default_jump() -> Vec<String> { vec!["A".into()] }
fn default_interact() -> Vec<String> { vec!["X".into()] }
fn default_mode_toggle() -> Vec<String> { vec!["Y".into()] }
fn default_restart() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            width: default_width(),
            height: default_height(),
            tile_size: default_tile_size(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Default for TomlTuning {
    fn default() -> Self {
        TomlTuning {
            player_speed: default_player_speed(),
            jump_strength: default_jump_strength(),
            gravity: default_gravity(),
            friction: default_friction(),
            eject_velocity: default_eject_velocity(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_jump(),
            interact: default_interact(),
            mode_toggle: default_mode_toggle(),
            restart: default_restart(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        GameConfig {
            display: DisplayConfig {
                width: toml_cfg.display.width,
                height: toml_cfg.display.height,
                tile_size: toml_cfg.display.tile_size.max(1),
                tick_rate_ms: toml_cfg.display.tick_rate_ms,
            },
            tuning: TuningConfig {
                player_speed: toml_cfg.tuning.player_speed,
                jump_strength: toml_cfg.tuning.jump_strength,
                gravity: toml_cfg.tuning.gravity,
                friction: toml_cfg.tuning.friction,
                eject_velocity: toml_cfg.tuning.eject_velocity,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                interact: toml_cfg.gamepad.interact,
                mode_toggle: toml_cfg.gamepad.mode_toggle,
                restart: toml_cfg.gamepad.restart,
                cancel: toml_cfg.gamepad.cancel,
            },
            level_path: toml_cfg.general.level_path.map(|p| resolve(&search_dirs, p)),
            theme_path: toml_cfg.general.theme_path.map(|p| resolve(&search_dirs, p)),
        }
    }
}

/// Resolve a possibly-relative data path against the candidate dirs.
fn resolve(search_dirs: &[PathBuf], path: String) -> PathBuf {
    let p = PathBuf::from(&path);
    if p.is_absolute() {
        return p;
    }
    search_dirs
        .iter()
        .map(|d| d.join(&p))
        .find(|c| c.exists())
        .unwrap_or(p)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_full_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.display.width, 768);
        assert_eq!(cfg.display.height, 512);
        assert_eq!(cfg.display.tile_size, 32);
        assert_eq!(cfg.tuning.player_speed, 5.0);
        assert_eq!(cfg.tuning.jump_strength, -20.0);
        assert_eq!(cfg.tuning.friction, 0.9);
        assert!(cfg.general.level_path.is_none());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: TomlConfig = toml::from_str(
            "[tuning]\nplayer_speed = 7.5\n\n[general]\nlevel_path = \"maps/one.lvl\"\n",
        )
        .unwrap();
        assert_eq!(cfg.tuning.player_speed, 7.5);
        assert_eq!(cfg.tuning.gravity, 1.0);
        assert_eq!(cfg.general.level_path.as_deref(), Some("maps/one.lvl"));
        assert_eq!(cfg.display.tick_rate_ms, 16);
    }

    #[test]
    fn gamepad_lists_parse() {
        let cfg: TomlConfig =
            toml::from_str("[gamepad]\njump = [\"A\", \"B\"]\n").unwrap();
        assert_eq!(cfg.gamepad.jump, vec!["A", "B"]);
        assert_eq!(cfg.gamepad.interact, vec!["X"]);
    }
}
