/// Visual theme loader.
///
/// `theme.toml` maps each entity kind to a glyph and an RGB color. The
/// theme is pure presentation: a missing or broken file warns and falls
/// back to the built-in look, and the simulation is never affected.

use serde::Deserialize;
use std::path::Path;

use crate::domain::entity::Visual;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background: Visual,
    pub terrain: Visual,
    pub prop_dead: Visual,
    pub prop_alive: Visual,
    pub movable: Visual,
    pub player: Visual,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Visual { glyph: ' ', color: (135, 206, 235) },
            terrain: Visual { glyph: '#', color: (139, 69, 19) },
            prop_dead: Visual { glyph: '*', color: (100, 100, 100) },
            prop_alive: Visual { glyph: '@', color: (50, 200, 50) },
            movable: Visual { glyph: '%', color: (160, 82, 45) },
            player: Visual { glyph: '&', color: (255, 220, 120) },
        }
    }
}

// ── TOML schema ──

#[derive(Deserialize, Debug, Default)]
struct TomlTheme {
    #[serde(default)]
    background: TomlVisual,
    #[serde(default)]
    terrain: TomlVisual,
    #[serde(default)]
    prop_dead: TomlVisual,
    #[serde(default)]
    prop_alive: TomlVisual,
    #[serde(default)]
    movable: TomlVisual,
    #[serde(default)]
    player: TomlVisual,
}

#[derive(Deserialize, Debug, Default)]
struct TomlVisual {
    glyph: Option<String>,
    color: Option<[u8; 3]>,
}

impl TomlVisual {
    fn apply(&self, base: Visual) -> Visual {
        Visual {
            glyph: self
                .glyph
                .as_ref()
                .and_then(|s| s.chars().next())
                .unwrap_or(base.glyph),
            color: self.color.map(|[r, g, b]| (r, g, b)).unwrap_or(base.color),
        }
    }
}

impl Theme {
    /// Theme pointed to by the config, or the default. A broken file is a
    /// warning, never a crash.
    pub fn load(path: Option<&Path>) -> Theme {
        let base = Theme::default();
        let Some(path) = path else { return base };
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                return base;
            }
        };
        match toml::from_str::<TomlTheme>(&text) {
            Ok(t) => Theme {
                background: t.background.apply(base.background),
                terrain: t.terrain.apply(base.terrain),
                prop_dead: t.prop_dead.apply(base.prop_dead),
                prop_alive: t.prop_alive.apply(base.prop_alive),
                movable: t.movable.apply(base.movable),
                player: t.player.apply(base.player),
            },
            Err(e) => {
                eprintln!("Warning: theme parse error in {}: {e}", path.display());
                base
            }
        }
    }
}
