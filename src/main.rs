/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::entity::{FrameInput, Mode};
use domain::grid::{TileGrid, TileVisuals};
use sim::event::GameEvent;
use sim::level::{self, Level};
use sim::step;
use sim::world::{Tuning, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::theme::Theme;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Status messages stay up this many ticks.
const MESSAGE_TTL: u32 = 45;

fn main() {
    let config = GameConfig::load();
    let theme = Theme::load(config.theme_path.as_deref());
    let level = level::load(config.level_path.as_deref());

    let mut world = build_world(&level, &config, &theme);

    let mut renderer = Renderer::new(&theme);
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &mut renderer, &level, &config, &theme);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }
}

/// Build a fresh world from the level map. Also used for restart.
fn build_world(level: &Level, config: &GameConfig, theme: &Theme) -> WorldState {
    let tile = config.display.tile_size as f32;
    let cols = (config.display.width / config.display.tile_size) as usize;
    let rows = (config.display.height / config.display.tile_size) as usize;
    let visuals = TileVisuals {
        background: theme.background,
        terrain: theme.terrain,
        prop_dead: theme.prop_dead,
        movable: theme.movable,
    };
    let build = TileGrid::build(&level.row_strs(), cols, rows, tile, &visuals);
    let tuning = Tuning {
        player_speed: config.tuning.player_speed,
        jump_strength: config.tuning.jump_strength,
        gravity: config.tuning.gravity,
        friction: config.tuning.friction,
        eject_velocity: config.tuning.eject_velocity,
    };
    WorldState::new(build, tuning, theme.prop_alive)
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    level: &Level,
    config: &GameConfig,
    theme: &Theme,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.display.tick_rate_ms);

    // Edge-triggered actions are latched between ticks so a press landing
    // between two simulation steps is never dropped.
    let mut pending_interact = false;
    let mut pending_toggle = false;

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed()
            || kb.any_pressed(KEYS_QUIT)
            || kb.any_pressed(&[KeyCode::Esc])
            || gp.cancel_pressed()
        {
            break;
        }

        if kb.any_pressed(KEYS_RESTART) || gp.restart_pressed() {
            *world = build_world(level, config, theme);
            world.set_message(format!("Level '{}' restarted", level.name), MESSAGE_TTL);
        }

        if kb.any_pressed(KEYS_INTERACT) || gp.interact_pressed() {
            pending_interact = true;
        }
        if kb.any_pressed(KEYS_TOGGLE) || gp.mode_toggle_pressed() {
            pending_toggle = true;
        }

        if last_tick.elapsed() >= tick_rate {
            let frame_input = FrameInput {
                left: kb.any_held(KEYS_LEFT) || gp.left_held(),
                right: kb.any_held(KEYS_RIGHT) || gp.right_held(),
                up: kb.any_held(KEYS_UP) || gp.up_held() || gp.jump_held(),
                down: kb.any_held(KEYS_DOWN) || gp.down_held(),
                interact: pending_interact,
                toggle_mode: pending_toggle,
            };
            pending_interact = false;
            pending_toggle = false;

            let events = step::step(world, frame_input);
            process_events(world, &events);
            world.tick_message();

            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_events(world: &mut WorldState, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::ModeToggled(Mode::Platformer) => {
                world.set_message("Mode: platformer", MESSAGE_TTL);
            }
            GameEvent::ModeToggled(Mode::TopDown) => {
                world.set_message("Mode: top-down", MESSAGE_TTL);
            }
            GameEvent::PropPainted(..) => {
                world.set_message("Painted! The prop is awake", MESSAGE_TTL);
            }
            GameEvent::CrateCaptured(_) => {
                world.set_message("A crate landed on your head", MESSAGE_TTL);
            }
            GameEvent::CrateEjected(_) => {
                world.set_message("Crate launched!", MESSAGE_TTL);
            }
            GameEvent::PlayerJumped | GameEvent::PlayerLanded => {}
        }
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_INTERACT: &[KeyCode] = &[KeyCode::Char('z'), KeyCode::Char('Z')];
const KEYS_TOGGLE: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];
